//! Error types for record storage

use std::path::PathBuf;

/// Errors raised by a [`Storage`](crate::Storage) backend or a typed record
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Key contains characters a backend cannot address
    #[error("invalid storage key: '{0}'")]
    InvalidKey(String),

    /// IO error in a file-backed store
    #[error("io error on {path}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Stored value is not valid JSON for the expected record type
    #[error("corrupt record '{key}': {source}")]
    Corrupt {
        /// Record key
        key: String,
        /// Parse error
        #[source]
        source: serde_json::Error,
    },

    /// Value could not be serialized
    #[error("failed to serialize record '{key}': {source}")]
    Serialize {
        /// Record key
        key: String,
        /// Serializer error
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if the error means stored data is unreadable rather than unreachable
    #[inline]
    #[must_use]
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display_names_path() {
        let err = StoreError::io_error(
            "/tmp/rifa/trd_config_v2.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("trd_config_v2.json"));
        assert!(!err.is_corruption());
    }

    #[test]
    fn corrupt_is_corruption() {
        let source = serde_json::from_str::<u32>("{").unwrap_err();
        let err = StoreError::Corrupt {
            key: "trd_tickets_v2".to_string(),
            source,
        };
        assert!(err.is_corruption());
        assert!(err.to_string().starts_with("corrupt record 'trd_tickets_v2'"));
    }
}
