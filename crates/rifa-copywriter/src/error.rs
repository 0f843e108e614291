//! Copywriter errors

/// Description generation failures
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    /// No API key configured
    #[error("API key missing")]
    MissingApiKey,

    /// Transport or decoding failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the model endpoint
    #[error("model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response carried no text
    #[error("model returned no text")]
    EmptyResponse,
}

impl CopyError {
    /// Check if the generator is simply not configured
    #[inline]
    #[must_use]
    pub fn is_unconfigured(&self) -> bool {
        matches!(self, Self::MissingApiKey)
    }

    /// Check if the operation can be retried
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::MissingApiKey | Self::EmptyResponse => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_retry_classification() {
        let throttled = CopyError::Status {
            status: 429,
            body: String::new(),
        };
        assert!(throttled.is_retryable());

        let bad_request = CopyError::Status {
            status: 400,
            body: "bad".to_string(),
        };
        assert!(!bad_request.is_retryable());
        assert_eq!(bad_request.to_string(), "model endpoint returned 400: bad");
    }

    #[test]
    fn missing_key_is_unconfigured() {
        assert!(CopyError::MissingApiKey.is_unconfigured());
        assert!(!CopyError::EmptyResponse.is_unconfigured());
    }
}
