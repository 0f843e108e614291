//! Admin password handling
//!
//! Only a SHA-256 digest of the password is persisted. An absent record
//! means the password was never changed and the default applies.

use sha2::{Digest, Sha256};

/// Password in effect until the admin sets one
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

/// Hex-encoded SHA-256 digest of `password`
#[must_use]
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"rifa-admin:");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check `candidate` against a stored digest (or the default when `None`)
#[must_use]
pub fn verify_password(candidate: &str, stored_digest: Option<&str>) -> bool {
    let expected = stored_digest.map_or_else(|| hash_password(DEFAULT_ADMIN_PASSWORD), str::to_string);
    constant_time_eq(hash_password(candidate).as_bytes(), expected.as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_password_applies_when_unset() {
        assert!(verify_password("admin", None));
        assert!(!verify_password("Admin", None));
    }

    #[test]
    fn stored_digest_replaces_default() {
        let digest = hash_password("s3cret");
        assert_eq!(digest.len(), 64);
        assert!(verify_password("s3cret", Some(&digest)));
        assert!(!verify_password("admin", Some(&digest)));
    }
}
