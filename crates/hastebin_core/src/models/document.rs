//! Document record and the payloads exchanged with clients.

use crate::constants::MAX_KEY_LENGTH;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored document, bincode-encoded by the persistent backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub key: String,
    pub content: String,
    pub is_static: bool,
    pub created_at: DateTime<Utc>,
    /// Always `None` for static documents.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Create a document stamped with the current time.
    ///
    /// # Arguments
    /// - `key`: Document key.
    /// - `content`: Document body.
    /// - `is_static`: Whether the document is exempt from expiration.
    /// - `expires_at`: Expiration instant; ignored for static documents.
    ///
    /// # Returns
    /// A new [`Document`].
    pub fn new(
        key: &str,
        content: &str,
        is_static: bool,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            key: key.to_string(),
            content: content.to_string(),
            is_static,
            created_at: Utc::now(),
            expires_at: if is_static { None } else { expires_at },
        }
    }

    /// Whether the document has passed its expiration instant at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) if !self.is_static => expires_at <= now,
            _ => false,
        }
    }
}

/// Check that `key` is addressable by every store backend.
///
/// Keys are 1 to 128 characters of ASCII letters, digits, `_`, `-` or `.`.
/// Anything else can never be stored, so lookups report it as absent.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_KEY_LENGTH
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.'))
}

/// Response body for a successful write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateDocumentResponse {
    pub key: String,
}

/// Response body for a document read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentResponse {
    pub key: String,
    pub data: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn static_documents_never_expire() {
        let past = Utc::now() - Duration::hours(1);
        let doc = Document::new("about", "About us", true, Some(past));
        assert_eq!(doc.expires_at, None);
        assert!(!doc.is_expired_at(Utc::now() + Duration::days(365)));
    }

    #[test]
    fn expiration_is_inclusive_of_the_deadline() {
        let doc = Document::new("abc", "body", false, Some(Utc::now()));
        let deadline = doc.expires_at.expect("deadline");
        assert!(doc.is_expired_at(deadline));
        assert!(!doc.is_expired_at(deadline - Duration::seconds(1)));
    }

    #[test]
    fn key_validation_rejects_paths_and_empty_keys() {
        assert!(is_valid_key("aB3xZ"));
        assert!(is_valid_key("about.md"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("../etc/passwd"));
        assert!(!is_valid_key("has space"));
        assert!(!is_valid_key(&"k".repeat(MAX_KEY_LENGTH + 1)));
    }
}
