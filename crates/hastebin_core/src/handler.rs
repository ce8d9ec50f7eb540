//! Document write/read orchestration.
//!
//! The handler owns no per-request state. It validates input, draws candidate
//! keys until the store accepts one, and turns every store outcome into an
//! [`AppError`] whose [`kind`](AppError::kind) the transport maps to a status.

use crate::config::Config;
use crate::constants::MAX_KEY_LENGTH;
use crate::error::AppError;
use crate::keys::{key_generator_for, KeyGenerator};
use crate::store::DocumentStore;
use std::sync::Arc;

/// Entry point for document writes and reads.
#[derive(Clone)]
pub struct DocumentHandler {
    store: Arc<dyn DocumentStore>,
    key_generator: Arc<dyn KeyGenerator>,
    max_length: usize,
    key_length: usize,
    max_key_attempts: usize,
}

impl DocumentHandler {
    /// Build a handler using the key generator selected in `config`.
    ///
    /// # Arguments
    /// - `store`: Backend shared with the rest of the process.
    /// - `config`: Size and key limits.
    ///
    /// # Returns
    /// A new [`DocumentHandler`].
    pub fn new(store: Arc<dyn DocumentStore>, config: &Config) -> Self {
        Self::with_key_generator(store, key_generator_for(config.key_generator), config)
    }

    /// Build a handler with an explicit key generator.
    ///
    /// `key_length` is clamped to the range every store accepts and at least
    /// one key attempt is always made.
    pub fn with_key_generator(
        store: Arc<dyn DocumentStore>,
        key_generator: Arc<dyn KeyGenerator>,
        config: &Config,
    ) -> Self {
        Self {
            store,
            key_generator,
            max_length: config.max_length,
            key_length: config.key_length.clamp(1, MAX_KEY_LENGTH),
            max_key_attempts: config.max_key_attempts.max(1),
        }
    }

    /// Largest accepted document, in bytes.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    fn validate(&self, content: &str) -> Result<(), AppError> {
        if content.is_empty() {
            return Err(AppError::InvalidInput("Document is empty".to_string()));
        }
        if content.len() > self.max_length {
            return Err(AppError::InvalidInput(format!(
                "Document exceeds maximum length of {} bytes",
                self.max_length
            )));
        }
        Ok(())
    }

    /// Store `content` under a freshly generated key.
    ///
    /// Candidate keys already present are skipped; the final write is an
    /// atomic insert-if-absent, so a concurrent writer that grabbed the same
    /// key between the check and the write only costs another attempt.
    ///
    /// # Returns
    /// The new document key.
    ///
    /// # Errors
    /// - [`AppError::InvalidInput`] for empty or oversized content.
    /// - A storage-kind error when the backend fails.
    /// - [`AppError::KeyGenerationExhausted`] when no free key turned up.
    pub fn handle_post(&self, content: &str) -> Result<String, AppError> {
        self.validate(content)?;

        for attempt in 1..=self.max_key_attempts {
            let key = self.key_generator.generate(self.key_length);
            if self.store.exists(&key)? {
                tracing::debug!("Key {} already in use (attempt {})", key, attempt);
                continue;
            }
            if self.store.add(&key, content)? {
                tracing::info!("Added document {} ({} bytes)", key, content.len());
                return Ok(key);
            }
            tracing::debug!("Key {} taken concurrently (attempt {})", key, attempt);
        }

        tracing::error!(
            "Gave up finding a free key after {} attempts",
            self.max_key_attempts
        );
        Err(AppError::KeyGenerationExhausted {
            attempts: self.max_key_attempts,
        })
    }

    /// Fetch a document for display.
    ///
    /// # Arguments
    /// - `key`: Document key.
    /// - `skip_expire`: Bypass expiration, used for static documents.
    ///
    /// # Returns
    /// The stored text, verbatim.
    ///
    /// # Errors
    /// [`AppError::NotFound`] when the document is absent or unreadable.
    pub fn handle_get(&self, key: &str, skip_expire: bool) -> Result<String, AppError> {
        self.lookup(key, skip_expire)
    }

    /// Fetch a document for raw download.
    ///
    /// Same lookup as [`handle_get`](Self::handle_get); only the caller's
    /// presentation differs.
    pub fn handle_raw_get(&self, key: &str, skip_expire: bool) -> Result<String, AppError> {
        self.lookup(key, skip_expire)
    }

    fn lookup(&self, key: &str, skip_expire: bool) -> Result<String, AppError> {
        match self.store.get(key, skip_expire) {
            Ok(Some(content)) => {
                tracing::debug!("Retrieved document {}", key);
                Ok(content)
            }
            Ok(None) => {
                tracing::debug!("Document not found: {}", key);
                Err(AppError::NotFound)
            }
            Err(err) => {
                tracing::error!("Failed to read document {}: {}", key, err);
                Err(AppError::NotFound)
            }
        }
    }
}
