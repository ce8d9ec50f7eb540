//! Document storage trait and backends.
//!
//! Every backend honors the same contract: keys are unique, `add` is an
//! atomic insert-if-absent, static documents never expire, and failures come
//! back as [`AppError`] values instead of panics.

/// In-process backend.
pub mod memory;
/// Embedded redb backend persisted to a single file.
pub mod redb_store;


pub use memory::MemoryStore;
pub use redb_store::RedbStore;

use crate::config::{Config, StoreKind};
use crate::error::AppError;
use crate::models::document::is_valid_key;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// Persistence contract shared by all backends.
pub trait DocumentStore: Send + Sync {
    /// Report whether a document for `key` is currently retrievable.
    ///
    /// # Returns
    /// `Ok(false)` for malformed, missing, or expired keys.
    ///
    /// # Errors
    /// Returns an error when the backend cannot be read.
    fn exists(&self, key: &str) -> Result<bool, AppError>;

    /// Unconditionally write `content` under `key`.
    ///
    /// `is_static` marks the document as exempt from expiration. This path is
    /// for seeding configured documents; user writes go through [`add`].
    ///
    /// [`add`]: DocumentStore::add
    ///
    /// # Errors
    /// Returns an error for malformed keys or when the write fails. A failed
    /// write leaves no partial document behind.
    fn set(&self, key: &str, content: &str, is_static: bool) -> Result<(), AppError>;

    /// Insert `content` under `key` only if the key is free.
    ///
    /// The existence check and the write happen atomically, so two writers
    /// racing on one key cannot both succeed. An expired document that has not
    /// been swept yet counts as free and is replaced.
    ///
    /// # Returns
    /// `Ok(true)` when inserted, `Ok(false)` when the key was already taken.
    ///
    /// # Errors
    /// Returns an error for malformed keys or when the write fails.
    fn add(&self, key: &str, content: &str) -> Result<bool, AppError>;

    /// Fetch the content stored under `key`.
    ///
    /// `skip_expire` bypasses the expiration check for this read.
    ///
    /// # Returns
    /// `Ok(None)` when the key is malformed, missing, or expired.
    ///
    /// # Errors
    /// Returns an error when the backend cannot be read or decoded.
    fn get(&self, key: &str, skip_expire: bool) -> Result<Option<String>, AppError>;

    /// Remove every non-static document whose expiration has passed.
    ///
    /// # Returns
    /// Number of documents removed.
    ///
    /// # Errors
    /// Returns an error when the sweep cannot complete.
    fn purge_expired(&self) -> Result<usize, AppError>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}

/// Lifetime applied to non-static documents at write time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpirationPolicy {
    ttl: Option<Duration>,
}

impl ExpirationPolicy {
    /// Keep documents forever.
    pub fn never() -> Self {
        Self { ttl: None }
    }

    /// Expire documents `ttl` after they are written.
    pub fn after(ttl: Duration) -> Self {
        Self { ttl: Some(ttl) }
    }

    /// Build the policy described by `config`.
    pub fn from_config(config: &Config) -> Self {
        match config.expire_after_secs {
            Some(secs) => Self::after(
                i64::try_from(secs)
                    .ok()
                    .and_then(Duration::try_seconds)
                    .unwrap_or(Duration::MAX),
            ),
            None => Self::never(),
        }
    }

    /// Expiration instant for a document written at `now`.
    pub fn expires_at(&self, now: DateTime<Utc>, is_static: bool) -> Option<DateTime<Utc>> {
        if is_static {
            return None;
        }
        self.ttl.and_then(|ttl| now.checked_add_signed(ttl))
    }
}

pub(crate) fn ensure_writable_key(key: &str) -> Result<(), AppError> {
    if is_valid_key(key) {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "Invalid document key '{}'",
            key
        )))
    }
}

/// Open the backend selected by `config`.
///
/// # Returns
/// A shared store handle.
///
/// # Errors
/// Returns an error when the persistent backend cannot be opened.
pub fn open_store(config: &Config) -> Result<Arc<dyn DocumentStore>, AppError> {
    let policy = ExpirationPolicy::from_config(config);
    let store: Arc<dyn DocumentStore> = match config.store {
        StoreKind::Redb => Arc::new(RedbStore::open(&config.data_path, policy)?),
        StoreKind::Memory => Arc::new(MemoryStore::new(policy)),
    };
    tracing::info!(
        "Using {} document store (expiration: {})",
        store.backend_name(),
        config
            .expire_after_secs
            .map(|secs| format!("{}s", secs))
            .unwrap_or_else(|| "never".to_string())
    );
    Ok(store)
}
