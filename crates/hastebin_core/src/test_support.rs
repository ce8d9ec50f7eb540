//! Shared test-only helpers for hastebin_core.

use crate::error::AppError;
use crate::keys::KeyGenerator;
use crate::store::{DocumentStore, ExpirationPolicy, RedbStore};
use std::collections::VecDeque;
use std::sync::Mutex;
use tempfile::TempDir;

/// Creates an isolated on-disk store and returns it with the temp dir.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing file.
///
/// # Panics
/// Panics if temp-dir creation or database initialization fails.
pub(crate) fn setup_temp_redb(policy: ExpirationPolicy) -> (RedbStore, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let data_dir = temp_dir.path().join("data");
    let store = RedbStore::open(data_dir.to_str().expect("data dir"), policy).expect("store");
    (store, temp_dir)
}

/// Generator that replays a fixed list of keys, then repeats the last one.
pub(crate) struct ScriptedKeyGenerator {
    keys: Mutex<VecDeque<String>>,
}

impl ScriptedKeyGenerator {
    pub(crate) fn new(keys: &[&str]) -> Self {
        Self {
            keys: Mutex::new(keys.iter().map(|k| k.to_string()).collect()),
        }
    }
}

impl KeyGenerator for ScriptedKeyGenerator {
    fn generate(&self, _length: usize) -> String {
        let mut keys = self.keys.lock().expect("keys lock");
        if keys.len() > 1 {
            keys.pop_front().unwrap_or_default()
        } else {
            keys.front().cloned().unwrap_or_default()
        }
    }
}

/// Store whose every operation fails like a full or unreadable disk.
pub(crate) struct FailingStore;

fn disk_error() -> AppError {
    AppError::Io(std::io::Error::other("simulated disk failure"))
}

impl DocumentStore for FailingStore {
    fn exists(&self, _key: &str) -> Result<bool, AppError> {
        Ok(false)
    }

    fn set(&self, _key: &str, _content: &str, _is_static: bool) -> Result<(), AppError> {
        Err(disk_error())
    }

    fn add(&self, _key: &str, _content: &str) -> Result<bool, AppError> {
        Err(disk_error())
    }

    fn get(&self, _key: &str, _skip_expire: bool) -> Result<Option<String>, AppError> {
        Err(disk_error())
    }

    fn purge_expired(&self) -> Result<usize, AppError> {
        Err(disk_error())
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}
