//! In-process document store.

use super::{ensure_writable_key, DocumentStore, ExpirationPolicy};
use crate::error::AppError;
use crate::models::document::{is_valid_key, Document};
use chrono::Utc;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Map-backed store guarded by a single `RwLock`.
///
/// Reads share the lock; `add` checks and inserts under one write guard.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, Document>>,
    policy: ExpirationPolicy,
}

impl MemoryStore {
    /// Create an empty store with the given expiration policy.
    pub fn new(policy: ExpirationPolicy) -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            policy,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Document>>, AppError> {
        self.documents
            .read()
            .map_err(|_| AppError::StorageMessage("Memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Document>>, AppError> {
        self.documents
            .write()
            .map_err(|_| AppError::StorageMessage("Memory store lock poisoned".to_string()))
    }

    fn build(&self, key: &str, content: &str, is_static: bool) -> Document {
        let expires_at = self.policy.expires_at(Utc::now(), is_static);
        Document::new(key, content, is_static, expires_at)
    }
}

impl DocumentStore for MemoryStore {
    fn exists(&self, key: &str) -> Result<bool, AppError> {
        if !is_valid_key(key) {
            return Ok(false);
        }
        let now = Utc::now();
        Ok(self
            .read()?
            .get(key)
            .is_some_and(|doc| !doc.is_expired_at(now)))
    }

    fn set(&self, key: &str, content: &str, is_static: bool) -> Result<(), AppError> {
        ensure_writable_key(key)?;
        let document = self.build(key, content, is_static);
        self.write()?.insert(key.to_string(), document);
        Ok(())
    }

    fn add(&self, key: &str, content: &str) -> Result<bool, AppError> {
        ensure_writable_key(key)?;
        let now = Utc::now();
        let mut documents = self.write()?;
        match documents.entry(key.to_string()) {
            Entry::Occupied(slot) if !slot.get().is_expired_at(now) => Ok(false),
            Entry::Occupied(mut slot) => {
                slot.insert(self.build(key, content, false));
                Ok(true)
            }
            Entry::Vacant(slot) => {
                slot.insert(self.build(key, content, false));
                Ok(true)
            }
        }
    }

    fn get(&self, key: &str, skip_expire: bool) -> Result<Option<String>, AppError> {
        if !is_valid_key(key) {
            return Ok(None);
        }
        let now = Utc::now();
        let documents = self.read()?;
        Ok(documents
            .get(key)
            .filter(|doc| skip_expire || !doc.is_expired_at(now))
            .map(|doc| doc.content.clone()))
    }

    fn purge_expired(&self) -> Result<usize, AppError> {
        let now = Utc::now();
        let mut documents = self.write()?;
        let before = documents.len();
        documents.retain(|_, doc| !doc.is_expired_at(now));
        Ok(before - documents.len())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
