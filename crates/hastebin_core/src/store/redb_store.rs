//! Document storage backed by an embedded redb file.

use super::{ensure_writable_key, DocumentStore, ExpirationPolicy};
use crate::constants::REDB_FILE_NAME;
use crate::error::AppError;
use crate::models::document::{is_valid_key, Document};
use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable, TableDefinition};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Canonical document rows (`Document`, bincode-encoded).
const DOCUMENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("documents");

/// File-backed store.
///
/// redb allows one write transaction at a time, which makes the
/// check-then-insert in [`DocumentStore::add`] atomic across threads. Reads use
/// MVCC snapshots and never wait on writers.
pub struct RedbStore {
    db: Arc<redb::Database>,
    path: PathBuf,
    policy: ExpirationPolicy,
}

fn decode(bytes: &[u8]) -> Result<Document, AppError> {
    Ok(bincode::deserialize(bytes)?)
}

fn encode(document: &Document) -> Result<Vec<u8>, AppError> {
    Ok(bincode::serialize(document)?)
}

impl RedbStore {
    /// Open (or create) the database file inside `data_dir`.
    ///
    /// # Arguments
    /// - `data_dir`: Directory holding the database file; created if missing.
    /// - `policy`: Expiration applied to documents written through this handle.
    ///
    /// # Returns
    /// A ready [`RedbStore`] with its table initialized.
    ///
    /// # Errors
    /// Returns an error when the directory or database cannot be opened, or
    /// when another process already holds the file.
    pub fn open(data_dir: &str, policy: ExpirationPolicy) -> Result<Self, AppError> {
        std::fs::create_dir_all(data_dir)?;
        let path = Path::new(data_dir).join(REDB_FILE_NAME);

        let db = match redb::Database::create(&path) {
            Ok(db) => db,
            Err(redb::DatabaseError::DatabaseAlreadyOpen) => {
                return Err(AppError::StorageMessage(format!(
                    "Database at {} is already open in another process.\n\
                    Stop the other hastebin instance, or set DATA_PATH to a different directory.",
                    path.display()
                )));
            }
            Err(err) => return Err(err.into()),
        };

        let write_txn = db.begin_write()?;
        write_txn.open_table(DOCUMENTS)?;
        write_txn.commit()?;

        tracing::debug!("Opened document database at {}", path.display());
        Ok(Self {
            db: Arc::new(db),
            path,
            policy,
        })
    }

    /// Location of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self, key: &str) -> Result<Option<Document>, AppError> {
        let read_txn = self.db.begin_read()?;
        let documents = read_txn.open_table(DOCUMENTS)?;
        match documents.get(key)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    fn build(&self, key: &str, content: &str, is_static: bool, now: DateTime<Utc>) -> Document {
        Document::new(key, content, is_static, self.policy.expires_at(now, is_static))
    }
}

impl DocumentStore for RedbStore {
    fn exists(&self, key: &str) -> Result<bool, AppError> {
        if !is_valid_key(key) {
            return Ok(false);
        }
        let now = Utc::now();
        Ok(self
            .load(key)?
            .is_some_and(|doc| !doc.is_expired_at(now)))
    }

    fn set(&self, key: &str, content: &str, is_static: bool) -> Result<(), AppError> {
        ensure_writable_key(key)?;
        let encoded = encode(&self.build(key, content, is_static, Utc::now()))?;

        let write_txn = self.db.begin_write()?;
        {
            let mut documents = write_txn.open_table(DOCUMENTS)?;
            documents.insert(key, encoded.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn add(&self, key: &str, content: &str) -> Result<bool, AppError> {
        ensure_writable_key(key)?;
        let now = Utc::now();
        let encoded = encode(&self.build(key, content, false, now))?;

        let write_txn = self.db.begin_write()?;
        {
            let mut documents = write_txn.open_table(DOCUMENTS)?;
            if let Some(existing) = documents.get(key)? {
                let taken = match decode(existing.value()) {
                    Ok(doc) => !doc.is_expired_at(now),
                    // Unreadable rows are never reclaimed silently.
                    Err(_) => true,
                };
                if taken {
                    return Ok(false);
                }
            }
            documents.insert(key, encoded.as_slice())?;
        }
        write_txn.commit()?;
        Ok(true)
    }

    fn get(&self, key: &str, skip_expire: bool) -> Result<Option<String>, AppError> {
        if !is_valid_key(key) {
            return Ok(None);
        }
        let now = Utc::now();
        Ok(self
            .load(key)?
            .filter(|doc| skip_expire || !doc.is_expired_at(now))
            .map(|doc| doc.content))
    }

    fn purge_expired(&self) -> Result<usize, AppError> {
        let now = Utc::now();
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut documents = write_txn.open_table(DOCUMENTS)?;
            let mut expired = Vec::new();
            for entry in documents.iter()? {
                let (key, value) = entry?;
                match decode(value.value()) {
                    Ok(doc) if doc.is_expired_at(now) => expired.push(key.value().to_string()),
                    Ok(_) => {}
                    Err(err) => {
                        tracing::warn!("Skipping undecodable document '{}': {}", key.value(), err)
                    }
                }
            }
            for key in &expired {
                documents.remove(key.as_str())?;
            }
            expired.len()
        };
        write_txn.commit()?;
        Ok(removed)
    }

    fn backend_name(&self) -> &'static str {
        "redb"
    }
}
