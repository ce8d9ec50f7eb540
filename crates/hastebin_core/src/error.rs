//! Application error types for core storage and domain logic.
use std::fmt;
use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    #[error("Storage error: {0}")]
    StorageMessage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found")]
    NotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No free document key found after {attempts} attempts")]
    KeyGenerationExhausted { attempts: usize },
}

/// Client-facing classification of every [`AppError`].
///
/// Transport layers pick status codes from this instead of matching on
/// backend-specific variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    StorageError,
    KeyGenerationExhausted,
}

impl ErrorKind {
    /// Stable wire name for the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::NotFound => "NOT_FOUND",
            Self::StorageError => "STORAGE_ERROR",
            Self::KeyGenerationExhausted => "KEY_GENERATION_EXHAUSTED",
        }
    }

    /// Whether the caller, not the service, is at fault.
    pub fn is_client_error(self) -> bool {
        matches!(self, Self::InvalidInput | Self::NotFound)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AppError {
    /// Collapse this error into its taxonomy kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound => ErrorKind::NotFound,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::KeyGenerationExhausted { .. } => ErrorKind::KeyGenerationExhausted,
            Self::Database(_) | Self::StorageMessage(_) | Self::Serialization(_) | Self::Io(_) => {
                ErrorKind::StorageError
            }
        }
    }
}

impl From<redb::DatabaseError> for AppError {
    fn from(value: redb::DatabaseError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::TransactionError> for AppError {
    fn from(value: redb::TransactionError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::TableError> for AppError {
    fn from(value: redb::TableError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::StorageError> for AppError {
    fn from(value: redb::StorageError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::CommitError> for AppError {
    fn from(value: redb::CommitError) -> Self {
        Self::Database(value.into())
    }
}
