//! Core domain library for hastebin (config, keys, storage, document handling).

/// Configuration loading and defaults.
pub mod config;
/// Shared default values.
pub mod constants;
/// Application error types and the client-facing error taxonomy.
pub mod error;
/// Write/read orchestration over a store and a key generator.
pub mod handler;
/// Random document key generation.
pub mod keys;
/// Data models for persistence and API payloads.
pub mod models;
/// Preloading of configured static documents.
pub mod statics;
/// Document storage trait and backends.
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use constants::DEFAULT_PORT;
pub use error::{AppError, ErrorKind};
pub use handler::DocumentHandler;
pub use store::{open_store, DocumentStore};
