//! Shared constants used across hastebin crates.

/// Default API port.
pub const DEFAULT_PORT: u16 = 7777;

/// Default maximum document size in bytes.
pub const DEFAULT_MAX_LENGTH: usize = 400_000;

/// Default length of generated document keys.
pub const DEFAULT_KEY_LENGTH: usize = 10;

/// Default number of key candidates tried before giving up on a write.
pub const DEFAULT_MAX_KEY_ATTEMPTS: usize = 32;

/// Default interval between expiration sweeps, in seconds.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Static document seeded when no `STATIC_DOCUMENTS` value is provided.
pub const DEFAULT_STATIC_DOCUMENT: (&str, &str) = ("about", "./about.md");

/// File name for the redb database within the configured data directory.
pub const REDB_FILE_NAME: &str = "documents.redb";

/// Longest key accepted by any store operation.
pub const MAX_KEY_LENGTH: usize = 128;
