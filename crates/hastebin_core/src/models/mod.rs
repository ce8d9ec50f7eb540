//! Data models for persistence and the HTTP API.

/// Stored document record and API payloads.
pub mod document;
