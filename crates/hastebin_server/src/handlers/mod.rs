//! HTTP request handlers.

/// Document write and read endpoints.
pub mod document;
