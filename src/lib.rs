//! Root crate facade for the hastebin core library and HTTP server.

pub use hastebin_server::{
    config, create_app, error, handler, handlers, keys, models, resolve_bind_address,
    serve_router, spawn_expiry_sweeper, statics, store, AppError, AppState, Config,
    DocumentHandler, DocumentStore, ErrorKind, DEFAULT_PORT,
};
