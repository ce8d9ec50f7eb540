//! Document HTTP handlers.
//!
//! Each endpoint forwards to [`hastebin_core::DocumentHandler`]. Whether a
//! read skips expiration comes from configuration: configured static
//! documents always do.

use crate::{error::HttpError, AppState};
use axum::{
    extract::{rejection::StringRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use hastebin_core::models::document::{CreateDocumentResponse, DocumentResponse};
use hastebin_core::{AppError, DocumentHandler};
use std::sync::Arc;

/// Run a store-backed handler call on the blocking pool.
///
/// Backends commit with synchronous I/O, same as the expiry sweeper.
async fn run_blocking<T, F>(handler: &Arc<DocumentHandler>, call: F) -> Result<T, HttpError>
where
    T: Send + 'static,
    F: FnOnce(&DocumentHandler) -> Result<T, AppError> + Send + 'static,
{
    let handler = handler.clone();
    tokio::task::spawn_blocking(move || call(&handler))
        .await
        .map_err(|err| AppError::StorageMessage(format!("Handler task failed: {}", err)))?
        .map_err(HttpError::from)
}

fn body_rejection(rejection: StringRejection, max_length: usize) -> HttpError {
    let message = match &rejection {
        StringRejection::InvalidUtf8(_) => "Document is not valid UTF-8".to_string(),
        _ if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => format!(
            "Document exceeds maximum length of {} bytes",
            max_length
        ),
        _ => rejection.body_text(),
    };
    HttpError(AppError::InvalidInput(message))
}

/// Store the request body as a new document.
///
/// # Arguments
/// - `state`: Application state.
/// - `body`: Raw UTF-8 document text.
///
/// # Returns
/// The generated key as JSON.
///
/// # Errors
/// Returns `INVALID_INPUT` if the body is empty, too large, or not UTF-8, and
/// a storage error if the write fails.
pub async fn create_document(
    State(state): State<AppState>,
    body: Result<String, StringRejection>,
) -> Result<Json<CreateDocumentResponse>, HttpError> {
    let body = body.map_err(|rejection| body_rejection(rejection, state.handler.max_length()))?;
    let key = run_blocking(&state.handler, move |handler| handler.handle_post(&body)).await?;
    Ok(Json(CreateDocumentResponse { key }))
}

/// Fetch a document wrapped in JSON.
///
/// # Returns
/// `{"key": ..., "data": ...}`.
///
/// # Errors
/// Returns 404 when the document does not exist.
pub async fn get_document(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DocumentResponse>, HttpError> {
    let skip_expire = state.config.is_static_document(&key);
    let lookup = key.clone();
    let data = run_blocking(&state.handler, move |handler| {
        handler.handle_get(&lookup, skip_expire)
    })
    .await?;
    Ok(Json(DocumentResponse { key, data }))
}

/// Fetch a document as plain text.
///
/// # Errors
/// Returns 404 when the document does not exist.
pub async fn get_raw_document(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, HttpError> {
    let skip_expire = state.config.is_static_document(&key);
    let content = run_blocking(&state.handler, move |handler| {
        handler.handle_raw_get(&key, skip_expire)
    })
    .await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        content,
    )
        .into_response())
}
