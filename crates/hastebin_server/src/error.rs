//! HTTP error mapping for API handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hastebin_core::{AppError, ErrorKind};
use serde_json::json;

/// Wrapper that renders an [`AppError`] as a JSON error response.
#[derive(Debug)]
pub struct HttpError(pub AppError);

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

/// Status code for each error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::StorageError | ErrorKind::KeyGenerationExhausted => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        if kind.is_client_error() {
            tracing::debug!("Rejected request ({}): {}", kind, self.0);
        } else {
            tracing::error!("Request failed ({}): {}", kind, self.0);
        }

        let message = match (&self.0, kind) {
            (AppError::InvalidInput(msg), _) => msg.clone(),
            (_, ErrorKind::NotFound) => "Document not found".to_string(),
            (_, ErrorKind::KeyGenerationExhausted) => {
                "Could not allocate a document key".to_string()
            }
            _ => "Storage error".to_string(),
        };

        let body = Json(json!({ "error": message, "kind": kind.as_str() }));
        (status_for(kind), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_faults_map_to_500_and_client_faults_to_4xx() {
        assert_eq!(status_for(ErrorKind::InvalidInput), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(ErrorKind::StorageError),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(ErrorKind::KeyGenerationExhausted),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn storage_errors_render_as_internal_errors() {
        let err = HttpError(AppError::StorageMessage("/var/lib/secret".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn client_errors_keep_their_message_and_status() {
        let err = HttpError(AppError::InvalidInput("Document is empty".to_string()));
        assert!(err.0.kind().is_client_error());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
