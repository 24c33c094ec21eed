//! Error types for the HTTP surface

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::artifact::ArtifactError;
use crate::compose::ComposeError;
use crate::config::ConfigError;
use crate::document::DocumentError;
use crate::layout::LayoutError;
use crate::session::SessionError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

/// Startup failures; the binary exits before binding
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error(transparent)]
    Env(#[from] ConfigError),

    #[error("Invalid quadrant layout: {0}")]
    Layout(#[from] LayoutError),

    #[error("Invalid render settings: {0}")]
    Render(#[from] DocumentError),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

fn document_status(e: &DocumentError) -> (StatusCode, &'static str, String) {
    match e {
        DocumentError::InvalidDocument(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_document",
            e.to_string(),
        ),
        DocumentError::InsufficientPages { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "insufficient_pages",
            e.to_string(),
        ),
        _ => {
            tracing::error!("Document error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "document_error",
                "Failed to process document".to_string(),
            )
        }
    }
}

fn artifact_status(e: &ArtifactError) -> (StatusCode, &'static str, String) {
    match e {
        ArtifactError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            "not_found",
            format!("Artifact not found: {}", id),
        ),
        ArtifactError::InvalidId(_) => (
            StatusCode::BAD_REQUEST,
            "bad_request",
            "Malformed artifact id".to_string(),
        ),
        ArtifactError::Io(io) => {
            tracing::error!("Artifact IO error: {}", io);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Storage error".to_string(),
            )
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::Session(SessionError::Document(e)) => document_status(e),
            AppError::Session(SessionError::Compose(e)) => {
                tracing::error!("Composition error: {}", e);
                let message = match e {
                    ComposeError::Document(d) if d.is_rejection() => e.to_string(),
                    _ => "Failed to combine documents, reply yes to retry".to_string(),
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "composition_failed",
                    message,
                )
            }
            AppError::Session(SessionError::Artifact(e)) | AppError::Artifact(e) => {
                artifact_status(e)
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(AppError, StatusCode)> = vec![
            (
                SessionError::Document(DocumentError::InvalidDocument("x".into())).into(),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                SessionError::Document(DocumentError::InsufficientPages {
                    required: 2,
                    found: 1,
                })
                .into(),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                SessionError::Compose(ComposeError::Empty).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ArtifactError::NotFound("abc".into()).into(),
                StatusCode::NOT_FOUND,
            ),
            (
                ArtifactError::InvalidId("..".into()).into(),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::Conflict("busy".into()), StatusCode::CONFLICT),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
