//! Artifact download endpoint

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::artifact::{file_name, parse_id};
use crate::error::Result;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:id", get(download))
}

/// Serve a finished composite as an attachment.
///
/// Accepts the bare id or `combined_{id}.pdf`.
async fn download(State(state): State<AppState>, Path(raw_id): Path<String>) -> Result<Response> {
    let id = parse_id(&raw_id)?;
    let bytes = state.sessions().artifacts().get(&id).await?;

    tracing::debug!(artifact_id = %id, size = bytes.len(), "Serving artifact");

    let disposition = format!("attachment; filename=\"{}\"", file_name(&id));
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        bytes,
    )
        .into_response())
}
