//! Session endpoints
//!
//! One session per sender key:
//! - `POST /:key/files` stages a PDF (raw request body)
//! - `POST /:key/confirm` answers the pending confirmation
//! - `POST /:key/reply` accepts a free-text yes/no answer
//! - `GET /:key` shows the session

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactSummary;
use crate::error::{AppError, Result};
use crate::session::{
    ConfirmOutcome, RejectReason, ReplyOutcome, SessionKey, SessionSnapshot, SessionState,
    SubmitOutcome,
};
use crate::state::AppState;

/// Largest accepted document upload
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

const USAGE: &str = "Send two PDFs (each with at least 2 pages). After both arrive, \
reply YES to combine them into a single A4 sheet or NO to cancel.";

const CONFIRM_PROMPT: &str =
    "Received two PDFs. Reply YES to combine them into a single A4 quadrant PDF, or NO to cancel.";

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub affirmative: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub body: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub accepted: bool,
    pub staged_count: usize,
    pub state: SessionState,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ArtifactSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

/// Create the sessions router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:key", get(get_session))
        .route("/:key/files", post(submit_file))
        .route("/:key/confirm", post(confirm))
        .route("/:key/reply", post(reply))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

fn submit_message(outcome: &SubmitOutcome) -> String {
    match (outcome.accepted, outcome.state) {
        (true, SessionState::Collecting) => format!("Received PDF #{}.", outcome.staged_count),
        (true, SessionState::AwaitingConfirm) => CONFIRM_PROMPT.to_string(),
        (false, _) => format!("Already holding two PDFs. {}", CONFIRM_PROMPT),
    }
}

fn reject_message(reason: RejectReason, staged_count: usize) -> String {
    match reason {
        RejectReason::NoSession => format!("No PDFs received yet. {}", USAGE),
        RejectReason::NotReady => format!(
            "Received {} of 2 PDFs. Send the remaining PDF before confirming.",
            staged_count
        ),
    }
}

fn confirm_response(state: &AppState, outcome: ConfirmOutcome) -> Result<ConfirmResponse> {
    match outcome {
        ConfirmOutcome::Composed(result) => Ok(ConfirmResponse {
            status: "composed",
            message: "Here is your combined PDF.".to_string(),
            download_url: Some(state.download_url(&result.id)),
            artifact: Some(result.summary()),
        }),
        ConfirmOutcome::Cancelled => Ok(ConfirmResponse {
            status: "cancelled",
            message: "Cancelled, uploaded files removed. Send PDFs to start again.".to_string(),
            artifact: None,
            download_url: None,
        }),
        ConfirmOutcome::Rejected {
            reason,
            staged_count,
        } => Err(AppError::Conflict(reject_message(reason, staged_count))),
    }
}

/// Stage an uploaded PDF
async fn submit_file(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Json<SubmitResponse>> {
    if body.is_empty() {
        return Err(AppError::BadRequest("Empty request body".to_string()));
    }

    let key = SessionKey::new(key);
    let outcome = state.sessions().add_file(&key, body.to_vec()).await?;

    Ok(Json(SubmitResponse {
        accepted: outcome.accepted,
        staged_count: outcome.staged_count,
        state: outcome.state,
        message: submit_message(&outcome),
    }))
}

/// Answer the pending confirmation
async fn confirm(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<ConfirmRequest>,
) -> Result<Json<ConfirmResponse>> {
    let key = SessionKey::new(key);
    let outcome = state.sessions().confirm(&key, request.affirmative).await?;
    Ok(Json(confirm_response(&state, outcome)?))
}

/// Free-text reply; anything but yes/no gets usage help
async fn reply(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<ReplyRequest>,
) -> Result<Json<ConfirmResponse>> {
    let key = SessionKey::new(key);
    match state.sessions().reply(&key, &request.body).await? {
        ReplyOutcome::Confirm(outcome) => Ok(Json(confirm_response(&state, outcome)?)),
        ReplyOutcome::Unrecognized => Ok(Json(ConfirmResponse {
            status: "unrecognized",
            message: USAGE.to_string(),
            artifact: None,
            download_url: None,
        })),
    }
}

/// Show a session
async fn get_session(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<SessionSnapshot>> {
    let key = SessionKey::new(key);
    state
        .sessions()
        .snapshot(&key)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No session for {}", key)))
}
