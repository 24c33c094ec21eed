//! Health and service info endpoints

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::layout::AnchorMode;
use crate::render::PoolStats;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    sessions: usize,
    render_pool: PoolStats,
}

#[derive(Serialize)]
pub struct ServiceInfo {
    service: &'static str,
    status: &'static str,
    dpi: u32,
    zoom: f64,
    anchor: AnchorMode,
    endpoints: Vec<&'static str>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        sessions: state.sessions().session_count(),
        render_pool: state.sessions().pipeline().pool().stats(),
    })
}

async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    let config = state.config();
    Json(ServiceInfo {
        service: env!("CARGO_PKG_NAME"),
        status: "ok",
        dpi: config.render.dpi,
        zoom: config.layout.zoom,
        anchor: config.layout.anchor,
        endpoints: vec![
            "POST /api/v1/sessions/:key/files",
            "POST /api/v1/sessions/:key/confirm",
            "POST /api/v1/sessions/:key/reply",
            "GET /api/v1/sessions/:key",
            "GET /download/:id",
            "GET /health",
        ],
    })
}
