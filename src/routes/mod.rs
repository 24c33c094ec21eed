//! Route modules for quadrant-press

pub mod download;
pub mod health;
pub mod sessions;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(health::router())
        .nest("/api/v1/sessions", sessions::router())
        .nest("/download", download::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
