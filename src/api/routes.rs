use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::relay::SynthesisRelay;

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub struct AppState {
    pub relay: SynthesisRelay,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/synthesize", post(handlers::synthesize))
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
