use super::handlers;
use super::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Clip submission
        .route("/clips", post(handlers::submit_clip))
        .layer(DefaultBodyLimit::max(body_limit))
        // Browser recorders post from other origins
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        // Unexpected internal faults become 500 responses
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
