use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/status", get(handlers::get_status))
        // Input injection
        .route("/input/tap", post(handlers::tap))
        .route("/input/motion", post(handlers::motion))
        .route("/app/reload", post(handlers::reload))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
