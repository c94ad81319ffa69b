use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Widget controls
        .route("/widget", get(handlers::get_widget))
        .route("/widget/play", post(handlers::play))
        .route("/widget/stop", post(handlers::stop))
        .route("/widget/audio-toggle", post(handlers::toggle_audio))
        // Notifications
        .route("/toasts", get(handlers::get_toasts))
        .route("/toasts/:toast_id/dismiss", post(handlers::dismiss_toast))
        .route("/connectivity/:status", post(handlers::set_connectivity))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
