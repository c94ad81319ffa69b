//! HTTP control surface for the widget
//!
//! This module exposes the widget's controls over a REST API:
//! - GET /widget - Current state and rendered controls
//! - POST /widget/play, /widget/stop, /widget/audio-toggle - Control clicks
//! - GET /toasts - Toasts currently on screen
//! - POST /toasts/:id/dismiss - Close button on a toast
//! - POST /connectivity/:status - Inject an online/offline transition
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
