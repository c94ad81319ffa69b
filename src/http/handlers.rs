use super::state::AppState;
use crate::notify::{ConnectivityEvent, ShownToast};
use crate::widget::WidgetSnapshot;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ToastsResponse {
    pub active: Vec<ShownToast>,
}

#[derive(Debug, Serialize)]
pub struct ConnectivityResponse {
    pub status: ConnectivityEvent,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

fn snapshot_response(result: anyhow::Result<WidgetSnapshot>) -> Response {
    match result {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => {
            error!("Widget unavailable: {}", e);
            error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Widget unavailable: {}", e),
            )
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /widget
/// Current widget state and rendered controls
pub async fn get_widget(State(state): State<AppState>) -> impl IntoResponse {
    snapshot_response(state.widget.snapshot().await)
}

/// POST /widget/play
/// Start recording (capture failures leave the widget in pre-recording state)
pub async fn play(State(state): State<AppState>) -> impl IntoResponse {
    info!("Play requested");
    snapshot_response(state.widget.play().await)
}

/// POST /widget/stop
/// Stop recording and deliver the file
pub async fn stop(State(state): State<AppState>) -> impl IntoResponse {
    info!("Stop requested");
    snapshot_response(state.widget.stop().await)
}

/// POST /widget/audio-toggle
/// Flip the audio toggle (no-op while recording)
pub async fn toggle_audio(State(state): State<AppState>) -> impl IntoResponse {
    snapshot_response(state.widget.toggle_audio().await)
}

/// GET /toasts
/// Toasts currently on screen
pub async fn get_toasts(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ToastsResponse {
            active: state.toasts.active(),
        }),
    )
}

/// POST /toasts/:toast_id/dismiss
/// Close a toast that has a close button
pub async fn dismiss_toast(
    State(state): State<AppState>,
    Path(toast_id): Path<Uuid>,
) -> impl IntoResponse {
    if state.toasts.dismiss(toast_id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        error_response(
            StatusCode::NOT_FOUND,
            format!("Toast {} not found or not closable", toast_id),
        )
    }
}

/// POST /connectivity/:status
/// Inject a network transition (`online` or `offline`)
pub async fn set_connectivity(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> impl IntoResponse {
    let event = match status.parse::<ConnectivityEvent>() {
        Ok(event) => event,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    if let Err(e) = state.connectivity.send(event).await {
        error!("Connectivity notifier unavailable: {}", e);
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Connectivity notifier unavailable".to_string(),
        );
    }

    (StatusCode::ACCEPTED, Json(ConnectivityResponse { status: event })).into_response()
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
