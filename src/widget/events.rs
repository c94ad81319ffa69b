use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::capture::StreamSummary;
use crate::error::WidgetError;
use crate::recorder::{DownloadReceipt, RecorderState};
use crate::ui::{AudioToggle, ControlSurface, UiState};

/// Control-surface input delivered to the widget loop
#[derive(Debug)]
pub(crate) enum Command {
    Play(oneshot::Sender<WidgetSnapshot>),
    Stop(oneshot::Sender<WidgetSnapshot>),
    ToggleAudio(oneshot::Sender<WidgetSnapshot>),
    Snapshot(oneshot::Sender<WidgetSnapshot>),
    Shutdown(oneshot::Sender<WidgetSnapshot>),
}

/// Something observable that happened in the widget
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WidgetEvent {
    RecordingStarted {
        session_id: Uuid,
        audio: bool,
        stream: StreamSummary,
    },
    Finalizing {
        session_id: Option<Uuid>,
    },
    Downloaded {
        session_id: Uuid,
        receipt: DownloadReceipt,
    },
    AudioToggled {
        state: AudioToggle,
    },
    Error {
        kind: String,
        message: String,
    },
}

/// The last failure, kept for diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub kind: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl From<&WidgetError> for ErrorReport {
    fn from(err: &WidgetError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
            at: Utc::now(),
        }
    }
}

/// Point-in-time view of the widget
#[derive(Debug, Clone, Serialize)]
pub struct WidgetSnapshot {
    pub ui_state: UiState,
    pub recorder_state: RecorderState,
    /// Recording-active flag
    pub recording: bool,
    pub audio_toggle: AudioToggle,
    /// Audio flag the current session was started with
    pub session_audio: Option<bool>,
    pub session_id: Option<Uuid>,
    pub chunk_count: usize,
    pub buffered_bytes: usize,
    pub recordings_completed: usize,
    pub controls: ControlSurface,
    pub last_download: Option<DownloadReceipt>,
    pub last_error: Option<ErrorReport>,
}
