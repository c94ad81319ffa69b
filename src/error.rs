use serde::Serialize;
use thiserror::Error;

/// Capture device a request was made for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureDevice {
    /// Screen / window capture
    Display,
    /// Microphone input
    Microphone,
}

impl std::fmt::Display for CaptureDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureDevice::Display => write!(f, "display"),
            CaptureDevice::Microphone => write!(f, "microphone"),
        }
    }
}

/// Failure to acquire a capture stream from the platform
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("{device} capture denied: {reason}")]
    Denied { device: CaptureDevice, reason: String },

    #[error("{device} capture unavailable: {reason}")]
    Unavailable { device: CaptureDevice, reason: String },
}

impl CaptureError {
    pub fn device(&self) -> CaptureDevice {
        match self {
            CaptureError::Denied { device, .. } | CaptureError::Unavailable { device, .. } => {
                *device
            }
        }
    }
}

/// Failure reported by the recorder controller or the platform recorder
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("recorder is already {0}")]
    Busy(&'static str),

    #[error("no recording in progress")]
    NotRecording,

    #[error("recorder failed to start: {0}")]
    Start(String),

    #[error("recorder failed to stop: {0}")]
    Stop(String),
}

/// Error surfaced by a widget operation
///
/// Every variant is logged and swallowed by the widget; none of them is fatal.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Recorder(#[from] RecorderError),

    #[error("download failed: {0}")]
    Download(String),
}

impl WidgetError {
    /// Short machine-readable kind, used in widget events and HTTP payloads
    pub fn kind(&self) -> &'static str {
        match self {
            WidgetError::Capture(_) => "capture",
            WidgetError::Recorder(RecorderError::Stop(_)) => "stop",
            WidgetError::Recorder(_) => "recorder",
            WidgetError::Download(_) => "download",
        }
    }
}
