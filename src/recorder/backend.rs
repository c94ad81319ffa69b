use std::time::Duration;
use tokio::sync::mpsc;

use crate::capture::CaptureStream;
use crate::error::RecorderError;

/// Default container/codec hint handed to the recorder
pub const DEFAULT_MIME_TYPE: &str = "video/webm";

/// Options the recorder is bound with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderOptions {
    /// Output encoding hint (container/codec identifier)
    pub mime_type: String,
    /// Emit a chunk every `timeslice`; `None` buffers everything until stop
    pub timeslice: Option<Duration>,
}

impl Default for RecorderOptions {
    fn default() -> Self {
        Self {
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            timeslice: None,
        }
    }
}

/// Event emitted by a running recorder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderEvent {
    /// A chunk of encoded output (may be empty)
    DataAvailable(Vec<u8>),
    /// Recording finished; no more data will follow
    Stopped,
}

/// Platform recorder trait
///
/// Contract for `stop`: every buffered chunk is sent as `DataAvailable`
/// before `Stopped`, and `Stopped` is the last event of the session.
#[async_trait::async_trait]
pub trait MediaRecorder: Send + Sync {
    /// Bind to `stream` and begin emitting events
    async fn start(
        &mut self,
        stream: &CaptureStream,
        options: &RecorderOptions,
    ) -> Result<mpsc::Receiver<RecorderEvent>, RecorderError>;

    /// Flush buffered data and finish the session
    async fn stop(&mut self) -> Result<(), RecorderError>;

    /// Check if recorder is currently recording
    fn is_recording(&self) -> bool;

    /// Get recorder name for logging
    fn name(&self) -> &str;
}
