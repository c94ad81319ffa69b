use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::backend::{MediaRecorder, RecorderEvent, RecorderOptions};
use super::chunk::{ChunkList, RecordedBlob};
use crate::capture::CaptureStream;
use crate::error::RecorderError;

/// Recorder controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecorderState {
    Idle,
    Recording,
    Finalizing,
}

impl RecorderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecorderState::Idle => "idle",
            RecorderState::Recording => "recording",
            RecorderState::Finalizing => "finalizing",
        }
    }
}

/// A session whose chunks have been assembled into one blob
#[derive(Debug, Clone)]
pub struct FinishedRecording {
    pub session_id: Uuid,
    pub blob: RecordedBlob,
    pub chunk_count: usize,
}

/// Owns the platform recorder and the chunks of the active session
///
/// `idle → recording → finalizing → idle`. Chunks arrive through
/// [`next_event`](Self::next_event) and are fed back through
/// [`handle_event`](Self::handle_event) by the single owner of the
/// controller, so they are appended in emission order and all of them are in
/// the list by the time `Stopped` is handled.
pub struct RecorderController {
    recorder: Box<dyn MediaRecorder>,
    options: RecorderOptions,
    state: RecorderState,
    session_id: Option<Uuid>,
    stream: Option<CaptureStream>,
    events: Option<mpsc::Receiver<RecorderEvent>>,
    chunks: ChunkList,
}

impl RecorderController {
    pub fn new(recorder: Box<dyn MediaRecorder>, options: RecorderOptions) -> Self {
        info!(
            "Recorder controller initialized: {} ({})",
            recorder.name(),
            options.mime_type
        );

        Self {
            recorder,
            options,
            state: RecorderState::Idle,
            session_id: None,
            stream: None,
            events: None,
            chunks: ChunkList::new(),
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    pub fn stream(&self) -> Option<&CaptureStream> {
        self.stream.as_ref()
    }

    /// Number of chunks collected for the active session
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn buffered_bytes(&self) -> usize {
        self.chunks.total_bytes()
    }

    pub fn options(&self) -> &RecorderOptions {
        &self.options
    }

    /// Bind the recorder to `stream` and start recording
    ///
    /// On failure every track of `stream` is stopped.
    pub async fn start(&mut self, stream: CaptureStream) -> Result<Uuid, RecorderError> {
        if self.state != RecorderState::Idle {
            stream.stop_all();
            return Err(RecorderError::Busy(self.state.as_str()));
        }

        let events = match self.recorder.start(&stream, &self.options).await {
            Ok(rx) => rx,
            Err(e) => {
                stream.stop_all();
                return Err(e);
            }
        };

        let session_id = Uuid::new_v4();
        info!(
            "Recording session {} started on stream {} ({} tracks)",
            session_id,
            stream.id(),
            stream.tracks().len()
        );

        self.chunks.clear();
        self.session_id = Some(session_id);
        self.stream = Some(stream);
        self.events = Some(events);
        self.state = RecorderState::Recording;

        Ok(session_id)
    }

    /// Stop every track, then ask the recorder to flush and stop
    ///
    /// The session moves to `finalizing`; the file is produced when the
    /// recorder reports `Stopped`. If the recorder fails to stop, the session
    /// is discarded and the controller is back to `idle`.
    pub async fn stop(&mut self) -> Result<(), RecorderError> {
        if self.state != RecorderState::Recording {
            return Err(RecorderError::NotRecording);
        }

        if let Some(stream) = &self.stream {
            stream.stop_all();
        }
        self.state = RecorderState::Finalizing;

        info!("Stopping recorder {}", self.recorder.name());

        if let Err(e) = self.recorder.stop().await {
            self.abort();
            return Err(e);
        }

        Ok(())
    }

    /// Wait for the next recorder event
    ///
    /// Pending forever while no session is bound. `None` means the recorder
    /// closed its channel.
    pub async fn next_event(&mut self) -> Option<RecorderEvent> {
        match self.events.as_mut() {
            Some(rx) => rx.recv().await,
            None => std::future::pending().await,
        }
    }

    /// Apply an event from [`next_event`](Self::next_event)
    ///
    /// Returns the finished recording once the session is finalized.
    pub async fn handle_event(
        &mut self,
        event: Option<RecorderEvent>,
    ) -> Option<FinishedRecording> {
        match event {
            Some(RecorderEvent::DataAvailable(data)) => {
                if self.state == RecorderState::Idle {
                    debug!("Ignoring {} bytes outside of a session", data.len());
                    return None;
                }
                let size = data.len();
                if self.chunks.push(data) {
                    debug!(
                        "Chunk {} appended ({} bytes, {} total)",
                        self.chunks.len(),
                        size,
                        self.chunks.total_bytes()
                    );
                }
                None
            }
            Some(RecorderEvent::Stopped) => self.finish().await,
            None => {
                self.events = None;
                if self.state == RecorderState::Idle {
                    return None;
                }
                warn!("Recorder channel closed without a stop event, finalizing with collected data");
                self.finish().await
            }
        }
    }

    /// Discard the active session: stop tracks, drop chunks, return to idle
    pub fn abort(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.stop_all();
        }
        if !self.chunks.is_empty() {
            warn!("Discarding {} recorded chunks", self.chunks.len());
        }
        self.chunks.clear();
        self.events = None;
        self.session_id = None;
        self.state = RecorderState::Idle;
    }

    async fn finish(&mut self) -> Option<FinishedRecording> {
        if self.state == RecorderState::Idle {
            return None;
        }

        if self.state == RecorderState::Recording {
            // Recorder ended on its own (capture source went away)
            info!("Recorder {} stopped without a stop request", self.recorder.name());
        }

        // Release the platform recorder so the next session can start
        if self.recorder.is_recording() {
            if let Err(e) = self.recorder.stop().await {
                warn!("Recorder {} did not shut down cleanly: {}", self.recorder.name(), e);
            }
        }

        if let Some(stream) = self.stream.take() {
            stream.stop_all();
        }

        let chunk_count = self.chunks.len();
        let blob = self.chunks.take_blob(&self.options.mime_type);
        let session_id = self.session_id.take().unwrap_or_else(Uuid::new_v4);

        self.events = None;
        self.state = RecorderState::Idle;

        info!(
            "Recording session {} finalized: {} chunks, {} bytes",
            session_id,
            chunk_count,
            blob.len()
        );

        Some(FinishedRecording {
            session_id,
            blob,
            chunk_count,
        })
    }
}
