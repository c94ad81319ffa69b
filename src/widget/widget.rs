use anyhow::{anyhow, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::events::{Command, ErrorReport, WidgetEvent, WidgetSnapshot};
use crate::capture::{CaptureAcquirer, CapturePlatform, StreamSummary};
use crate::config::{Config, UiConfig};
use crate::error::WidgetError;
use crate::notify::{Notifier, ToastPresets};
use crate::recorder::{
    DownloadReceipt, Downloader, MediaRecorder, RecorderController, RecorderEvent, RecorderState,
};
use crate::ui::{self, AudioToggle, UiState};

/// How long shutdown waits for an active session to finalize
const SHUTDOWN_FINALIZE_TIMEOUT: Duration = Duration::from_secs(10);

enum Next {
    Command(Option<Command>),
    Recorder(Option<RecorderEvent>),
}

/// The screen-recording widget
///
/// Owns the whole session state: UI state, audio toggle, the recorder
/// controller and its chunks. Run it with [`spawn`](Self::spawn) and drive it
/// through the returned [`WidgetHandle`]; the loop handles one command or
/// recorder event at a time, so nothing here needs a lock.
pub struct Widget {
    ui_config: UiConfig,
    file_name: String,
    acquirer: CaptureAcquirer,
    controller: RecorderController,
    downloader: Arc<dyn Downloader>,
    credit: Option<(Arc<dyn Notifier>, ToastPresets)>,
    ui: UiState,
    toggle: AudioToggle,
    session_audio: Option<bool>,
    preview: Option<StreamSummary>,
    last_download: Option<DownloadReceipt>,
    last_error: Option<ErrorReport>,
    recordings_completed: usize,
    events: broadcast::Sender<WidgetEvent>,
}

impl Widget {
    pub fn new(
        config: &Config,
        platform: Arc<dyn CapturePlatform>,
        recorder: Box<dyn MediaRecorder>,
        downloader: Arc<dyn Downloader>,
    ) -> Self {
        let (events, _) = broadcast::channel(64);

        Self {
            ui_config: config.ui.clone(),
            file_name: config.recording.file_name.clone(),
            acquirer: CaptureAcquirer::new(platform),
            controller: RecorderController::new(recorder, config.recording.recorder_options()),
            downloader,
            credit: None,
            ui: UiState::PreRecording,
            toggle: AudioToggle::from_enabled(config.ui.audio_on),
            session_audio: None,
            preview: None,
            last_download: None,
            last_error: None,
            recordings_completed: 0,
            events,
        }
    }

    /// Show the credit toast through `notifier` when the widget starts
    pub fn with_credit(mut self, notifier: Arc<dyn Notifier>, presets: ToastPresets) -> Self {
        self.credit = Some((notifier, presets));
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.events.subscribe()
    }

    /// Run the widget loop on its own task
    pub fn spawn(self) -> (WidgetHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(32);
        let handle = WidgetHandle {
            commands: tx,
            events: self.events.clone(),
        };
        let task = tokio::spawn(self.run(rx));
        (handle, task)
    }

    async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        info!(
            "Widget started (capture: {}, file: {})",
            self.acquirer.platform_name(),
            self.file_name
        );

        if let Some((notifier, presets)) = &self.credit {
            notifier.show(presets.credit());
        }

        loop {
            let next = tokio::select! {
                command = commands.recv() => Next::Command(command),
                event = self.controller.next_event() => Next::Recorder(event),
            };

            match next {
                Next::Command(Some(Command::Shutdown(reply))) => {
                    self.shutdown().await;
                    let _ = reply.send(self.snapshot());
                    break;
                }
                Next::Command(Some(command)) => self.handle_command(command).await,
                Next::Command(None) => {
                    self.shutdown().await;
                    break;
                }
                Next::Recorder(event) => self.on_recorder_event(event).await,
            }
        }

        info!("Widget stopped");
    }

    async fn handle_command(&mut self, command: Command) {
        let reply = match command {
            Command::Play(reply) => {
                let _ = self.play().await;
                reply
            }
            Command::Stop(reply) => {
                let _ = self.stop().await;
                reply
            }
            Command::ToggleAudio(reply) => {
                self.toggle_audio();
                reply
            }
            Command::Snapshot(reply) | Command::Shutdown(reply) => reply,
        };
        let _ = reply.send(self.snapshot());
    }

    /// Play control: acquire a stream and start recording
    ///
    /// Ignored unless the widget is showing the play control. Failures are
    /// logged and leave the widget in pre-recording state.
    pub async fn play(&mut self) -> Result<(), WidgetError> {
        if self.ui != UiState::PreRecording {
            warn!("Play ignored while {:?}", self.ui);
            return Ok(());
        }

        let audio = self.toggle.is_on();
        let result = self.start_session(audio).await;
        if let Err(e) = &result {
            self.report(e);
        }
        result
    }

    async fn start_session(&mut self, audio: bool) -> Result<(), WidgetError> {
        let stream = self.acquirer.acquire(audio).await?;
        let summary = stream.summary();
        let session_id = self.controller.start(stream).await?;

        self.session_audio = Some(audio);
        self.preview = Some(summary.clone());
        self.ui = UiState::Recording;

        info!("Recording started (session {}, audio: {})", session_id, audio);
        self.emit(WidgetEvent::RecordingStarted {
            session_id,
            audio,
            stream: summary,
        });

        Ok(())
    }

    /// Stop control: release capture and finalize the recording
    ///
    /// The file is delivered once the recorder reports it has stopped. If
    /// stopping fails the session is discarded and the widget still returns
    /// to pre-recording state.
    pub async fn stop(&mut self) -> Result<(), WidgetError> {
        if !self.ui.is_recording() {
            warn!("Stop ignored while {:?}", self.ui);
            return Ok(());
        }

        let session_id = self.controller.session_id();
        match self.controller.stop().await {
            Ok(()) => {
                self.ui = UiState::Finalizing;
                self.preview = None;
                info!("Recording stopped, finalizing");
                self.emit(WidgetEvent::Finalizing { session_id });
                Ok(())
            }
            Err(e) => {
                self.reset_ui();
                let err = WidgetError::from(e);
                self.report(&err);
                Err(err)
            }
        }
    }

    /// Audio toggle click; a no-op while recording. Returns whether it changed.
    pub fn toggle_audio(&mut self) -> bool {
        if !self.toggle.click(self.ui) {
            debug!("Audio toggle is locked while recording");
            return false;
        }

        info!("Audio toggled {:?}", self.toggle);
        self.emit(WidgetEvent::AudioToggled { state: self.toggle });
        true
    }

    /// Wait for the next recorder event and apply it
    ///
    /// For callers driving a `Widget` directly instead of through
    /// [`spawn`](Self::spawn).
    pub async fn process_next_event(&mut self) {
        let event = self.controller.next_event().await;
        self.on_recorder_event(event).await;
    }

    async fn on_recorder_event(&mut self, event: Option<RecorderEvent>) {
        let Some(finished) = self.controller.handle_event(event).await else {
            return;
        };

        match self
            .downloader
            .deliver(finished.blob, &self.file_name, finished.chunk_count)
            .await
        {
            Ok(receipt) => {
                self.recordings_completed += 1;
                self.last_download = Some(receipt.clone());
                self.emit(WidgetEvent::Downloaded {
                    session_id: finished.session_id,
                    receipt,
                });
            }
            Err(e) => {
                let err = WidgetError::Download(format!("{:#}", e));
                self.report(&err);
            }
        }

        self.reset_ui();
    }

    /// Finish an active session before the loop exits
    async fn shutdown(&mut self) {
        if self.ui.is_recording() {
            info!("Shutting down with an active recording, stopping it");
            let _ = self.stop().await;
        }

        if self.controller.state() == RecorderState::Idle {
            return;
        }

        let drained = tokio::time::timeout(SHUTDOWN_FINALIZE_TIMEOUT, async {
            while self.controller.state() != RecorderState::Idle {
                self.process_next_event().await;
            }
        })
        .await;

        if drained.is_err() {
            error!("Recorder did not finish within {:?}, discarding session", SHUTDOWN_FINALIZE_TIMEOUT);
            self.controller.abort();
            self.reset_ui();
        }
    }

    fn reset_ui(&mut self) {
        self.ui = UiState::PreRecording;
        self.preview = None;
        self.session_audio = None;
    }

    fn report(&mut self, err: &WidgetError) {
        error!("Error: {}", err);
        self.last_error = Some(ErrorReport::from(err));
        self.emit(WidgetEvent::Error {
            kind: err.kind().to_string(),
            message: err.to_string(),
        });
    }

    fn emit(&self, event: WidgetEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    pub fn ui_state(&self) -> UiState {
        self.ui
    }

    pub fn audio_toggle(&self) -> AudioToggle {
        self.toggle
    }

    pub fn snapshot(&self) -> WidgetSnapshot {
        WidgetSnapshot {
            ui_state: self.ui,
            recorder_state: self.controller.state(),
            recording: self.ui.is_recording(),
            audio_toggle: self.toggle,
            session_audio: self.session_audio,
            session_id: self.controller.session_id(),
            chunk_count: self.controller.chunk_count(),
            buffered_bytes: self.controller.buffered_bytes(),
            recordings_completed: self.recordings_completed,
            controls: ui::render(self.ui, self.toggle, self.preview.as_ref(), &self.ui_config),
            last_download: self.last_download.clone(),
            last_error: self.last_error.clone(),
        }
    }
}

/// Cloneable handle to a spawned widget
#[derive(Clone)]
pub struct WidgetHandle {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<WidgetEvent>,
}

impl WidgetHandle {
    async fn request(
        &self,
        command: impl FnOnce(oneshot::Sender<WidgetSnapshot>) -> Command,
    ) -> Result<WidgetSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(command(tx))
            .await
            .map_err(|_| anyhow!("widget has stopped"))?;
        rx.await.map_err(|_| anyhow!("widget stopped before replying"))
    }

    pub async fn play(&self) -> Result<WidgetSnapshot> {
        self.request(Command::Play).await
    }

    pub async fn stop(&self) -> Result<WidgetSnapshot> {
        self.request(Command::Stop).await
    }

    pub async fn toggle_audio(&self) -> Result<WidgetSnapshot> {
        self.request(Command::ToggleAudio).await
    }

    pub async fn snapshot(&self) -> Result<WidgetSnapshot> {
        self.request(Command::Snapshot).await
    }

    /// Stop any active recording, deliver it, and end the widget loop
    pub async fn shutdown(&self) -> Result<WidgetSnapshot> {
        self.request(Command::Shutdown).await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.events.subscribe()
    }
}
