// Scripted platform doubles shared by the integration tests
#![allow(dead_code)]

use anyhow::{bail, Result};
use screen_recorder::capture::DisplayConstraints;
use screen_recorder::{
    CaptureDevice, CaptureError, CapturePlatform, CaptureStream, Config, DownloadReceipt,
    FileDownloader, MediaRecorder, MediaTrack, RecorderError, RecorderEvent, RecorderOptions,
    TrackKind, Widget, WidgetEvent,
};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

/// Capture platform that grants or denies on request and remembers every
/// stream it handed out
#[derive(Default)]
pub struct ScriptedPlatform {
    pub deny_display: bool,
    pub deny_microphone: bool,
    /// Offer system audio with the display when audio is requested
    pub system_audio: bool,
    /// Return an audio track even when audio was not requested
    pub leak_audio: bool,
    pub issued_streams: Mutex<Vec<CaptureStream>>,
    pub constraints_seen: Mutex<Vec<DisplayConstraints>>,
}

impl ScriptedPlatform {
    pub fn issued(&self) -> Vec<CaptureStream> {
        self.issued_streams.lock().unwrap().clone()
    }

    pub fn display_requests(&self) -> Vec<DisplayConstraints> {
        self.constraints_seen.lock().unwrap().clone()
    }

    pub fn microphone_requested(&self) -> bool {
        self.issued()
            .iter()
            .any(|s| s.tracks().iter().any(|t| t.label() == "microphone"))
    }
}

#[async_trait::async_trait]
impl CapturePlatform for ScriptedPlatform {
    async fn request_display(
        &self,
        constraints: DisplayConstraints,
    ) -> Result<CaptureStream, CaptureError> {
        self.constraints_seen.lock().unwrap().push(constraints);

        if self.deny_display {
            return Err(CaptureError::Denied {
                device: CaptureDevice::Display,
                reason: "Permission denied".to_string(),
            });
        }

        let mut tracks = vec![MediaTrack::new(TrackKind::Video, "screen")];
        if (constraints.audio && self.system_audio) || self.leak_audio {
            tracks.push(MediaTrack::new(TrackKind::Audio, "system audio"));
        }
        let stream = CaptureStream::new(tracks);
        self.issued_streams.lock().unwrap().push(stream.clone());
        Ok(stream)
    }

    async fn request_microphone(&self) -> Result<CaptureStream, CaptureError> {
        if self.deny_microphone {
            return Err(CaptureError::Denied {
                device: CaptureDevice::Microphone,
                reason: "Permission denied".to_string(),
            });
        }

        let stream = CaptureStream::new(vec![MediaTrack::new(TrackKind::Audio, "microphone")]);
        self.issued_streams.lock().unwrap().push(stream.clone());
        Ok(stream)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Recorder that replays fixed chunks
///
/// `on_start` chunks are queued as soon as recording starts; `on_stop`
/// chunks are flushed by `stop`, followed by `Stopped`.
#[derive(Default)]
pub struct ScriptedRecorder {
    pub on_start: Vec<Vec<u8>>,
    pub on_stop: Vec<Vec<u8>>,
    pub fail_start: bool,
    pub fail_stop: bool,
    /// Close the channel on stop without sending `Stopped`
    pub drop_without_stopped: bool,
    pub tx: Option<mpsc::Sender<RecorderEvent>>,
    pub bound_streams: Arc<Mutex<Vec<CaptureStream>>>,
}

impl ScriptedRecorder {
    pub fn with_chunks(on_start: &[&str]) -> Self {
        Self {
            on_start: on_start.iter().map(|c| c.as_bytes().to_vec()).collect(),
            ..Self::default()
        }
    }

    /// Streams the recorder was bound to, observable after boxing
    pub fn bound(&self) -> Arc<Mutex<Vec<CaptureStream>>> {
        Arc::clone(&self.bound_streams)
    }
}

#[async_trait::async_trait]
impl MediaRecorder for ScriptedRecorder {
    async fn start(
        &mut self,
        stream: &CaptureStream,
        _options: &RecorderOptions,
    ) -> Result<mpsc::Receiver<RecorderEvent>, RecorderError> {
        if self.fail_start {
            return Err(RecorderError::Start("encoder unavailable".to_string()));
        }

        let (tx, rx) = mpsc::channel(100);
        for chunk in &self.on_start {
            tx.try_send(RecorderEvent::DataAvailable(chunk.clone()))
                .map_err(|e| RecorderError::Start(e.to_string()))?;
        }
        self.bound_streams.lock().unwrap().push(stream.clone());
        self.tx = Some(tx);
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), RecorderError> {
        let Some(tx) = self.tx.take() else {
            return Ok(());
        };
        if self.fail_stop {
            return Err(RecorderError::Stop("recorder crashed".to_string()));
        }

        for chunk in &self.on_stop {
            tx.try_send(RecorderEvent::DataAvailable(chunk.clone()))
                .map_err(|e| RecorderError::Stop(e.to_string()))?;
        }
        if !self.drop_without_stopped {
            tx.try_send(RecorderEvent::Stopped)
                .map_err(|e| RecorderError::Stop(e.to_string()))?;
        }
        Ok(())
    }

    fn is_recording(&self) -> bool {
        self.tx.is_some()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn test_widget(
    platform: Arc<ScriptedPlatform>,
    recorder: ScriptedRecorder,
    download_dir: &Path,
) -> Widget {
    Widget::new(
        &Config::default(),
        platform,
        Box::new(recorder),
        Arc::new(FileDownloader::new(download_dir)),
    )
}

async fn wait_for_download(events: &mut broadcast::Receiver<WidgetEvent>) -> Result<DownloadReceipt> {
    loop {
        match events.recv().await? {
            WidgetEvent::Downloaded { receipt, .. } => return Ok(receipt),
            WidgetEvent::Error { message, .. } => bail!("widget error: {}", message),
            _ => {}
        }
    }
}

/// Wait for the next `Downloaded` event
pub async fn next_download(events: &mut broadcast::Receiver<WidgetEvent>) -> Result<DownloadReceipt> {
    tokio::time::timeout(Duration::from_secs(5), wait_for_download(events)).await?
}
