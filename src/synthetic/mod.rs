// Synthetic capture platform and recorder
//
// Stands in for a real display server and encoder: the display is a test
// pattern, the microphone is silent, and the recorder emits WebM-shaped
// placeholder bytes (EBML header, then one cluster marker per frame). The
// output is not decodable video; it exercises the whole widget pipeline
// end-to-end without hardware or permissions.

use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::capture::{CapturePlatform, CaptureStream, DisplayConstraints, MediaTrack, TrackKind};
use crate::config::CaptureConfig;
use crate::error::{CaptureDevice, CaptureError, RecorderError};
use crate::recorder::{MediaRecorder, RecorderEvent, RecorderOptions};

const EBML_MAGIC: [u8; 4] = [0x1A, 0x45, 0xDF, 0xA3];
const CLUSTER_MAGIC: [u8; 4] = [0x1F, 0x43, 0xB6, 0x75];

/// Capture platform backed by a test pattern
pub struct SyntheticPlatform {
    config: CaptureConfig,
}

impl SyntheticPlatform {
    pub fn new(config: CaptureConfig) -> Self {
        info!(
            "Synthetic capture platform initialized ({}x{} @ {} fps)",
            config.width, config.height, config.fps
        );
        Self { config }
    }
}

#[async_trait::async_trait]
impl CapturePlatform for SyntheticPlatform {
    async fn request_display(
        &self,
        constraints: DisplayConstraints,
    ) -> Result<CaptureStream, CaptureError> {
        if !constraints.video {
            return Err(CaptureError::Unavailable {
                device: CaptureDevice::Display,
                reason: "display capture requires a video source".to_string(),
            });
        }
        if self.config.deny_display {
            return Err(CaptureError::Denied {
                device: CaptureDevice::Display,
                reason: "Permission denied".to_string(),
            });
        }

        let mut tracks = vec![MediaTrack::new(
            TrackKind::Video,
            format!("screen:0 ({}x{})", self.config.width, self.config.height),
        )];
        if constraints.audio && self.config.system_audio {
            tracks.push(MediaTrack::new(TrackKind::Audio, "system audio"));
        }

        Ok(CaptureStream::new(tracks))
    }

    async fn request_microphone(&self) -> Result<CaptureStream, CaptureError> {
        if self.config.deny_microphone {
            return Err(CaptureError::Denied {
                device: CaptureDevice::Microphone,
                reason: "Permission denied".to_string(),
            });
        }

        Ok(CaptureStream::new(vec![MediaTrack::new(
            TrackKind::Audio,
            "microphone:default",
        )]))
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

/// Tick period for `fps`, never shorter than 1 ms
fn frame_interval(fps: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(fps.max(1))).max(Duration::from_millis(1))
}

/// Recorder that turns frame ticks into placeholder WebM bytes
pub struct SyntheticRecorder {
    frame_interval: Duration,
    bytes_per_frame: usize,
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SyntheticRecorder {
    pub fn new(config: &CaptureConfig) -> Self {
        Self {
            frame_interval: frame_interval(config.fps),
            bytes_per_frame: config.bytes_per_frame,
            stop_tx: None,
            task: None,
        }
    }

    fn header() -> Vec<u8> {
        let mut bytes = EBML_MAGIC.to_vec();
        bytes.extend_from_slice(b"webm");
        bytes
    }

    fn cluster(sequence: u64, size: usize) -> Vec<u8> {
        let mut bytes = CLUSTER_MAGIC.to_vec();
        bytes.extend_from_slice(&sequence.to_be_bytes());
        bytes.extend((0..size).map(|i| (sequence as usize + i) as u8));
        bytes
    }
}

#[async_trait::async_trait]
impl MediaRecorder for SyntheticRecorder {
    async fn start(
        &mut self,
        stream: &CaptureStream,
        options: &RecorderOptions,
    ) -> Result<mpsc::Receiver<RecorderEvent>, RecorderError> {
        if self.task.is_some() {
            return Err(RecorderError::Start("already recording".to_string()));
        }
        if stream.video_tracks().next().is_none() || !stream.is_active() {
            return Err(RecorderError::Start("stream has no live video track".to_string()));
        }

        info!(
            "Starting synthetic recorder ({}, timeslice: {:?})",
            options.mime_type, options.timeslice
        );

        let (tx, rx) = mpsc::channel(100);
        let (stop_tx, mut stop_rx) = oneshot::channel();
        let stream = stream.clone();
        let frame_interval = self.frame_interval;
        let bytes_per_frame = self.bytes_per_frame;
        let timeslice = options.timeslice.filter(|t| !t.is_zero());

        let task = tokio::spawn(async move {
            let mut pending = Self::header();
            let mut sequence = 0u64;
            let mut frames = tokio::time::interval(frame_interval);
            // Only polled when a timeslice is set
            let mut slices = tokio::time::interval(timeslice.unwrap_or(Duration::from_secs(3600)));
            slices.tick().await;

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = frames.tick() => {
                        if !stream.is_active() {
                            debug!("Capture stream ended, stopping synthetic recorder");
                            break;
                        }
                        pending.extend(Self::cluster(sequence, bytes_per_frame));
                        sequence += 1;
                    }
                    _ = slices.tick(), if timeslice.is_some() => {
                        let chunk = std::mem::take(&mut pending);
                        if tx.send(RecorderEvent::DataAvailable(chunk)).await.is_err() {
                            return;
                        }
                    }
                }
            }

            // Flush whatever is buffered, then signal completion
            if !pending.is_empty() {
                let _ = tx.send(RecorderEvent::DataAvailable(pending)).await;
            }
            let _ = tx.send(RecorderEvent::Stopped).await;
            debug!("Synthetic recorder finished after {} frames", sequence);
        });

        self.stop_tx = Some(stop_tx);
        self.task = Some(task);

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), RecorderError> {
        let Some(task) = self.task.take() else {
            return Ok(());
        };

        if let Some(stop_tx) = self.stop_tx.take() {
            // The task may already have exited because the stream ended
            let _ = stop_tx.send(());
        }

        task.await
            .map_err(|e| RecorderError::Stop(format!("recorder task failed: {}", e)))?;

        info!("Synthetic recorder stopped");

        Ok(())
    }

    fn is_recording(&self) -> bool {
        self.task.is_some()
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}
