use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::notify::{Gravity, Position};
use crate::recorder::{RecorderOptions, DEFAULT_FILE_NAME, DEFAULT_MIME_TYPE};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub recording: RecordingConfig,
    pub ui: UiConfig,
    pub notifications: NotificationsConfig,
    pub connectivity: ConnectivityConfig,
    pub capture: CaptureConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "screen-recorder".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Container/codec hint handed to the recorder
    pub mime_type: String,
    /// Name offered for every finished recording
    pub file_name: String,
    /// Where downloads land (`~` is expanded)
    pub download_dir: String,
    /// Emit a chunk every N milliseconds; unset or 0 buffers until stop
    pub timeslice_ms: Option<u64>,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            download_dir: "~/Downloads".to_string(),
            timeslice_ms: None,
        }
    }
}

impl RecordingConfig {
    pub fn recorder_options(&self) -> RecorderOptions {
        RecorderOptions {
            mime_type: self.mime_type.clone(),
            timeslice: self
                .timeslice_ms
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis),
        }
    }

    pub fn download_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.download_dir).as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Icon shown while the audio toggle is on
    pub switch_on_icon: String,
    /// Icon shown while the audio toggle is off
    pub switch_off_icon: String,
    /// Initial audio toggle state
    pub audio_on: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            switch_on_icon: "../assets/switchOn.png".to_string(),
            switch_off_icon: "../assets/switchOff.png".to_string(),
            audio_on: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    pub gravity: Gravity,
    pub position: Position,
    pub show_credit: bool,
    pub credit_text: String,
    pub credit_duration_ms: u64,
    pub offline_text: String,
    pub online_text: String,
    pub online_duration_ms: u64,
    /// Toasts kept in the board's history
    pub history_limit: usize,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            gravity: Gravity::Bottom,
            position: Position::Left,
            show_credit: true,
            credit_text: "Developed By 'Istiak Rahman'".to_string(),
            credit_duration_ms: 5000,
            offline_text: "You are offline".to_string(),
            online_text: "Welcome Back!".to_string(),
            online_duration_ms: 4000,
            history_limit: 64,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectivityConfig {
    pub enabled: bool,
    /// `host:port` reached over TCP to decide whether the network is up
    pub probe_addr: String,
    pub interval_secs: u64,
    pub timeout_ms: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            probe_addr: "1.1.1.1:53".to_string(),
            interval_secs: 5,
            timeout_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Placeholder payload size per synthetic frame
    pub bytes_per_frame: usize,
    /// Whether the display capture offers system audio when asked
    pub system_audio: bool,
    /// Simulate the user refusing the screen-share prompt
    pub deny_display: bool,
    /// Simulate the user refusing the microphone prompt
    pub deny_microphone: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 30,
            bytes_per_frame: 1024,
            system_audio: true,
            deny_display: false,
            deny_microphone: false,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults
    pub fn load_or_default(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
