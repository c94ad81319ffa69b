use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::config::NotificationsConfig;

/// Vertical placement of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gravity {
    Top,
    Bottom,
}

/// Horizontal placement of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Left,
    Center,
    Right,
}

/// How long a toast stays on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ToastDuration {
    /// Auto-dismissed after `millis`
    Timed { millis: u64 },
    /// Stays until closed
    Persistent,
}

impl ToastDuration {
    pub fn timed(duration: Duration) -> Self {
        ToastDuration::Timed {
            millis: duration.as_millis() as u64,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            ToastDuration::Timed { millis } => Some(Duration::from_millis(*millis)),
            ToastDuration::Persistent => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToastStyle {
    pub background: String,
    pub color: String,
    pub font_weight: String,
    pub box_shadow: String,
    pub border_radius: String,
    pub padding: String,
    pub width: String,
}

impl ToastStyle {
    /// The card look shared by every widget toast
    pub fn card(background: impl Into<String>) -> Self {
        Self {
            background: background.into(),
            color: "#fff".to_string(),
            font_weight: "bold".to_string(),
            box_shadow: "0 4px 8px rgba(0,0,0,0.2)".to_string(),
            border_radius: "8px".to_string(),
            padding: "16px".to_string(),
            width: "300px".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: Uuid,
    pub text: String,
    pub duration: ToastDuration,
    /// Show a close button
    pub close: bool,
    pub gravity: Gravity,
    pub position: Position,
    /// Pause the dismiss timer while the toast has focus
    pub stop_on_focus: bool,
    pub style: ToastStyle,
}

impl Toast {
    pub fn new(text: impl Into<String>, duration: ToastDuration, style: ToastStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            duration,
            close: false,
            gravity: Gravity::Bottom,
            position: Position::Left,
            stop_on_focus: true,
            style,
        }
    }

    pub fn with_close(mut self) -> Self {
        self.close = true;
        self
    }

    pub fn placed(mut self, gravity: Gravity, position: Position) -> Self {
        self.gravity = gravity;
        self.position = position;
        self
    }

    pub fn is_persistent(&self) -> bool {
        self.duration == ToastDuration::Persistent
    }
}

const CREDIT_BACKGROUND: &str = "#3498db";
const OFFLINE_BACKGROUND: &str = "#ff6347";
const ONLINE_BACKGROUND: &str = "linear-gradient(to right, #00b09b, #96c93d)";

/// Builds the widget's toasts from the notification settings
#[derive(Debug, Clone)]
pub struct ToastPresets {
    config: NotificationsConfig,
}

impl ToastPresets {
    pub fn new(config: NotificationsConfig) -> Self {
        Self { config }
    }

    pub fn credit(&self) -> Toast {
        Toast::new(
            &self.config.credit_text,
            ToastDuration::timed(Duration::from_millis(self.config.credit_duration_ms)),
            ToastStyle::card(CREDIT_BACKGROUND),
        )
        .placed(self.config.gravity, self.config.position)
    }

    /// Stays until the user closes it
    pub fn offline(&self) -> Toast {
        Toast::new(
            &self.config.offline_text,
            ToastDuration::Persistent,
            ToastStyle::card(OFFLINE_BACKGROUND),
        )
        .with_close()
        .placed(self.config.gravity, self.config.position)
    }

    pub fn online(&self) -> Toast {
        Toast::new(
            &self.config.online_text,
            ToastDuration::timed(Duration::from_millis(self.config.online_duration_ms)),
            ToastStyle::card(ONLINE_BACKGROUND),
        )
        .with_close()
        .placed(self.config.gravity, self.config.position)
    }
}

impl Default for ToastPresets {
    fn default() -> Self {
        Self::new(NotificationsConfig::default())
    }
}
