use serde::Serialize;

use super::state::{AudioToggle, UiState};
use crate::capture::StreamSummary;
use crate::config::UiConfig;

/// Pointer interaction on a control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerEvents {
    Auto,
    None,
}

/// Rendered attributes of one control
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlAttrs {
    pub hidden: bool,
    pub disabled: bool,
}

impl ControlAttrs {
    fn shown() -> Self {
        Self {
            hidden: false,
            disabled: false,
        }
    }

    fn hidden() -> Self {
        Self {
            hidden: true,
            disabled: false,
        }
    }
}

/// Rendered live preview
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewAttrs {
    pub hidden: bool,
    /// Stream bound to the preview while recording
    pub source: Option<StreamSummary>,
}

/// Rendered audio toggle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioToggleAttrs {
    pub state: AudioToggle,
    pub icon: String,
    pub read_only: bool,
    pub pointer_events: PointerEvents,
    /// Pointer cursor hinting that the toggle is clickable
    pub cursor_pointer: bool,
}

/// Every control of the widget, rendered for one state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlSurface {
    pub play: ControlAttrs,
    pub stop: ControlAttrs,
    pub preview: PreviewAttrs,
    pub audio_toggle: AudioToggleAttrs,
}

/// Map widget state to control attributes
pub fn render(
    state: UiState,
    toggle: AudioToggle,
    preview: Option<&StreamSummary>,
    assets: &UiConfig,
) -> ControlSurface {
    let icon = match toggle {
        AudioToggle::On => assets.switch_on_icon.clone(),
        AudioToggle::Off => assets.switch_off_icon.clone(),
    };
    let interactive = !state.is_recording();

    let audio_toggle = AudioToggleAttrs {
        state: toggle,
        icon,
        read_only: !interactive,
        pointer_events: if interactive {
            PointerEvents::Auto
        } else {
            PointerEvents::None
        },
        cursor_pointer: interactive,
    };

    match state {
        UiState::PreRecording => ControlSurface {
            play: ControlAttrs::shown(),
            stop: ControlAttrs::hidden(),
            preview: PreviewAttrs {
                hidden: true,
                source: None,
            },
            audio_toggle,
        },
        UiState::Recording => ControlSurface {
            play: ControlAttrs::hidden(),
            stop: ControlAttrs::shown(),
            preview: PreviewAttrs {
                hidden: false,
                source: preview.cloned(),
            },
            audio_toggle,
        },
        // Play comes back but stays disabled until the file is delivered
        UiState::Finalizing => ControlSurface {
            play: ControlAttrs {
                hidden: false,
                disabled: true,
            },
            stop: ControlAttrs::hidden(),
            preview: PreviewAttrs {
                hidden: true,
                source: None,
            },
            audio_toggle,
        },
    }
}
