use serde::Serialize;

/// What the widget is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UiState {
    #[default]
    PreRecording,
    Recording,
    Finalizing,
}

impl UiState {
    /// The recording-active flag: true only between a successful start and a stop
    pub fn is_recording(&self) -> bool {
        *self == UiState::Recording
    }
}

/// Audio toggle position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioToggle {
    On,
    #[default]
    Off,
}

impl AudioToggle {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            AudioToggle::On
        } else {
            AudioToggle::Off
        }
    }

    pub fn is_on(&self) -> bool {
        *self == AudioToggle::On
    }

    pub fn flipped(&self) -> Self {
        match self {
            AudioToggle::On => AudioToggle::Off,
            AudioToggle::Off => AudioToggle::On,
        }
    }

    /// Click on the toggle: flips it unless recording is active
    ///
    /// Returns whether the toggle changed.
    pub fn click(&mut self, ui: UiState) -> bool {
        if ui.is_recording() {
            return false;
        }
        *self = self.flipped();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_flips_outside_recording() {
        let mut toggle = AudioToggle::Off;

        assert!(toggle.click(UiState::PreRecording));
        assert_eq!(toggle, AudioToggle::On);
        assert!(toggle.click(UiState::Finalizing));
        assert_eq!(toggle, AudioToggle::Off);
    }

    #[test]
    fn test_click_is_noop_while_recording() {
        for start in [AudioToggle::On, AudioToggle::Off] {
            let mut toggle = start;
            for _ in 0..3 {
                assert!(!toggle.click(UiState::Recording));
            }
            assert_eq!(toggle, start);
        }
    }
}
