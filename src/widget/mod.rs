//! The screen-recording widget
//!
//! This module ties the pieces together:
//! - Capture acquisition (screen, optionally microphone)
//! - The recorder controller and its chunk list
//! - UI state reflection for the play/stop/preview/audio-toggle controls
//! - Delivery of the finished file and widget events for observers

mod events;
mod widget;

pub use events::{ErrorReport, WidgetEvent, WidgetSnapshot};
pub use widget::{Widget, WidgetHandle};
