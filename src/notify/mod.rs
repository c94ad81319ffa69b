//! Toast notifications
//!
//! - `toast`: toast model and the widget's presets (credit, offline, online)
//! - `board`: notifier that logs toasts and tracks which are on screen
//! - `connectivity`: network monitor and the toasts it triggers

mod board;
mod connectivity;
mod toast;

pub use board::{ShownToast, ToastBoard};
pub use connectivity::{ConnectivityEvent, ConnectivityMonitor, ConnectivityNotifier};
pub use toast::{Gravity, Position, Toast, ToastDuration, ToastPresets, ToastStyle};

/// Toast display boundary
///
/// Fire-and-forget: callers never observe a result.
pub trait Notifier: Send + Sync {
    fn show(&self, toast: Toast);
}
