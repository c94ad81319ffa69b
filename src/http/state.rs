use crate::notify::{ConnectivityEvent, ToastBoard};
use crate::widget::WidgetHandle;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The running widget
    pub widget: WidgetHandle,

    /// Toasts shown so far (credit, connectivity)
    pub toasts: Arc<ToastBoard>,

    /// Feeds injected transitions to the connectivity notifier
    pub connectivity: mpsc::Sender<ConnectivityEvent>,
}

impl AppState {
    pub fn new(
        widget: WidgetHandle,
        toasts: Arc<ToastBoard>,
        connectivity: mpsc::Sender<ConnectivityEvent>,
    ) -> Self {
        Self {
            widget,
            toasts,
            connectivity,
        }
    }
}
