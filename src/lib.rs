pub mod capture;
pub mod config;
pub mod error;
pub mod http;
pub mod notify;
pub mod recorder;
pub mod synthetic;
pub mod ui;
pub mod widget;

pub use capture::{CaptureAcquirer, CapturePlatform, CaptureStream, MediaTrack, TrackKind};
pub use config::Config;
pub use error::{CaptureDevice, CaptureError, RecorderError, WidgetError};
pub use http::{create_router, AppState};
pub use notify::{
    ConnectivityEvent, ConnectivityMonitor, ConnectivityNotifier, Notifier, Toast, ToastBoard,
    ToastPresets,
};
pub use recorder::{
    DownloadReceipt, Downloader, FileDownloader, MediaRecorder, RecorderController, RecorderEvent,
    RecorderOptions,
};
pub use synthetic::{SyntheticPlatform, SyntheticRecorder};
pub use ui::{AudioToggle, ControlSurface, UiState};
pub use widget::{Widget, WidgetEvent, WidgetHandle, WidgetSnapshot};
