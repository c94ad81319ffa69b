pub mod backend;
pub mod chunk;
pub mod controller;
pub mod download;

pub use backend::{MediaRecorder, RecorderEvent, RecorderOptions, DEFAULT_MIME_TYPE};
pub use chunk::{ChunkList, DownloadReceipt, RecordedBlob};
pub use controller::{FinishedRecording, RecorderController, RecorderState};
pub use download::{Downloader, FileDownloader, DEFAULT_FILE_NAME};
