pub mod acquirer;
pub mod platform;
pub mod stream;

pub use acquirer::CaptureAcquirer;
pub use platform::{CapturePlatform, DisplayConstraints};
pub use stream::{CaptureStream, MediaTrack, StreamSummary, TrackKind, TrackSummary};
