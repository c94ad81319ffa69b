use super::stream::CaptureStream;
use crate::error::CaptureError;

/// Constraints for a display-capture request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConstraints {
    /// Capture the screen as the video source
    pub video: bool,
    /// Ask the platform for audio alongside the display capture
    pub audio: bool,
}

impl DisplayConstraints {
    pub fn screen(audio: bool) -> Self {
        Self { video: true, audio }
    }
}

/// Capture platform trait
///
/// Implementations:
/// - Synthetic: test-pattern display and silent microphone (demo, tests)
///
/// Both requests suspend until the platform grants or refuses access.
#[async_trait::async_trait]
pub trait CapturePlatform: Send + Sync {
    /// Request a display-capture stream
    async fn request_display(
        &self,
        constraints: DisplayConstraints,
    ) -> Result<CaptureStream, CaptureError>;

    /// Request a microphone-only audio stream
    async fn request_microphone(&self) -> Result<CaptureStream, CaptureError>;

    /// Get platform name for logging
    fn name(&self) -> &str;
}
