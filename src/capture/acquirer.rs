use std::sync::Arc;
use tracing::{info, warn};

use super::platform::{CapturePlatform, DisplayConstraints};
use super::stream::CaptureStream;
use crate::error::CaptureError;

/// Acquires the stream a recording session records from
///
/// Requests the screen, and when audio is enabled also the microphone,
/// merging the two into one stream.
pub struct CaptureAcquirer {
    platform: Arc<dyn CapturePlatform>,
}

impl CaptureAcquirer {
    pub fn new(platform: Arc<dyn CapturePlatform>) -> Self {
        Self { platform }
    }

    pub fn platform_name(&self) -> &str {
        self.platform.name()
    }

    /// Acquire a capture stream
    ///
    /// With `audio` the result holds the display's video tracks plus the
    /// microphone's audio tracks; without it, the display stream carries no
    /// audio at all. Tracks that end up unused are stopped, including the
    /// whole display stream if the microphone request fails.
    pub async fn acquire(&self, audio: bool) -> Result<CaptureStream, CaptureError> {
        info!(
            "Requesting display capture from {} (audio: {})",
            self.platform.name(),
            audio
        );

        let display = self
            .platform
            .request_display(DisplayConstraints::screen(audio))
            .await?;

        if !audio {
            if display.has_audio() {
                warn!("Platform returned audio tracks for a video-only request, dropping them");
            }
            return Ok(display.strip_audio());
        }

        let microphone = match self.platform.request_microphone().await {
            Ok(stream) => stream,
            Err(e) => {
                display.stop_all();
                return Err(e);
            }
        };

        let combined = CaptureStream::combine(&display, &microphone);
        display.stop_excluded(&combined);
        microphone.stop_excluded(&combined);

        info!(
            "Combined capture stream {} ({} tracks)",
            combined.id(),
            combined.tracks().len()
        );

        Ok(combined)
    }
}
