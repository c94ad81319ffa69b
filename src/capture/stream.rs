use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Media track kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
}

/// A single live media track
///
/// Clones share the live/ended state, so stopping any clone stops the
/// track for every holder (platform, recorder and preview alike).
#[derive(Debug, Clone)]
pub struct MediaTrack {
    id: Uuid,
    kind: TrackKind,
    label: String,
    ended: Arc<AtomicBool>,
}

impl MediaTrack {
    pub fn new(kind: TrackKind, label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            label: label.into(),
            ended: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_live(&self) -> bool {
        !self.ended.load(Ordering::SeqCst)
    }

    /// Stop the track, releasing the underlying capture source. Idempotent.
    pub fn stop(&self) {
        if !self.ended.swap(true, Ordering::SeqCst) {
            debug!("Stopped {:?} track {} ({})", self.kind, self.label, self.id);
        }
    }
}

/// A capture stream: an ordered set of tracks
#[derive(Debug, Clone)]
pub struct CaptureStream {
    id: Uuid,
    tracks: Vec<MediaTrack>,
}

impl CaptureStream {
    pub fn new(tracks: Vec<MediaTrack>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tracks,
        }
    }

    /// Build a new stream from the video tracks of `video` and the audio
    /// tracks of `audio`
    pub fn combine(video: &CaptureStream, audio: &CaptureStream) -> Self {
        let tracks = video
            .video_tracks()
            .chain(audio.audio_tracks())
            .cloned()
            .collect();
        Self::new(tracks)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn tracks(&self) -> &[MediaTrack] {
        &self.tracks
    }

    pub fn video_tracks(&self) -> impl Iterator<Item = &MediaTrack> {
        self.tracks.iter().filter(|t| t.kind() == TrackKind::Video)
    }

    pub fn audio_tracks(&self) -> impl Iterator<Item = &MediaTrack> {
        self.tracks.iter().filter(|t| t.kind() == TrackKind::Audio)
    }

    pub fn has_audio(&self) -> bool {
        self.audio_tracks().next().is_some()
    }

    /// True while at least one track is still live
    pub fn is_active(&self) -> bool {
        self.tracks.iter().any(MediaTrack::is_live)
    }

    /// Stop every track in the stream
    pub fn stop_all(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }

    /// Stop every track of `self` that is not part of `kept`
    pub fn stop_excluded(&self, kept: &CaptureStream) {
        for track in &self.tracks {
            if !kept.tracks.iter().any(|k| k.id() == track.id()) {
                track.stop();
            }
        }
    }

    /// Remove audio tracks from the stream, stopping them
    pub fn strip_audio(mut self) -> Self {
        for track in self.audio_tracks() {
            track.stop();
        }
        self.tracks.retain(|t| t.kind() != TrackKind::Audio);
        self
    }

    pub fn summary(&self) -> StreamSummary {
        StreamSummary {
            stream_id: self.id,
            tracks: self
                .tracks
                .iter()
                .map(|t| TrackSummary {
                    id: t.id(),
                    kind: t.kind(),
                    label: t.label().to_string(),
                    live: t.is_live(),
                })
                .collect(),
        }
    }
}

/// Serializable view of a stream, bound to the preview control
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamSummary {
    pub stream_id: Uuid,
    pub tracks: Vec<TrackSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSummary {
    pub id: Uuid,
    pub kind: TrackKind,
    pub label: String,
    pub live: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display_with_system_audio() -> CaptureStream {
        CaptureStream::new(vec![
            MediaTrack::new(TrackKind::Video, "screen:0"),
            MediaTrack::new(TrackKind::Audio, "system-audio"),
        ])
    }

    #[test]
    fn test_track_stop_is_shared_between_clones() {
        let track = MediaTrack::new(TrackKind::Video, "screen:0");
        let clone = track.clone();

        clone.stop();

        assert!(!track.is_live());
        track.stop(); // Idempotent
        assert!(!clone.is_live());
    }

    #[test]
    fn test_combine_takes_video_from_first_and_audio_from_second() {
        let display = display_with_system_audio();
        let mic = CaptureStream::new(vec![MediaTrack::new(TrackKind::Audio, "mic:default")]);

        let combined = CaptureStream::combine(&display, &mic);

        let labels: Vec<&str> = combined.tracks().iter().map(|t| t.label()).collect();
        assert_eq!(labels, vec!["screen:0", "mic:default"]);
        assert_ne!(combined.id(), display.id());
    }

    #[test]
    fn test_stop_excluded_only_stops_dropped_tracks() {
        let display = display_with_system_audio();
        let mic = CaptureStream::new(vec![MediaTrack::new(TrackKind::Audio, "mic:default")]);
        let combined = CaptureStream::combine(&display, &mic);

        display.stop_excluded(&combined);

        assert!(display.video_tracks().all(MediaTrack::is_live));
        assert!(display.audio_tracks().all(|t| !t.is_live()));
        assert!(combined.is_active());
    }

    #[test]
    fn test_strip_audio() {
        let display = display_with_system_audio();
        let system_audio = display.audio_tracks().next().cloned().unwrap();

        let stripped = display.strip_audio();

        assert!(!stripped.has_audio());
        assert_eq!(stripped.tracks().len(), 1);
        assert!(!system_audio.is_live());
    }

    #[test]
    fn test_stop_all_deactivates_stream() {
        let stream = display_with_system_audio();
        assert!(stream.is_active());

        stream.stop_all();

        assert!(!stream.is_active());
        assert!(stream.summary().tracks.iter().all(|t| !t.live));
    }
}
