mod common;

use anyhow::Result;
use common::ScriptedRecorder;
use screen_recorder::config::CaptureConfig;
use screen_recorder::recorder::RecorderState;
use screen_recorder::{
    CaptureStream, MediaTrack, RecorderController, RecorderError, RecorderEvent, RecorderOptions,
    SyntheticRecorder, TrackKind,
};

fn screen_stream() -> CaptureStream {
    CaptureStream::new(vec![
        MediaTrack::new(TrackKind::Video, "screen"),
        MediaTrack::new(TrackKind::Audio, "microphone"),
    ])
}

fn controller(recorder: ScriptedRecorder) -> RecorderController {
    RecorderController::new(Box::new(recorder), RecorderOptions::default())
}

/// Feed recorder events back until the session finalizes
async fn drain(
    controller: &mut RecorderController,
) -> Option<screen_recorder::recorder::FinishedRecording> {
    loop {
        let event = controller.next_event().await;
        let closed = event.is_none();
        if let Some(finished) = controller.handle_event(event).await {
            return Some(finished);
        }
        if closed {
            return None;
        }
    }
}

#[tokio::test]
async fn test_chunks_assembled_in_order() -> Result<()> {
    let mut recorder = ScriptedRecorder::with_chunks(&["first-", "second-"]);
    recorder.on_stop = vec![b"last".to_vec()];
    let mut controller = controller(recorder);
    let stream = screen_stream();

    let session_id = controller.start(stream.clone()).await?;
    assert_eq!(controller.state(), RecorderState::Recording);
    assert_eq!(controller.session_id(), Some(session_id));

    controller.stop().await?;
    assert_eq!(controller.state(), RecorderState::Finalizing);
    assert!(!stream.is_active());

    let finished = drain(&mut controller).await.expect("session finalized");

    assert_eq!(finished.session_id, session_id);
    assert_eq!(finished.chunk_count, 3);
    assert_eq!(finished.blob.data, b"first-second-last".to_vec());
    assert_eq!(finished.blob.mime_type, "video/webm");
    assert_eq!(controller.state(), RecorderState::Idle);
    assert_eq!(controller.chunk_count(), 0);
    assert_eq!(controller.session_id(), None);

    Ok(())
}

#[tokio::test]
async fn test_empty_chunks_are_ignored() -> Result<()> {
    let recorder = ScriptedRecorder::with_chunks(&["", "data", ""]);
    let mut controller = controller(recorder);

    controller.start(screen_stream()).await?;
    controller.stop().await?;
    let finished = drain(&mut controller).await.expect("session finalized");

    assert_eq!(finished.chunk_count, 1);
    assert_eq!(finished.blob.data, b"data".to_vec());

    Ok(())
}

#[tokio::test]
async fn test_stop_before_any_chunk_yields_empty_recording() -> Result<()> {
    let mut controller = controller(ScriptedRecorder::default());

    controller.start(screen_stream()).await?;
    controller.stop().await?;
    let finished = drain(&mut controller).await.expect("session finalized");

    assert_eq!(finished.chunk_count, 0);
    assert!(finished.blob.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_closed_channel_still_finalizes() -> Result<()> {
    let recorder = ScriptedRecorder {
        drop_without_stopped: true,
        ..ScriptedRecorder::with_chunks(&["partial"])
    };
    let mut controller = controller(recorder);

    controller.start(screen_stream()).await?;
    controller.stop().await?;
    let finished = drain(&mut controller).await.expect("session finalized");

    assert_eq!(finished.blob.data, b"partial".to_vec());
    assert_eq!(controller.state(), RecorderState::Idle);

    Ok(())
}

#[tokio::test]
async fn test_failed_stop_discards_session() -> Result<()> {
    let recorder = ScriptedRecorder {
        fail_stop: true,
        ..ScriptedRecorder::with_chunks(&["lost"])
    };
    let mut controller = controller(recorder);
    let stream = screen_stream();

    controller.start(stream.clone()).await?;
    let err = controller.stop().await.unwrap_err();

    assert!(matches!(err, RecorderError::Stop(_)));
    assert_eq!(controller.state(), RecorderState::Idle);
    assert_eq!(controller.chunk_count(), 0);
    assert!(!stream.is_active());

    Ok(())
}

#[tokio::test]
async fn test_failed_start_releases_stream() -> Result<()> {
    let recorder = ScriptedRecorder {
        fail_start: true,
        ..ScriptedRecorder::default()
    };
    let mut controller = controller(recorder);
    let stream = screen_stream();

    let err = controller.start(stream.clone()).await.unwrap_err();

    assert!(matches!(err, RecorderError::Start(_)));
    assert_eq!(controller.state(), RecorderState::Idle);
    assert!(!stream.is_active());

    Ok(())
}

#[tokio::test]
async fn test_start_while_recording_is_busy() -> Result<()> {
    let mut controller = controller(ScriptedRecorder::default());
    let active = screen_stream();
    controller.start(active.clone()).await?;

    let second = screen_stream();
    let err = controller.start(second.clone()).await.unwrap_err();

    assert!(matches!(err, RecorderError::Busy("recording")));
    assert!(!second.is_active());
    assert!(active.is_active());

    Ok(())
}

#[tokio::test]
async fn test_stop_without_session() {
    let mut controller = controller(ScriptedRecorder::default());

    let err = controller.stop().await.unwrap_err();

    assert!(matches!(err, RecorderError::NotRecording));
}

#[tokio::test]
async fn test_data_outside_session_is_ignored() {
    let mut controller = controller(ScriptedRecorder::default());

    let finished = controller
        .handle_event(Some(RecorderEvent::DataAvailable(b"stray".to_vec())))
        .await;

    assert!(finished.is_none());
    assert_eq!(controller.chunk_count(), 0);
    assert!(controller
        .handle_event(Some(RecorderEvent::Stopped))
        .await
        .is_none());
}

#[tokio::test]
async fn test_new_session_after_capture_source_ended() -> Result<()> {
    let config = CaptureConfig {
        fps: 100,
        bytes_per_frame: 16,
        ..CaptureConfig::default()
    };
    let mut controller = RecorderController::new(
        Box::new(SyntheticRecorder::new(&config)),
        RecorderOptions::default(),
    );

    let first = screen_stream();
    controller.start(first.clone()).await?;
    tokio::time::sleep(std::time::Duration::from_millis(30)).await;

    // The user ends the share from outside the widget
    first.stop_all();
    let finished = drain(&mut controller).await.expect("session finalized");
    assert!(!finished.blob.is_empty());
    assert_eq!(controller.state(), RecorderState::Idle);

    let second = screen_stream();
    controller.start(second.clone()).await?;
    assert_eq!(controller.state(), RecorderState::Recording);

    controller.stop().await?;
    let finished = drain(&mut controller).await.expect("second session finalized");
    assert!(!finished.blob.is_empty());

    Ok(())
}
