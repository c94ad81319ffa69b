use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use screen_recorder::{
    create_router, AppState, Config, ConnectivityMonitor, ConnectivityNotifier, FileDownloader,
    SyntheticPlatform, SyntheticRecorder, ToastBoard, ToastPresets, Widget, WidgetEvent,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn, Level};

#[derive(Parser)]
#[command(name = "screen-recorder")]
#[command(about = "Screen recording widget with an HTTP control surface")]
struct Args {
    /// Config file (extension optional)
    #[arg(short, long, default_value = "config/screen-recorder")]
    config: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the widget and its HTTP control surface (default)
    Serve,
    /// Record once and exit
    Record {
        /// Duration to record in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,

        /// Record microphone audio too
        #[arg(short, long)]
        audio: bool,
    },
}

fn build_widget(cfg: &Config) -> Widget {
    let platform = Arc::new(SyntheticPlatform::new(cfg.capture.clone()));
    let recorder = Box::new(SyntheticRecorder::new(&cfg.capture));
    let downloader = Arc::new(FileDownloader::new(cfg.recording.download_path()));

    Widget::new(cfg, platform, recorder, downloader)
}

async fn serve(cfg: Config) -> Result<()> {
    let board = Arc::new(ToastBoard::new(cfg.notifications.history_limit));
    let presets = ToastPresets::new(cfg.notifications.clone());

    let mut widget = build_widget(&cfg);
    if cfg.notifications.show_credit {
        widget = widget.with_credit(board.clone(), presets.clone());
    }
    let (handle, widget_task) = widget.spawn();

    let (connectivity_tx, connectivity_rx) = mpsc::channel(16);
    tokio::spawn(ConnectivityNotifier::new(board.clone(), presets).run(connectivity_rx));
    if cfg.connectivity.enabled {
        tokio::spawn(ConnectivityMonitor::new(cfg.connectivity.clone()).run(connectivity_tx.clone()));
    }

    let app = create_router(AppState::new(handle.clone(), board, connectivity_tx));
    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);
    info!("Downloads go to {}", cfg.recording.download_path().display());

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await
        .context("HTTP server failed")?;

    handle.shutdown().await?;
    widget_task.await.context("Widget task panicked")?;

    Ok(())
}

async fn record(cfg: Config, duration: u64, audio: bool) -> Result<()> {
    let (handle, widget_task) = build_widget(&cfg).spawn();
    let mut events = handle.subscribe();

    let snapshot = handle.snapshot().await?;
    if snapshot.audio_toggle.is_on() != audio {
        handle.toggle_audio().await?;
    }

    let snapshot = handle.play().await?;
    if !snapshot.recording {
        let reason = snapshot
            .last_error
            .map(|e| e.message)
            .unwrap_or_else(|| "unknown error".to_string());
        handle.shutdown().await?;
        bail!("Recording did not start: {}", reason);
    }

    info!("Recording for {} seconds (Ctrl+C to stop early)", duration);
    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(duration)) => {}
        _ = tokio::signal::ctrl_c() => info!("Stopping early"),
    }

    handle.stop().await?;

    loop {
        match events.recv().await {
            Ok(WidgetEvent::Downloaded { receipt, .. }) => {
                info!(
                    "Recording complete: {} ({} bytes, {} chunks)",
                    receipt.location, receipt.size_bytes, receipt.chunk_count
                );
                break;
            }
            Ok(WidgetEvent::Error { message, .. }) => {
                handle.shutdown().await?;
                bail!("Recording failed: {}", message);
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(n)) => warn!("Missed {} widget events", n),
            Err(broadcast::error::RecvError::Closed) => bail!("Widget stopped unexpectedly"),
        }
    }

    handle.shutdown().await?;
    widget_task.await.context("Widget task panicked")?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let cfg = Config::load_or_default(&args.config)?;

    info!("Screen Recorder v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(cfg).await,
        Command::Record { duration, audio } => record(cfg, duration, audio).await,
    }
}
