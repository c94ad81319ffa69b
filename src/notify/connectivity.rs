use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::toast::ToastPresets;
use super::Notifier;
use crate::config::ConnectivityConfig;

/// Network connectivity transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityEvent {
    Online,
    Offline,
}

impl std::str::FromStr for ConnectivityEvent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(ConnectivityEvent::Online),
            "offline" => Ok(ConnectivityEvent::Offline),
            other => anyhow::bail!("unknown connectivity status: {}", other),
        }
    }
}

/// Shows a toast for every connectivity transition
///
/// Offline produces a persistent toast with a close button; online produces
/// one that dismisses itself. Independent of any recording state.
pub struct ConnectivityNotifier {
    notifier: Arc<dyn Notifier>,
    presets: ToastPresets,
}

impl ConnectivityNotifier {
    pub fn new(notifier: Arc<dyn Notifier>, presets: ToastPresets) -> Self {
        Self { notifier, presets }
    }

    pub fn handle(&self, event: ConnectivityEvent) {
        info!("Network is {:?}", event);
        let toast = match event {
            ConnectivityEvent::Offline => self.presets.offline(),
            ConnectivityEvent::Online => self.presets.online(),
        };
        self.notifier.show(toast);
    }

    /// Handle events until every sender is gone
    pub async fn run(self, mut events: mpsc::Receiver<ConnectivityEvent>) {
        info!("Connectivity notifier started");

        while let Some(event) = events.recv().await {
            self.handle(event);
        }

        info!("Connectivity notifier stopped");
    }
}

/// Watches the network by probing a TCP address
///
/// Emits an event only when the state changes. The network is assumed
/// online at start, so nothing is emitted until the first failed probe.
pub struct ConnectivityMonitor {
    config: ConnectivityConfig,
}

impl ConnectivityMonitor {
    pub fn new(config: ConnectivityConfig) -> Self {
        Self { config }
    }

    async fn probe(&self) -> bool {
        let timeout = Duration::from_millis(self.config.timeout_ms);
        match tokio::time::timeout(timeout, TcpStream::connect(&self.config.probe_addr)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                debug!("Connectivity probe to {} failed: {}", self.config.probe_addr, e);
                false
            }
            Err(_) => {
                debug!("Connectivity probe to {} timed out", self.config.probe_addr);
                false
            }
        }
    }

    /// Probe on a fixed interval until the receiver goes away
    pub async fn run(self, events: mpsc::Sender<ConnectivityEvent>) {
        info!(
            "Connectivity monitor probing {} every {}s",
            self.config.probe_addr, self.config.interval_secs
        );

        let mut online = true;
        let mut ticker = tokio::time::interval(Duration::from_secs(self.config.interval_secs.max(1)));

        loop {
            ticker.tick().await;

            let reachable = self.probe().await;
            let Some(event) = transition(online, reachable) else {
                continue;
            };
            online = reachable;

            if events.send(event).await.is_err() {
                warn!("Connectivity receiver closed, stopping monitor");
                break;
            }
        }
    }
}

fn transition(was_online: bool, reachable: bool) -> Option<ConnectivityEvent> {
    match (was_online, reachable) {
        (true, false) => Some(ConnectivityEvent::Offline),
        (false, true) => Some(ConnectivityEvent::Online),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ToastBoard;

    #[test]
    fn test_transition_only_on_change() {
        assert_eq!(transition(true, true), None);
        assert_eq!(transition(true, false), Some(ConnectivityEvent::Offline));
        assert_eq!(transition(false, false), None);
        assert_eq!(transition(false, true), Some(ConnectivityEvent::Online));
    }

    #[test]
    fn test_parse_status() {
        assert_eq!("online".parse::<ConnectivityEvent>().unwrap(), ConnectivityEvent::Online);
        assert_eq!("offline".parse::<ConnectivityEvent>().unwrap(), ConnectivityEvent::Offline);
        assert!("flaky".parse::<ConnectivityEvent>().is_err());
    }

    #[tokio::test]
    async fn test_run_shows_one_toast_per_event() {
        let board = Arc::new(ToastBoard::default());
        let notifier = ConnectivityNotifier::new(board.clone(), ToastPresets::default());
        let (tx, rx) = mpsc::channel(8);

        tx.send(ConnectivityEvent::Offline).await.unwrap();
        tx.send(ConnectivityEvent::Online).await.unwrap();
        drop(tx);
        notifier.run(rx).await;

        assert_eq!(board.history().len(), 2);
    }

    #[tokio::test]
    async fn test_monitor_reports_unreachable_probe() {
        // Bind then drop a listener so the port is closed
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let monitor = ConnectivityMonitor::new(ConnectivityConfig {
            enabled: true,
            probe_addr: addr.to_string(),
            interval_secs: 1,
            timeout_ms: 200,
        });
        let (tx, mut rx) = mpsc::channel(1);
        let handle = tokio::spawn(monitor.run(tx));

        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await.unwrap();

        assert_eq!(event, Some(ConnectivityEvent::Offline));
        handle.abort();
    }
}
