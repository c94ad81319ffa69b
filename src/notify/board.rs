use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use super::toast::Toast;
use super::Notifier;

/// A toast together with when it was shown
#[derive(Debug, Clone, Serialize)]
pub struct ShownToast {
    pub toast: Toast,
    pub shown_at: DateTime<Utc>,
    pub dismissed: bool,
}

impl ShownToast {
    /// Whether the toast is still on screen at `now`
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        if self.dismissed {
            return false;
        }
        match self.toast.duration.as_duration() {
            None => true,
            Some(duration) => match chrono::Duration::from_std(duration) {
                Ok(duration) => now < self.shown_at + duration,
                Err(_) => true,
            },
        }
    }
}

/// Notifier that logs every toast and keeps their on-screen state
///
/// Timed toasts expire on their own; persistent ones stay until
/// [`dismiss`](Self::dismiss) is called for a toast that has a close button.
pub struct ToastBoard {
    history: Mutex<VecDeque<ShownToast>>,
    limit: usize,
}

impl ToastBoard {
    pub fn new(limit: usize) -> Self {
        Self {
            history: Mutex::new(VecDeque::new()),
            limit: limit.max(1),
        }
    }

    fn with_history<T>(&self, f: impl FnOnce(&mut VecDeque<ShownToast>) -> T) -> T {
        let mut history = self.history.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut history)
    }

    /// Every toast shown, oldest first (bounded by the history limit)
    pub fn history(&self) -> Vec<ShownToast> {
        self.with_history(|h| h.iter().cloned().collect())
    }

    pub fn active_at(&self, now: DateTime<Utc>) -> Vec<ShownToast> {
        self.with_history(|h| h.iter().filter(|t| t.is_active_at(now)).cloned().collect())
    }

    pub fn active(&self) -> Vec<ShownToast> {
        self.active_at(Utc::now())
    }

    /// Close a toast via its close button
    ///
    /// Returns false for unknown toasts and toasts without a close button.
    pub fn dismiss(&self, id: Uuid) -> bool {
        self.with_history(|h| {
            match h.iter_mut().find(|t| t.toast.id == id && t.toast.close) {
                Some(shown) if !shown.dismissed => {
                    shown.dismissed = true;
                    info!("Toast dismissed: {}", shown.toast.text);
                    true
                }
                _ => false,
            }
        })
    }
}

impl Default for ToastBoard {
    fn default() -> Self {
        Self::new(64)
    }
}

impl Notifier for ToastBoard {
    fn show(&self, toast: Toast) {
        info!(
            "Toast: \"{}\" ({:?}, {:?}/{:?})",
            toast.text, toast.duration, toast.gravity, toast.position
        );

        self.with_history(|h| {
            h.push_back(ShownToast {
                toast,
                shown_at: Utc::now(),
                dismissed: false,
            });
            while h.len() > self.limit {
                if let Some(old) = h.pop_front() {
                    debug!("Toast history full, forgetting \"{}\"", old.toast.text);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ToastPresets;

    #[test]
    fn test_timed_toast_expires() {
        let board = ToastBoard::default();
        board.show(ToastPresets::default().online());
        let shown_at = board.history()[0].shown_at;

        assert_eq!(board.active_at(shown_at + chrono::Duration::milliseconds(3999)).len(), 1);
        assert!(board.active_at(shown_at + chrono::Duration::milliseconds(4000)).is_empty());
    }

    #[test]
    fn test_persistent_toast_stays_until_dismissed() {
        let board = ToastBoard::default();
        let toast = ToastPresets::default().offline();
        let id = toast.id;
        board.show(toast);
        let much_later = Utc::now() + chrono::Duration::days(1);

        assert_eq!(board.active_at(much_later).len(), 1);
        assert!(board.dismiss(id));
        assert!(!board.dismiss(id));
        assert!(board.active_at(much_later).is_empty());
    }

    #[test]
    fn test_toast_without_close_button_cannot_be_dismissed() {
        let board = ToastBoard::default();
        let toast = ToastPresets::default().credit();
        let id = toast.id;
        board.show(toast);

        assert!(!board.dismiss(id));
        assert!(!board.dismiss(Uuid::new_v4()));
    }

    #[test]
    fn test_history_is_bounded() {
        let board = ToastBoard::new(2);
        let presets = ToastPresets::default();
        board.show(presets.credit());
        board.show(presets.offline());
        board.show(presets.online());

        let texts: Vec<String> = board.history().into_iter().map(|t| t.toast.text).collect();
        assert_eq!(texts, vec!["You are offline", "Welcome Back!"]);
    }
}
