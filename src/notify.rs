//! User-facing notifications and an auto-dismissing in-memory queue.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tokio::time::{Duration, Instant};

use crate::{engine::traits::NotificationSink, runtime::config::ControllerConfig};

/// Default time a notification stays visible.
pub const DEFAULT_NOTIFICATION_TTL_MS: u64 = 4_500;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Confirmed action.
    Success,
    /// Failed action.
    Error,
}

/// `{type, message}` pair shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Severity.
    #[serde(rename = "type")]
    pub kind: NoticeKind,
    /// Text shown to the user.
    pub message: String,
}

impl Notification {
    /// Success notification.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    /// Error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    /// True for error notifications.
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// Notification sink that keeps each entry visible for a fixed TTL.
#[derive(Debug)]
pub struct ToastQueue {
    ttl: Duration,
    entries: Mutex<Vec<(Notification, Instant)>>,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_NOTIFICATION_TTL_MS))
    }
}

impl ToastQueue {
    /// Queue whose entries stay visible for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Queue using the controller's `notification_ttl_ms`.
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::new(config.notification_ttl())
    }

    /// Notifications not yet dismissed, oldest first. Expired entries are dropped.
    pub fn active(&self) -> Vec<Notification> {
        let now = Instant::now();
        let mut entries = self.lock();
        entries.retain(|(_, expires)| *expires > now);
        entries.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Dismisses everything immediately.
    pub fn dismiss_all(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Notification, Instant)>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl NotificationSink for ToastQueue {
    fn notify(&self, notification: Notification) {
        let expires = Instant::now() + self.ttl;
        self.lock().push((notification, expires));
    }
}
