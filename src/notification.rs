// src/notification.rs

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// How long a toast stays on screen.
pub const AUTO_HIDE_MS: i64 = 3000;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Success,
    Error,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    BottomRight,
}

/// A transient message for the user ("toast").
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub variant: Variant,
    pub anchor: Anchor,
    pub issued_at: DateTime<Utc>,
    #[serde(skip)]
    pub auto_hide: Duration,
}

impl Notification {
    pub fn new(message: impl Into<String>, is_error: bool, issued_at: DateTime<Utc>) -> Self {
        Notification {
            message: message.into(),
            variant: if is_error {
                Variant::Error
            } else {
                Variant::Success
            },
            anchor: Anchor::BottomRight,
            issued_at,
            auto_hide: Duration::milliseconds(AUTO_HIDE_MS),
        }
    }

    pub fn is_error(&self) -> bool {
        self.variant == Variant::Error
    }

    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        now < self.issued_at + self.auto_hide
    }
}

/// Toasts currently on screen. Identical messages are not stacked while one is still visible.
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    entries: Vec<Notification>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a notification unless the same message is still showing.
    ///
    /// Returns the queued notification, or `None` if it was suppressed as a duplicate.
    pub fn enqueue(
        &mut self,
        message: impl Into<String>,
        is_error: bool,
        now: DateTime<Utc>,
    ) -> Option<Notification> {
        self.prune(now);
        let message = message.into();
        if self.entries.iter().any(|n| n.message == message) {
            log::debug!("Suppressing duplicate notification: {}", message);
            return None;
        }
        let notification = Notification::new(message, is_error, now);
        self.entries.push(notification.clone());
        Some(notification)
    }

    /// Notifications still on screen at `now`, oldest first.
    pub fn visible(&self, now: DateTime<Utc>) -> Vec<&Notification> {
        self.entries
            .iter()
            .filter(|n| n.is_visible_at(now))
            .collect()
    }

    fn prune(&mut self, now: DateTime<Utc>) {
        self.entries.retain(|n| n.is_visible_at(now));
    }
}
