//! User-facing notifications: the relay port and an in-memory toast queue
//! with TTL and de-duplication.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub title: Option<String>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
            title: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
            title: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
            title: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Warning,
            message: message.into(),
            title: None,
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Fire-and-forget sink for notifications.
pub trait NotificationRelay: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<R: NotificationRelay + ?Sized> NotificationRelay for &R {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

impl<R: NotificationRelay + ?Sized> NotificationRelay for std::sync::Arc<R> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

pub type ToastId = u64;

#[derive(Debug, Clone)]
struct Toast {
    id: ToastId,
    notification: Notification,
    ttl: Duration,
    created: Instant,
}

/// Render-ready toast; `progress` runs from 1.0 (new) to 0.0 (expired).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToastView {
    pub id: ToastId,
    pub notification: Notification,
    pub progress: f32,
}

struct Queue {
    toasts: VecDeque<Toast>,
    next_id: ToastId,
}

/// Bounded toast queue.
///
/// Identical notifications pushed within the de-dupe window refresh the
/// existing toast instead of stacking. The oldest toast is dropped when
/// the queue is full.
pub struct ToastQueue {
    queue: Mutex<Queue>,
    max: usize,
    ttl: Duration,
    dedupe_window: Duration,
}

impl ToastQueue {
    pub fn new(max: usize, ttl: Duration) -> Self {
        Self {
            queue: Mutex::new(Queue {
                toasts: VecDeque::new(),
                next_id: 1,
            }),
            max: max.max(1),
            ttl,
            dedupe_window: Duration::from_millis(500),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Queue> {
        self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push_at(&self, notification: Notification, now: Instant) -> ToastId {
        let mut queue = self.lock();

        if let Some(existing) = queue.toasts.iter_mut().find(|t| {
            t.notification == notification
                && now.duration_since(t.created) <= self.dedupe_window
        }) {
            existing.created = now;
            return existing.id;
        }

        let id = queue.next_id;
        queue.next_id += 1;
        if queue.toasts.len() == self.max {
            queue.toasts.pop_front();
        }
        queue.toasts.push_back(Toast {
            id,
            notification,
            ttl: self.ttl,
            created: now,
        });
        id
    }

    pub fn dismiss(&self, id: ToastId) -> bool {
        let mut queue = self.lock();
        let before = queue.toasts.len();
        queue.toasts.retain(|t| t.id != id);
        queue.toasts.len() != before
    }

    /// Drop expired toasts.
    pub fn retain_visible(&self, now: Instant) {
        self.lock()
            .toasts
            .retain(|t| now.duration_since(t.created) < t.ttl);
    }

    pub fn visible(&self, now: Instant) -> Vec<ToastView> {
        self.lock()
            .toasts
            .iter()
            .filter(|t| now.duration_since(t.created) < t.ttl)
            .map(|t| ToastView {
                id: t.id,
                notification: t.notification.clone(),
                progress: 1.0
                    - (now.duration_since(t.created).as_secs_f32() / t.ttl.as_secs_f32()),
            })
            .collect()
    }

    /// Remove and return everything queued, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        self.lock()
            .toasts
            .drain(..)
            .map(|t| t.notification)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationRelay for ToastQueue {
    fn notify(&self, notification: Notification) {
        debug!(kind = ?notification.kind, message = %notification.message, "notification");
        self.push_at(notification, Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_within_window() {
        let queue = ToastQueue::new(5, Duration::from_secs(5));
        let now = Instant::now();
        let a = queue.push_at(Notification::success("Copied to clipboard!"), now);
        let b = queue.push_at(
            Notification::success("Copied to clipboard!"),
            now + Duration::from_millis(100),
        );
        assert_eq!(a, b);
        assert_eq!(queue.len(), 1);

        let c = queue.push_at(
            Notification::success("Copied to clipboard!"),
            now + Duration::from_secs(2),
        );
        assert_ne!(a, c);
    }

    #[test]
    fn test_oldest_dropped_when_full() {
        let queue = ToastQueue::new(2, Duration::from_secs(5));
        let now = Instant::now();
        queue.push_at(Notification::info("one"), now);
        queue.push_at(Notification::info("two"), now);
        queue.push_at(Notification::info("three"), now);

        let messages: Vec<_> = queue.drain().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["two", "three"]);
    }

    #[test]
    fn test_expiry() {
        let queue = ToastQueue::new(5, Duration::from_secs(1));
        let now = Instant::now();
        queue.push_at(Notification::error("boom").titled("Error"), now);
        assert_eq!(queue.visible(now).len(), 1);

        let later = now + Duration::from_secs(2);
        assert!(queue.visible(later).is_empty());
        queue.retain_visible(later);
        assert!(queue.is_empty());
    }
}
