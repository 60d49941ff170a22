use crate::domain::model::{Notification, NotificationKind};
use crate::domain::ports::Notifier;
use std::sync::{Arc, Mutex};

/// Forwards notifications to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => tracing::info!("🔔 {}", notification.message),
            NotificationKind::Failure => tracing::error!("🔔 {}", notification.message),
        }
    }
}

/// Keeps every notification until the UI layer drains it.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    /// 取出並清空，對應 UI 關閉通知
    pub fn drain(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|mut n| std::mem::take(&mut *n))
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        LogNotifier.notify(notification.clone());
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.push(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_queue() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notification::success("saved"));
        notifier.notify(Notification::failure("offline"));

        let drained = notifier.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[1].kind, NotificationKind::Failure);
        assert!(notifier.notifications().is_empty());
    }
}
