use super::{OsNotification, OsNotifications};
use async_trait::async_trait;
use std::sync::Mutex;

///
/// Tray backend used in tests and headless runs. Mirrors the OS
/// behaviour that matters: same tag replaces, different tags stack.
///
#[derive(Default)]
pub struct InMemoryTray {
    notifications: Mutex<Vec<OsNotification>>,
}

impl InMemoryTray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible(&self) -> Vec<OsNotification> {
        self.notifications.lock().unwrap().clone()
    }
}

#[async_trait]
impl OsNotifications for InMemoryTray {
    async fn show(&self, notification: OsNotification) {
        let mut notifications = self.notifications.lock().unwrap();

        match notifications.iter_mut().find(|n| n.tag == notification.tag) {
            Some(existing) => *existing = notification,
            None => notifications.push(notification),
        }
    }

    async fn dismiss(&self, tag: &str) {
        self.notifications.lock().unwrap().retain(|n| n.tag != tag);
    }
}
