use super::{OsNotification, OsNotifications, WindowClients};
use notify_wire::{PushEnvelope, APP_NAME, DEFAULT_CLICK_URL};
use std::sync::Arc;

///
/// Handles incoming push payloads and notification clicks the way a
/// service worker would: a push always produces a visible
/// notification, a click always lands the user somewhere useful.
///
pub struct PushReceiver {
    os_notifications: Arc<dyn OsNotifications>,
    window_clients: Arc<dyn WindowClients>,
}

impl PushReceiver {
    pub fn new(
        os_notifications: Arc<dyn OsNotifications>,
        window_clients: Arc<dyn WindowClients>,
    ) -> Self {
        Self {
            os_notifications,
            window_clients,
        }
    }

    pub async fn handle_push(&self, payload: &[u8]) {
        let envelope = match serde_json::from_slice::<PushEnvelope>(payload) {
            Ok(envelope) => envelope,
            Err(err) => {
                // A push the session cannot parse still has to become
                // visible, dropping it silently would eat the alert.
                tracing::warn!(%err, "unparseable push payload");
                PushEnvelope {
                    title: None,
                    body: Some(String::from_utf8_lossy(payload).into_owned()),
                    tag: None,
                    renotify: true,
                    data: Default::default(),
                }
            }
        };

        let notification = OsNotification {
            title: envelope.title.unwrap_or_else(|| APP_NAME.to_string()),
            body: envelope.body.unwrap_or_default(),
            // Untagged alerts get a unique tag so they never replace
            // one another in the tray.
            tag: envelope
                .tag
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            renotify: envelope.renotify,
            url: envelope
                .data
                .url
                .unwrap_or_else(|| DEFAULT_CLICK_URL.to_string()),
        };

        self.os_notifications.show(notification).await;
    }

    pub async fn handle_click(&self, notification: &OsNotification) {
        let focused = self.window_clients.focus_existing(&notification.url).await;
        if !focused {
            self.window_clients.open(&notification.url).await;
        }

        self.os_notifications.dismiss(&notification.tag).await;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::push::{MockOsNotifications, MockWindowClients};

    fn create_notification() -> OsNotification {
        OsNotification {
            title: "New study material".to_string(),
            body: "3 new notes in Calculus".to_string(),
            tag: "content:note:abc:math-101".to_string(),
            renotify: true,
            url: "/courses/math-101".to_string(),
        }
    }

    #[tokio::test]
    async fn handle_push_shows_envelope_fields() {
        let payload = br#"{
            "title": "New study material",
            "body": "3 new notes in Calculus",
            "tag": "content:note:abc:math-101",
            "renotify": false,
            "data": { "url": "/courses/math-101" }
        }"#;

        let mut os_notifications = MockOsNotifications::new();
        os_notifications
            .expect_show()
            .withf(|n| {
                n.title == "New study material"
                    && n.tag == "content:note:abc:math-101"
                    && !n.renotify
                    && n.url == "/courses/math-101"
            })
            .once()
            .return_const(());
        let receiver = PushReceiver::new(
            Arc::new(os_notifications),
            Arc::new(MockWindowClients::new()),
        );

        receiver.handle_push(payload).await;
    }

    #[tokio::test]
    async fn handle_push_unparseable_payload_still_shows() {
        let mut os_notifications = MockOsNotifications::new();
        os_notifications
            .expect_show()
            .withf(|n| n.title == APP_NAME && n.body == "plain text alert")
            .once()
            .return_const(());
        let receiver = PushReceiver::new(
            Arc::new(os_notifications),
            Arc::new(MockWindowClients::new()),
        );

        receiver.handle_push(b"plain text alert").await;
    }

    #[tokio::test]
    async fn handle_push_untagged_alerts_get_distinct_tags() {
        let tags = Arc::new(std::sync::Mutex::new(Vec::new()));
        let tags_clone = Arc::clone(&tags);
        let mut os_notifications = MockOsNotifications::new();
        os_notifications
            .expect_show()
            .times(2)
            .returning(move |notification| {
                tags_clone.lock().unwrap().push(notification.tag);
            });
        let receiver = PushReceiver::new(
            Arc::new(os_notifications),
            Arc::new(MockWindowClients::new()),
        );

        receiver.handle_push(br#"{"body":"first"}"#).await;
        receiver.handle_push(br#"{"body":"second"}"#).await;

        let tags = tags.lock().unwrap();
        assert_eq!(tags.len(), 2);
        assert_ne!(tags[0], tags[1]);
    }

    #[tokio::test]
    async fn handle_push_defaults_click_url() {
        let mut os_notifications = MockOsNotifications::new();
        os_notifications
            .expect_show()
            .withf(|n| n.url == DEFAULT_CLICK_URL)
            .once()
            .return_const(());
        let receiver = PushReceiver::new(
            Arc::new(os_notifications),
            Arc::new(MockWindowClients::new()),
        );

        receiver.handle_push(b"{}").await;
    }

    #[tokio::test]
    async fn handle_click_focuses_existing_window() {
        let mut os_notifications = MockOsNotifications::new();
        os_notifications.expect_dismiss().once().return_const(());
        let mut window_clients = MockWindowClients::new();
        window_clients
            .expect_focus_existing()
            .withf(|url| url == "/courses/math-101")
            .once()
            .returning(|_| true);
        window_clients.expect_open().never();
        let receiver = PushReceiver::new(Arc::new(os_notifications), Arc::new(window_clients));

        receiver.handle_click(&create_notification()).await;
    }

    #[tokio::test]
    async fn handle_click_opens_window_when_none_focused() {
        let mut os_notifications = MockOsNotifications::new();
        os_notifications
            .expect_dismiss()
            .withf(|tag| tag == "content:note:abc:math-101")
            .once()
            .return_const(());
        let mut window_clients = MockWindowClients::new();
        window_clients.expect_focus_existing().returning(|_| false);
        window_clients
            .expect_open()
            .withf(|url| url == "/courses/math-101")
            .once()
            .return_const(());
        let receiver = PushReceiver::new(Arc::new(os_notifications), Arc::new(window_clients));

        receiver.handle_click(&create_notification()).await;
    }
}
