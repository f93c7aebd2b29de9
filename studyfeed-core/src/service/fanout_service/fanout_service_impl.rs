use super::FanoutService;
use crate::{
    repository::{Notification, PushSubscriptionsRepository},
    service::{push_gateway::PushGateway, websockets_service::WebSocketsService},
};
use axum::async_trait;
use notify_wire::{
    NotificationKind, NotificationRecord, PushData, PushEnvelope, RealtimeMessage,
};
use std::sync::Arc;

pub struct FanoutServiceImpl {
    websockets_service: Arc<dyn WebSocketsService>,
    push_subscriptions_repository: Arc<dyn PushSubscriptionsRepository>,
    push_gateway: Arc<dyn PushGateway>,
}

impl FanoutServiceImpl {
    pub fn new(
        websockets_service: Arc<dyn WebSocketsService>,
        push_subscriptions_repository: Arc<dyn PushSubscriptionsRepository>,
        push_gateway: Arc<dyn PushGateway>,
    ) -> Self {
        Self {
            websockets_service,
            push_subscriptions_repository,
            push_gateway,
        }
    }

    fn create_envelope(record: &NotificationRecord, renotify: bool) -> PushEnvelope {
        let title = match record.kind {
            NotificationKind::ContentCreated => "New study material",
            NotificationKind::FriendRequest => "New friend request",
            NotificationKind::FriendAccepted => "Friend request accepted",
        };

        // The tag makes the OS tray coalesce repeated pushes for one
        // logical event into a single visible entry.
        let tag = record
            .aggregation_key
            .clone()
            .unwrap_or_else(|| record.id.clone());

        PushEnvelope {
            title: Some(title.to_string()),
            body: Some(record.message.clone()),
            tag: Some(tag),
            renotify,
            data: PushData {
                url: record.url.clone(),
            },
        }
    }

    async fn send_push(&self, record: &NotificationRecord, renotify: bool) {
        let subscriptions = match self
            .push_subscriptions_repository
            .find_by_user(record.user_id)
            .await
        {
            Ok(subscriptions) => subscriptions,
            Err(err) => {
                tracing::warn!(%err, "failed to load push subscriptions");
                return;
            }
        };

        let envelope = Self::create_envelope(record, renotify);

        for subscription in subscriptions {
            if let Err(err) = self.push_gateway.deliver(&subscription, &envelope).await {
                tracing::warn!(
                    %err,
                    endpoint = subscription.endpoint,
                    "push delivery failed",
                );
            }
        }
    }
}

#[async_trait]
impl FanoutService for FanoutServiceImpl {
    async fn send_inserted(&self, notification: Notification) {
        let record = NotificationRecord::from(notification);

        self.websockets_service
            .send(record.user_id, RealtimeMessage::inserted(record.clone()))
            .await;

        self.send_push(&record, true).await;
    }

    async fn send_updated(&self, notification: Notification, renotify: bool) {
        let record = NotificationRecord::from(notification);

        self.websockets_service
            .send(record.user_id, RealtimeMessage::updated(record.id.clone()))
            .await;

        self.send_push(&record, renotify).await;
    }
}
