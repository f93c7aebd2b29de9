use super::{AggregationService, AggregationServiceConfig};
use crate::{
    dto::input,
    error::Error,
    repository::{NewNotification, NotificationsRepository, UpsertOutcome},
    service::{audience_service::AudienceService, fanout_service::FanoutService},
};
use axum::async_trait;
use notify_wire::{NotificationKind, NotificationPayload};
use std::{collections::HashMap, sync::Arc};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Key-lock map entries are swept once the map grows past this.
const KEY_LOCKS_CLEANUP_THRESHOLD: usize = 1024;

pub struct AggregationServiceImpl {
    config: AggregationServiceConfig,
    repository: Arc<dyn NotificationsRepository>,
    audience_service: Arc<dyn AudienceService>,
    fanout_service: Arc<dyn FanoutService>,

    key_locks: Mutex<HashMap<(Uuid, String), Arc<Mutex<()>>>>,
}

impl AggregationServiceImpl {
    pub fn new(
        config: AggregationServiceConfig,
        repository: Arc<dyn NotificationsRepository>,
        audience_service: Arc<dyn AudienceService>,
        fanout_service: Arc<dyn FanoutService>,
    ) -> Self {
        let key_locks = HashMap::new();
        let key_locks = Mutex::new(key_locks);

        Self {
            config,
            repository,
            audience_service,
            fanout_service,
            key_locks,
        }
    }

    fn aggregation_key(creator_id: Uuid, event: &input::ContentCreatedEvent) -> String {
        format!(
            "content:{}:{}:{}",
            event.content_type.as_ref(),
            creator_id,
            event.target_course,
        )
    }

    async fn key_lock(&self, user_id: Uuid, aggregation_key: &str) -> Arc<Mutex<()>> {
        let mut key_locks = self.key_locks.lock().await;

        if key_locks.len() > KEY_LOCKS_CLEANUP_THRESHOLD {
            key_locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        }

        Arc::clone(
            key_locks
                .entry((user_id, aggregation_key.to_string()))
                .or_default(),
        )
    }

    ///
    /// Serializes same-key upserts so two racing events cannot both
    /// take the insert path. Different keys proceed in parallel.
    ///
    async fn upsert_serialized(
        &self,
        notification: NewNotification,
        aggregation_key: &str,
    ) -> Result<UpsertOutcome, Error> {
        let lock = self.key_lock(notification.user_id, aggregation_key).await;
        let _guard = lock.lock().await;

        // The timestamp is taken at commit time, so it decides
        // deterministically which side of the window boundary a racing
        // event lands on.
        let now = OffsetDateTime::now_utc();
        let window_start = now - self.config.aggregation_window;

        let outcome = self
            .repository
            .upsert_aggregated(notification, window_start, now)
            .await?;

        Ok(outcome)
    }
}

#[async_trait]
impl AggregationService for AggregationServiceImpl {
    #[tracing::instrument(
        name = "Aggregation",
        skip_all,
        fields(
            creator_id = %creator_id,
            content_id = %event.content_id,
        )
    )]
    async fn ingest_content_created(
        &self,
        creator_id: Uuid,
        event: input::ContentCreatedEvent,
    ) -> Result<(), Error> {
        tracing::info!("ingesting content-created event");
        tracing::trace!(?event);

        let audience = self
            .audience_service
            .content_audience(creator_id, event.visibility, &event.target_course)
            .await?;
        tracing::info!(count = audience.len(), "resolved audience");

        let aggregation_key = Self::aggregation_key(creator_id, &event);

        for recipient in audience {
            if recipient == creator_id {
                continue;
            }

            let notification = NewNotification {
                user_id: recipient,
                kind: NotificationKind::ContentCreated,
                aggregation_key: Some(aggregation_key.clone()),
                payload: NotificationPayload {
                    content_type: Some(event.content_type),
                    content_id: Some(event.content_id),
                    creator_id: Some(creator_id),
                    title: Some(event.title.clone()),
                    subject_name: event.subject_name.clone(),
                    count: 1,
                },
                url: Some(format!("/courses/{}", event.target_course)),
            };

            match self.upsert_serialized(notification, &aggregation_key).await {
                Ok(UpsertOutcome::Inserted(notification)) => {
                    self.fanout_service.send_inserted(notification).await;
                }
                Ok(UpsertOutcome::Updated(notification)) => {
                    self.fanout_service.send_updated(notification, true).await;
                }
                Err(err) => {
                    // Delivery for this recipient is lost, the event
                    // must still reach everyone else.
                    tracing::warn!(%err, %recipient, "aggregation failed");
                }
            }
        }

        Ok(())
    }

    #[tracing::instrument(
        name = "Aggregation",
        skip_all,
        fields(
            actor_id = %actor_id,
            target_user_id = %event.target_user_id,
        )
    )]
    async fn ingest_friend_event(
        &self,
        actor_id: Uuid,
        event: input::FriendEvent,
    ) -> Result<(), Error> {
        tracing::info!("ingesting friend event");

        if event.target_user_id == actor_id {
            return Err(Error::Validation("cannot notify yourself"));
        }

        let kind = match event.event_type {
            input::FriendEventKind::FriendRequest => NotificationKind::FriendRequest,
            input::FriendEventKind::FriendAccepted => NotificationKind::FriendAccepted,
        };

        let notification = NewNotification {
            user_id: event.target_user_id,
            kind,
            aggregation_key: None,
            payload: NotificationPayload {
                content_type: None,
                content_id: None,
                creator_id: Some(actor_id),
                title: None,
                subject_name: None,
                count: 1,
            },
            url: Some("/friends".to_string()),
        };

        let notification = self
            .repository
            .insert(notification, OffsetDateTime::now_utc())
            .await?;
        tracing::info!(id = notification.id.to_hex(), "created notification");

        self.fanout_service.send_inserted(notification).await;

        Ok(())
    }
}
