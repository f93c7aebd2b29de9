use super::{NotificationsService, NotificationsServiceConfig};
use crate::{
    error::Error,
    repository::{self, NotificationsRepository},
};
use axum::async_trait;
use bson::oid::ObjectId;
use notify_wire::NotificationRecord;
use std::sync::Arc;
use uuid::Uuid;

pub struct NotificationsServiceImpl {
    config: NotificationsServiceConfig,
    repository: Arc<dyn NotificationsRepository>,
}

impl NotificationsServiceImpl {
    pub fn new(
        config: NotificationsServiceConfig,
        repository: Arc<dyn NotificationsRepository>,
    ) -> Self {
        Self { config, repository }
    }

    fn clamp_limit(&self, limit: Option<i64>) -> i64 {
        limit
            .unwrap_or(self.config.default_list_limit)
            .clamp(1, self.config.max_list_limit)
    }
}

#[async_trait]
impl NotificationsService for NotificationsServiceImpl {
    #[tracing::instrument(name = "Notifications", skip_all, fields(user_id = %user_id))]
    async fn find_recent_notifications(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<NotificationRecord>, Error> {
        tracing::info!("finding recent notifications");

        let limit = self.clamp_limit(limit);
        let notifications = self.repository.find_recent(user_id, limit).await?;

        let records = notifications.into_iter().map(Into::into).collect();

        Ok(records)
    }

    #[tracing::instrument(name = "Notifications", skip_all, fields(user_id = %user_id))]
    async fn count_unread_notifications(&self, user_id: Uuid) -> Result<u64, Error> {
        tracing::info!("counting unread notifications");

        let count = self.repository.count_unread(user_id).await?;

        Ok(count)
    }

    #[tracing::instrument(
        name = "Notifications",
        skip_all,
        fields(user_id = %user_id, id = id.to_hex())
    )]
    async fn mark_notification_read(&self, user_id: Uuid, id: ObjectId) -> Result<(), Error> {
        tracing::info!("marking notification read");

        self.repository
            .mark_read(id, user_id)
            .await
            .map_err(|err| match err {
                repository::Error::NoDocumentUpdated => Error::NotificationNotExist,
                err => Error::Database(err),
            })?;

        Ok(())
    }

    #[tracing::instrument(name = "Notifications", skip_all, fields(user_id = %user_id))]
    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<(), Error> {
        tracing::info!("marking all notifications read");

        self.repository.mark_all_read(user_id).await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "Notifications",
        skip_all,
        fields(user_id = %user_id, id = id.to_hex())
    )]
    async fn delete_notification(&self, user_id: Uuid, id: ObjectId) -> Result<(), Error> {
        tracing::info!("deleting notification");

        self.repository
            .delete(id, user_id)
            .await
            .map_err(|err| match err {
                repository::Error::NoDocumentUpdated => Error::NotificationNotExist,
                err => Error::Database(err),
            })?;

        Ok(())
    }
}
