use crate::error::Error;
use axum::async_trait;
use bson::oid::ObjectId;
use notify_wire::NotificationRecord;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsService: Send + Sync {
    ///
    /// Finds the user's notifications sorted newest first. `limit`
    /// falls back to the configured default and is capped at the
    /// configured maximum.
    ///
    async fn find_recent_notifications(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<NotificationRecord>, Error>;

    async fn count_unread_notifications(&self, user_id: Uuid) -> Result<u64, Error>;

    ///
    /// ### Errors
    /// - [Error::NotificationNotExist] when
    ///     - notification does not exist
    ///     - notification does not belong to the user
    ///
    async fn mark_notification_read(&self, user_id: Uuid, id: ObjectId) -> Result<(), Error>;

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<(), Error>;

    ///
    /// ### Errors
    /// - [Error::NotificationNotExist] when
    ///     - notification does not exist
    ///     - notification does not belong to the user
    ///
    async fn delete_notification(&self, user_id: Uuid, id: ObjectId) -> Result<(), Error>;
}
