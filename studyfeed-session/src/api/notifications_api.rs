use crate::error::Error;
use async_trait::async_trait;
use notify_wire::{BadgeGrant, NotificationRecord};

///
/// Server API of the notification subsystem. Full fetches through
/// this interface are the source of truth, realtime events only tell
/// the session when its local view went stale.
///
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsApi: Send + Sync {
    async fn recent_notifications(
        &self,
        limit: Option<i64>,
    ) -> Result<Vec<NotificationRecord>, Error>;

    async fn unread_count(&self) -> Result<u64, Error>;

    async fn mark_read(&self, id: &str) -> Result<(), Error>;

    async fn mark_all_read(&self) -> Result<(), Error>;

    async fn delete_notification(&self, id: &str) -> Result<(), Error>;

    async fn user_badges(&self) -> Result<Vec<BadgeGrant>, Error>;

    async fn unnotified_badges(&self) -> Result<Vec<BadgeGrant>, Error>;

    async fn acknowledge_badges(&self, badge_ids: Vec<String>) -> Result<(), Error>;
}
