use crate::error::Error;
use axum::async_trait;
use notify_wire::BadgeGrant;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BadgesService: Send + Sync {
    async fn find_user_badges(&self, user_id: Uuid) -> Result<Vec<BadgeGrant>, Error>;

    ///
    /// Finds badges the user earned but was never notified about,
    /// oldest first.
    ///
    async fn find_unnotified_badges(&self, user_id: Uuid) -> Result<Vec<BadgeGrant>, Error>;

    ///
    /// Marks badges as notified. Already-acknowledged and unknown ids
    /// are skipped silently, so the call is idempotent and safe to
    /// retry with the same set.
    ///
    async fn acknowledge_badges(&self, user_id: Uuid, badge_ids: Vec<String>)
        -> Result<(), Error>;
}
