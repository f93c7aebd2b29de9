use super::error::Error;
use axum::async_trait;
use notify_wire::BadgeGrant;
use time::OffsetDateTime;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BadgesRepository: Send + Sync {
    ///
    /// Finds grants that were never surfaced to the user,
    /// sorted ascending by `earned_at`.
    ///
    async fn find_unnotified(&self, user_id: Uuid) -> Result<Vec<BadgeGrant>, Error>;

    async fn find_all(&self, user_id: Uuid) -> Result<Vec<BadgeGrant>, Error>;

    ///
    /// Sets `notified_at` if it is still unset.
    ///
    /// ### Returns
    /// `true` when this call claimed the grant, `false` when it was
    /// already claimed or does not exist. Never an error, so the
    /// acknowledgment is safe to retry.
    ///
    async fn claim_notified(
        &self,
        user_id: Uuid,
        badge_id: &str,
        now: OffsetDateTime,
    ) -> Result<bool, Error>;
}
