use super::{dto::PushSubscription, error::Error};
use axum::async_trait;
use uuid::Uuid;

///
/// Read-only view over the account service's push subscriptions.
/// One user may have many devices.
///
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushSubscriptionsRepository: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<PushSubscription>, Error>;
}
