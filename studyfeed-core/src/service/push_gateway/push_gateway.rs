use crate::repository::PushSubscription;
use axum::async_trait;
use notify_wire::PushEnvelope;

///
/// Transport used to hand a push envelope to a single device
/// subscription. Push delivery is best effort end to end, callers
/// only ever log a failed delivery.
///
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushGateway: Send + Sync {
    async fn deliver(
        &self,
        subscription: &PushSubscription,
        envelope: &PushEnvelope,
    ) -> anyhow::Result<()>;
}
