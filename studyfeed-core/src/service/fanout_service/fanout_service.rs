use crate::repository::Notification;
use axum::async_trait;

///
/// Turns a store mutation into delivery events on two independent
/// best-effort channels: the realtime feed and web push. There is no
/// ordering guarantee between the channels and neither delivery is
/// ever awaited by the producing flow.
///
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FanoutService: Send + Sync {
    ///
    /// A new record was created: emits a realtime INSERT carrying the
    /// full record and an alerting push.
    ///
    async fn send_inserted(&self, notification: Notification);

    ///
    /// An open record was merged in place: emits a realtime UPDATE
    /// carrying only the id (consumers refetch) and a push that
    /// coalesces under the record's tag. `renotify` gates
    /// vibration/sound on the repeated alert.
    ///
    async fn send_updated(&self, notification: Notification, renotify: bool);
}
