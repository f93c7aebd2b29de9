use notify_wire::{NotificationKind, NotificationPayload};
use uuid::Uuid;

///
/// Notification fields as produced by the aggregation manager,
/// before the store assigns identity and timestamps.
///
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub aggregation_key: Option<String>,
    pub payload: NotificationPayload,
    pub url: Option<String>,
}
