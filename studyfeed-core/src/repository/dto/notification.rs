use bson::oid::ObjectId;
use notify_wire::{
    render_message, NotificationKind, NotificationPayload, NotificationRecord,
};
use time::OffsetDateTime;
use uuid::Uuid;

///
/// A stored notification. The human readable message is derived from
/// the payload on conversion to the wire record, so an aggregated
/// mutation never needs a second write to keep it current.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: ObjectId,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub aggregation_key: Option<String>,
    pub payload: NotificationPayload,
    pub url: Option<String>,
    pub is_read: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<Notification> for NotificationRecord {
    fn from(notification: Notification) -> Self {
        let message = render_message(notification.kind, &notification.payload);

        Self {
            id: notification.id.to_hex(),
            user_id: notification.user_id,
            kind: notification.kind,
            aggregation_key: notification.aggregation_key,
            payload: notification.payload,
            message,
            url: notification.url,
            is_read: notification.is_read,
            created_at: notification.created_at,
            updated_at: notification.updated_at,
        }
    }
}
