use uuid::Uuid;

///
/// Web push subscription of a single device. Owned by the account
/// service, this repository only ever reads it.
///
#[derive(Debug, Clone, PartialEq)]
pub struct PushSubscription {
    pub user_id: Uuid,
    pub endpoint: String,
    pub auth: String,
    pub p256dh: String,
}
