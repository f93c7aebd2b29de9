use crate::repository::dto::PushSubscription;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PushSubscriptionEntity {
    pub user_id: bson::Uuid,
    pub endpoint: String,
    pub auth: String,
    pub p256dh: String,
}

impl From<PushSubscriptionEntity> for PushSubscription {
    fn from(entity: PushSubscriptionEntity) -> Self {
        Self {
            user_id: entity.user_id.into(),
            endpoint: entity.endpoint,
            auth: entity.auth,
            p256dh: entity.p256dh,
        }
    }
}
