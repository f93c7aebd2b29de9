use bson::DateTime;
use notify_wire::BadgeGrant;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct BadgeGrantEntity {
    pub user_id: bson::Uuid,
    pub badge_id: String,
    pub earned_at: DateTime,
    pub notified_at: Option<DateTime>,
}

impl From<BadgeGrantEntity> for BadgeGrant {
    fn from(entity: BadgeGrantEntity) -> Self {
        Self {
            user_id: entity.user_id.into(),
            badge_id: entity.badge_id,
            earned_at: entity.earned_at.into(),
            notified_at: entity.notified_at.map(Into::into),
        }
    }
}
