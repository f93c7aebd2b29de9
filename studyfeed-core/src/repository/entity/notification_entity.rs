use crate::repository::{dto::Notification, Error};
use bson::{oid::ObjectId, DateTime};
use notify_wire::{ContentType, NotificationKind, NotificationPayload};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

///
/// Mongo document shape of a notification. The structured payload is
/// flattened into the document so the aggregation upsert can `$inc`
/// the count and `$set` the latest render fields in one update.
///
#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationEntity {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: bson::Uuid,
    pub kind: String,
    pub aggregation_key: Option<String>,
    pub content_type: Option<String>,
    pub content_id: Option<bson::Uuid>,
    pub creator_id: Option<bson::Uuid>,
    pub title: Option<String>,
    pub subject_name: Option<String>,
    pub count: i32,
    pub url: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl TryFrom<NotificationEntity> for Notification {
    type Error = Error;

    fn try_from(entity: NotificationEntity) -> Result<Self, Self::Error> {
        let id = entity
            .id
            .ok_or(Error::InvalidDocument("notification without '_id'"))?;
        let kind = NotificationKind::from_str(&entity.kind)
            .map_err(|_| Error::InvalidDocument("unknown notification kind"))?;
        let content_type = match entity.content_type.as_deref() {
            Some(content_type) => Some(
                ContentType::from_str(content_type)
                    .map_err(|_| Error::InvalidDocument("unknown content type"))?,
            ),
            None => None,
        };

        Ok(Self {
            id,
            user_id: entity.user_id.into(),
            kind,
            aggregation_key: entity.aggregation_key,
            payload: NotificationPayload {
                content_type,
                content_id: entity.content_id.map(Into::into),
                creator_id: entity.creator_id.map(Into::into),
                title: entity.title,
                subject_name: entity.subject_name,
                count: entity.count.max(0) as u32,
            },
            url: entity.url,
            is_read: entity.is_read,
            created_at: entity.created_at.into(),
            updated_at: entity.updated_at.into(),
        })
    }
}
