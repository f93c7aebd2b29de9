use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::AsRefStr,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationKind {
    ContentCreated,
    FriendRequest,
    FriendAccepted,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::AsRefStr,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContentType {
    Note,
    FlashcardDeck,
}

///
/// Structured payload of a notification.
///
/// For aggregated notifications `count` accumulates across the
/// aggregation window while the other fields keep the values
/// of the most recent event.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,
    pub count: u32,
}

///
/// Canonical notification unit delivered to a user.
///
/// `created_at` is set at first insert and never changes,
/// `updated_at` is bumped on every aggregated mutation.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: String,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_key: Option<String>,
    pub payload: NotificationPayload,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub is_read: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::Value;
    use std::str::FromStr;

    #[test]
    fn notification_kind_strum_matches_serde() {
        let json = serde_json::to_value(NotificationKind::FriendAccepted).unwrap();

        assert_eq!(json, Value::String("friend_accepted".to_string()));
        assert_eq!(NotificationKind::FriendAccepted.as_ref(), "friend_accepted");
        assert_eq!(
            NotificationKind::from_str("friend_accepted").unwrap(),
            NotificationKind::FriendAccepted
        );
    }

    #[test]
    fn record_json_round_trip() {
        let record = NotificationRecord {
            id: "66b1a7".to_string(),
            user_id: Uuid::new_v4(),
            kind: NotificationKind::ContentCreated,
            aggregation_key: Some("content:note:abc:math-101".to_string()),
            payload: NotificationPayload {
                content_type: Some(ContentType::Note),
                content_id: Some(Uuid::new_v4()),
                creator_id: Some(Uuid::new_v4()),
                title: Some("Derivatives".to_string()),
                subject_name: Some("Calculus".to_string()),
                count: 3,
            },
            message: "3 new notes in Calculus".to_string(),
            url: Some("/courses/math-101".to_string()),
            is_read: false,
            created_at: OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
            updated_at: OffsetDateTime::from_unix_timestamp(1_700_000_600).unwrap(),
        };

        let json = serde_json::to_string(&record).unwrap();
        let parsed = serde_json::from_str::<NotificationRecord>(&json).unwrap();

        assert_eq!(parsed, record);
    }

    #[test]
    fn record_json_created_at_is_rfc3339() {
        let record = NotificationRecord {
            id: "1".to_string(),
            user_id: Uuid::new_v4(),
            kind: NotificationKind::FriendRequest,
            aggregation_key: None,
            payload: NotificationPayload {
                content_type: None,
                content_id: None,
                creator_id: None,
                title: None,
                subject_name: None,
                count: 1,
            },
            message: "You received a friend request".to_string(),
            url: None,
            is_read: false,
            created_at: OffsetDateTime::from_unix_timestamp(0).unwrap(),
            updated_at: OffsetDateTime::from_unix_timestamp(0).unwrap(),
        };

        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(
            json.get("created_at").unwrap(),
            &Value::String("1970-01-01T00:00:00Z".to_string())
        );
    }
}
