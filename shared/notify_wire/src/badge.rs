use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

///
/// A single permanent badge grant. `notified_at` is set at most once,
/// by exactly one acknowledgment.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeGrant {
    pub user_id: Uuid,
    pub badge_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub earned_at: OffsetDateTime,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub notified_at: Option<OffsetDateTime>,
}

impl BadgeGrant {
    pub fn is_notified(&self) -> bool {
        self.notified_at.is_some()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn grant_without_notified_at_parses() {
        let json = format!(
            r#"{{
                "user_id": "{}",
                "badge_id": "first-note",
                "earned_at": "2024-07-01T10:00:00Z"
            }}"#,
            Uuid::new_v4()
        );

        let grant = serde_json::from_str::<BadgeGrant>(&json).unwrap();

        assert!(!grant.is_notified());
    }
}
