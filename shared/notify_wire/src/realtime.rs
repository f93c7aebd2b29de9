use crate::record::NotificationRecord;
use serde::{Deserialize, Serialize};

pub const NOTIFICATIONS_TABLE: &str = "notifications";

///
/// Change event emitted on the realtime channel after a store write.
///
/// `Insert` carries the full record. `Update` carries only the id,
/// consumers must refetch because the payload merge is server side.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum RealtimeEvent {
    #[serde(rename = "INSERT")]
    Insert { record: NotificationRecord },
    #[serde(rename = "UPDATE")]
    Update { id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeMessage {
    pub table: String,
    #[serde(flatten)]
    pub event: RealtimeEvent,
}

impl RealtimeMessage {
    pub fn inserted(record: NotificationRecord) -> Self {
        Self {
            table: NOTIFICATIONS_TABLE.to_string(),
            event: RealtimeEvent::Insert { record },
        }
    }

    pub fn updated(id: String) -> Self {
        Self {
            table: NOTIFICATIONS_TABLE.to_string(),
            event: RealtimeEvent::Update { id },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn update_json_shape() {
        let message = RealtimeMessage::updated("66b1a7".to_string());

        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["op"], "UPDATE");
        assert_eq!(json["table"], "notifications");
        assert_eq!(json["id"], "66b1a7");
    }

    #[test]
    fn update_json_parses_back() {
        let json = r#"{"table":"notifications","op":"UPDATE","id":"abc"}"#;

        let message = serde_json::from_str::<RealtimeMessage>(json).unwrap();

        assert_eq!(
            message.event,
            RealtimeEvent::Update {
                id: "abc".to_string()
            }
        );
    }
}
