use serde::Deserialize;
use uuid::Uuid;

///
/// Raw ingestion event for social actions. The actor is the
/// authenticated user.
///
#[derive(Debug, Deserialize)]
pub struct FriendEvent {
    pub event_type: FriendEventKind,
    pub target_user_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendEventKind {
    FriendRequest,
    FriendAccepted,
}
