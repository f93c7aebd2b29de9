use notify_wire::ContentType;
use serde::Deserialize;
use uuid::Uuid;

///
/// Raw ingestion event published when a user creates a note or a
/// flashcard deck. The creator is always the authenticated user,
/// never a field of the body.
///
#[derive(Debug, Deserialize)]
pub struct ContentCreatedEvent {
    pub content_type: ContentType,
    pub content_id: Uuid,
    pub title: String,
    pub subject_name: Option<String>,
    pub visibility: Visibility,
    pub target_course: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Friends,
}
