use crate::{dto::input::Visibility, repository};
use axum::async_trait;
use uuid::Uuid;

///
/// Interface to the social graph and enrollment data owned by other
/// services. Notification delivery only ever needs one question
/// answered: who should hear about this content.
///
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AudienceService: Send + Sync {
    ///
    /// Resolves the users enrolled in `target_course` that are allowed
    /// to see content of `creator_id` with the given visibility.
    /// The creator is never part of the audience.
    ///
    async fn content_audience(
        &self,
        creator_id: Uuid,
        visibility: Visibility,
        target_course: &str,
    ) -> Result<Vec<Uuid>, repository::Error>;
}
