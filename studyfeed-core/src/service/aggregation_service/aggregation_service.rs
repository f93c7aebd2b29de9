use crate::{
    dto::input,
    error::Error,
};
use axum::async_trait;
use uuid::Uuid;

///
/// Converts raw domain events into the notification record set,
/// enforcing the bounded-staleness dedup policy: a burst of same-key
/// events inside one aggregation window collapses into a single
/// evolving record.
///
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AggregationService: Send + Sync {
    ///
    /// Fans a content-created event out to its audience, running the
    /// windowed upsert once per recipient. Failures for a single
    /// recipient are logged and do not stop the remaining recipients.
    ///
    async fn ingest_content_created(
        &self,
        creator_id: Uuid,
        event: input::ContentCreatedEvent,
    ) -> Result<(), Error>;

    ///
    /// Friend events are never aggregated, each one becomes its own
    /// record for the target user.
    ///
    /// ### Errors
    /// - [Error::Validation] when the actor targets themselves
    ///
    async fn ingest_friend_event(
        &self,
        actor_id: Uuid,
        event: input::FriendEvent,
    ) -> Result<(), Error>;
}
