use super::{
    dto::{NewNotification, Notification, UpsertOutcome},
    error::Error,
};
use axum::async_trait;
use bson::oid::ObjectId;
use time::OffsetDateTime;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsRepository: Send + Sync {
    ///
    /// Windowed aggregation upsert. If an open record exists for
    /// `(user_id, aggregation_key)`, meaning `updated_at >= window_start`,
    /// merges the event into it in a single conditional update:
    /// count incremented, latest render fields set, `updated_at = now`,
    /// `is_read` reset. Otherwise inserts a new record with
    /// `created_at = updated_at = now`.
    ///
    /// Callers must serialize invocations per `(user_id, key)`;
    /// concurrent first events for the same key could otherwise both
    /// take the insert path.
    ///
    async fn upsert_aggregated(
        &self,
        notification: NewNotification,
        window_start: OffsetDateTime,
        now: OffsetDateTime,
    ) -> Result<UpsertOutcome, Error>;

    ///
    /// Plain insert for kinds that are never aggregated.
    ///
    async fn insert(
        &self,
        notification: NewNotification,
        now: OffsetDateTime,
    ) -> Result<Notification, Error>;

    ///
    /// Finds the user's notifications sorted descending by `updated_at`.
    ///
    async fn find_recent(&self, user_id: Uuid, limit: i64) -> Result<Vec<Notification>, Error>;

    async fn count_unread(&self, user_id: Uuid) -> Result<u64, Error>;

    ///
    /// ### Errors
    /// - [Error::NoDocumentUpdated] when
    ///     - notification does not exist
    ///     - notification does not belong to the user
    ///
    async fn mark_read(&self, id: ObjectId, user_id: Uuid) -> Result<(), Error>;

    async fn mark_all_read(&self, user_id: Uuid) -> Result<(), Error>;

    ///
    /// Removes the notification. Deletion is always an explicit user
    /// action, records are never cleaned up automatically.
    ///
    /// ### Errors
    /// - [Error::NoDocumentUpdated] when
    ///     - notification does not exist
    ///     - notification does not belong to the user
    ///
    async fn delete(&self, id: ObjectId, user_id: Uuid) -> Result<(), Error>;
}
