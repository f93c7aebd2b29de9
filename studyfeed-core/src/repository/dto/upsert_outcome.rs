use super::Notification;

///
/// Result of the windowed aggregation upsert.
///
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome {
    /// No open record existed for the aggregation key, a new one
    /// was created.
    Inserted(Notification),
    /// An open record was merged in place, post-merge state returned.
    Updated(Notification),
}

impl UpsertOutcome {
    pub fn notification(&self) -> &Notification {
        match self {
            UpsertOutcome::Inserted(notification) => notification,
            UpsertOutcome::Updated(notification) => notification,
        }
    }
}
