mod new_notification;
mod notification;
mod push_subscription;
mod upsert_outcome;

pub use new_notification::*;
pub use notification::*;
pub use push_subscription::*;
pub use upsert_outcome::*;
