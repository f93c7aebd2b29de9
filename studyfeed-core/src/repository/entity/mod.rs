mod badge_grant_entity;
mod notification_entity;
mod push_subscription_entity;

pub use badge_grant_entity::*;
pub use notification_entity::*;
pub use push_subscription_entity::*;
