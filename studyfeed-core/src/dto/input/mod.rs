mod badge_acknowledge;
mod content_created_event;
mod friend_event;
mod list_query;

pub use badge_acknowledge::*;
pub use content_created_event::*;
pub use friend_event::*;
pub use list_query::*;
