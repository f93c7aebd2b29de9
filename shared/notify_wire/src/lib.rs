mod badge;
mod message;
mod push;
mod realtime;
mod record;

pub use badge::*;
pub use message::*;
pub use push::*;
pub use realtime::*;
pub use record::*;

/// Application name, used as the default push notification title.
pub const APP_NAME: &str = "studyfeed";
