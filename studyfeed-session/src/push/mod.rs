mod in_memory_tray;
mod os_notifications;
mod push_receiver;

pub use in_memory_tray::*;
pub use os_notifications::*;
pub use push_receiver::*;
