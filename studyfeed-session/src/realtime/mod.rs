mod realtime_subscriber;

pub use realtime_subscriber::*;
