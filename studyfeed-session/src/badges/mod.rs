mod badge_poller;

pub use badge_poller::*;
