//!
//! Client-side session runtime: keeps a local view of the user's
//! notification feed consistent with the server through realtime
//! events and full refetches, surfaces push payloads as OS
//! notifications and polls for unacknowledged badges.
//!

pub mod api;
pub mod badges;
pub mod error;
pub mod push;
pub mod realtime;
pub mod reconciliation;
mod session;

pub use session::*;
