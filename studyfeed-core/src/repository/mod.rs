mod badges_repository;
mod badges_repository_impl;
mod dto;
mod entity;
mod error;
mod notifications_repository;
mod notifications_repository_impl;
mod push_subscriptions_repository;
mod push_subscriptions_repository_impl;

pub use badges_repository::*;
pub use badges_repository_impl::*;
pub use dto::*;
pub use error::*;
pub use notifications_repository::*;
pub use notifications_repository_impl::*;
pub use push_subscriptions_repository::*;
pub use push_subscriptions_repository_impl::*;
