mod badges_service;
mod badges_service_impl;

pub use badges_service::*;
pub use badges_service_impl::*;
