mod audience_service;
mod audience_service_impl;

pub use audience_service::*;
pub use audience_service_impl::*;
