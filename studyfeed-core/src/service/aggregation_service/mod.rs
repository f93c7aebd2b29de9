mod aggregation_service;
mod aggregation_service_impl;
mod dto;

pub use aggregation_service::*;
pub use aggregation_service_impl::*;
pub use dto::*;
