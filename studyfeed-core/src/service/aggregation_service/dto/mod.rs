mod aggregation_service_config;

pub use aggregation_service_config::*;
