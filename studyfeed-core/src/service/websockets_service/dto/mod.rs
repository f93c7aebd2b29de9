mod websockets_service_config;

pub use websockets_service_config::*;
