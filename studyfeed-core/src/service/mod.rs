pub mod aggregation_service;
pub mod audience_service;
pub mod badges_service;
pub mod fanout_service;
pub mod notifications_service;
pub mod push_gateway;
pub mod websockets_service;
