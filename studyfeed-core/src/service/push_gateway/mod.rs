mod http_push_gateway;
mod push_gateway;

pub use http_push_gateway::*;
pub use push_gateway::*;
