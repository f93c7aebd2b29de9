mod dto;
mod websocket_connection;
mod websockets_service;
mod websockets_service_impl;

pub use dto::*;
pub use websockets_service::*;
pub use websockets_service_impl::*;

use websocket_connection::WebSocketConnection;
