use axum::extract::ws::WebSocket;
use axum::async_trait;
use notify_wire::RealtimeMessage;
use std::net::SocketAddr;
use uuid::Uuid;

///
/// Realtime delivery channel. Every change event is scoped to the
/// owning user and fans out to all of that user's open connections.
///
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebSocketsService: Send + Sync {
    ///
    /// Drives a single client connection until it closes.
    ///
    async fn handle_client(&self, user_id: Uuid, address: SocketAddr, websocket: WebSocket);

    ///
    /// Queues a change event for all connections of the user.
    /// Best effort, an offline user simply misses the event and
    /// reconciles through the next full fetch.
    ///
    async fn send(&self, user_id: Uuid, message: RealtimeMessage);

    ///
    /// Closes every open connection, used on shutdown.
    ///
    async fn close_connections(&self);
}
