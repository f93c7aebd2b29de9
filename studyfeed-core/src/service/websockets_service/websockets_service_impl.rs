use super::{WebSocketConnection, WebSocketsService, WebSocketsServiceConfig};
use axum::{async_trait, extract::ws::WebSocket};
use notify_wire::RealtimeMessage;
use std::{collections::HashMap, net::SocketAddr, sync::Arc};
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

pub struct WebSocketsServiceImpl {
    config: Arc<WebSocketsServiceConfig>,

    users_connections: Arc<RwLock<HashMap<Uuid, broadcast::Sender<Arc<RealtimeMessage>>>>>,
}

impl WebSocketsServiceImpl {
    pub fn new(config: WebSocketsServiceConfig) -> Self {
        let users_connections = HashMap::new();
        let users_connections = RwLock::new(users_connections);
        let users_connections = Arc::new(users_connections);

        Self {
            config: Arc::new(config),
            users_connections,
        }
    }

    async fn subscribe(&self, user_id: Uuid) -> broadcast::Receiver<Arc<RealtimeMessage>> {
        let mut connections = self.users_connections.write().await;
        connections
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(self.config.channel_capacity).0)
            .subscribe()
    }

    async fn cleanup(&self, user_id: Uuid) {
        let mut connections = self.users_connections.write().await;
        if let Some(tx) = connections.get(&user_id) {
            if tx.receiver_count() == 0 {
                connections.remove(&user_id);
            }
        }
    }
}

#[async_trait]
impl WebSocketsService for WebSocketsServiceImpl {
    async fn handle_client(&self, user_id: Uuid, address: SocketAddr, websocket: WebSocket) {
        let events_rx = self.subscribe(user_id).await;

        let connection = WebSocketConnection::new(
            Arc::clone(&self.config),
            user_id,
            address,
            events_rx,
            websocket,
        );
        connection.run().await;

        self.cleanup(user_id).await;
    }

    async fn send(&self, user_id: Uuid, message: RealtimeMessage) {
        let connections = self.users_connections.read().await;
        if let Some(tx) = connections.get(&user_id) {
            let receivers = tx.send(Arc::new(message)).unwrap_or(0);
            tracing::info!(%user_id, receivers, "queued realtime event");
        }
    }

    async fn close_connections(&self) {
        let count = {
            let mut connections = self.users_connections.write().await;
            let count = connections.len();
            connections.clear();
            count
        };

        tracing::info!(count, "closed realtime connections");
    }
}
