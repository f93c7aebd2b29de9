use super::WebSocketsServiceConfig;
use anyhow::anyhow;
use axum::extract::ws::{Message, WebSocket};
use notify_wire::RealtimeMessage;
use std::{net::SocketAddr, sync::Arc};
use tokio::{
    sync::broadcast::{self, error::RecvError},
    time::{sleep_until, Instant},
};
use uuid::Uuid;

pub struct WebSocketConnection {
    config: Arc<WebSocketsServiceConfig>,

    user_id: Uuid,
    user_address: SocketAddr,

    events_rx: broadcast::Receiver<Arc<RealtimeMessage>>,
    websocket: WebSocket,

    ping_time: Instant,
}

impl WebSocketConnection {
    pub fn new(
        config: Arc<WebSocketsServiceConfig>,
        user_id: Uuid,
        user_address: SocketAddr,
        events_rx: broadcast::Receiver<Arc<RealtimeMessage>>,
        websocket: WebSocket,
    ) -> Self {
        let ping_time = Instant::now() + config.ping_interval;

        Self {
            config,
            user_id,
            user_address,
            events_rx,
            websocket,
            ping_time,
        }
    }

    #[tracing::instrument(
        name = "WebSocket",
        skip_all,
        fields(
            user_id = %self.user_id,
            address = %self.user_address,
        )
    )]
    pub async fn run(mut self) {
        match self.try_run().await {
            Ok(()) => tracing::info!("connection closed"),
            Err(err) => tracing::warn!(%err, "connection error"),
        }

        match self.websocket.close().await {
            Ok(()) => tracing::info!("websocket closed"),
            Err(err) => tracing::debug!(%err, "failed to close websocket"),
        }
    }

    async fn try_run(&mut self) -> anyhow::Result<()> {
        loop {
            tokio::select! {
                biased;

                // Wait for time to send the ping
                _ = sleep_until(self.ping_time) => {
                    self.websocket.send(Message::Ping(Vec::new())).await?;
                    self.ping_time = Instant::now() + self.config.ping_interval;
                }

                // Wait for message from the user
                message = self.websocket.recv() => {
                    match message {
                        None | Some(Ok(Message::Close(_))) => return Ok(()),
                        Some(Err(err)) => return Err(anyhow!("websocket error: {err}")),
                        // pongs and client chatter are ignored
                        Some(Ok(_)) => {}
                    }
                }

                // Wait for new change event to deliver
                event = self.events_rx.recv() => {
                    match event {
                        Ok(event) => {
                            let text = serde_json::to_string(event.as_ref())?;
                            self.websocket.send(Message::Text(text)).await?;
                        }
                        Err(RecvError::Lagged(count)) => {
                            // A lagged client has already missed events,
                            // dropping it forces a reconnect refetch.
                            return Err(anyhow!("connection lagged behind {count} events"));
                        }
                        Err(RecvError::Closed) => return Ok(()),
                    }
                }
            }
        }
    }
}
