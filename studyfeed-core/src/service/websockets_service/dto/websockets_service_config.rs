use std::time::Duration;

#[derive(Debug, Clone)]
pub struct WebSocketsServiceConfig {
    pub ping_interval: Duration,
    /// Events buffered per user before slow connections are dropped.
    pub channel_capacity: usize,
}
