use crate::{
    api::{HttpNotificationsApi, HttpNotificationsApiConfig},
    badges::{BadgePoller, BadgePollerConfig},
    realtime::{RealtimeSubscriber, RealtimeSubscriberConfig},
    reconciliation::{
        EngineCommand, EngineSnapshot, ReconciliationEngine, ReconciliationEngineConfig,
    },
};
use notify_wire::BadgeGrant;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

const SURFACED_BADGES_CAPACITY: usize = 16;

pub struct SessionConfig {
    pub api: HttpNotificationsApiConfig,
    pub realtime: RealtimeSubscriberConfig,
    pub reconciliation: ReconciliationEngineConfig,
    pub badges: BadgePollerConfig,
}

///
/// One signed-in user's notification runtime. Owns the background
/// tasks and tears them down together on close.
///
pub struct Session {
    engine: ReconciliationEngine,
    realtime_subscriber: RealtimeSubscriber,
    badge_poller: BadgePoller,
    surfaced_badges_rx: mpsc::Receiver<BadgeGrant>,
}

impl Session {
    pub fn start(config: SessionConfig) -> anyhow::Result<Self> {
        let api = Arc::new(HttpNotificationsApi::new(config.api)?);

        let engine = ReconciliationEngine::new(config.reconciliation, api.clone());

        let realtime_subscriber = RealtimeSubscriber::new(config.realtime, engine.commands());

        let (surfaced_badges_tx, surfaced_badges_rx) = mpsc::channel(SURFACED_BADGES_CAPACITY);
        let badge_poller = BadgePoller::new(config.badges, api, surfaced_badges_tx);

        Ok(Self {
            engine,
            realtime_subscriber,
            badge_poller,
            surfaced_badges_rx,
        })
    }

    ///
    /// Live view of the feed for rendering.
    ///
    pub fn snapshot(&self) -> watch::Receiver<EngineSnapshot> {
        self.engine.snapshot()
    }

    pub fn commands(&self) -> mpsc::Sender<EngineCommand> {
        self.engine.commands()
    }

    ///
    /// Badges earned since they were last surfaced.
    ///
    pub fn surfaced_badges(&mut self) -> &mut mpsc::Receiver<BadgeGrant> {
        &mut self.surfaced_badges_rx
    }

    pub async fn close(self) {
        tracing::info!("closing session");

        self.realtime_subscriber.close().await;
        self.badge_poller.close().await;
        self.engine.close().await;
    }
}
