use crate::api::NotificationsApi;
use notify_wire::BadgeGrant;
use std::{sync::Arc, time::Duration};
use tokio::{sync::mpsc, task::JoinHandle};

#[derive(Debug, Clone)]
pub struct BadgePollerConfig {
    pub poll_interval: Duration,
}

///
/// Periodically asks the server for badges the user earned but never
/// saw. Surfaced badges are acknowledged immediately so they are not
/// surfaced again, the server side makes the acknowledgment safe to
/// repeat after a crash in between.
///
pub struct BadgePoller {
    task: Option<JoinHandle<()>>,
}

impl BadgePoller {
    pub fn new(
        config: BadgePollerConfig,
        api: Arc<dyn NotificationsApi>,
        surfaced_tx: mpsc::Sender<BadgeGrant>,
    ) -> Self {
        let task = tokio::spawn(async move {
            run(config, api, surfaced_tx).await;
        });

        Self { task: Some(task) }
    }

    pub async fn close(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for BadgePoller {
    ///
    /// Dropping the handle aborts the poll loop, `close` is only
    /// needed to also await its termination.
    ///
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

async fn run(
    config: BadgePollerConfig,
    api: Arc<dyn NotificationsApi>,
    surfaced_tx: mpsc::Sender<BadgeGrant>,
) {
    let mut interval = tokio::time::interval(config.poll_interval);

    loop {
        interval.tick().await;

        let badges = match api.unnotified_badges().await {
            Ok(badges) => badges,
            Err(err) => {
                tracing::warn!(%err, "badge poll failed");
                continue;
            }
        };
        if badges.is_empty() {
            continue;
        }

        let badge_ids = badges.iter().map(|b| b.badge_id.clone()).collect();

        for badge in badges {
            if surfaced_tx.send(badge).await.is_err() {
                return;
            }
        }

        // Acknowledge only after the badges were actually surfaced,
        // a crash in between re-surfaces them on the next session.
        if let Err(err) = api.acknowledge_badges(badge_ids).await {
            tracing::warn!(%err, "badge acknowledgment failed");
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::api::MockNotificationsApi;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use time::OffsetDateTime;

    fn create_grant(badge_id: &str) -> BadgeGrant {
        BadgeGrant {
            user_id: uuid::Uuid::new_v4(),
            badge_id: badge_id.to_string(),
            earned_at: OffsetDateTime::now_utc(),
            notified_at: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn surfaces_then_acknowledges() {
        let mut api = MockNotificationsApi::new();
        api.expect_unnotified_badges()
            .times(1)
            .returning(|| Ok(vec![create_grant("streak-7"), create_grant("early-bird")]));
        api.expect_unnotified_badges().returning(|| Ok(Vec::new()));
        api.expect_acknowledge_badges()
            .withf(|ids| ids == &["streak-7".to_string(), "early-bird".to_string()])
            .times(1)
            .returning(|_| Ok(()));
        let (surfaced_tx, mut surfaced_rx) = mpsc::channel(8);
        let poller = BadgePoller::new(
            BadgePollerConfig {
                poll_interval: Duration::from_secs(30),
            },
            Arc::new(api),
            surfaced_tx,
        );

        let first = surfaced_rx.recv().await.unwrap();
        let second = surfaced_rx.recv().await.unwrap();

        assert_eq!(first.badge_id, "streak-7");
        assert_eq!(second.badge_id, "early-bird");
        poller.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn poll_failure_retries_next_interval() {
        let mut api = MockNotificationsApi::new();
        api.expect_unnotified_badges()
            .times(1)
            .returning(|| Err(crate::error::Error::UnexpectedResponse("boom")));
        api.expect_unnotified_badges()
            .returning(|| Ok(vec![create_grant("streak-7")]));
        api.expect_acknowledge_badges().returning(|_| Ok(()));
        let (surfaced_tx, mut surfaced_rx) = mpsc::channel(8);
        let poller = BadgePoller::new(
            BadgePollerConfig {
                poll_interval: Duration::from_secs(30),
            },
            Arc::new(api),
            surfaced_tx,
        );

        let surfaced = surfaced_rx.recv().await.unwrap();

        assert_eq!(surfaced.badge_id, "streak-7");
        poller.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn empty_poll_surfaces_nothing() {
        let mut api = MockNotificationsApi::new();
        api.expect_unnotified_badges().returning(|| Ok(Vec::new()));
        api.expect_acknowledge_badges().never();
        let (surfaced_tx, mut surfaced_rx) = mpsc::channel(8);
        let poller = BadgePoller::new(
            BadgePollerConfig {
                poll_interval: Duration::from_secs(30),
            },
            Arc::new(api),
            surfaced_tx,
        );

        tokio::time::sleep(Duration::from_secs(90)).await;

        assert!(surfaced_rx.try_recv().is_err());
        poller.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_handle_stops_polling() {
        let polls = Arc::new(AtomicUsize::new(0));
        let polls_clone = Arc::clone(&polls);
        let mut api = MockNotificationsApi::new();
        api.expect_unnotified_badges().returning(move || {
            polls_clone.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        });
        let (surfaced_tx, _surfaced_rx) = mpsc::channel(8);
        let poller = BadgePoller::new(
            BadgePollerConfig {
                poll_interval: Duration::from_secs(30),
            },
            Arc::new(api),
            surfaced_tx,
        );

        tokio::time::sleep(Duration::from_secs(65)).await;
        let polls_before_drop = polls.load(Ordering::SeqCst);
        drop(poller);
        tokio::time::sleep(Duration::from_secs(300)).await;

        assert!(polls_before_drop > 0);
        assert_eq!(polls.load(Ordering::SeqCst), polls_before_drop);
    }
}
