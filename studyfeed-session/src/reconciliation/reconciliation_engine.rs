use super::{EngineCommand, EngineSnapshot, EngineState, ReconciliationEngineConfig};
use crate::api::NotificationsApi;
use notify_wire::{RealtimeEvent, RealtimeMessage, NOTIFICATIONS_TABLE};
use std::sync::Arc;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

const COMMANDS_CAPACITY: usize = 64;

///
/// Owns the local view of the feed and keeps it consistent with the
/// server. All mutations flow through a single command loop, so the
/// view never sees interleaved partial updates.
///
pub struct ReconciliationEngine {
    commands_tx: mpsc::Sender<EngineCommand>,
    snapshot_rx: watch::Receiver<EngineSnapshot>,
    task: JoinHandle<()>,
}

impl ReconciliationEngine {
    pub fn new(config: ReconciliationEngineConfig, api: Arc<dyn NotificationsApi>) -> Self {
        let (commands_tx, mut commands_rx) = mpsc::channel(COMMANDS_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(EngineSnapshot::initial());

        let mut core = EngineCore {
            config,
            api,
            commands_tx: commands_tx.downgrade(),
            snapshot_tx,
            snapshot: EngineSnapshot::initial(),
        };

        let task = tokio::spawn(async move {
            core.refetch().await;

            while let Some(command) = commands_rx.recv().await {
                core.apply(command).await;
            }

            tracing::debug!("reconciliation engine stopped");
        });

        Self {
            commands_tx,
            snapshot_rx,
            task,
        }
    }

    pub fn snapshot(&self) -> watch::Receiver<EngineSnapshot> {
        self.snapshot_rx.clone()
    }

    pub fn commands(&self) -> mpsc::Sender<EngineCommand> {
        self.commands_tx.clone()
    }

    pub async fn close(self) {
        drop(self.commands_tx);
        let _ = self.task.await;
    }
}

struct EngineCore {
    config: ReconciliationEngineConfig,
    api: Arc<dyn NotificationsApi>,
    /// Weak so a detached mutation cannot keep the loop alive.
    commands_tx: mpsc::WeakSender<EngineCommand>,
    snapshot_tx: watch::Sender<EngineSnapshot>,
    snapshot: EngineSnapshot,
}

impl EngineCore {
    async fn apply(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Realtime(message) => self.apply_realtime(message).await,
            EngineCommand::Reconnected | EngineCommand::Refresh => self.refetch().await,
            EngineCommand::MarkRead(id) => self.mark_read(id),
            EngineCommand::MarkAllRead => self.mark_all_read(),
            EngineCommand::Delete(id) => self.delete(id),
            EngineCommand::MutationFailed => {
                self.snapshot.state = EngineState::Error;
                self.publish();
            }
        }
    }

    async fn apply_realtime(&mut self, message: RealtimeMessage) {
        if message.table != NOTIFICATIONS_TABLE {
            tracing::debug!(table = message.table, "ignoring event for unknown table");
            return;
        }

        match message.event {
            RealtimeEvent::Insert { record } => {
                // Replayed events show up after reconnects.
                let already_known = self.snapshot.notifications.iter().any(|n| n.id == record.id);
                if already_known {
                    return;
                }

                self.snapshot.notifications.insert(0, record);
                self.snapshot.notifications.truncate(self.config.list_limit);
                self.snapshot.unread_count += 1;
                self.publish();
            }
            // The merged payload lives server side, the id alone is
            // not enough to patch the local record.
            RealtimeEvent::Update { .. } => self.refetch().await,
        }
    }

    async fn refetch(&mut self) {
        let notifications = self.api.recent_notifications(None).await;
        let unread_count = self.api.unread_count().await;

        match (notifications, unread_count) {
            (Ok(notifications), Ok(unread_count)) => {
                self.snapshot.notifications = notifications;
                self.snapshot.unread_count = unread_count;
                self.snapshot.state = EngineState::Ready;
            }
            (Err(err), _) | (_, Err(err)) => {
                tracing::warn!(%err, "refetch failed");
                self.snapshot.state = EngineState::Error;
            }
        }

        self.publish();
    }

    fn mark_read(&mut self, id: String) {
        if let Some(notification) = self
            .snapshot
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
        {
            if !notification.is_read {
                notification.is_read = true;
                self.snapshot.unread_count = self.snapshot.unread_count.saturating_sub(1);
            }
        }
        self.publish();

        let api = self.api.clone();
        self.spawn_mutation(async move { api.mark_read(&id).await });
    }

    fn mark_all_read(&mut self) {
        for notification in &mut self.snapshot.notifications {
            notification.is_read = true;
        }
        self.snapshot.unread_count = 0;
        self.publish();

        let api = self.api.clone();
        self.spawn_mutation(async move { api.mark_all_read().await });
    }

    fn delete(&mut self, id: String) {
        if let Some(position) = self.snapshot.notifications.iter().position(|n| n.id == id) {
            let notification = self.snapshot.notifications.remove(position);
            if !notification.is_read {
                self.snapshot.unread_count = self.snapshot.unread_count.saturating_sub(1);
            }
        }
        self.publish();

        let api = self.api.clone();
        self.spawn_mutation(async move { api.delete_notification(&id).await });
    }

    ///
    /// Runs a mutation detached from the command loop. The optimistic
    /// local change is never reverted, a failure only flips the view
    /// into the error state until the next refetch confirms it.
    ///
    fn spawn_mutation<F>(&self, mutation: F)
    where
        F: std::future::Future<Output = Result<(), crate::error::Error>> + Send + 'static,
    {
        let commands_tx = self.commands_tx.clone();
        tokio::spawn(async move {
            if let Err(err) = mutation.await {
                tracing::warn!(%err, "mutation failed");
                if let Some(commands_tx) = commands_tx.upgrade() {
                    let _ = commands_tx.send(EngineCommand::MutationFailed).await;
                }
            }
        });
    }

    fn publish(&self) {
        let _ = self.snapshot_tx.send(self.snapshot.clone());
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::api::MockNotificationsApi;
    use notify_wire::{NotificationKind, NotificationPayload, NotificationRecord};
    use std::time::Duration;
    use uuid::Uuid;

    fn create_record(id: &str, is_read: bool) -> NotificationRecord {
        NotificationRecord {
            id: id.to_string(),
            user_id: Uuid::new_v4(),
            kind: NotificationKind::FriendRequest,
            aggregation_key: None,
            payload: NotificationPayload {
                content_type: None,
                content_id: None,
                creator_id: Some(Uuid::new_v4()),
                title: None,
                subject_name: None,
                count: 1,
            },
            message: "sent you a friend request".to_string(),
            url: Some("/friends".to_string()),
            is_read,
            created_at: time::OffsetDateTime::now_utc(),
            updated_at: time::OffsetDateTime::now_utc(),
        }
    }

    fn create_engine(api: MockNotificationsApi) -> ReconciliationEngine {
        ReconciliationEngine::new(
            ReconciliationEngineConfig { list_limit: 3 },
            Arc::new(api),
        )
    }

    async fn wait_for_snapshot(
        engine: &ReconciliationEngine,
        predicate: impl FnMut(&EngineSnapshot) -> bool,
    ) -> EngineSnapshot {
        let mut snapshot_rx = engine.snapshot();
        let snapshot = tokio::time::timeout(
            Duration::from_secs(5),
            snapshot_rx.wait_for(predicate),
        )
        .await
        .expect("timed out waiting for snapshot")
        .expect("engine stopped");

        snapshot.clone()
    }

    #[tokio::test]
    async fn initial_load_success_ready() {
        let mut api = MockNotificationsApi::new();
        api.expect_recent_notifications()
            .returning(|_| Ok(vec![create_record("a", false)]));
        api.expect_unread_count().returning(|| Ok(1));
        let engine = create_engine(api);

        let snapshot =
            wait_for_snapshot(&engine, |s| s.state == EngineState::Ready).await;

        assert_eq!(snapshot.notifications.len(), 1);
        assert_eq!(snapshot.unread_count, 1);
    }

    #[tokio::test]
    async fn initial_load_failure_error_state() {
        let mut api = MockNotificationsApi::new();
        api.expect_recent_notifications()
            .returning(|_| Err(crate::error::Error::UnexpectedResponse("boom")));
        api.expect_unread_count().returning(|| Ok(0));
        let engine = create_engine(api);

        let snapshot =
            wait_for_snapshot(&engine, |s| s.state == EngineState::Error).await;

        assert!(snapshot.notifications.is_empty());
    }

    #[tokio::test]
    async fn insert_prepends_and_bumps_unread() {
        let mut api = MockNotificationsApi::new();
        api.expect_recent_notifications()
            .returning(|_| Ok(vec![create_record("a", true)]));
        api.expect_unread_count().returning(|| Ok(0));
        let engine = create_engine(api);
        wait_for_snapshot(&engine, |s| s.state == EngineState::Ready).await;

        engine
            .commands()
            .send(EngineCommand::Realtime(RealtimeMessage::inserted(
                create_record("b", false),
            )))
            .await
            .unwrap();

        let snapshot = wait_for_snapshot(&engine, |s| s.unread_count == 1).await;
        assert_eq!(snapshot.notifications[0].id, "b");
        assert_eq!(snapshot.notifications.len(), 2);
    }

    #[tokio::test]
    async fn insert_truncates_to_list_limit() {
        let mut api = MockNotificationsApi::new();
        api.expect_recent_notifications().returning(|_| {
            Ok(vec![
                create_record("a", true),
                create_record("b", true),
                create_record("c", true),
            ])
        });
        api.expect_unread_count().returning(|| Ok(0));
        let engine = create_engine(api);
        wait_for_snapshot(&engine, |s| s.state == EngineState::Ready).await;

        engine
            .commands()
            .send(EngineCommand::Realtime(RealtimeMessage::inserted(
                create_record("d", false),
            )))
            .await
            .unwrap();

        let snapshot = wait_for_snapshot(&engine, |s| s.unread_count == 1).await;
        assert_eq!(snapshot.notifications.len(), 3);
        assert_eq!(snapshot.notifications[0].id, "d");
    }

    #[tokio::test]
    async fn replayed_insert_is_ignored() {
        let mut api = MockNotificationsApi::new();
        api.expect_recent_notifications()
            .returning(|_| Ok(vec![create_record("a", false)]));
        api.expect_unread_count().returning(|| Ok(1));
        let engine = create_engine(api);
        wait_for_snapshot(&engine, |s| s.state == EngineState::Ready).await;

        engine
            .commands()
            .send(EngineCommand::Realtime(RealtimeMessage::inserted(
                create_record("a", false),
            )))
            .await
            .unwrap();
        engine.commands().send(EngineCommand::Refresh).await.unwrap();

        let snapshot = wait_for_snapshot(&engine, |s| s.state == EngineState::Ready).await;
        assert_eq!(snapshot.notifications.len(), 1);
        assert_eq!(snapshot.unread_count, 1);
    }

    #[tokio::test]
    async fn update_event_triggers_refetch() {
        let mut api = MockNotificationsApi::new();
        api.expect_recent_notifications()
            .times(1)
            .returning(|_| Ok(vec![create_record("a", false)]));
        // The refetch picks up the merged record.
        api.expect_recent_notifications()
            .times(1)
            .returning(|_| {
                let mut record = create_record("a", false);
                record.payload.count = 4;
                Ok(vec![record])
            });
        api.expect_unread_count().times(2).returning(|| Ok(1));
        let engine = create_engine(api);
        wait_for_snapshot(&engine, |s| s.state == EngineState::Ready).await;

        engine
            .commands()
            .send(EngineCommand::Realtime(RealtimeMessage::updated(
                "a".to_string(),
            )))
            .await
            .unwrap();

        let snapshot =
            wait_for_snapshot(&engine, |s| s.notifications[0].payload.count == 4).await;
        assert_eq!(snapshot.notifications.len(), 1);
    }

    #[tokio::test]
    async fn mark_read_optimistic_and_calls_api() {
        let mut api = MockNotificationsApi::new();
        api.expect_recent_notifications()
            .returning(|_| Ok(vec![create_record("a", false)]));
        api.expect_unread_count().returning(|| Ok(1));
        api.expect_mark_read()
            .withf(|id| id == "a")
            .once()
            .returning(|_| Ok(()));
        let engine = create_engine(api);
        wait_for_snapshot(&engine, |s| s.state == EngineState::Ready).await;

        engine
            .commands()
            .send(EngineCommand::MarkRead("a".to_string()))
            .await
            .unwrap();

        let snapshot = wait_for_snapshot(&engine, |s| s.unread_count == 0).await;
        assert!(snapshot.notifications[0].is_read);
        engine.close().await;
    }

    #[tokio::test]
    async fn failed_mutation_surfaces_error_without_revert() {
        let mut api = MockNotificationsApi::new();
        api.expect_recent_notifications()
            .returning(|_| Ok(vec![create_record("a", false)]));
        api.expect_unread_count().returning(|| Ok(1));
        api.expect_mark_read()
            .returning(|_| Err(crate::error::Error::UnexpectedResponse("boom")));
        let engine = create_engine(api);
        wait_for_snapshot(&engine, |s| s.state == EngineState::Ready).await;

        engine
            .commands()
            .send(EngineCommand::MarkRead("a".to_string()))
            .await
            .unwrap();

        let snapshot =
            wait_for_snapshot(&engine, |s| s.state == EngineState::Error).await;
        assert!(snapshot.notifications[0].is_read);
        assert_eq!(snapshot.unread_count, 0);
    }

    #[tokio::test]
    async fn delete_read_record_keeps_unread_count() {
        let mut api = MockNotificationsApi::new();
        api.expect_recent_notifications()
            .returning(|_| Ok(vec![create_record("a", true), create_record("b", false)]));
        api.expect_unread_count().returning(|| Ok(1));
        api.expect_delete_notification()
            .once()
            .returning(|_| Ok(()));
        let engine = create_engine(api);
        wait_for_snapshot(&engine, |s| s.state == EngineState::Ready).await;

        engine
            .commands()
            .send(EngineCommand::Delete("a".to_string()))
            .await
            .unwrap();

        let snapshot = wait_for_snapshot(&engine, |s| s.notifications.len() == 1).await;
        assert_eq!(snapshot.unread_count, 1);
        engine.close().await;
    }

    #[tokio::test]
    async fn mark_all_read_zeroes_unread_count() {
        let mut api = MockNotificationsApi::new();
        api.expect_recent_notifications()
            .returning(|_| Ok(vec![create_record("a", false), create_record("b", false)]));
        api.expect_unread_count().returning(|| Ok(5));
        api.expect_mark_all_read().once().returning(|| Ok(()));
        let engine = create_engine(api);
        wait_for_snapshot(&engine, |s| s.state == EngineState::Ready).await;

        engine.commands().send(EngineCommand::MarkAllRead).await.unwrap();

        let snapshot = wait_for_snapshot(&engine, |s| s.unread_count == 0).await;
        assert!(snapshot.notifications.iter().all(|n| n.is_read));
        engine.close().await;
    }
}
