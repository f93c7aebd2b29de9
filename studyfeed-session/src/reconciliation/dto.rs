use notify_wire::{NotificationRecord, RealtimeMessage};

#[derive(Debug, Clone)]
pub struct ReconciliationEngineConfig {
    /// Records kept in the local view, matches the server list limit.
    pub list_limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Initial fetch in flight, local view is empty.
    Loading,
    /// Local view is consistent with the last confirmed server state.
    Ready,
    /// Last fetch failed, local view may be stale.
    Error,
}

///
/// Published local view of the feed. Mutations are applied
/// optimistically, a failed mutation triggers a full refetch which
/// always wins over the local guess.
///
#[derive(Debug, Clone)]
pub struct EngineSnapshot {
    pub state: EngineState,
    pub notifications: Vec<NotificationRecord>,
    pub unread_count: u64,
}

impl EngineSnapshot {
    pub fn initial() -> Self {
        Self {
            state: EngineState::Loading,
            notifications: Vec::new(),
            unread_count: 0,
        }
    }
}

#[derive(Debug)]
pub enum EngineCommand {
    /// Change event received on the realtime channel.
    Realtime(RealtimeMessage),
    /// Realtime channel was re-established, events may have been missed.
    Reconnected,
    MarkRead(String),
    MarkAllRead,
    Delete(String),
    /// Full refetch of list and unread count.
    Refresh,
    /// A detached mutation was rejected by the server. The optimistic
    /// local change stays, the error state tells the UI the view is
    /// no longer confirmed.
    MutationFailed,
}
