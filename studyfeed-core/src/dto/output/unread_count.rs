use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: u64,
}
