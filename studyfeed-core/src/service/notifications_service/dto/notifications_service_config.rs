#[derive(Debug, Clone)]
pub struct NotificationsServiceConfig {
    /// List size used when the query does not specify one.
    pub default_list_limit: i64,

    /// Hard cap applied to client supplied limits.
    pub max_list_limit: i64,
}
