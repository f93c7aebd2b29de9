use async_trait::async_trait;

///
/// Notification as handed to the OS tray. Two notifications with the
/// same tag replace each other instead of stacking.
///
#[derive(Debug, Clone, PartialEq)]
pub struct OsNotification {
    pub title: String,
    pub body: String,
    pub tag: String,
    /// Whether replacing an existing tag alerts again.
    pub renotify: bool,
    pub url: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OsNotifications: Send + Sync {
    async fn show(&self, notification: OsNotification);

    async fn dismiss(&self, tag: &str);
}

///
/// Window management of the hosting application.
///
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WindowClients: Send + Sync {
    ///
    /// Focuses an already open window and navigates it to `url`.
    ///
    /// ### Returns
    /// `false` when no window is open.
    ///
    async fn focus_existing(&self, url: &str) -> bool;

    async fn open(&self, url: &str);
}
