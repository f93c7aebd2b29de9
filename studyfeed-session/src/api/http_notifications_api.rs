use super::NotificationsApi;
use crate::error::Error;
use anyhow::Context;
use async_trait::async_trait;
use notify_wire::{BadgeGrant, NotificationRecord};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpNotificationsApiConfig {
    pub base_url: String,
    pub bearer_token: String,
    pub request_timeout: Duration,
}

pub struct HttpNotificationsApi {
    config: HttpNotificationsApiConfig,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct UnreadCountResponse {
    count: u64,
}

impl HttpNotificationsApi {
    pub fn new(config: HttpNotificationsApiConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("failed to build api http client")?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    async fn send_no_content(&self, request: reqwest::RequestBuilder) -> Result<(), Error> {
        let response = request
            .bearer_auth(&self.config.bearer_token)
            .send()
            .await?
            .error_for_status()?;

        ensure_no_content(response.status())
    }
}

///
/// Mutation endpoints answer `204 No Content`. Anything else that
/// still passes the status check means the request landed somewhere
/// unexpected, a misconfigured base url for example.
///
fn ensure_no_content(status: reqwest::StatusCode) -> Result<(), Error> {
    match status {
        reqwest::StatusCode::NO_CONTENT => Ok(()),
        _ => Err(Error::UnexpectedResponse("expected an empty response")),
    }
}

#[async_trait]
impl NotificationsApi for HttpNotificationsApi {
    async fn recent_notifications(
        &self,
        limit: Option<i64>,
    ) -> Result<Vec<NotificationRecord>, Error> {
        let mut request = self.client.get(self.url("/api/notifications"));
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }

        let records = request
            .bearer_auth(&self.config.bearer_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(records)
    }

    async fn unread_count(&self) -> Result<u64, Error> {
        let response: UnreadCountResponse = self
            .client
            .get(self.url("/api/notifications/unread-count"))
            .bearer_auth(&self.config.bearer_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.count)
    }

    async fn mark_read(&self, id: &str) -> Result<(), Error> {
        let request = self
            .client
            .put(self.url(&format!("/api/notifications/{id}/read")));

        self.send_no_content(request).await
    }

    async fn mark_all_read(&self) -> Result<(), Error> {
        let request = self.client.put(self.url("/api/notifications/read"));

        self.send_no_content(request).await
    }

    async fn delete_notification(&self, id: &str) -> Result<(), Error> {
        let request = self.client.delete(self.url(&format!("/api/notifications/{id}")));

        self.send_no_content(request).await
    }

    async fn user_badges(&self) -> Result<Vec<BadgeGrant>, Error> {
        let badges = self
            .client
            .get(self.url("/api/badges"))
            .bearer_auth(&self.config.bearer_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(badges)
    }

    async fn unnotified_badges(&self) -> Result<Vec<BadgeGrant>, Error> {
        let badges = self
            .client
            .get(self.url("/api/badges/unnotified"))
            .bearer_auth(&self.config.bearer_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(badges)
    }

    async fn acknowledge_badges(&self, badge_ids: Vec<String>) -> Result<(), Error> {
        let request = self
            .client
            .post(self.url("/api/badges/acknowledge"))
            .json(&serde_json::json!({ "badge_ids": badge_ids }));

        self.send_no_content(request).await
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ensure_no_content_accepts_204() {
        assert!(ensure_no_content(reqwest::StatusCode::NO_CONTENT).is_ok());
    }

    #[test]
    fn ensure_no_content_rejects_other_success_codes() {
        assert!(matches!(
            ensure_no_content(reqwest::StatusCode::OK),
            Err(Error::UnexpectedResponse(_))
        ));
    }
}
