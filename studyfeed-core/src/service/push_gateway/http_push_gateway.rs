use super::PushGateway;
use crate::repository::PushSubscription;
use anyhow::Context;
use axum::async_trait;
use notify_wire::PushEnvelope;
use std::time::Duration;

///
/// Posts the JSON envelope to the subscription endpoint of the push
/// relay. Payload encryption with the subscription keys is handled by
/// the relay deployment in front of the browser push services.
///
pub struct HttpPushGateway {
    client: reqwest::Client,
}

impl HttpPushGateway {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build push http client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PushGateway for HttpPushGateway {
    async fn deliver(
        &self,
        subscription: &PushSubscription,
        envelope: &PushEnvelope,
    ) -> anyhow::Result<()> {
        let response = self
            .client
            .post(&subscription.endpoint)
            .json(envelope)
            .send()
            .await
            .context("push request failed")?;

        response
            .error_for_status()
            .context("push endpoint rejected message")?;

        Ok(())
    }
}
