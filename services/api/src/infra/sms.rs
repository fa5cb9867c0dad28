//! SMS gateway client. The gateway is a GET endpoint taking everything as
//! query parameters and answering 200 even for some soft failures, so only
//! transport and HTTP status are checked here.

use anyhow::{Context as _, bail};

use crate::domain::repository::DeliveryChannel;

#[derive(Clone)]
pub struct SmsClient {
    pub http: reqwest::Client,
    pub api_url: String,
    pub api_key: String,
    pub sender_id: String,
}

impl DeliveryChannel for SmsClient {
    async fn send(&self, target: &str, message: &str) -> anyhow::Result<()> {
        let response = self
            .http
            .get(&self.api_url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("type", "text"),
                ("contacts", target),
                ("senderid", self.sender_id.as_str()),
                ("msg", message),
                ("label", "transactional"),
            ])
            .send()
            .await
            .context("sms gateway request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("sms gateway responded {status}: {body}");
        }
        Ok(())
    }
}
