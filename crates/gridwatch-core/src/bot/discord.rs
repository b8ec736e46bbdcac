//! Discord delivery -- post alert notifications via webhook.

use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::alerts::Notification;
use crate::bot::keyring_store;
use crate::error::DeliveryError;

const WEBHOOK_KEY: &str = "discord_webhook_url";
const WEBHOOK_PREFIX: &str = "https://discord.com/api/webhooks/";

/// Webhook notification sink.
///
/// The URL comes from the OS keyring unless supplied explicitly. Sending
/// never retries: the scheduler's dedup record is already in place, so a
/// failed delivery is logged by the caller and dropped.
pub struct DiscordSink {
    webhook_url: String,
    http: Client,
}

impl Default for DiscordSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscordSink {
    /// Load the stored webhook URL from the OS keyring (empty if absent).
    pub fn new() -> Self {
        let webhook_url = keyring_store::get(WEBHOOK_KEY)
            .ok()
            .flatten()
            .unwrap_or_default();
        Self::with_webhook_url(webhook_url)
    }

    /// Use an explicit webhook URL, bypassing the keyring.
    pub fn with_webhook_url(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            http: Client::new(),
        }
    }

    /// Persist a user-provided webhook URL to the OS keyring and update
    /// in-memory state.
    pub fn set_credentials(&mut self, webhook_url: &str) -> Result<(), DeliveryError> {
        keyring_store::set(WEBHOOK_KEY, webhook_url)?;
        self.webhook_url = webhook_url.to_string();
        Ok(())
    }

    /// Remove stored credentials.
    pub fn disconnect(&mut self) -> Result<(), DeliveryError> {
        keyring_store::delete(WEBHOOK_KEY)?;
        self.webhook_url.clear();
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        !self.webhook_url.is_empty()
    }

    /// Check that the stored URL looks like a Discord webhook.
    pub fn validate(&self) -> Result<(), DeliveryError> {
        if self.webhook_url.is_empty() {
            return Err(DeliveryError::NotConfigured);
        }
        if !self.webhook_url.starts_with(WEBHOOK_PREFIX) {
            return Err(DeliveryError::Credentials(format!(
                "webhook URL must start with {WEBHOOK_PREFIX}"
            )));
        }
        Ok(())
    }

    /// Post one notification as a webhook embed.
    pub async fn send(&self, notification: &Notification) -> Result<(), DeliveryError> {
        if self.webhook_url.is_empty() {
            return Err(DeliveryError::NotConfigured);
        }

        let body = json!({
            "embeds": [{
                "title": notification.title,
                "description": notification.description,
                "fields": [
                    { "name": "Location", "value": notification.location, "inline": false },
                    { "name": "Event Type", "value": notification.event_label, "inline": false },
                    { "name": "Time", "value": notification.local_time, "inline": false },
                ],
            }],
        });

        let resp = self.http.post(&self.webhook_url).json(&body).send().await?;
        let status = resp.status();
        if status.is_success() {
            debug!(title = %notification.title, "notification delivered");
            Ok(())
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Post a plain text message (command responses).
    pub async fn send_text(&self, content: &str) -> Result<(), DeliveryError> {
        if self.webhook_url.is_empty() {
            return Err(DeliveryError::NotConfigured);
        }
        let resp = self
            .http
            .post(&self.webhook_url)
            .json(&json!({ "content": content }))
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
