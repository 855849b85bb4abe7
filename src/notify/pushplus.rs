//! PushPlus client
//!
//! Delivers formatted messages to the PushPlus send endpoint. Delivery
//! problems are logged and reported as `false`, never raised.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::core::config::PushPlusConfig;
use crate::core::{CheckinError, PushTemplate, Result, RunSummary};
use crate::notify::templates::{self, PushMessage};

/// PushPlus send request
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    token: &'a str,
    title: &'a str,
    content: &'a str,
    template: PushTemplate,
}

/// PushPlus send response; the HTTP status is 200 even for rejected sends
#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    msg: Option<String>,
}

/// Notification dispatcher backed by PushPlus
#[derive(Clone)]
pub struct PushPlusNotifier {
    client: Client,
    config: PushPlusConfig,
}

impl PushPlusNotifier {
    /// Create a notifier from configuration
    pub fn new(config: PushPlusConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    /// Whether sends will reach the network
    pub fn is_enabled(&self) -> bool {
        self.config.is_active()
    }

    /// Send one message; `true` only when PushPlus answers with code 200
    ///
    /// Uses the configured template when `template` is `None`.
    pub async fn send(&self, title: &str, content: &str, template: Option<PushTemplate>) -> bool {
        if !self.is_enabled() {
            tracing::info!(title, "PushPlus notifications disabled, skipping send");
            return false;
        }

        match self.try_send(title, content, template).await {
            Ok(()) => {
                tracing::info!(title, "PushPlus notification sent");
                true
            }
            Err(e) => {
                tracing::warn!(title, error = %e, "PushPlus notification failed");
                false
            }
        }
    }

    async fn try_send(
        &self,
        title: &str,
        content: &str,
        template: Option<PushTemplate>,
    ) -> Result<()> {
        let token = self
            .config
            .token
            .as_deref()
            .ok_or_else(|| CheckinError::notification("missing token"))?;

        let request = SendRequest {
            token,
            title,
            content,
            template: template.unwrap_or(self.config.template),
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CheckinError::notification(format!(
                "PushPlus API error ({}): {}",
                status, body
            )));
        }

        let parsed: SendResponse = serde_json::from_str(&body)?;
        match parsed.code {
            Some(200) => Ok(()),
            code => Err(CheckinError::notification(format!(
                "code {}: {}",
                code.map_or_else(|| "missing".to_string(), |c| c.to_string()),
                parsed.msg.as_deref().unwrap_or("未知错误")
            ))),
        }
    }

    async fn deliver(&self, message: PushMessage) -> bool {
        self.send(&message.title, &message.content, None).await
    }

    /// Report the check-in result
    pub async fn send_sign_in_notification(&self, success: bool, message: &str) -> bool {
        let now = templates::now_timestamp();
        self.deliver(templates::sign_in_message(success, message, &now))
            .await
    }

    /// Report the draw result; `prize_or_reason` is the failure reason when unsuccessful
    pub async fn send_lottery_notification(&self, success: bool, prize_or_reason: &str) -> bool {
        let now = templates::now_timestamp();
        self.deliver(templates::lottery_message(success, prize_or_reason, &now))
            .await
    }

    /// Report the whole run
    pub async fn send_daily_summary(&self, summary: &RunSummary) -> bool {
        let now = templates::now_timestamp();
        self.deliver(templates::daily_summary_message(summary, &now))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_wire_template() {
        let request = SendRequest {
            token: "t",
            title: "标题",
            content: "内容",
            template: PushTemplate::Structured,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"token": "t", "title": "标题", "content": "内容", "template": "json"})
        );
    }

    #[test]
    fn test_disabled_send_returns_false_without_network() {
        // Endpoint is unroutable; a network attempt would not return quickly
        let config = PushPlusConfig {
            enabled: false,
            token: Some("t".to_string()),
            endpoint: "http://10.255.255.1/send".to_string(),
            ..Default::default()
        };
        let notifier = PushPlusNotifier::new(config).unwrap();

        let sent = tokio_test::block_on(notifier.send("t", "c", None));
        assert!(!sent);
    }

    #[test]
    fn test_enabled_without_token_is_skipped() {
        let config = PushPlusConfig {
            enabled: true,
            token: None,
            ..Default::default()
        };
        let notifier = PushPlusNotifier::new(config).unwrap();
        assert!(!notifier.is_enabled());
        assert!(!tokio_test::block_on(notifier.send("t", "c", None)));
    }
}
