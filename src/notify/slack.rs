//! @ai:module:intent Slack incoming-webhook notifications for merged pull requests
//! @ai:module:layer infrastructure
//! @ai:module:public_api SlackNotifier, merge_payload, test_payload
//! @ai:module:stateless true

use crate::github::PullRequest;
use crate::runner::generator::Summaries;
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::time::Duration;

const PING_TIMEOUT: Duration = Duration::from_secs(30);

/// @ai:intent Message announcing a merged pull request with both summaries
/// @ai:effects pure
pub fn merge_payload(pr: &PullRequest, summaries: &Summaries, channel: Option<&str>) -> Value {
    let merged_by_login = pr.merged_by.as_ref().map_or("unknown", |u| u.login.as_str());
    let merged_by_display = pr.merged_by.as_ref().map_or("unknown", |u| u.display_name());

    let pr_section = format!(
        "**PR #{}:** {}\n**Author:** {} (@{})\n**Merged by:** {} (@{})\n**Branches:** `{}` → `{}`",
        pr.number,
        pr.title,
        pr.user.display_name(),
        pr.user.login,
        merged_by_display,
        merged_by_login,
        pr.head.ref_name,
        pr.base.ref_name,
    );
    let summary_section = format!(
        "**Technical:** {}\n**Marketing:** {}",
        summaries.technical, summaries.marketing
    );

    let mut payload = json!({
        "text": format!("🚀 PR #{} Merged: {}", pr.number, pr.title),
        "blocks": [
            {"type": "section", "text": {"type": "mrkdwn", "text": pr_section}},
            {"type": "section", "text": {"type": "mrkdwn", "text": summary_section}},
            {
                "type": "actions",
                "elements": [{
                    "type": "button",
                    "text": {"type": "plain_text", "text": "View PR"},
                    "url": pr.html_url,
                }],
            },
        ],
    });
    with_channel(&mut payload, channel);
    payload
}

/// @ai:intent Message used to verify a webhook without a pull request
/// @ai:effects pure
pub fn test_payload(channel: Option<&str>) -> Value {
    let mut payload = json!({
        "text": "🧪 PR Summary credentials check",
        "blocks": [
            {
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": "✅ *Test Message*\nThe PR summary webhook credentials are working.",
                },
            },
            {
                "type": "context",
                "elements": [{"type": "mrkdwn", "text": "🔧 Sent by pr-summary check-credentials"}],
            },
        ],
    });
    with_channel(&mut payload, channel);
    payload
}

fn with_channel(payload: &mut Value, channel: Option<&str>) {
    if let (Some(channel), Some(object)) = (channel, payload.as_object_mut()) {
        object.insert("channel".to_string(), Value::String(channel.to_string()));
    }
}

/// @ai:intent Posts messages to one incoming webhook
pub struct SlackNotifier {
    client: reqwest::Client,
    webhook_url: String,
    channel: Option<String>,
}

impl SlackNotifier {
    /// @ai:pre webhook_url was checked by SummaryConfig::validate
    /// @ai:effects pure
    pub fn new(webhook_url: impl Into<String>, channel: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
            channel,
        })
    }

    /// @ai:intent Announce a merged pull request
    /// @ai:post Err on transport failure or non-2xx status
    /// @ai:effects network
    pub async fn post(&self, pr: &PullRequest, summaries: &Summaries) -> Result<()> {
        let payload = merge_payload(pr, summaries, self.channel.as_deref());
        self.send(&payload, None).await?;
        tracing::info!(pr_number = pr.number, "Successfully posted to Slack");
        Ok(())
    }

    /// @ai:intent Send the test message, giving up after 30 seconds
    /// @ai:effects network
    pub async fn ping(&self) -> Result<()> {
        self.send(&test_payload(self.channel.as_deref()), Some(PING_TIMEOUT))
            .await
    }

    async fn send(&self, payload: &Value, timeout: Option<Duration>) -> Result<()> {
        let mut request = self.client.post(&self.webhook_url).json(payload);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.context("Slack webhook request failed")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Slack webhook returned {}: {}", status, body);
        }
        Ok(())
    }
}
