//! Discord REST sink
//!
//! Posts plain-text messages to a guild channel as a bot user.

use super::{ChannelId, NotificationSink, NotifyError};
use crate::http::build_client;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Discord REST API base URL
pub const DISCORD_API_URL: &str = "https://discord.com/api/v10";

/// Configuration for the Discord sink
#[derive(Debug, Clone)]
pub struct DiscordConfig {
    /// REST API base URL
    pub api_base: String,
    /// Bot token (without the "Bot " prefix)
    pub token: String,
    /// Request timeout
    pub timeout: Duration,
}

impl DiscordConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_base: DISCORD_API_URL.to_string(),
            token: token.into(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateMessage<'a> {
    content: &'a str,
}

/// Sends notifications through Discord's create-message endpoint
pub struct DiscordSink {
    config: DiscordConfig,
    client: Client,
}

impl DiscordSink {
    pub fn new(config: DiscordConfig) -> Result<Self, NotifyError> {
        if config.token.trim().is_empty() {
            return Err(NotifyError::MissingCredentials("DISCORD_BOT_TOKEN"));
        }
        let client = build_client(config.timeout)?;
        Ok(Self { config, client })
    }

    fn messages_url(&self, channel: &ChannelId) -> String {
        format!(
            "{}/channels/{}/messages",
            self.config.api_base.trim_end_matches('/'),
            channel
        )
    }
}

#[async_trait]
impl NotificationSink for DiscordSink {
    async fn send(&self, channel: &ChannelId, text: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.messages_url(channel))
            .header("Authorization", format!("Bot {}", self.config.token))
            .json(&CreateMessage { content: text })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected { status, body });
        }

        tracing::debug!(channel = %channel, "Discord message delivered");
        Ok(())
    }
}
