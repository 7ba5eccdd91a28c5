//! Notification module
//!
//! The chat-channel seam alerts are written to, plus the alert text format

mod discord;
mod format;
mod log;

pub use discord::{DiscordConfig, DiscordSink, DISCORD_API_URL};
pub use format::{alert_message, period_word};
pub use log::LogSink;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Opaque destination handle understood by the sink (e.g. a channel ID)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Notification delivery errors
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Transport failure
    #[error("delivery request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Sink answered with a non-success status
    #[error("sink rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
    /// Sink cannot be built without credentials
    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),
}

/// Destination for outbound notifications
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver `text` to `channel`
    async fn send(&self, channel: &ChannelId, text: &str) -> Result<(), NotifyError>;
}
