//! Sink that writes notifications to the log

use super::{ChannelId, NotificationSink, NotifyError};
use async_trait::async_trait;

/// Logs each notification instead of delivering it
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn send(&self, channel: &ChannelId, text: &str) -> Result<(), NotifyError> {
        tracing::info!(channel = %channel, text, "Notification");
        Ok(())
    }
}
