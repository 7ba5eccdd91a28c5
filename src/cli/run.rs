//! Run command implementation

use super::build_sink;
use crate::config::{Config, Secrets};
use crate::cross::CrossStateStore;
use crate::monitor::Monitor;
use crate::notify::{LogSink, NotificationSink};
use crate::series::YahooClient;
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Log alerts instead of delivering them
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    pub async fn execute(&self, config: &Config, secrets: &Secrets) -> anyhow::Result<()> {
        let sink: Arc<dyn NotificationSink> = if self.dry_run {
            Arc::new(LogSink)
        } else {
            build_sink(config, secrets)?
        };
        let provider = Arc::new(YahooClient::with_config(config.yahoo_config())?);
        let clock = Arc::new(config.exchange_hours()?);

        let monitor = Arc::new(Monitor::new(
            config.monitor_settings(),
            provider,
            sink,
            clock,
            Arc::new(CrossStateStore::new()),
        )?);

        let mut handle = monitor.spawn();

        let outcome = tokio::select! {
            res = handle.finished() => Some(res),
            _ = tokio::signal::ctrl_c() => None,
        };

        match outcome {
            Some(res) => res?,
            None => {
                tracing::info!("Interrupt received, stopping monitor");
                handle.stop().await?;
            }
        }

        Ok(())
    }
}
