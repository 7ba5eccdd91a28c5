//! CLI interface for smacross
//!
//! Provides subcommands for:
//! - `run`: Start the crossover monitor
//! - `check`: One detection pass, printed to stdout
//! - `flow`: Top option contracts for a ticker
//! - `config`: Show the effective configuration

mod check;
mod flow;
mod run;

pub use check::CheckArgs;
pub use flow::FlowArgs;
pub use run::RunArgs;

use crate::config::{Config, Secrets, SinkKind, DISCORD_TOKEN_ENV};
use crate::notify::{DiscordSink, LogSink, NotificationSink};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "smacross")]
#[command(about = "Moving-average crossover alerts for equities")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the crossover monitor
    Run(RunArgs),
    /// Run a single detection pass
    Check(CheckArgs),
    /// Show top option contracts for a ticker
    Flow(FlowArgs),
    /// Show configuration
    Config,
}

/// Build the configured notification sink
pub(crate) fn build_sink(
    config: &Config,
    secrets: &Secrets,
) -> anyhow::Result<Arc<dyn NotificationSink>> {
    match config.notify.sink {
        SinkKind::Log => Ok(Arc::new(LogSink)),
        SinkKind::Discord => {
            if config.notify.channel_id.trim().is_empty() {
                anyhow::bail!("notify.channel_id is required for the discord sink");
            }
            let token = secrets.discord_token.clone().unwrap_or_default();
            let sink = DiscordSink::new(config.discord_config(token))
                .with_context(|| format!("set {} or use sink = \"log\"", DISCORD_TOKEN_ENV))?;
            Ok(Arc::new(sink))
        }
    }
}

/// Print the effective configuration; secrets only show whether they are set
pub fn print_config(config: &Config, secrets: &Secrets) {
    let set = |v: &Option<String>| if v.is_some() { "set" } else { "not set" };
    let symbols: Vec<&str> = config.monitor.symbols.iter().map(|s| s.as_str()).collect();

    println!("Current configuration:");
    println!(
        "  Monitor: SMA{} on {} bars, every {}s, lookback {}d",
        config.monitor.sma_window,
        config.monitor.bar_interval,
        config.monitor.tick_interval_seconds,
        config.monitor.lookback_days
    );
    println!("  Symbols: {}", symbols.join(", "));
    println!(
        "  Market: {} {}-{}",
        config.market.timezone, config.market.open, config.market.close
    );
    println!("  Provider: {}", config.provider.base_url);
    println!(
        "  Notify: {:?} channel={:?} token={}",
        config.notify.sink,
        config.notify.channel_id,
        set(&secrets.discord_token)
    );
    println!(
        "  Flow: {} (fetch {}) key={}",
        config.flow.base_url,
        config.flow.fetch_limit,
        set(&secrets.uw_api_key)
    );
    match config.telemetry.metrics_port {
        Some(port) => println!("  Metrics: :{}", port),
        None => println!("  Metrics: disabled"),
    }
}
