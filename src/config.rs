//! Configuration types for smacross

use crate::clock::ExchangeHours;
use crate::flow::{FlowConfig, UNUSUAL_WHALES_API_URL};
use crate::monitor::MonitorSettings;
use crate::notify::{ChannelId, DiscordConfig, DISCORD_API_URL};
use crate::series::{Symbol, YahooConfig, YAHOO_API_URL};
use crate::telemetry::LogFormat;
use anyhow::{anyhow, bail, Context};
use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::Deserialize;
use std::time::Duration;

/// Environment variable holding the Discord bot token
pub const DISCORD_TOKEN_ENV: &str = "DISCORD_BOT_TOKEN";
/// Environment variable holding the Unusual Whales API key
pub const UW_API_KEY_ENV: &str = "UW_API_KEY";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub monitor: MonitorConfig,
    pub market: MarketConfig,
    pub provider: ProviderConfig,
    pub notify: NotifyConfig,
    pub flow: FlowSettings,
    pub telemetry: TelemetryConfig,
}

/// Crossover monitor configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between ticks
    #[serde(default = "default_tick_interval_seconds")]
    pub tick_interval_seconds: u64,

    /// SMA window in bars
    #[serde(default = "default_sma_window")]
    pub sma_window: usize,

    /// Watched symbols
    #[serde(default = "default_symbols")]
    pub symbols: Vec<Symbol>,

    /// Calendar days of history requested per fetch
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Bar interval passed to the provider
    #[serde(default = "default_bar_interval")]
    pub bar_interval: String,
}

fn default_tick_interval_seconds() -> u64 {
    900 // 15 minutes
}
fn default_sma_window() -> usize {
    200
}
fn default_symbols() -> Vec<Symbol> {
    ["SPY", "QQQ"].iter().filter_map(|s| s.parse().ok()).collect()
}
fn default_lookback_days() -> u32 {
    300 // enough calendar days for 200 trading sessions
}
fn default_bar_interval() -> String {
    "1d".to_string()
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_interval_seconds: default_tick_interval_seconds(),
            sma_window: default_sma_window(),
            symbols: default_symbols(),
            lookback_days: default_lookback_days(),
            bar_interval: default_bar_interval(),
        }
    }
}

/// Trading session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    /// IANA timezone of the exchange
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Session open, local "HH:MM"
    #[serde(default = "default_open")]
    pub open: String,

    /// Session close, local "HH:MM"
    #[serde(default = "default_close")]
    pub close: String,
}

fn default_timezone() -> String {
    "America/New_York".to_string()
}
fn default_open() -> String {
    "09:30".to_string()
}
fn default_close() -> String {
    "16:00".to_string()
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            open: default_open(),
            close: default_close(),
        }
    }
}

/// Price history provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Minimum spacing between requests (milliseconds)
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,
}

fn default_provider_url() -> String {
    YAHOO_API_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_min_request_interval_ms() -> u64 {
    250
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_provider_url(),
            timeout_secs: default_timeout_secs(),
            min_request_interval_ms: default_min_request_interval_ms(),
        }
    }
}

/// Where alerts go
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    Discord,
    /// Write alerts to the log only
    Log,
}

/// Notification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub sink: SinkKind,

    /// Destination channel
    #[serde(default)]
    pub channel_id: String,

    #[serde(default = "default_discord_api")]
    pub api_base: String,
}

fn default_discord_api() -> String {
    DISCORD_API_URL.to_string()
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            sink: SinkKind::default(),
            channel_id: String::new(),
            api_base: default_discord_api(),
        }
    }
}

/// Options flow lookup configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FlowSettings {
    #[serde(default = "default_flow_url")]
    pub base_url: String,

    /// Contracts requested per lookup
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,
}

fn default_flow_url() -> String {
    UNUSUAL_WHALES_API_URL.to_string()
}
fn default_fetch_limit() -> usize {
    50
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            base_url: default_flow_url(),
            fetch_limit: default_fetch_limit(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Prometheus listener port; no exporter when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

/// Credentials read from the environment
#[derive(Clone, Default)]
pub struct Secrets {
    pub discord_token: Option<String>,
    pub uw_api_key: Option<String>,
}

impl Secrets {
    /// Read secrets from the process environment (call `dotenvy::dotenv` first)
    pub fn from_env() -> Self {
        let read = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            discord_token: read(DISCORD_TOKEN_ENV),
            uw_api_key: read(UW_API_KEY_ENV),
        }
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Secrets")
            .field("discord_token", &mask(&self.discord_token))
            .field("uw_api_key", &mask(&self.uw_api_key))
            .finish()
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the monitor cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.monitor.sma_window < 1 {
            bail!("monitor.sma_window must be at least 1");
        }
        if self.monitor.tick_interval_seconds == 0 {
            bail!("monitor.tick_interval_seconds must be non-zero");
        }
        if self.monitor.symbols.is_empty() {
            bail!("monitor.symbols must not be empty");
        }
        self.exchange_hours()?;
        Ok(())
    }

    /// Session calendar described by `[market]`
    pub fn exchange_hours(&self) -> anyhow::Result<ExchangeHours> {
        let tz: Tz = self
            .market
            .timezone
            .parse()
            .map_err(|_| anyhow!("unknown timezone {:?}", self.market.timezone))?;
        let open = parse_clock_time("market.open", &self.market.open)?;
        let close = parse_clock_time("market.close", &self.market.close)?;
        if open >= close {
            bail!("market.open must be before market.close");
        }
        Ok(ExchangeHours::new(tz, open, close))
    }

    /// Scheduler settings described by `[monitor]` and `[notify]`
    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            symbols: self.monitor.symbols.clone(),
            channel: ChannelId::new(self.notify.channel_id.clone()),
            sma_window: self.monitor.sma_window,
            lookback_days: self.monitor.lookback_days,
            bar_interval: self.monitor.bar_interval.clone(),
            tick_interval: Duration::from_secs(self.monitor.tick_interval_seconds),
        }
    }

    pub fn yahoo_config(&self) -> YahooConfig {
        YahooConfig {
            base_url: self.provider.base_url.clone(),
            timeout: Duration::from_secs(self.provider.timeout_secs),
            min_request_interval: Duration::from_millis(self.provider.min_request_interval_ms),
        }
    }

    pub fn discord_config(&self, token: impl Into<String>) -> DiscordConfig {
        DiscordConfig {
            api_base: self.notify.api_base.clone(),
            token: token.into(),
            timeout: Duration::from_secs(self.provider.timeout_secs),
        }
    }

    pub fn flow_config(&self, api_key: impl Into<String>) -> FlowConfig {
        FlowConfig {
            base_url: self.flow.base_url.clone(),
            api_key: api_key.into(),
            fetch_limit: self.flow.fetch_limit,
            timeout: Duration::from_secs(self.provider.timeout_secs),
            min_request_interval: Duration::from_millis(self.provider.min_request_interval_ms),
        }
    }
}

fn parse_clock_time(field: &str, value: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value.trim(), "%H:%M:%S"))
        .with_context(|| format!("{} must be HH:MM, got {:?}", field, value))
}
