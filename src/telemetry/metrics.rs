//! Prometheus metrics

use crate::cross::CrossDirection;
use std::net::SocketAddr;
use std::time::Duration;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Ticks that evaluated symbols
    TicksRun,
    /// Ticks skipped outside market hours
    TicksMarketClosed,
    /// Notifications that failed to deliver
    DeliveryFailures,
}

/// Why a symbol was skipped for a tick
#[derive(Debug, Clone, Copy)]
pub enum SkipKind {
    /// Provider error or unusable response
    Fetch,
    /// Not enough bars for the window yet
    InsufficientHistory,
}

/// Start the Prometheus scrape endpoint on `port`
pub fn install_exporter(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;
    tracing::info!(%addr, "Metrics exporter listening");
    Ok(())
}

/// Increment a counter
pub fn increment(metric: CounterMetric) {
    let metric_name = match metric {
        CounterMetric::TicksRun => "smacross_ticks_total",
        CounterMetric::TicksMarketClosed => "smacross_ticks_market_closed_total",
        CounterMetric::DeliveryFailures => "smacross_delivery_failures_total",
    };
    ::metrics::counter!(metric_name).increment(1);
}

/// Count a delivered crossover alert
pub fn record_alert(direction: CrossDirection) {
    ::metrics::counter!("smacross_alerts_total", "direction" => direction.as_str()).increment(1);
}

/// Count a symbol skipped for one tick
pub fn record_skip(kind: SkipKind) {
    let reason = match kind {
        SkipKind::Fetch => "fetch",
        SkipKind::InsufficientHistory => "insufficient_history",
    };
    ::metrics::counter!("smacross_symbol_skips_total", "reason" => reason).increment(1);
}

/// Record how long a tick took
pub fn record_tick_duration(duration: Duration) {
    ::metrics::histogram!("smacross_tick_duration_seconds").record(duration.as_secs_f64());
    tracing::debug!(value_ms = duration.as_millis() as u64, "Tick duration");
}
