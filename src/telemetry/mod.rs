//! Telemetry module
//!
//! Logging and metrics

mod logging;
mod metrics;

pub use logging::{init_logging, LogFormat};
pub use self::metrics::{
    increment, install_exporter, record_alert, record_skip, record_tick_duration, CounterMetric,
    SkipKind,
};

use crate::config::TelemetryConfig;

/// Guard held for the lifetime of the process
pub struct TelemetryGuard {
    _priv: (),
}

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<TelemetryGuard> {
    init_logging(&config.log_level, config.log_format)?;

    if let Some(port) = config.metrics_port {
        install_exporter(port)?;
    }

    Ok(TelemetryGuard { _priv: () })
}
