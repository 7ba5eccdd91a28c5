//! Monitor settings, per-symbol outcomes and errors

use crate::cross::CrossEvent;
use crate::notify::{ChannelId, NotifyError};
use crate::series::{SeriesError, Symbol};
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

/// Errors that end the monitoring task
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Settings the monitor cannot run with
    #[error("invalid monitor settings: {0}")]
    InvalidConfig(String),
    /// Unrecoverable internal failure during a tick
    #[error("monitor failed: {0}")]
    Fatal(String),
}

/// What to watch and where to report it
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// Watched symbols, in report order
    pub symbols: Vec<Symbol>,
    /// Destination for alerts
    pub channel: ChannelId,
    /// SMA window in bars
    pub sma_window: usize,
    /// History requested per fetch, in days
    pub lookback_days: u32,
    /// Bar interval requested from the provider (e.g. "1d")
    pub bar_interval: String,
    /// Time between ticks
    pub tick_interval: Duration,
}

impl MonitorSettings {
    /// Bars needed to evaluate a crossing: the window plus one previous bar
    pub fn required_bars(&self) -> usize {
        self.sma_window + 1
    }

    /// Reject unusable settings and drop duplicate symbols, keeping first-seen order
    pub fn validated(mut self) -> Result<Self, MonitorError> {
        if self.sma_window == 0 {
            return Err(MonitorError::InvalidConfig("sma_window must be at least 1".into()));
        }
        if self.tick_interval.is_zero() {
            return Err(MonitorError::InvalidConfig("tick interval must be non-zero".into()));
        }
        if self.symbols.is_empty() {
            return Err(MonitorError::InvalidConfig("no symbols configured".into()));
        }
        let mut seen = std::collections::HashSet::new();
        self.symbols.retain(|s| seen.insert(s.clone()));
        Ok(self)
    }
}

/// Result of processing one symbol within a tick
#[derive(Debug)]
pub enum SymbolOutcome {
    /// Evaluated; no crossing
    Quiet,
    /// Crossing detected and delivered
    Alerted(CrossEvent),
    /// Crossing detected, delivery failed; state was still updated
    DeliveryFailed { event: CrossEvent, error: NotifyError },
    /// Not evaluated this tick; state untouched
    Skipped(SeriesError),
}

impl SymbolOutcome {
    pub fn event(&self) -> Option<&CrossEvent> {
        match self {
            SymbolOutcome::Alerted(event) | SymbolOutcome::DeliveryFailed { event, .. } => {
                Some(event)
            }
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, SymbolOutcome::Skipped(_))
    }
}

/// Aggregated result of one tick
#[derive(Debug)]
pub struct TickReport {
    pub started_at: DateTime<Utc>,
    /// False when the tick was skipped because the market was closed
    pub market_open: bool,
    /// One entry per processed symbol, in configured order
    pub outcomes: Vec<(Symbol, SymbolOutcome)>,
}

impl TickReport {
    pub fn closed(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            market_open: false,
            outcomes: Vec::new(),
        }
    }

    pub fn outcome(&self, symbol: &Symbol) -> Option<&SymbolOutcome> {
        self.outcomes
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, outcome)| outcome)
    }

    /// Crossings delivered this tick
    pub fn alerts(&self) -> impl Iterator<Item = &CrossEvent> {
        self.outcomes.iter().filter_map(|(_, o)| match o {
            SymbolOutcome::Alerted(event) => Some(event),
            _ => None,
        })
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_skipped()).count()
    }
}
