//! Price series module
//!
//! Bars, series, and the provider seam the monitor fetches history through

mod types;
mod yahoo;

pub use types::{Bar, Series, Symbol, SymbolError};
pub use yahoo::{YahooClient, YahooConfig, YAHOO_API_URL};

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while obtaining a usable series
#[derive(Debug, Error)]
pub enum SeriesError {
    /// Transport failure talking to the provider
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Provider answered with a non-success status
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
    /// Provider answered with data that cannot form a series
    #[error("malformed response: {0}")]
    Malformed(String),
    /// Fewer bars than the indicator window needs
    #[error("{symbol}: {available} bars available, {required} required")]
    InsufficientHistory {
        symbol: Symbol,
        available: usize,
        required: usize,
    },
}

impl SeriesError {
    /// Expected during warm-up, not a fault
    pub fn is_insufficient_history(&self) -> bool {
        matches!(self, SeriesError::InsufficientHistory { .. })
    }
}

/// Source of historical bars
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    /// Fetch `lookback_days` of bars at `interval` (e.g. "1d") for `symbol`
    async fn fetch(
        &self,
        symbol: &Symbol,
        lookback_days: u32,
        interval: &str,
    ) -> Result<Series, SeriesError>;
}
