//! Yahoo Finance chart API client
//!
//! Pulls daily (or intraday) closing prices from the public v8 chart
//! endpoint. Bars whose close is null (halts, partial sessions) are dropped
//! before the series is assembled.

use super::{Bar, Series, SeriesError, SeriesProvider, Symbol};
use crate::http::{build_client, Throttle};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

/// Yahoo Finance API base URL
pub const YAHOO_API_URL: &str = "https://query1.finance.yahoo.com";

/// Configuration for the Yahoo client
#[derive(Debug, Clone)]
pub struct YahooConfig {
    /// Base URL for the chart API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Minimum spacing between consecutive requests
    pub min_request_interval: Duration,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: YAHOO_API_URL.to_string(),
            timeout: Duration::from_secs(10),
            min_request_interval: Duration::from_millis(250),
        }
    }
}

/// Client for Yahoo's chart endpoint
pub struct YahooClient {
    config: YahooConfig,
    client: Client,
    throttle: Throttle,
}

impl YahooClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self, SeriesError> {
        Self::with_config(YahooConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: YahooConfig) -> Result<Self, SeriesError> {
        let client = build_client(config.timeout)?;
        let throttle = Throttle::new(config.min_request_interval);
        Ok(Self {
            config,
            client,
            throttle,
        })
    }

    fn chart_url(&self, symbol: &Symbol) -> String {
        format!(
            "{}/v8/finance/chart/{}",
            self.config.base_url.trim_end_matches('/'),
            symbol
        )
    }
}

#[async_trait]
impl SeriesProvider for YahooClient {
    async fn fetch(
        &self,
        symbol: &Symbol,
        lookback_days: u32,
        interval: &str,
    ) -> Result<Series, SeriesError> {
        let now = Utc::now();
        let start = now - ChronoDuration::days(i64::from(lookback_days));
        let url = self.chart_url(symbol);

        self.throttle.acquire().await;
        tracing::debug!(url = %url, symbol = %symbol, interval, lookback_days, "Fetching chart");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", start.timestamp().to_string()),
                ("period2", now.timestamp().to_string()),
                ("interval", interval.to_string()),
                ("includePrePost", "false".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SeriesError::Status { status, body });
        }

        let body: ChartResponse = response
            .json()
            .await
            .map_err(|e| SeriesError::Malformed(e.to_string()))?;

        parse_chart(symbol, body)
    }
}

/// Top-level chart envelope
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Convert a chart payload into a validated series
fn parse_chart(symbol: &Symbol, body: ChartResponse) -> Result<Series, SeriesError> {
    if let Some(err) = body.chart.error {
        return Err(SeriesError::Malformed(format!(
            "{}: {}",
            err.code, err.description
        )));
    }

    let result = body
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| SeriesError::Malformed(format!("no chart result for {}", symbol)))?;

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    if closes.len() != result.timestamp.len() {
        return Err(SeriesError::Malformed(format!(
            "{} timestamps but {} closes",
            result.timestamp.len(),
            closes.len()
        )));
    }

    let mut bars = Vec::with_capacity(closes.len());
    for (ts, close) in result.timestamp.into_iter().zip(closes) {
        let Some(close) = close else { continue };
        let timestamp = Utc
            .timestamp_opt(ts, 0)
            .single()
            .ok_or_else(|| SeriesError::Malformed(format!("bad timestamp {}", ts)))?;
        let close = Decimal::from_f64(close)
            .ok_or_else(|| SeriesError::Malformed(format!("bad close {}", close)))?;
        bars.push(Bar::new(timestamp, close));
    }
    bars.sort_by_key(|b| b.timestamp);

    Series::new(symbol.clone(), bars)
}
