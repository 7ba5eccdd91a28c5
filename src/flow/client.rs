//! Unusual Whales option-contracts client

use super::{FlowError, OptionContract};
use crate::http::{build_client, Throttle};
use crate::series::Symbol;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Unusual Whales API base URL
pub const UNUSUAL_WHALES_API_URL: &str = "https://api.unusualwhales.com";

/// Configuration for the flow client
#[derive(Debug, Clone)]
pub struct FlowConfig {
    pub base_url: String,
    /// Bearer token
    pub api_key: String,
    /// Contracts requested per lookup
    pub fetch_limit: usize,
    pub timeout: Duration,
    pub min_request_interval: Duration,
}

impl FlowConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: UNUSUAL_WHALES_API_URL.to_string(),
            api_key: api_key.into(),
            fetch_limit: 50,
            timeout: Duration::from_secs(10),
            min_request_interval: Duration::from_millis(250),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContractsResponse {
    #[serde(default)]
    data: Vec<OptionContract>,
}

/// Fetches option contracts for a ticker
pub struct FlowClient {
    config: FlowConfig,
    client: Client,
    throttle: Throttle,
}

impl FlowClient {
    pub fn new(config: FlowConfig) -> Result<Self, FlowError> {
        if config.api_key.trim().is_empty() {
            return Err(FlowError::MissingCredentials("UW_API_KEY"));
        }
        let client = build_client(config.timeout)?;
        let throttle = Throttle::new(config.min_request_interval);
        Ok(Self {
            config,
            client,
            throttle,
        })
    }

    /// Most recent option contracts for `ticker`
    pub async fn fetch_contracts(&self, ticker: &Symbol) -> Result<Vec<OptionContract>, FlowError> {
        let url = format!(
            "{}/api/stock/{}/option-contracts",
            self.config.base_url.trim_end_matches('/'),
            ticker
        );

        self.throttle.acquire().await;
        tracing::debug!(url = %url, ticker = %ticker, "Fetching option contracts");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .query(&[
                ("limit", self.config.fetch_limit.to_string()),
                ("type", "all".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FlowError::Status { status, body });
        }

        let body: ContractsResponse = response.json().await?;
        tracing::debug!(ticker = %ticker, count = body.data.len(), "Fetched option contracts");
        Ok(body.data)
    }
}
