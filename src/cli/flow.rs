//! Flow command implementation

use super::build_sink;
use crate::config::{Config, Secrets, UW_API_KEY_ENV};
use crate::flow::{render_flow, select_contracts, FlowClient, FlowQuery};
use crate::notify::ChannelId;
use anyhow::Context;
use chrono::Utc;
use clap::Args;

#[derive(Args, Debug)]
pub struct FlowArgs {
    /// Underlying ticker
    pub ticker: String,

    /// Filters: limit=N sort=FIELD order=asc|desc
    pub filters: Vec<String>,

    /// Post the listing to the configured sink
    #[arg(long)]
    pub notify: bool,
}

impl FlowArgs {
    pub async fn execute(&self, config: &Config, secrets: &Secrets) -> anyhow::Result<()> {
        let query = match FlowQuery::parse(&self.ticker, &self.filters.join(" ")) {
            Ok(query) => query,
            Err(e) => {
                println!("{}", e);
                return Ok(());
            }
        };

        let api_key = secrets.uw_api_key.clone().unwrap_or_default();
        let client = FlowClient::new(config.flow_config(api_key))
            .with_context(|| format!("set {} to use the flow command", UW_API_KEY_ENV))?;

        tracing::info!(query = %query, "Looking up option flow");
        let contracts = client.fetch_contracts(&query.ticker).await?;
        let today = Utc::now().with_timezone(&config.exchange_hours()?.timezone()).date_naive();
        let selected = select_contracts(contracts, &query, today);
        let text = render_flow(&query, &selected);

        println!("{}", text);

        if self.notify {
            let sink = build_sink(config, secrets)?;
            let channel = ChannelId::new(config.notify.channel_id.clone());
            sink.send(&channel, &text).await?;
        }

        Ok(())
    }
}
