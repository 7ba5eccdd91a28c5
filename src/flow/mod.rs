//! Options flow module
//!
//! On-demand lookup of a ticker's most active option contracts: parse the
//! chat query, fetch contracts, drop expired ones, sort, and render text.

mod client;
mod contract;
mod query;
mod render;

pub use client::{FlowClient, FlowConfig, UNUSUAL_WHALES_API_URL};
pub use contract::{parse_option_symbol, OptionContract, OptionSide, ParsedOptionSymbol};
pub use query::{FlowQuery, FlowQueryError, SortField, SortOrder};
pub use render::{render_flow, select_contracts};

use thiserror::Error;

/// Options flow retrieval errors
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("flow API returned {status}: {body}")]
    Status { status: u16, body: String },
}
