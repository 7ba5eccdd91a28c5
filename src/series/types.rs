//! Price series types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::SeriesError;

/// Ticker symbol, normalized to uppercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

/// Rejected ticker input
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SymbolError {
    #[error("symbol is empty")]
    Empty,
    #[error("symbol contains whitespace: {0:?}")]
    Whitespace(String),
}

impl Symbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Symbol {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SymbolError::Empty);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(SymbolError::Whitespace(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_uppercase()))
    }
}

impl TryFrom<String> for Symbol {
    type Error = SymbolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One sampled price observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar open time
    pub timestamp: DateTime<Utc>,
    /// Closing price
    pub close: Decimal,
}

impl Bar {
    pub fn new(timestamp: DateTime<Utc>, close: Decimal) -> Self {
        Self { timestamp, close }
    }
}

/// Bars for one symbol, strictly ascending by timestamp
#[derive(Debug, Clone)]
pub struct Series {
    symbol: Symbol,
    bars: Vec<Bar>,
}

impl Series {
    /// Build a series, rejecting out-of-order or duplicate timestamps
    pub fn new(symbol: Symbol, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        if let Some(pair) = bars
            .windows(2)
            .find(|pair| pair[0].timestamp >= pair[1].timestamp)
        {
            return Err(SeriesError::Malformed(format!(
                "bars for {} not strictly ascending at {}",
                symbol, pair[1].timestamp
            )));
        }
        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Closing prices in series order
    pub fn closes(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.bars.iter().map(|b| b.close)
    }

    /// Fail with `InsufficientHistory` unless at least `required` bars exist
    pub fn require(&self, required: usize) -> Result<(), SeriesError> {
        if self.bars.len() < required {
            return Err(SeriesError::InsufficientHistory {
                symbol: self.symbol.clone(),
                available: self.bars.len(),
                required,
            });
        }
        Ok(())
    }
}
