//! Flow command query parsing

use crate::series::{Symbol, SymbolError};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Contracts shown when no limit is given
pub const DEFAULT_LIMIT: usize = 5;
/// Largest accepted limit
pub const MAX_LIMIT: usize = 20;

/// Rejected flow query; messages are shown to the requesting user
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlowQueryError {
    #[error("invalid ticker: {0}")]
    Ticker(#[from] SymbolError),
    #[error("invalid format, use key=value pairs like `limit=10 sort=iv`")]
    Format(String),
    #[error("`limit` must be a number between 1 and {}", MAX_LIMIT)]
    LimitNotNumber(String),
    #[error("please specify a number of contracts between 1 and {}", MAX_LIMIT)]
    LimitOutOfRange(i64),
    #[error("invalid sort field, choose from: {}", SortField::NAMES.join(", "))]
    Sort(String),
    #[error("order must be either `asc` or `desc`")]
    Order(String),
}

/// Field contracts are ranked by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Premium,
    Volume,
    OpenInterest,
    ImpliedVolatility,
    Price,
    VolumeOiRatio,
}

impl SortField {
    pub const NAMES: [&'static str; 6] = ["premium", "volume", "oi", "iv", "price", "voi"];
}

impl FromStr for SortField {
    type Err = FlowQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "premium" => Ok(SortField::Premium),
            "volume" => Ok(SortField::Volume),
            "oi" => Ok(SortField::OpenInterest),
            "iv" => Ok(SortField::ImpliedVolatility),
            "price" => Ok(SortField::Price),
            "voi" => Ok(SortField::VolumeOiRatio),
            _ => Err(FlowQueryError::Sort(s.to_string())),
        }
    }
}

/// Ranking direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = FlowQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(FlowQueryError::Order(s.to_string())),
        }
    }
}

/// A validated `flow` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowQuery {
    pub ticker: Symbol,
    pub limit: usize,
    pub sort: SortField,
    pub order: SortOrder,
}

impl FlowQuery {
    /// Parse `ticker` plus whitespace-separated `key=value` filters.
    ///
    /// Recognized keys are `limit`, `sort` and `order`; words without `=`
    /// and unknown keys are ignored.
    pub fn parse(ticker: &str, filters: &str) -> Result<Self, FlowQueryError> {
        let ticker: Symbol = ticker.parse()?;
        let mut limit = DEFAULT_LIMIT as i64;
        let mut sort = SortField::default();
        let mut order = SortOrder::default();

        for arg in filters.split_whitespace().filter(|a| a.contains('=')) {
            let mut parts = arg.split('=');
            let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(FlowQueryError::Format(arg.to_string()));
            };
            match key {
                "limit" => {
                    limit = value
                        .parse()
                        .map_err(|_| FlowQueryError::LimitNotNumber(value.to_string()))?;
                }
                "sort" => sort = value.parse()?,
                "order" => order = value.parse()?,
                _ => {}
            }
        }

        if !(1..=MAX_LIMIT as i64).contains(&limit) {
            return Err(FlowQueryError::LimitOutOfRange(limit));
        }

        Ok(Self {
            ticker,
            limit: limit as usize,
            sort,
            order,
        })
    }
}

impl fmt::Display for FlowQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} limit={} sort={:?} order={:?}",
            self.ticker, self.limit, self.sort, self.order
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query = FlowQuery::parse("amzn", "").unwrap();
        assert_eq!(query.ticker.as_str(), "AMZN");
        assert_eq!(query.limit, 5);
        assert_eq!(query.sort, SortField::Premium);
        assert_eq!(query.order, SortOrder::Desc);
    }

    #[test]
    fn test_all_filters() {
        let query = FlowQuery::parse("spy", "limit=10 sort=IV order=asc").unwrap();
        assert_eq!(query.limit, 10);
        assert_eq!(query.sort, SortField::ImpliedVolatility);
        assert_eq!(query.order, SortOrder::Asc);
    }

    #[test]
    fn test_words_without_equals_ignored() {
        let query = FlowQuery::parse("spy", "please limit=3 thanks").unwrap();
        assert_eq!(query.limit, 3);
    }

    #[test]
    fn test_double_equals_is_format_error() {
        assert!(matches!(
            FlowQuery::parse("spy", "limit=1=2"),
            Err(FlowQueryError::Format(_))
        ));
    }

    #[test]
    fn test_limit_validation() {
        assert!(matches!(
            FlowQuery::parse("spy", "limit=ten"),
            Err(FlowQueryError::LimitNotNumber(_))
        ));
        assert_eq!(
            FlowQuery::parse("spy", "limit=21"),
            Err(FlowQueryError::LimitOutOfRange(21))
        );
        assert_eq!(
            FlowQuery::parse("spy", "limit=0"),
            Err(FlowQueryError::LimitOutOfRange(0))
        );
        assert!(FlowQuery::parse("spy", "limit=20").is_ok());
    }

    #[test]
    fn test_invalid_sort_and_order() {
        let err = FlowQuery::parse("spy", "sort=delta").unwrap_err();
        assert!(err.to_string().contains("premium, volume, oi, iv, price, voi"));
        assert!(matches!(
            FlowQuery::parse("spy", "order=up"),
            Err(FlowQueryError::Order(_))
        ));
    }

    #[test]
    fn test_invalid_ticker() {
        assert!(matches!(
            FlowQuery::parse(" ", ""),
            Err(FlowQueryError::Ticker(SymbolError::Empty))
        ));
    }
}
