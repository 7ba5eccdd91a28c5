//! Crossover detection types

use crate::indicator::IndicatorPoint;
use crate::series::{Series, Symbol};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Last observed relationship between price and its average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CrossState {
    /// Symbol not yet observed
    #[default]
    Unknown,
    /// Price strictly above the average
    Above,
    /// Price at or below the average
    Below,
}

impl CrossState {
    /// State for a price/average pair; a touch counts as not above
    pub fn from_prices(price: Decimal, indicator: Decimal) -> Self {
        if price > indicator {
            CrossState::Above
        } else {
            CrossState::Below
        }
    }
}

/// Direction of a reported crossover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrossDirection {
    /// Price moved from below to above the average
    Up,
    /// Price moved from above to below the average
    Down,
}

impl CrossDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrossDirection::Up => "up",
            CrossDirection::Down => "down",
        }
    }
}

impl fmt::Display for CrossDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    None,
    CrossedUp,
    CrossedDown,
}

impl Crossing {
    pub fn direction(&self) -> Option<CrossDirection> {
        match self {
            Crossing::None => None,
            Crossing::CrossedUp => Some(CrossDirection::Up),
            Crossing::CrossedDown => Some(CrossDirection::Down),
        }
    }
}

/// Previous and current bar of a freshly fetched series with their averages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossInput {
    pub previous_price: Decimal,
    pub previous_indicator: Option<Decimal>,
    pub current_price: Decimal,
    pub current_indicator: Option<Decimal>,
}

impl CrossInput {
    /// Pair the last two bars with their aligned indicator values.
    ///
    /// `None` when the series has fewer than two bars or the indicator is
    /// not aligned with it.
    pub fn from_series(series: &Series, points: &[IndicatorPoint]) -> Option<Self> {
        let bars = series.bars();
        if bars.len() < 2 || points.len() != bars.len() {
            return None;
        }
        let n = bars.len();
        Some(Self {
            previous_price: bars[n - 2].close,
            previous_indicator: points[n - 2].value,
            current_price: bars[n - 1].close,
            current_indicator: points[n - 1].value,
        })
    }
}

/// A genuine crossover, ready to be reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossEvent {
    pub symbol: Symbol,
    pub direction: CrossDirection,
    /// Close of the current bar
    pub price: Decimal,
    /// Average at the current bar
    pub indicator: Decimal,
    pub detected_at: DateTime<Utc>,
}
