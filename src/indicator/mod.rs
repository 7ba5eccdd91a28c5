//! Indicator computation
//!
//! Simple moving average aligned one-to-one with the input bars, so the
//! crossover check can pair each bar's close with that bar's average.

use crate::series::Series;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Indicator value at one bar; `None` while the window is still filling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorPoint {
    pub timestamp: DateTime<Utc>,
    pub value: Option<Decimal>,
}

/// Simple moving average over the closes of `series`
pub fn sma(series: &Series, window: usize) -> Vec<IndicatorPoint> {
    let closes: Vec<Decimal> = series.closes().collect();
    series
        .bars()
        .iter()
        .zip(rolling_mean(&closes, window))
        .map(|(bar, value)| IndicatorPoint {
            timestamp: bar.timestamp,
            value,
        })
        .collect()
}

/// Trailing mean of `window` values ending at each position.
///
/// Positions with fewer than `window` values (inclusive) are `None`, as is
/// every position when `window` is zero.
pub fn rolling_mean(values: &[Decimal], window: usize) -> Vec<Option<Decimal>> {
    let mut out = Vec::with_capacity(values.len());
    if window == 0 {
        out.resize(values.len(), None);
        return out;
    }

    let divisor = Decimal::from(window);
    let mut sum = Decimal::ZERO;
    for (i, value) in values.iter().enumerate() {
        sum += *value;
        if i >= window {
            sum -= values[i - window];
        }
        if i + 1 >= window {
            out.push(Some(sum / divisor));
        } else {
            out.push(None);
        }
    }
    out
}
