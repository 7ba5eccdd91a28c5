//! Trading session gate
//!
//! Decides whether the monitored market is open at a given instant. The
//! default [`ExchangeHours`] knows weekends and a fixed daily session in the
//! exchange's own timezone. It does not know exchange holidays.

use chrono::{DateTime, Datelike, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;

/// Calendar deciding whether the market is in session
pub trait MarketClock: Send + Sync {
    /// Whether the market is open at `now`
    fn is_open(&self, now: DateTime<Utc>) -> bool;
}

/// Weekday session between fixed local open and close times (both inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeHours {
    tz: Tz,
    open: NaiveTime,
    close: NaiveTime,
}

impl ExchangeHours {
    pub fn new(tz: Tz, open: NaiveTime, close: NaiveTime) -> Self {
        Self { tz, open, close }
    }

    /// NYSE / Nasdaq regular session, 09:30-16:00 America/New_York
    pub fn us_equities() -> Self {
        Self {
            tz: chrono_tz::America::New_York,
            open: NaiveTime::from_hms_opt(9, 30, 0).unwrap_or_default(),
            close: NaiveTime::from_hms_opt(16, 0, 0).unwrap_or_default(),
        }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }
}

impl Default for ExchangeHours {
    fn default() -> Self {
        Self::us_equities()
    }
}

impl MarketClock for ExchangeHours {
    fn is_open(&self, now: DateTime<Utc>) -> bool {
        let local = now.with_timezone(&self.tz);
        if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        let time = local.time();
        self.open <= time && time <= self.close
    }
}

/// Clock for round-the-clock markets; also handy for forcing a pass
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOpen;

impl MarketClock for AlwaysOpen {
    fn is_open(&self, _now: DateTime<Utc>) -> bool {
        true
    }
}
