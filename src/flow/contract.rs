//! Option contract records and OCC symbol parsing

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// One contract row from the flow API; numeric fields may arrive as strings
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OptionContract {
    pub option_symbol: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub volume: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub open_interest: Option<u64>,
    #[serde(default)]
    pub total_premium: Option<Decimal>,
    #[serde(default)]
    pub implied_volatility: Option<Decimal>,
    #[serde(default)]
    pub last_price: Option<Decimal>,
}

/// Counts arrive as integers, floats or numeric strings
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Num(Decimal),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Int(n)) => Some(n),
        Some(Raw::Num(d)) => d.trunc().to_u64(),
        Some(Raw::Text(s)) => s.trim().parse::<Decimal>().ok().and_then(|d| d.trunc().to_u64()),
    })
}

impl OptionContract {
    pub fn volume(&self) -> u64 {
        self.volume.unwrap_or(0)
    }

    pub fn open_interest(&self) -> u64 {
        self.open_interest.unwrap_or(0)
    }

    pub fn premium(&self) -> Decimal {
        self.total_premium.unwrap_or_default()
    }

    pub fn implied_volatility(&self) -> Decimal {
        self.implied_volatility.unwrap_or_default()
    }

    pub fn price(&self) -> Decimal {
        self.last_price.unwrap_or_default()
    }

    /// Volume over open interest; zero when there is no open interest
    pub fn volume_oi_ratio(&self) -> Decimal {
        match self.open_interest() {
            0 => Decimal::ZERO,
            oi => Decimal::from(self.volume()) / Decimal::from(oi),
        }
    }
}

/// Call or put
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionSide {
    Call,
    Put,
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionSide::Call => f.write_str("Call"),
            OptionSide::Put => f.write_str("Put"),
        }
    }
}

/// Fields packed into an OCC option symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOptionSymbol {
    pub root: String,
    pub expiration: NaiveDate,
    pub side: OptionSide,
    pub strike: Decimal,
}

/// Parse `ROOT YYMMDD C|P SSSSSSSS` (no spaces), strike in thousandths.
///
/// Trailing characters after the strike are ignored.
pub fn parse_option_symbol(symbol: &str) -> Option<ParsedOptionSymbol> {
    let root_len = symbol
        .bytes()
        .take_while(|b| b.is_ascii_uppercase())
        .count();
    if root_len == 0 {
        return None;
    }
    let (root, rest) = symbol.split_at(root_len);

    let date = rest.get(0..6)?;
    let side = rest.get(6..7)?;
    let strike = rest.get(7..15)?;
    if !date.bytes().all(|b| b.is_ascii_digit()) || !strike.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let side = match side {
        "C" => OptionSide::Call,
        "P" => OptionSide::Put,
        _ => return None,
    };
    let year: i32 = date[0..2].parse().ok()?;
    let month: u32 = date[2..4].parse().ok()?;
    let day: u32 = date[4..6].parse().ok()?;
    let expiration = NaiveDate::from_ymd_opt(2000 + year, month, day)?;
    let strike_raw: i64 = strike.parse().ok()?;

    Some(ParsedOptionSymbol {
        root: root.to_string(),
        expiration,
        side,
        strike: Decimal::new(strike_raw, 3),
    })
}
