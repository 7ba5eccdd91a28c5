//! Alert message formatting

use crate::cross::{CrossDirection, CrossEvent};
use crate::display::cents;

/// Word used for one bar of `interval` in "200-day SMA"
pub fn period_word(interval: &str) -> &'static str {
    match interval {
        "1d" => "day",
        "1wk" => "week",
        "1mo" => "month",
        "1h" | "60m" => "hour",
        "1m" => "minute",
        _ => "bar",
    }
}

/// Chat text for a crossover
pub fn alert_message(event: &CrossEvent, window: usize, interval: &str) -> String {
    let (glyph, side) = match event.direction {
        CrossDirection::Up => ("📈", "above"),
        CrossDirection::Down => ("📉", "below"),
    };
    format!(
        "{glyph} **{symbol} just crossed {side} its {window}-{period} SMA!**\n\
         Price: ${price:.2} | SMA{window}: ${indicator:.2}",
        symbol = event.symbol.as_str().to_uppercase(),
        period = period_word(interval),
        price = cents(event.price),
        indicator = cents(event.indicator),
    )
}
