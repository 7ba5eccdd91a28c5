//! Check command implementation

use super::build_sink;
use crate::clock::MarketClock;
use crate::config::{Config, Secrets};
use crate::cross::CrossStateStore;
use crate::display::cents;
use crate::monitor::{Monitor, SymbolOutcome, TickReport};
use crate::notify::{LogSink, NotificationSink};
use crate::series::{Symbol, YahooClient};
use chrono::Utc;
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Symbols to check (defaults to the configured list)
    pub symbols: Vec<String>,

    /// Run even when the market is closed
    #[arg(short, long)]
    pub force: bool,

    /// Deliver alerts through the configured sink instead of only printing
    #[arg(long)]
    pub notify: bool,
}

impl CheckArgs {
    pub async fn execute(&self, config: &Config, secrets: &Secrets) -> anyhow::Result<()> {
        let symbols = if self.symbols.is_empty() {
            config.monitor.symbols.clone()
        } else {
            self.symbols
                .iter()
                .map(|s| s.parse::<Symbol>())
                .collect::<Result<Vec<_>, _>>()?
        };

        let clock = config.exchange_hours()?;
        let now = Utc::now();
        if !self.force && !clock.is_open(now) {
            println!("Market is closed; use --force to check anyway");
            return Ok(());
        }

        let sink: Arc<dyn NotificationSink> = if self.notify {
            build_sink(config, secrets)?
        } else {
            Arc::new(LogSink)
        };
        let provider = Arc::new(YahooClient::with_config(config.yahoo_config())?);

        let mut settings = config.monitor_settings();
        settings.symbols = symbols;

        let monitor = Arc::new(Monitor::new(
            settings,
            provider,
            sink,
            Arc::new(clock),
            Arc::new(CrossStateStore::new()),
        )?);

        let symbols = monitor.settings().symbols.clone();
        let report = monitor.run_pass(&symbols, now).await?;
        print!("{}", render_report(&report, config.monitor.sma_window));
        Ok(())
    }
}

/// One line per symbol
fn render_report(report: &TickReport, window: usize) -> String {
    let mut out = String::new();
    for (symbol, outcome) in &report.outcomes {
        let line = match outcome {
            SymbolOutcome::Quiet => "no crossover".to_string(),
            SymbolOutcome::Alerted(event) => format!(
                "crossed {} SMA{} (price ${:.2}, SMA ${:.2})",
                event.direction,
                window,
                cents(event.price),
                cents(event.indicator)
            ),
            SymbolOutcome::DeliveryFailed { event, error } => format!(
                "crossed {} SMA{}, delivery failed: {}",
                event.direction, window, error
            ),
            SymbolOutcome::Skipped(error) => format!("skipped: {}", error),
        };
        out.push_str(&format!("{:<6} {}\n", symbol.as_str(), line));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cross::{CrossDirection, CrossEvent};
    use crate::series::SeriesError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_render_report() {
        let spy: Symbol = "SPY".parse().unwrap();
        let qqq: Symbol = "QQQ".parse().unwrap();
        let iwm: Symbol = "IWM".parse().unwrap();
        let report = TickReport {
            started_at: Utc::now(),
            market_open: true,
            outcomes: vec![
                (
                    spy.clone(),
                    SymbolOutcome::Alerted(CrossEvent {
                        symbol: spy,
                        direction: CrossDirection::Up,
                        price: dec!(102),
                        indicator: dec!(100.456),
                        detected_at: Utc::now(),
                    }),
                ),
                (qqq, SymbolOutcome::Quiet),
                (
                    iwm.clone(),
                    SymbolOutcome::Skipped(SeriesError::InsufficientHistory {
                        symbol: iwm,
                        available: 10,
                        required: 201,
                    }),
                ),
            ],
        };

        let text = render_report(&report, 200);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("SPY"));
        assert!(lines[0].contains("$102.00"));
        assert!(lines[0].contains("$100.46"));
        assert!(lines[1].ends_with("no crossover"));
        assert!(lines[2].contains("skipped"));
    }
}
