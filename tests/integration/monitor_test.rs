//! Integration tests for the crossover monitor

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use smacross::clock::{ExchangeHours, MarketClock};
use smacross::cross::{CrossDirection, CrossState, CrossStateStore};
use smacross::monitor::{Monitor, MonitorSettings, SymbolOutcome};
use smacross::notify::{ChannelId, NotificationSink, NotifyError};
use smacross::series::{Bar, Series, SeriesError, SeriesProvider, Symbol};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Serves whatever closes the test last set for each symbol
#[derive(Default)]
struct ScriptedProvider {
    closes: Mutex<HashMap<Symbol, Vec<Decimal>>>,
}

impl ScriptedProvider {
    fn set(&self, symbol: &str, closes: Vec<Decimal>) {
        self.closes.lock().unwrap().insert(sym(symbol), closes);
    }
}

#[async_trait]
impl SeriesProvider for ScriptedProvider {
    async fn fetch(
        &self,
        symbol: &Symbol,
        _lookback_days: u32,
        _interval: &str,
    ) -> Result<Series, SeriesError> {
        let closes = self.closes.lock().unwrap().get(symbol).cloned();
        let Some(closes) = closes else {
            return Err(SeriesError::Status {
                status: 503,
                body: "upstream unavailable".to_string(),
            });
        };
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 21, 0, 0).unwrap();
        let bars = closes
            .into_iter()
            .enumerate()
            .map(|(i, close)| Bar::new(start + Duration::days(i as i64), close))
            .collect();
        Series::new(symbol.clone(), bars)
    }
}

#[derive(Default)]
struct CollectingSink {
    messages: Mutex<Vec<String>>,
}

impl CollectingSink {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for CollectingSink {
    async fn send(&self, _channel: &ChannelId, text: &str) -> Result<(), NotifyError> {
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

fn sym(s: &str) -> Symbol {
    s.parse().unwrap()
}

/// Wednesday 2024-06-12, 11:00 EDT
fn session_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 12, 15, 0, 0).unwrap()
}

fn build(
    symbols: &[&str],
    window: usize,
    provider: Arc<ScriptedProvider>,
    sink: Arc<CollectingSink>,
    store: Arc<CrossStateStore>,
) -> Arc<Monitor> {
    let settings = MonitorSettings {
        symbols: symbols.iter().map(|s| sym(s)).collect(),
        channel: ChannelId::new("alerts"),
        sma_window: window,
        lookback_days: 300,
        bar_interval: "1d".to_string(),
        tick_interval: std::time::Duration::from_secs(900),
    };
    Arc::new(
        Monitor::new(
            settings,
            provider,
            sink,
            Arc::new(ExchangeHours::us_equities()),
            store,
        )
        .unwrap(),
    )
}

#[tokio::test]
async fn test_cross_up_alerts_once_then_stays_quiet() {
    let provider = Arc::new(ScriptedProvider::default());
    let sink = Arc::new(CollectingSink::default());
    let store = Arc::new(CrossStateStore::new());
    // SMA2: previous 99 (close 98), current 100 (close 102)
    provider.set("SPY", vec![dec!(100), dec!(98), dec!(102)]);

    let monitor = build(&["SPY"], 2, provider, Arc::clone(&sink), Arc::clone(&store));

    let first = monitor.tick_at(session_time()).await.unwrap();
    let event = first.alerts().next().expect("crossing expected");
    assert_eq!(event.direction, CrossDirection::Up);
    assert_eq!(store.get(&sym("SPY")).await, CrossState::Above);

    let second = monitor.tick_at(session_time()).await.unwrap();
    assert_eq!(second.alerts().count(), 0);
    assert!(matches!(second.outcome(&sym("SPY")), Some(SymbolOutcome::Quiet)));

    assert_eq!(
        sink.messages(),
        vec!["📈 **SPY just crossed above its 2-day SMA!**\nPrice: $102.00 | SMA2: $100.00"]
    );
}

#[tokio::test]
async fn test_trend_reversal_across_ticks() {
    let provider = Arc::new(ScriptedProvider::default());
    let sink = Arc::new(CollectingSink::default());
    let monitor = build(
        &["QQQ"],
        3,
        Arc::clone(&provider),
        Arc::clone(&sink),
        Arc::new(CrossStateStore::new()),
    );

    // Previous bar touches its average, current bar sits above: no alert
    provider.set("QQQ", vec![dec!(100), dec!(100), dec!(100), dec!(101)]);
    let report = monitor.tick_at(session_time()).await.unwrap();
    assert_eq!(report.alerts().count(), 0);
    assert_eq!(monitor.store().get(&sym("QQQ")).await, CrossState::Above);

    // New bar breaks below the average
    provider.set("QQQ", vec![dec!(100), dec!(100), dec!(100), dec!(101), dec!(95)]);
    let report = monitor.tick_at(session_time()).await.unwrap();
    let event = report.alerts().next().expect("down-cross expected");
    assert_eq!(event.direction, CrossDirection::Down);
    assert_eq!(monitor.store().get(&sym("QQQ")).await, CrossState::Below);

    assert_eq!(
        sink.messages(),
        vec!["📉 **QQQ just crossed below its 3-day SMA!**\nPrice: $95.00 | SMA3: $98.67"]
    );
}

#[tokio::test]
async fn test_weekend_tick_does_nothing() {
    let provider = Arc::new(ScriptedProvider::default());
    let sink = Arc::new(CollectingSink::default());
    provider.set("SPY", vec![dec!(100), dec!(98), dec!(102)]);
    let monitor = build(
        &["SPY"],
        2,
        provider,
        Arc::clone(&sink),
        Arc::new(CrossStateStore::new()),
    );

    // Saturday 2024-06-15, midday in New York
    let saturday = Utc.with_ymd_and_hms(2024, 6, 15, 16, 0, 0).unwrap();
    assert!(!ExchangeHours::us_equities().is_open(saturday));

    let report = monitor.tick_at(saturday).await.unwrap();
    assert!(!report.market_open);
    assert!(report.outcomes.is_empty());
    assert!(sink.messages().is_empty());
    assert!(monitor.store().is_empty().await);
}

#[tokio::test]
async fn test_failing_symbol_does_not_block_others() {
    let provider = Arc::new(ScriptedProvider::default());
    let sink = Arc::new(CollectingSink::default());
    let store = Arc::new(CrossStateStore::new());
    provider.set("GOOD", vec![dec!(100), dec!(98), dec!(102)]);

    let monitor = build(
        &["BAD", "GOOD"],
        2,
        provider,
        Arc::clone(&sink),
        Arc::clone(&store),
    );
    let report = monitor.tick_at(session_time()).await.unwrap();

    assert!(matches!(
        report.outcome(&sym("BAD")),
        Some(SymbolOutcome::Skipped(SeriesError::Status { status: 503, .. }))
    ));
    assert!(matches!(
        report.outcome(&sym("GOOD")),
        Some(SymbolOutcome::Alerted(_))
    ));
    assert_eq!(store.get(&sym("BAD")).await, CrossState::Unknown);
    assert_eq!(store.len().await, 1);
    assert_eq!(sink.messages().len(), 1);
}

#[tokio::test]
async fn test_warm_up_is_skipped_silently() {
    let provider = Arc::new(ScriptedProvider::default());
    let sink = Arc::new(CollectingSink::default());
    provider.set("IWM", vec![dec!(1), dec!(2), dec!(3)]);

    let monitor = build(
        &["IWM"],
        200,
        provider,
        Arc::clone(&sink),
        Arc::new(CrossStateStore::new()),
    );
    let report = monitor.tick_at(session_time()).await.unwrap();

    match report.outcome(&sym("IWM")) {
        Some(SymbolOutcome::Skipped(e)) => assert!(e.is_insufficient_history()),
        other => panic!("expected insufficient history, got {other:?}"),
    }
    assert!(sink.messages().is_empty());
    assert!(monitor.store().is_empty().await);
}

#[tokio::test]
async fn test_monitors_share_nothing_unless_store_is_shared() {
    let provider = Arc::new(ScriptedProvider::default());
    provider.set("SPY", vec![dec!(100), dec!(98), dec!(102)]);

    let sink_a = Arc::new(CollectingSink::default());
    let sink_b = Arc::new(CollectingSink::default());
    let a = build(
        &["SPY"],
        2,
        Arc::clone(&provider),
        Arc::clone(&sink_a),
        Arc::new(CrossStateStore::new()),
    );
    let b = build(
        &["SPY"],
        2,
        provider,
        Arc::clone(&sink_b),
        Arc::new(CrossStateStore::new()),
    );

    tokio_test::assert_ok!(a.tick_at(session_time()).await);
    tokio_test::assert_ok!(b.tick_at(session_time()).await);

    assert_eq!(sink_a.messages().len(), 1);
    assert_eq!(sink_b.messages().len(), 1);
}
