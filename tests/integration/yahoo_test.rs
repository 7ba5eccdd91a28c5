//! Integration tests for the Yahoo chart provider against a local mock server

use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;
use smacross::clock::AlwaysOpen;
use smacross::cross::{CrossDirection, CrossStateStore};
use smacross::monitor::{Monitor, MonitorSettings, SymbolOutcome};
use smacross::notify::{ChannelId, LogSink};
use smacross::series::{SeriesError, SeriesProvider, Symbol, YahooClient, YahooConfig};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> YahooClient {
    YahooClient::with_config(YahooConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
        min_request_interval: Duration::ZERO,
    })
    .unwrap()
}

/// Daily chart payload with one bar per close, starting 2024-01-02
fn chart_body(closes: &[Option<f64>]) -> serde_json::Value {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 21, 0, 0).unwrap().timestamp();
    let timestamps: Vec<i64> = (0..closes.len() as i64).map(|i| start + i * 86_400).collect();
    serde_json::json!({
        "chart": {
            "result": [{
                "meta": { "symbol": "SPY", "currency": "USD" },
                "timestamp": timestamps,
                "indicators": { "quote": [{ "close": closes }] }
            }],
            "error": null
        }
    })
}

fn spy() -> Symbol {
    "SPY".parse().unwrap()
}

#[tokio::test]
async fn test_fetch_daily_series() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/SPY"))
        .and(query_param("interval", "1d"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chart_body(&[
                Some(470.5),
                None,
                Some(472.25),
                Some(468.0),
            ])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let series = client_for(&server).fetch(&spy(), 300, "1d").await.unwrap();

    assert_eq!(series.symbol(), &spy());
    assert_eq!(series.len(), 3);
    let closes: Vec<_> = series.closes().collect();
    assert_eq!(closes, vec![dec!(470.5), dec!(472.25), dec!(468)]);
}

#[tokio::test]
async fn test_fetch_not_found_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch(&spy(), 300, "1d").await.unwrap_err();
    assert!(matches!(err, SeriesError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_fetch_garbage_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch(&spy(), 300, "1d").await.unwrap_err();
    assert!(matches!(err, SeriesError::Malformed(_)));
}

#[tokio::test]
async fn test_monitor_over_yahoo_detects_cross() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/SPY"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chart_body(&[
                Some(100.0),
                Some(98.0),
                Some(102.0),
            ])),
        )
        .mount(&server)
        .await;

    let settings = MonitorSettings {
        symbols: vec![spy()],
        channel: ChannelId::new("alerts"),
        sma_window: 2,
        lookback_days: 10,
        bar_interval: "1d".to_string(),
        tick_interval: Duration::from_secs(900),
    };
    let monitor = Arc::new(
        Monitor::new(
            settings,
            Arc::new(client_for(&server)),
            Arc::new(LogSink),
            Arc::new(AlwaysOpen),
            Arc::new(CrossStateStore::new()),
        )
        .unwrap(),
    );

    let report = monitor.tick().await.unwrap();
    match report.outcome(&spy()) {
        Some(SymbolOutcome::Alerted(event)) => {
            assert_eq!(event.direction, CrossDirection::Up);
            assert_eq!(event.price, dec!(102));
            assert_eq!(event.indicator, dec!(100));
        }
        other => panic!("expected alert, got {other:?}"),
    }
}

#[tokio::test]
async fn test_monitor_over_short_history_skips() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chart_body(&[Some(100.0), Some(101.0)])),
        )
        .mount(&server)
        .await;

    let settings = MonitorSettings {
        symbols: vec![spy()],
        channel: ChannelId::new("alerts"),
        sma_window: 200,
        lookback_days: 300,
        bar_interval: "1d".to_string(),
        tick_interval: Duration::from_secs(900),
    };
    let store = Arc::new(CrossStateStore::new());
    let monitor = Arc::new(
        Monitor::new(
            settings,
            Arc::new(client_for(&server)),
            Arc::new(LogSink),
            Arc::new(AlwaysOpen),
            Arc::clone(&store),
        )
        .unwrap(),
    );

    let report = monitor.tick().await.unwrap();
    assert_eq!(report.skipped(), 1);
    assert!(store.is_empty().await);
}
