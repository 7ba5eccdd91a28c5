//! End-to-end integration tests

use chrono::NaiveDate;
use smacross::config::{Config, SinkKind};
use smacross::flow::{render_flow, select_contracts, FlowClient, FlowQuery};
use smacross::notify::{ChannelId, DiscordSink, NotificationSink};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_config_example_loads() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    config.validate().unwrap();

    assert_eq!(config.monitor.sma_window, 200);
    assert_eq!(config.monitor.tick_interval_seconds, 900);
    assert_eq!(config.notify.sink, SinkKind::Discord);

    let settings = config.monitor_settings();
    assert_eq!(settings.symbols.len(), 2);
    assert_eq!(settings.tick_interval, Duration::from_secs(900));
}

#[tokio::test]
async fn test_flow_lookup_posted_to_discord() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/stock/TSLA/option-contracts"))
        .and(header("Authorization", "Bearer uw-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                {
                    "option_symbol": "TSLA250620C00250000",
                    "volume": 5400,
                    "open_interest": 1800,
                    "total_premium": "2250000.40",
                    "implied_volatility": "0.62",
                    "last_price": "18.35"
                },
                {
                    "option_symbol": "TSLA250117P00200000",
                    "volume": 90000,
                    "open_interest": 100,
                    "total_premium": "9999999",
                    "implied_volatility": "0.90",
                    "last_price": "0.01"
                },
                {
                    "option_symbol": "TSLA250620P00230000",
                    "volume": "3100",
                    "open_interest": "0",
                    "total_premium": 410000,
                    "implied_volatility": 0.55,
                    "last_price": 7.4
                }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/channels/777/messages"))
        .and(header("Authorization", "Bot discord-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "1" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.flow.base_url = server.uri();
    config.notify.api_base = server.uri();
    config.provider.min_request_interval_ms = 0;

    let query = FlowQuery::parse("tsla", "limit=5 sort=premium").unwrap();
    let client = FlowClient::new(config.flow_config("uw-test")).unwrap();
    let contracts = client.fetch_contracts(&query.ticker).await.unwrap();
    assert_eq!(contracts.len(), 3);

    let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    let selected = select_contracts(contracts, &query, today);
    // The January put has expired
    assert_eq!(selected.len(), 2);

    let text = render_flow(&query, &selected);
    assert!(text.starts_with("**Top Option Contracts for TSLA**"));
    let call = text.find("__TSLA 250.00 Call 06/20/2025__").unwrap();
    let put = text.find("__TSLA 230.00 Put 06/20/2025__").unwrap();
    assert!(call < put);
    assert!(text.contains("**Premium:** $2,250,000"));
    assert!(text.contains("**Volume:** 5,400"));
    assert!(!text.contains("250117"));

    let sink = DiscordSink::new(config.discord_config("discord-test")).unwrap();
    sink.send(&ChannelId::new("777"), &text).await.unwrap();
}
