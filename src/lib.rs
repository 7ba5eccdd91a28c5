//! smacross: moving-average crossover alerts for equities
//!
//! This library provides the core components for:
//! - Daily price history from Yahoo Finance
//! - Simple moving averages aligned to bars
//! - A per-symbol crossover state machine that reports each crossing once
//! - A market-hours gated polling scheduler
//! - Discord (or log) notification delivery
//! - Options flow lookups from Unusual Whales
//! - Logging and Prometheus metrics

pub mod cli;
pub mod clock;
pub mod config;
pub mod cross;
pub mod display;
pub mod flow;
pub mod http;
pub mod indicator;
pub mod monitor;
pub mod notify;
pub mod series;
pub mod telemetry;
