//! Periodic crossover monitor

use super::{MonitorError, MonitorHandle, MonitorSettings, SymbolOutcome, TickReport};
use crate::clock::MarketClock;
use crate::cross::{CrossDetector, CrossInput, CrossStateStore, Observation};
use crate::indicator;
use crate::notify::{alert_message, NotificationSink};
use crate::series::{SeriesError, SeriesProvider, Symbol};
use crate::telemetry::{self, CounterMetric, SkipKind};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior};

/// Polls symbols on a fixed interval and reports crossovers.
///
/// Ticks are serialized: a tick (scheduled or ad-hoc) holds the tick lock
/// for its whole duration, so no symbol is ever evaluated twice at once.
/// Within a tick, symbols are processed concurrently.
pub struct Monitor {
    settings: MonitorSettings,
    provider: Arc<dyn SeriesProvider>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn MarketClock>,
    detector: CrossDetector,
    tick_lock: Mutex<()>,
}

impl Monitor {
    /// Create a monitor over an injected state store
    pub fn new(
        settings: MonitorSettings,
        provider: Arc<dyn SeriesProvider>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn MarketClock>,
        store: Arc<CrossStateStore>,
    ) -> Result<Self, MonitorError> {
        Ok(Self {
            settings: settings.validated()?,
            provider,
            sink,
            clock,
            detector: CrossDetector::new(store),
            tick_lock: Mutex::new(()),
        })
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<CrossStateStore> {
        self.detector.store()
    }

    /// Run one scheduled tick at the current time
    pub async fn tick(self: &Arc<Self>) -> Result<TickReport, MonitorError> {
        self.tick_at(Utc::now()).await
    }

    /// Run one scheduled tick as of `now`; does nothing while the market is closed
    pub async fn tick_at(self: &Arc<Self>, now: DateTime<Utc>) -> Result<TickReport, MonitorError> {
        if !self.clock.is_open(now) {
            tracing::debug!(%now, "Market closed, skipping tick");
            telemetry::increment(CounterMetric::TicksMarketClosed);
            return Ok(TickReport::closed(now));
        }
        self.run_pass(&self.settings.symbols, now).await
    }

    /// Evaluate `symbols` once, ignoring market hours
    pub async fn run_pass(
        self: &Arc<Self>,
        symbols: &[Symbol],
        now: DateTime<Utc>,
    ) -> Result<TickReport, MonitorError> {
        let _guard = self.tick_lock.lock().await;
        let started = Instant::now();
        telemetry::increment(CounterMetric::TicksRun);
        tracing::info!(symbols = symbols.len(), "Running crossover check");

        let mut tasks = JoinSet::new();
        for (index, symbol) in symbols.iter().enumerate() {
            let monitor = Arc::clone(self);
            let symbol = symbol.clone();
            tasks.spawn(async move {
                let outcome = monitor.process_symbol(&symbol, now).await;
                (index, symbol, outcome)
            });
        }

        let mut outcomes = Vec::with_capacity(symbols.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => outcomes.push(result),
                Err(e) => {
                    tracing::error!(error = %e, "Symbol task failed");
                    return Err(MonitorError::Fatal(format!("symbol task failed: {}", e)));
                }
            }
        }
        outcomes.sort_by_key(|(index, _, _)| *index);

        let report = TickReport {
            started_at: now,
            market_open: true,
            outcomes: outcomes
                .into_iter()
                .map(|(_, symbol, outcome)| (symbol, outcome))
                .collect(),
        };

        telemetry::record_tick_duration(started.elapsed());
        tracing::info!(
            alerts = report.alerts().count(),
            skipped = report.skipped(),
            "Crossover check complete"
        );
        Ok(report)
    }

    /// Fetch, compute, detect and notify for one symbol
    async fn process_symbol(&self, symbol: &Symbol, now: DateTime<Utc>) -> SymbolOutcome {
        let series = match self
            .provider
            .fetch(symbol, self.settings.lookback_days, &self.settings.bar_interval)
            .await
            .and_then(|series| {
                series.require(self.settings.required_bars())?;
                Ok(series)
            }) {
            Ok(series) => series,
            Err(e) => return Self::skip(symbol, e),
        };

        let points = indicator::sma(&series, self.settings.sma_window);
        let Some(input) = CrossInput::from_series(&series, &points) else {
            return Self::skip(
                symbol,
                SeriesError::Malformed("indicator not aligned with series".to_string()),
            );
        };

        let event = match self.detector.observe(symbol, &input, now).await {
            Observation::Crossed(event) => event,
            Observation::Quiet => return SymbolOutcome::Quiet,
            Observation::InsufficientHistory => {
                return Self::skip(
                    symbol,
                    SeriesError::InsufficientHistory {
                        symbol: symbol.clone(),
                        available: series.len(),
                        required: self.settings.required_bars(),
                    },
                )
            }
        };

        let text = alert_message(&event, self.settings.sma_window, &self.settings.bar_interval);
        match self.sink.send(&self.settings.channel, &text).await {
            Ok(()) => {
                tracing::info!(
                    symbol = %symbol,
                    direction = %event.direction,
                    price = %event.price,
                    sma = %event.indicator,
                    "Crossover alert sent"
                );
                telemetry::record_alert(event.direction);
                SymbolOutcome::Alerted(event)
            }
            Err(error) => {
                tracing::error!(
                    symbol = %symbol,
                    direction = %event.direction,
                    error = %error,
                    "Failed to deliver crossover alert"
                );
                telemetry::increment(CounterMetric::DeliveryFailures);
                SymbolOutcome::DeliveryFailed { event, error }
            }
        }
    }

    fn skip(symbol: &Symbol, error: SeriesError) -> SymbolOutcome {
        if error.is_insufficient_history() {
            tracing::debug!(symbol = %symbol, reason = %error, "Not enough history yet");
            telemetry::record_skip(SkipKind::InsufficientHistory);
        } else {
            tracing::warn!(symbol = %symbol, error = %error, "Skipping symbol this tick");
            telemetry::record_skip(SkipKind::Fetch);
        }
        SymbolOutcome::Skipped(error)
    }

    /// Tick until `shutdown` flips to true or its sender is dropped.
    ///
    /// The first tick runs immediately. A tick in progress always completes.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) -> Result<(), MonitorError> {
        let mut interval = tokio::time::interval(self.settings.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            symbols = ?self.settings.symbols,
            channel = %self.settings.channel,
            interval_secs = self.settings.tick_interval.as_secs(),
            sma_window = self.settings.sma_window,
            "Crossover monitor started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = interval.tick() => {
                    if let Err(e) = self.tick().await {
                        tracing::error!(error = %e, "Crossover monitor stopped");
                        return Err(e);
                    }
                }
            }
        }

        tracing::info!("Crossover monitor stopped");
        Ok(())
    }

    /// Run the loop on a background task
    pub fn spawn(self: Arc<Self>) -> MonitorHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));
        MonitorHandle::new(shutdown_tx, task)
    }
}
