//! Crossover state machine

use super::{CrossEvent, CrossInput, CrossState, CrossStateStore, Crossing};
use crate::series::Symbol;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Result of evaluating one tick against the stored state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub crossing: Crossing,
    /// State to store for the next tick
    pub next_state: CrossState,
}

/// Classify one tick.
///
/// Returns `None` when either average is absent; the stored state must then
/// be left untouched. For a symbol never seen before, the previous bar stands
/// in for the stored state. Once a state is stored it takes precedence over
/// the previous bar, which is what keeps a re-poll of the same two bars from
/// reporting the same crossing twice.
pub fn evaluate(stored: CrossState, input: &CrossInput) -> Option<Evaluation> {
    let previous_indicator = input.previous_indicator?;
    let current_indicator = input.current_indicator?;

    let was_above = match stored {
        CrossState::Unknown => input.previous_price > previous_indicator,
        CrossState::Above => true,
        CrossState::Below => false,
    };

    let was_below_before = input.previous_price < previous_indicator;
    let was_above_before = input.previous_price > previous_indicator;
    let is_above_now = input.current_price > current_indicator;
    let is_below_now = input.current_price < current_indicator;

    let crossing = if was_below_before && is_above_now && !was_above {
        Crossing::CrossedUp
    } else if was_above_before && is_below_now && was_above {
        Crossing::CrossedDown
    } else {
        Crossing::None
    };

    Some(Evaluation {
        crossing,
        next_state: CrossState::from_prices(input.current_price, current_indicator),
    })
}

/// Outcome of observing one symbol's latest bars
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// An average was missing; state untouched
    InsufficientHistory,
    /// State updated, nothing to report
    Quiet,
    /// State updated, crossover to report
    Crossed(CrossEvent),
}

/// Applies [`evaluate`] against a shared [`CrossStateStore`].
///
/// Callers must not observe the same symbol concurrently; the read and the
/// write of a symbol's state are separate steps.
#[derive(Debug, Clone)]
pub struct CrossDetector {
    store: Arc<CrossStateStore>,
}

impl CrossDetector {
    pub fn new(store: Arc<CrossStateStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<CrossStateStore> {
        &self.store
    }

    /// Evaluate `input` for `symbol`, store the new state, report any crossing
    pub async fn observe(
        &self,
        symbol: &Symbol,
        input: &CrossInput,
        now: DateTime<Utc>,
    ) -> Observation {
        let stored = self.store.get(symbol).await;
        let Some(eval) = evaluate(stored, input) else {
            return Observation::InsufficientHistory;
        };

        self.store.set(symbol, eval.next_state).await;

        tracing::debug!(
            symbol = %symbol,
            stored = ?stored,
            next = ?eval.next_state,
            crossing = ?eval.crossing,
            "Evaluated crossover"
        );

        match (eval.crossing.direction(), input.current_indicator) {
            (Some(direction), Some(indicator)) => Observation::Crossed(CrossEvent {
                symbol: symbol.clone(),
                direction,
                price: input.current_price,
                indicator,
                detected_at: now,
            }),
            _ => Observation::Quiet,
        }
    }
}
