//! Per-symbol crossover memory

use super::CrossState;
use crate::series::Symbol;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Last known price/average relationship per symbol.
///
/// Lives for the process lifetime; entries are created on first observation
/// and overwritten every evaluated tick, never removed.
#[derive(Debug, Default)]
pub struct CrossStateStore {
    states: RwLock<HashMap<Symbol, CrossState>>,
}

impl CrossStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored state, `Unknown` for symbols never observed
    pub async fn get(&self, symbol: &Symbol) -> CrossState {
        let states = self.states.read().await;
        states.get(symbol).copied().unwrap_or_default()
    }

    pub async fn set(&self, symbol: &Symbol, state: CrossState) {
        let mut states = self.states.write().await;
        states.insert(symbol.clone(), state);
    }

    /// Copy of every known state
    pub async fn snapshot(&self) -> HashMap<Symbol, CrossState> {
        let states = self.states.read().await;
        states.clone()
    }

    pub async fn len(&self) -> usize {
        self.states.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.states.read().await.is_empty()
    }
}
