//! Alert scheduling module
//!
//! Periodically samples every configured symbol while the market is open,
//! runs the crossover check, and dispatches a notification per crossing.
//! One symbol's failure never stops the others.

mod handle;
mod scheduler;
mod types;

pub use handle::MonitorHandle;
pub use scheduler::Monitor;
pub use types::{MonitorError, MonitorSettings, SymbolOutcome, TickReport};
