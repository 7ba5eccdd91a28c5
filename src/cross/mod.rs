//! Crossover detection module
//!
//! Classifies price-vs-average transitions per symbol and remembers which
//! side of the average each symbol was last seen on, so a crossing that has
//! already been reported is not reported again on the next poll.

mod detector;
mod store;
mod types;

pub use detector::{evaluate, CrossDetector, Evaluation, Observation};
pub use store::CrossStateStore;
pub use types::{CrossDirection, CrossEvent, CrossInput, CrossState, Crossing};
