// src/wait/mod.rs
mod race;
mod tally;

pub use race::{DeadlineRace, WaitOutcome};
pub use tally::ReadinessTally;
