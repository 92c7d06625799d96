//! Case Swipe Trainer - classify scenarios as "happened" / "did not happen"
//!
//! A deck of cases is shown one at a time in the terminal. Each card is
//! swiped (mouse drag) or keyed left/right, a verdict with an explanation is
//! revealed, and the final score is bracketed into a tier. Progress survives
//! restarts through a pluggable byte store.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod gesture;
pub mod session;
