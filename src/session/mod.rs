//! Session Management: deck traversal, scoring, persistence and pacing
//!
//! # Components
//! - `state.rs`: SessionMachine, the single writer of session progress
//! - `store.rs`: ProgressStore trait with memory and file implementations
//! - `tier.rs`: Ratio-based final score tiers
//! - `pacing.rs`: Cancelable verdict reveal timers keyed by session epoch

pub mod pacing;
pub mod state;
pub mod store;
pub mod tier;

pub use pacing::{PacingConfig, RevealPacer, TimerHandle, TimerQueue};
pub use state::{Phase, SessionMachine, SessionSnapshot, Summary, Transition, Verdict};
pub use store::{FileStore, MemoryStore, ProgressStore, StoreError, PROGRESS_KEY};
pub use tier::{Tier, TierTable, TierTableError};
