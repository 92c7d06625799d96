//! Session state machine
//!
//! Maintains:
//! - Current position in the catalog and the running score
//! - The decision pending for the current card (verdict shown)
//! - An epoch counter bumped on every applied transition
//!
//! States are derived: `Complete` when every card has been advanced past,
//! `Verdict` while a decision is pending, `Active` otherwise. Out-of-state
//! calls are ignored, never errors. Progress is written through the
//! injected `ProgressStore` after every applied transition.

use super::store::{ProgressStore, PROGRESS_KEY};
use super::tier::{Tier, TierTable};
use crate::catalog::{Case, Catalog, Decision};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Where the session is in the deck
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Awaiting a decision for the card at `position`
    Active,
    /// Decision made, explanation shown, awaiting advance
    Verdict,
    /// Every card has been answered
    Complete,
}

/// Result of a transition request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Applied,
    /// Requested out of state; nothing changed
    Ignored,
}

/// Read-only view of the session for rendering
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub position: usize,
    pub score: usize,
    pub total: usize,
    pub phase: Phase,
    pub verdict_visible: bool,
    pub pending: Option<Decision>,
}

/// Decision outcome for the card under the verdict overlay
#[derive(Clone, Copy, Debug)]
pub struct Verdict<'a> {
    pub case: &'a Case,
    pub decision: Decision,
    pub correct: bool,
}

/// Final result once the deck is done
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub score: usize,
    pub total: usize,
    /// Every answer correct on a non-empty deck
    pub perfect: bool,
}

impl Summary {
    pub fn tier<'t>(&self, table: &'t TierTable) -> Option<&'t Tier> {
        table.classify(self.score, self.total)
    }
}

/// On-disk shape of the progress entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct PersistedProgress {
    position: usize,
    score: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pending: Option<Decision>,
}

/// Owns the traversal of one catalog
pub struct SessionMachine<S: ProgressStore> {
    catalog: Catalog,
    store: S,
    position: usize,
    score: usize,
    pending: Option<Decision>,
    epoch: u64,
}

impl<S: ProgressStore> SessionMachine<S> {
    /// Create a session, resuming persisted progress when it is valid
    pub fn new(catalog: Catalog, mut store: S) -> Self {
        let restored = Self::rehydrate(&catalog, &mut store);

        let (position, score, pending) = match restored {
            Some(p) => (p.position, p.score, p.pending),
            None => (0, 0, None),
        };

        SessionMachine {
            catalog,
            store,
            position,
            score,
            pending,
            epoch: 0,
        }
    }

    fn rehydrate(catalog: &Catalog, store: &mut S) -> Option<PersistedProgress> {
        let bytes = match store.get(PROGRESS_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "could not read saved progress; starting fresh");
                return None;
            }
        };

        let saved: PersistedProgress = match serde_json::from_slice(&bytes) {
            Ok(saved) => saved,
            Err(e) => {
                warn!(error = %e, "saved progress is malformed; starting fresh");
                return None;
            }
        };

        if saved.position >= catalog.len() {
            info!(
                position = saved.position,
                total = catalog.len(),
                "discarding finished session"
            );
            if let Err(e) = store.remove(PROGRESS_KEY) {
                warn!(error = %e, "could not clear finished session");
            }
            return None;
        }

        // A correct pending decision has already been scored for the current card
        let pending_point = saved.pending.is_some_and(|decision| {
            catalog
                .get(saved.position)
                .is_some_and(|case| case.is_correct(decision))
        });
        let max_score = saved.position + usize::from(pending_point);
        if saved.score > max_score {
            warn!(
                position = saved.position,
                score = saved.score,
                "saved score out of range; starting fresh"
            );
            return None;
        }

        info!(
            position = saved.position,
            score = saved.score,
            "resuming saved session"
        );
        Some(saved)
    }

    fn persist(&mut self) {
        let progress = PersistedProgress {
            position: self.position,
            score: self.score,
            pending: self.pending,
        };

        let result = serde_json::to_vec(&progress)
            .map_err(|e| e.to_string())
            .and_then(|bytes| {
                self.store
                    .set(PROGRESS_KEY, &bytes)
                    .map_err(|e| e.to_string())
            });

        if let Err(e) = result {
            warn!(error = %e, "could not save progress");
        }
    }

    fn clear_persisted(&mut self) {
        if let Err(e) = self.store.remove(PROGRESS_KEY) {
            warn!(error = %e, "could not clear saved progress");
        }
    }

    pub fn phase(&self) -> Phase {
        if self.position >= self.catalog.len() {
            Phase::Complete
        } else if self.pending.is_some() {
            Phase::Verdict
        } else {
            Phase::Active
        }
    }

    /// Record a decision for the current card (Active only)
    pub fn submit_decision(&mut self, decision: Decision) -> Transition {
        if self.phase() != Phase::Active {
            debug!(?decision, phase = ?self.phase(), "ignoring decision");
            return Transition::Ignored;
        }

        let correct = match self.catalog.get(self.position) {
            Some(case) => case.is_correct(decision),
            None => return Transition::Ignored,
        };

        self.pending = Some(decision);
        if correct {
            self.score += 1;
        }
        self.epoch += 1;

        debug!(
            position = self.position,
            ?decision,
            correct,
            score = self.score,
            "decision recorded"
        );
        self.persist();
        Transition::Applied
    }

    /// Move past the verdict to the next card (Verdict only)
    pub fn advance(&mut self) -> Transition {
        if self.phase() != Phase::Verdict {
            debug!(phase = ?self.phase(), "ignoring advance");
            return Transition::Ignored;
        }

        self.position += 1;
        self.pending = None;
        self.epoch += 1;

        if self.phase() == Phase::Complete {
            info!(
                score = self.score,
                total = self.catalog.len(),
                "session complete"
            );
        }
        self.persist();
        Transition::Applied
    }

    /// Start over after finishing (Complete only)
    pub fn restart(&mut self) -> Transition {
        if self.phase() != Phase::Complete {
            debug!(phase = ?self.phase(), "ignoring restart");
            return Transition::Ignored;
        }

        self.reset_progress();
        Transition::Applied
    }

    /// Drop all progress regardless of phase
    pub fn reset_progress(&mut self) {
        self.position = 0;
        self.score = 0;
        self.pending = None;
        self.epoch += 1;
        self.clear_persisted();
        info!("session reset");
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            position: self.position,
            score: self.score,
            total: self.catalog.len(),
            phase: self.phase(),
            verdict_visible: self.pending.is_some(),
            pending: self.pending,
        }
    }

    /// Card on top of the deck
    pub fn current_case(&self) -> Option<&Case> {
        self.catalog.get(self.position)
    }

    /// Card peeking out behind the current one
    pub fn next_case(&self) -> Option<&Case> {
        self.catalog.get(self.position + 1)
    }

    pub fn verdict(&self) -> Option<Verdict<'_>> {
        let decision = self.pending?;
        let case = self.current_case()?;
        Some(Verdict {
            case,
            decision,
            correct: case.is_correct(decision),
        })
    }

    pub fn summary(&self) -> Option<Summary> {
        if self.phase() != Phase::Complete {
            return None;
        }

        let total = self.catalog.len();
        Some(Summary {
            score: self.score,
            total,
            perfect: total > 0 && self.score == total,
        })
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.catalog.len()
    }

    /// Bumped on every applied transition
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
