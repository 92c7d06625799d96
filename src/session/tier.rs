//! Final score tiers
//!
//! A tier table is a list of score thresholds written for a reference deck
//! size (`out_of`), highest first. A final score is compared by ratio, so the
//! same table works for decks of other sizes: the first tier with
//! `score / total >= min_score / out_of` wins.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TierTableError {
    #[error("tier table has no tiers")]
    Empty,

    #[error("tier table reference size must be positive")]
    ZeroBase,

    #[error("tier {label:?} (min {min_score}) is not below the previous tier")]
    NotDescending { label: String, min_score: usize },

    #[error("lowest tier must start at 0, found {0}")]
    NoFloor(usize),

    #[error("tier threshold {min_score} exceeds reference size {out_of}")]
    AboveBase { min_score: usize, out_of: usize },
}

/// One outcome bracket
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    /// Minimum score, relative to `TierTable::out_of`
    pub min_score: usize,
    /// Short bracket name, e.g. "6–7"
    pub label: String,
    /// Message shown on the summary screen
    pub message: String,
}

impl Tier {
    pub fn new(min_score: usize, label: &str, message: &str) -> Self {
        Tier {
            min_score,
            label: label.to_string(),
            message: message.to_string(),
        }
    }
}

/// Ordered tiers, highest threshold first
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    /// Deck size the thresholds were written for
    pub out_of: usize,
    pub tiers: Vec<Tier>,
}

impl Default for TierTable {
    fn default() -> Self {
        TierTable {
            out_of: 9,
            tiers: vec![
                Tier::new(8, "8–9", "Outstanding! You can tell real incidents from fiction."),
                Tier::new(6, "6–7", "Good instincts. A few cases fooled you."),
                Tier::new(4, "4–5", "Halfway there. Review the explanations and try again."),
                Tier::new(0, "0–3", "Plenty to learn. Give it another go."),
            ],
        }
    }
}

impl TierTable {
    /// Check ordering and bounds
    pub fn validate(&self) -> Result<(), TierTableError> {
        if self.out_of == 0 {
            return Err(TierTableError::ZeroBase);
        }

        let last = self.tiers.last().ok_or(TierTableError::Empty)?;
        if last.min_score != 0 {
            return Err(TierTableError::NoFloor(last.min_score));
        }

        for tier in &self.tiers {
            if tier.min_score > self.out_of {
                return Err(TierTableError::AboveBase {
                    min_score: tier.min_score,
                    out_of: self.out_of,
                });
            }
        }

        for pair in self.tiers.windows(2) {
            if pair[1].min_score >= pair[0].min_score {
                return Err(TierTableError::NotDescending {
                    label: pair[1].label.clone(),
                    min_score: pair[1].min_score,
                });
            }
        }

        Ok(())
    }

    /// Tier for `score` out of `total`; an empty deck gets the lowest tier
    pub fn classify(&self, score: usize, total: usize) -> Option<&Tier> {
        if total == 0 {
            return self.tiers.last();
        }

        let score = score.min(total) as u64;
        let total = total as u64;
        let out_of = self.out_of as u64;

        self.tiers
            .iter()
            .find(|tier| score * out_of >= tier.min_score as u64 * total)
    }
}
