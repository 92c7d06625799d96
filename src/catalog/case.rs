//! Case records and the player's binary decision

use serde::{Deserialize, Serialize};

/// One scenario the player has to classify
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    /// Stable identifier, unique within a catalog
    pub id: String,
    /// Short heading shown above the prompt
    #[serde(default)]
    pub title: String,
    /// Scenario text shown before a decision
    pub prompt: String,
    /// Ground truth: true => it happened
    pub was_real: bool,
    /// One-line verdict revealed after a decision
    pub verdict_summary: String,
    /// How the situation was handled
    pub handling_note: String,
    /// How the institution protected itself (absent for cases that never happened)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protection_note: Option<String>,
}

impl Case {
    /// Whether `decision` matches this case's ground truth
    pub fn is_correct(&self, decision: Decision) -> bool {
        decision.is_forward() == self.was_real
    }
}

/// Player's classification of the current case
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// "It happened" (swipe right / up, Right arrow)
    Forward,
    /// "It did not happen" (swipe left / down, Left arrow)
    Backward,
}

impl Decision {
    pub fn is_forward(self) -> bool {
        matches!(self, Decision::Forward)
    }

    /// Label shown on the card edge for this side
    pub fn label(self) -> &'static str {
        match self {
            Decision::Forward => "Happened",
            Decision::Backward => "Did not happen",
        }
    }
}
