//! Card views composed from a session snapshot
//!
//! The shell renders whatever `compose` returns, bottom card first.

use crate::catalog::{Case, Decision};
use crate::session::{Phase, ProgressStore, SessionMachine, Summary, Tier, TierTable, Verdict};

/// One renderable card
#[derive(Clone, Copy, Debug)]
pub enum CardView<'a> {
    /// Top card with the scenario text; `chosen` is set while the verdict is pending
    Front {
        case: &'a Case,
        position: usize,
        total: usize,
        score: usize,
        chosen: Option<Decision>,
    },
    /// Blank card peeking out behind the top one
    BackPeek,
    /// Explanation overlay
    Verdict(Verdict<'a>),
    /// End-of-deck result
    Summary {
        summary: Summary,
        tier: Option<&'a Tier>,
    },
}

/// Cards to draw for the current session state
pub fn compose<'a, S: ProgressStore>(
    machine: &'a SessionMachine<S>,
    tiers: &'a TierTable,
    verdict_revealed: bool,
) -> Vec<CardView<'a>> {
    let snap = machine.snapshot();

    if snap.phase == Phase::Complete {
        return machine
            .summary()
            .map(|summary| CardView::Summary {
                summary,
                tier: summary.tier(tiers),
            })
            .into_iter()
            .collect();
    }

    if verdict_revealed {
        if let Some(verdict) = machine.verdict() {
            return vec![CardView::Verdict(verdict)];
        }
    }

    let mut views = Vec::with_capacity(2);
    if machine.next_case().is_some() {
        views.push(CardView::BackPeek);
    }
    if let Some(case) = machine.current_case() {
        views.push(CardView::Front {
            case,
            position: snap.position,
            total: snap.total,
            score: snap.score,
            chosen: snap.pending,
        });
    }
    views
}
