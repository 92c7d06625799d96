//! Pointer drag tracking
//!
//! Collects pointer samples between press and release and turns them into
//! a `DragRelease`. Velocity is measured over a trailing window so a slow
//! drag ending in a quick flick still registers as a flick.

use super::classifier::DragRelease;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug)]
struct Sample {
    x: f32,
    y: f32,
    at: Instant,
}

/// In-flight drag state
#[derive(Clone, Debug)]
pub struct DragTracker {
    samples: Vec<Sample>,
    window: Duration,
}

impl DragTracker {
    pub fn new(window: Duration) -> Self {
        DragTracker {
            samples: Vec::with_capacity(32),
            window,
        }
    }

    /// Whether a press has been seen and not yet released
    pub fn is_active(&self) -> bool {
        !self.samples.is_empty()
    }

    /// Start a new drag, discarding any unfinished one
    pub fn press(&mut self, x: f32, y: f32, at: Instant) {
        self.samples.clear();
        self.samples.push(Sample { x, y, at });
    }

    /// Record pointer motion; ignored without a press
    pub fn motion(&mut self, x: f32, y: f32, at: Instant) {
        if self.is_active() {
            self.samples.push(Sample { x, y, at });
        }
    }

    /// Finish the drag; `None` if no press was recorded
    pub fn release(&mut self, x: f32, y: f32, at: Instant) -> Option<DragRelease> {
        let start = *self.samples.first()?;
        self.samples.push(Sample { x, y, at });

        // Oldest sample still inside the trailing window
        let anchor = self
            .samples
            .iter()
            .find(|s| at.saturating_duration_since(s.at) <= self.window)
            .copied()
            .unwrap_or(start);

        let elapsed = at.saturating_duration_since(anchor.at).as_secs_f32();
        let (velocity_x, velocity_y) = if elapsed > 0.0 {
            ((x - anchor.x) / elapsed, (y - anchor.y) / elapsed)
        } else {
            (0.0, 0.0)
        };

        self.samples.clear();

        Some(DragRelease::new(
            x - start.x,
            y - start.y,
            velocity_x,
            velocity_y,
        ))
    }

    /// Drop an unfinished drag
    pub fn cancel(&mut self) {
        self.samples.clear();
    }
}
