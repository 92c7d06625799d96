//! Verdict reveal pacing
//!
//! The verdict overlay is painted a short moment after a decision. The delay
//! is a scheduled callback carrying the session epoch it was scheduled for;
//! callbacks for an older epoch are dropped when they fire, and every
//! superseding transition cancels the pending one outright.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Default delay between a decision and the verdict overlay
pub const DEFAULT_REVEAL_DELAY_MS: u64 = 200;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub reveal_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        PacingConfig {
            reveal_delay_ms: DEFAULT_REVEAL_DELAY_MS,
        }
    }
}

impl PacingConfig {
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }
}

/// Cancel handle returned by `TimerQueue::schedule`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Entry<T> {
    id: u64,
    deadline: Instant,
    payload: T,
}

/// Poll-driven queue of delayed payloads
#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        TimerQueue {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to become due `delay` after `now`
    pub fn schedule(&mut self, payload: T, delay: Duration, now: Instant) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            deadline: now + delay,
            payload,
        });
        TimerHandle(id)
    }

    /// Cancel a scheduled payload; false if it already fired or was cancelled
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != handle.0);
        self.entries.len() != before
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// Remove and return the earliest payload due at `now`
    pub fn pop_due(&mut self, now: Instant) -> Option<T> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| (e.deadline, e.id))
            .map(|(idx, _)| idx)?;
        Some(self.entries.remove(idx).payload)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tracks whether the verdict for the current epoch may be painted
#[derive(Debug)]
pub struct RevealPacer {
    delay: Duration,
    queue: TimerQueue<u64>,
    pending: Option<TimerHandle>,
    revealed: Option<u64>,
}

impl RevealPacer {
    pub fn new(delay: Duration) -> Self {
        RevealPacer {
            delay,
            queue: TimerQueue::new(),
            pending: None,
            revealed: None,
        }
    }

    /// Schedule the reveal for `epoch`, replacing any pending one
    pub fn schedule_reveal(&mut self, epoch: u64, now: Instant) {
        self.supersede();
        if self.delay.is_zero() {
            self.revealed = Some(epoch);
        } else {
            self.pending = Some(self.queue.schedule(epoch, self.delay, now));
        }
    }

    /// Cancel pending work and hide any revealed verdict
    pub fn supersede(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.queue.cancel(handle);
        }
        self.revealed = None;
    }

    /// Fire due callbacks; true when the verdict for `current_epoch` just became visible
    pub fn tick(&mut self, now: Instant, current_epoch: u64) -> bool {
        let mut newly_revealed = false;

        while let Some(epoch) = self.queue.pop_due(now) {
            self.pending = None;
            if epoch == current_epoch {
                self.revealed = Some(epoch);
                newly_revealed = true;
            } else {
                tracing::debug!(epoch, current_epoch, "dropping stale verdict reveal");
            }
        }

        newly_revealed
    }

    pub fn is_revealed(&self, epoch: u64) -> bool {
        self.revealed == Some(epoch)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.next_deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_queue_orders_by_deadline() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new();
        queue.schedule("late", ms(300), t0);
        queue.schedule("early", ms(100), t0);

        assert_eq!(queue.next_deadline(), Some(t0 + ms(100)));
        assert_eq!(queue.pop_due(t0 + ms(50)), None);
        assert_eq!(queue.pop_due(t0 + ms(500)), Some("early"));
        assert_eq!(queue.pop_due(t0 + ms(500)), Some("late"));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new();
        let handle = queue.schedule(1, ms(10), t0);

        assert!(queue.cancel(handle));
        assert!(!queue.cancel(handle));
        assert_eq!(queue.pop_due(t0 + ms(20)), None);
    }

    #[test]
    fn test_reveal_after_delay() {
        let t0 = Instant::now();
        let mut pacer = RevealPacer::new(ms(200));
        pacer.schedule_reveal(1, t0);

        assert!(!pacer.tick(t0 + ms(100), 1));
        assert!(!pacer.is_revealed(1));
        assert!(pacer.tick(t0 + ms(200), 1));
        assert!(pacer.is_revealed(1));
        assert_eq!(pacer.next_deadline(), None);
    }

    #[test]
    fn test_superseded_reveal_is_cancelled() {
        let t0 = Instant::now();
        let mut pacer = RevealPacer::new(ms(200));
        pacer.schedule_reveal(1, t0);
        pacer.supersede();

        assert!(!pacer.tick(t0 + ms(300), 2));
        assert!(!pacer.is_revealed(1));
        assert!(!pacer.is_revealed(2));
    }

    #[test]
    fn test_stale_epoch_is_dropped() {
        let t0 = Instant::now();
        let mut pacer = RevealPacer::new(ms(200));
        pacer.schedule_reveal(1, t0);

        // Session moved on without telling the pacer
        assert!(!pacer.tick(t0 + ms(300), 2));
        assert!(!pacer.is_revealed(2));
        assert!(!pacer.is_revealed(1));
    }

    #[test]
    fn test_zero_delay_reveals_immediately() {
        let mut pacer = RevealPacer::new(Duration::ZERO);
        pacer.schedule_reveal(4, Instant::now());
        assert!(pacer.is_revealed(4));
    }
}
