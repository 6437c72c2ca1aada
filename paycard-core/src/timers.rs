//! Cooperative timer queue.
//!
//! The queue never reads the clock. Its owner asks for
//! [`TimerQueue::next_deadline`], waits however it likes (a tokio sleep, or
//! nothing at all under a virtual clock in tests), then drains due entries
//! with [`TimerQueue::pop_due`] using its own notion of "now".
//!
//! A session only ever has a handful of pending timers (one countdown tick
//! and at most one copy-feedback expiry), so entries live in a `Vec` and are
//! searched linearly.

use crate::copy_feedback::CopyField;
use time::OffsetDateTime;

/// Handle of a scheduled timer, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// Deferred work of a payment session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTimer {
    /// Recompute the countdown.
    CountdownTick,
    /// Hide the "copied" indicator of a field.
    CopyFeedbackExpired(CopyField),
}

#[derive(Debug)]
struct Entry<E> {
    id: TimerId,
    at: OffsetDateTime,
    event: E,
}

/// Pending timers ordered by due time, then by scheduling order.
#[derive(Debug)]
pub struct TimerQueue<E> {
    entries: Vec<Entry<E>>,
    next_id: u64,
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedule `event` to become due at `at`.
    pub fn schedule_at(&mut self, at: OffsetDateTime, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, at, event });
        id
    }

    /// Cancel a pending timer. Returns `false` if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(pos) => {
                self.entries.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    /// Cancel every pending timer and return how many there were.
    pub fn clear(&mut self) -> usize {
        let cancelled = self.entries.len();
        self.entries.clear();
        cancelled
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Earliest due time among pending timers.
    pub fn next_deadline(&self) -> Option<OffsetDateTime> {
        self.entries.iter().map(|e| e.at).min()
    }

    /// Remove and return the earliest timer that is due at `now`.
    pub fn pop_due(&mut self, now: OffsetDateTime) -> Option<(TimerId, E)> {
        let pos = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.at <= now)
            .min_by_key(|(_, e)| (e.at, e.id))
            .map(|(pos, _)| pos)?;
        let entry = self.entries.swap_remove(pos);
        Some((entry.id, entry.event))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}
