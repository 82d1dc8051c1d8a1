#![forbid(unsafe_code)]

//! Host-driven timers with generation tokens.
//!
//! The core never sleeps. Scheduled continuations are stored in a
//! [`TimerQueue`] keyed by a deadline measured from page load; the host arms a
//! single platform timer for [`TimerQueue::next_deadline`] and hands the
//! current time back to [`TimerQueue::pop_due`].
//!
//! Cancellation is by invalidation: a component hands out a [`TaskToken`]
//! from its [`Generation`] whenever it (re)starts a sequence, and drops any
//! timer whose token is no longer current when it fires.
//!
//! # Invariants
//!
//! 1. `pop_due(now)` returns entries ordered by deadline, ties broken by
//!    scheduling order.
//! 2. Entries with `deadline > now` are never returned.
//! 3. A token is current until the next `bump`; tokens are never reused.

use std::time::Duration;

/// Identifies the sequence a scheduled timer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TaskToken(u64);

impl TaskToken {
    /// Raw generation value, for logging.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Monotonic generation counter. Bumping it invalidates every earlier token.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    current: u64,
}

impl Generation {
    #[must_use]
    pub const fn new() -> Self {
        Self { current: 0 }
    }

    /// Start a new sequence, invalidating all outstanding tokens.
    pub fn bump(&mut self) -> TaskToken {
        self.current = self.current.wrapping_add(1);
        TaskToken(self.current)
    }

    /// Token of the sequence currently in flight.
    #[must_use]
    pub const fn current(&self) -> TaskToken {
        TaskToken(self.current)
    }

    #[must_use]
    pub const fn is_current(&self, token: TaskToken) -> bool {
        self.current == token.0
    }
}

#[derive(Debug, Clone)]
struct Entry<T> {
    deadline: Duration,
    seq: u64,
    payload: T,
}

/// Deadline-ordered queue of pending continuations.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    entries: Vec<Entry<T>>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    /// Schedule `payload` to become due at `deadline`.
    pub fn schedule(&mut self, deadline: Duration, payload: T) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.entries.push(Entry {
            deadline,
            seq,
            payload,
        });
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// Remove and return every entry due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| e.deadline <= now);
        self.entries = pending;
        due.sort_by_key(|e| (e.deadline, e.seq));
        due.into_iter().map(|e| e.payload).collect()
    }

    /// Drop every pending entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn bump_invalidates_previous_tokens() {
        let mut generation = Generation::new();
        let first = generation.bump();
        assert!(generation.is_current(first));
        let second = generation.bump();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
        assert_eq!(generation.current(), second);
    }

    #[test]
    fn pop_due_orders_by_deadline_then_insertion() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(30), "c");
        queue.schedule(ms(10), "a");
        queue.schedule(ms(10), "b");
        queue.schedule(ms(50), "late");
        assert_eq!(queue.next_deadline(), Some(ms(10)));
        assert_eq!(queue.pop_due(ms(30)), vec!["a", "b", "c"]);
        assert_eq!(queue.next_deadline(), Some(ms(50)));
    }

    #[test]
    fn nothing_due_before_deadline() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(5), 1);
        assert!(queue.pop_due(ms(4)).is_empty());
        assert_eq!(queue.pop_due(ms(5)), vec![1]);
        assert_eq!(queue.next_deadline(), None);
    }

    #[test]
    fn clear_drops_everything() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(1), ());
        queue.schedule(ms(2), ());
        queue.clear();
        assert!(queue.pop_due(ms(100)).is_empty());
    }
}
