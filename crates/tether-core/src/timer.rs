#![forbid(unsafe_code)]

//! Cancelable deferred tasks keyed by caller-chosen keys.
//!
//! The queue never reads a clock itself. Callers schedule tasks at an
//! absolute [`Instant`] and later hand the current time to
//! [`TimerQueue::drain_due`], which makes behaviour deterministic under test.
//!
//! # Invariants
//!
//! - Due tasks are returned ordered by due time, then by scheduling order.
//! - A canceled task is never returned.
//! - Scheduling under a key that already has pending tasks keeps both;
//!   use [`TimerQueue::reschedule`] to replace.

use web_time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Scheduled<K, T> {
    key: K,
    due: Instant,
    seq: u64,
    task: T,
}

/// Pending tasks ordered by due time.
#[derive(Debug, Clone)]
pub struct TimerQueue<K, T> {
    entries: Vec<Scheduled<K, T>>,
    next_seq: u64,
}

impl<K, T> Default for TimerQueue<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T> TimerQueue<K, T> {
    /// Create an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Schedule `task` to run at `due`.
    pub fn schedule(&mut self, key: K, due: Instant, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Scheduled {
            key,
            due,
            seq,
            task,
        });
    }

    /// Schedule `task` to run `delay` after `now`.
    pub fn schedule_after(&mut self, key: K, now: Instant, delay: Duration, task: T) {
        self.schedule(key, now + delay, task);
    }

    /// Cancel every pending task matching `predicate`; returns how many.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&K, &T) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !predicate(&e.key, &e.task));
        before - self.entries.len()
    }

    /// Earliest due time, if anything is pending.
    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.due).min()
    }

    /// Remove and return every task due at or before `now`.
    pub fn drain_due(&mut self, now: Instant) -> Vec<(K, T)> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].due <= now {
                due.push(self.entries.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.due.cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|e| (e.key, e.task)).collect()
    }
}

impl<K: PartialEq, T> TimerQueue<K, T> {
    /// Cancel every task scheduled under `key`; returns how many.
    pub fn cancel(&mut self, key: &K) -> usize {
        self.cancel_where(|k, _| k == key)
    }

    /// Whether a task is pending under `key`.
    #[must_use]
    pub fn is_pending(&self, key: &K) -> bool {
        self.entries.iter().any(|e| &e.key == key)
    }

    /// Replace any pending tasks under `key` with a new one.
    pub fn reschedule(&mut self, key: K, due: Instant, task: T) {
        let canceled = self.cancel(&key);
        if canceled > 0 {
            tracing::trace!(canceled, "timer rescheduled");
        }
        self.schedule(key, due, task);
    }
}
