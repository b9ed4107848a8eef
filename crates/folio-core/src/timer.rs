#![forbid(unsafe_code)]

//! Deterministic timer queue.
//!
//! Replaces host `setTimeout` calls with explicitly scheduled tasks on a
//! virtual clock. The host (or a test) advances time; every task whose
//! deadline has passed is popped in deadline order, ties broken by
//! scheduling order.
//!
//! # Example
//!
//! ```
//! use core::time::Duration;
//! use folio_core::timer::TimerQueue;
//!
//! let mut timers = TimerQueue::new();
//! timers.schedule(Duration::from_millis(500), "late");
//! let early = timers.schedule(Duration::from_millis(100), "early");
//! assert!(timers.cancel(early));
//!
//! assert!(timers.pop_due(Duration::from_millis(400)).is_none());
//! let (_, task) = timers.pop_due(Duration::from_millis(500)).unwrap();
//! assert_eq!(task, "late");
//! ```

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Handle returned by [`TimerQueue::schedule`], usable for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw sequence number (monotonic per queue).
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Ordered set of pending tasks keyed by absolute deadline.
#[derive(Debug)]
pub struct TimerQueue<T> {
    pending: BTreeMap<(Duration, TimerId), T>,
    deadlines: HashMap<TimerId, Duration>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
            deadlines: HashMap::new(),
            next_id: 0,
        }
    }

    /// Schedule `task` to fire at the absolute time `deadline`.
    pub fn schedule(&mut self, deadline: Duration, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert((deadline, id), task);
        self.deadlines.insert(id, deadline);
        id
    }

    /// Cancel a pending task. Returns `false` if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(deadline) => self.pending.remove(&(deadline, id)).is_some(),
            None => false,
        }
    }

    /// Whether `id` is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// Earliest pending deadline, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Pop the earliest task whose deadline is `<= now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerId, T)> {
        let (deadline, id) = *self.pending.keys().next()?;
        if deadline > now {
            return None;
        }
        self.deadlines.remove(&id);
        self.pending.remove(&(deadline, id)).map(|task| (id, task))
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.deadlines.clear();
    }
}
