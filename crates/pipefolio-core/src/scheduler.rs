//! Timer scheduling with cancel tokens
//!
//! Components never sleep or spawn. They ask a [`Scheduler`] for a timer and
//! keep the returned [`TimerId`]; when the owner of the scheduler sees that id
//! fire, it hands it back to the component. Cancelling a timer guarantees the
//! id is never delivered.
//!
//! [`TimerQueue`] keeps its own timeline as a [`Duration`] since an arbitrary
//! origin. The event loop feeds it elapsed wall-clock time; tests feed it
//! whatever instants they want to observe.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

/// Handle for a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// Something that can arm and disarm one-shot timers
pub trait Scheduler {
    /// Arm a one-shot timer that fires `delay` after the current instant
    fn schedule(&mut self, delay: Duration) -> TimerId;

    /// Disarm a timer. Cancelling a fired or unknown id is a no-op.
    fn cancel(&mut self, id: TimerId);
}

/// Deadline-ordered timer queue on a caller-driven timeline
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    queue: BTreeSet<(Duration, TimerId)>,
    deadlines: HashMap<TimerId, Duration>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current instant on the queue's timeline
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Earliest pending deadline, if any timer is armed
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.first().map(|(deadline, _)| *deadline)
    }

    /// Time left until the next deadline, measured from `now`
    pub fn time_until_next(&self, now: Duration) -> Option<Duration> {
        self.next_deadline()
            .map(|deadline| deadline.saturating_sub(now))
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pop the earliest timer due at or before `now`.
    ///
    /// While draining, the queue's clock sits on the deadline that fired, so a
    /// timer re-armed from inside the dispatch is measured from its
    /// predecessor's deadline rather than from `now`. Once nothing is due the
    /// clock moves to `now`. The timeline never runs backwards.
    pub fn pop_expired(&mut self, now: Duration) -> Option<TimerId> {
        let Some(&(deadline, id)) = self.queue.first() else {
            self.now = self.now.max(now);
            return None;
        };
        if deadline > now {
            self.now = self.now.max(now);
            return None;
        }
        self.queue.pop_first();
        self.deadlines.remove(&id);
        self.now = self.now.max(deadline);
        Some(id)
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.queue.clear();
        self.deadlines.clear();
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let deadline = self.now + delay;
        self.queue.insert((deadline, id));
        self.deadlines.insert(id, deadline);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(deadline) = self.deadlines.remove(&id) {
            self.queue.remove(&(deadline, id));
        }
    }
}
