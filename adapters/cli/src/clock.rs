//! Timer queue that hands session tokens back in due order.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    time::Duration,
};

use labyrinth_core::{Timer, TimerToken};

#[derive(Debug)]
struct Scheduled {
    due: Duration,
    sequence: u64,
    token: TimerToken,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.sequence).cmp(&(other.due, other.sequence))
    }
}

/// Pending tokens ordered by due time, ties broken by scheduling order.
///
/// The queue keeps its own notion of "now". Interactive hosts move it forward
/// with the wall clock; headless runs jump straight to the next due token.
#[derive(Debug, Default)]
pub(crate) struct TimerQueue {
    now: Duration,
    sequence: u64,
    pending: BinaryHeap<Reverse<Scheduled>>,
}

impl TimerQueue {
    /// Due time of the earliest pending token.
    pub(crate) fn next_due(&self) -> Option<Duration> {
        self.pending.peek().map(|Reverse(scheduled)| scheduled.due)
    }

    /// Moves the clock to `now` without firing anything. Time never runs
    /// backwards.
    pub(crate) fn advance_to(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Removes the earliest token that is due at the current time.
    pub(crate) fn pop_due(&mut self) -> Option<TimerToken> {
        if self.next_due()? > self.now {
            return None;
        }
        self.pending.pop().map(|Reverse(scheduled)| scheduled.token)
    }

    /// Jumps the clock to the earliest pending token and removes it.
    pub(crate) fn pop_next(&mut self) -> Option<TimerToken> {
        let Reverse(scheduled) = self.pending.pop()?;
        self.now = self.now.max(scheduled.due);
        Some(scheduled.token)
    }
}

impl Timer for TimerQueue {
    fn now(&self) -> Duration {
        self.now
    }

    fn after(&mut self, delay: Duration, token: TimerToken) {
        self.pending.push(Reverse(Scheduled {
            due: self.now + delay,
            sequence: self.sequence,
            token,
        }));
        self.sequence += 1;
    }
}
