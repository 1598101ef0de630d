// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Timing: host-agnostic timer queue primitives for UI runtimes.
//!
//! UI interactions often need a short, cancellable delay: confirming a click
//! only after a possible drag had a chance to start, debouncing hover, or
//! expiring a double-click window. This crate keeps those deadlines in a plain
//! data structure and leaves the clock to the host.
//!
//! Time is an opaque `u64` tick count supplied by the host (typically
//! milliseconds since some epoch). The queue never reads a clock itself, which
//! keeps it deterministic and easy to drive from tests or from any event loop.
//!
//! ## Usage
//!
//! 1) Schedule payloads with [`TimerQueue::schedule_at`] or [`TimerQueue::schedule_after`].
//! 2) Cancel outstanding timers with [`TimerQueue::cancel`]; the payload is handed back.
//! 3) On each host turn, drain expired timers with [`TimerQueue::pop_due`].
//! 4) Use [`TimerQueue::next_deadline`] to decide how long the host may sleep.
//!
//! ```rust
//! use understory_timing::TimerQueue;
//!
//! let mut timers = TimerQueue::new();
//! let confirm = timers.schedule_after(1_000, 0, "confirm click");
//! let expire = timers.schedule_after(1_000, 300, "expire double click");
//!
//! // A drag started before the next turn: the click is no longer wanted.
//! assert_eq!(timers.cancel(confirm), Some("confirm click"));
//!
//! assert_eq!(timers.pop_due(1_000), None);
//! assert_eq!(timers.next_deadline(), Some(1_300));
//! assert_eq!(timers.pop_due(1_300), Some((expire, "expire double click")));
//! assert!(timers.is_empty());
//! ```
//!
//! Timers with equal deadlines fire in the order they were scheduled, and a
//! zero delay still waits for the next call to [`TimerQueue::pop_due`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::collections::BinaryHeap;
use core::cmp::Reverse;
use core::fmt;

use hashbrown::HashMap;

/// Identifies one scheduled timer.
///
/// Ids are allocated monotonically per queue and never reused, so a stale id
/// (already fired or cancelled) can never alias a newer timer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Returns the raw sequence number of this timer.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

struct Entry<T> {
    deadline: u64,
    payload: T,
}

/// A deadline-ordered queue of cancellable timers carrying payloads of type `T`.
///
/// The heap may hold entries for cancelled timers; they are discarded lazily.
/// After every mutation the heap top is either live or the heap is empty, so
/// [`TimerQueue::next_deadline`] is a cheap peek.
pub struct TimerQueue<T> {
    heap: BinaryHeap<Reverse<(u64, TimerId)>>,
    live: HashMap<TimerId, Entry<T>>,
    next_id: u64,
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            live: HashMap::new(),
            next_id: 0,
        }
    }

    /// Schedules `payload` to become due at `deadline`.
    pub fn schedule_at(&mut self, deadline: u64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.heap.push(Reverse((deadline, id)));
        self.live.insert(id, Entry { deadline, payload });
        id
    }

    /// Schedules `payload` to become due `delay` ticks after `now`.
    ///
    /// The deadline saturates at `u64::MAX`.
    pub fn schedule_after(&mut self, now: u64, delay: u64, payload: T) -> TimerId {
        self.schedule_at(now.saturating_add(delay), payload)
    }

    /// Cancels a timer and returns its payload.
    ///
    /// Returns `None` when the timer already fired or was cancelled before.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let entry = self.live.remove(&id)?;
        self.prune();
        Some(entry.payload)
    }

    /// Returns `true` if the timer is still outstanding.
    #[must_use]
    pub fn contains(&self, id: TimerId) -> bool {
        self.live.contains_key(&id)
    }

    /// Returns the deadline of an outstanding timer.
    #[must_use]
    pub fn deadline(&self, id: TimerId) -> Option<u64> {
        self.live.get(&id).map(|entry| entry.deadline)
    }

    /// Number of outstanding timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Returns `true` if no timer is outstanding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Drops every outstanding timer.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.live.clear();
    }

    /// Earliest deadline among outstanding timers.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse((deadline, _))| *deadline)
    }

    /// Pops the earliest outstanding timer whose deadline is at or before `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<(TimerId, T)> {
        let Reverse((deadline, id)) = *self.heap.peek()?;
        if deadline > now {
            return None;
        }
        self.heap.pop();
        let entry = self.live.remove(&id);
        self.prune();
        // The heap top is always live after `prune`, so `entry` is present.
        entry.map(|entry| (id, entry.payload))
    }

    fn prune(&mut self) {
        while let Some(Reverse((_, id))) = self.heap.peek() {
            if self.live.contains_key(id) {
                break;
            }
            self.heap.pop();
        }
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TimerQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("len", &self.live.len())
            .field("next_deadline", &self.next_deadline())
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn drain<T>(queue: &mut TimerQueue<T>, now: u64) -> Vec<T> {
        let mut out = Vec::new();
        while let Some((_, payload)) = queue.pop_due(now) {
            out.push(payload);
        }
        out
    }

    #[test]
    fn new_queue_is_empty() {
        let queue = TimerQueue::<()>::new();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.next_deadline(), None);
    }

    #[test]
    fn pops_in_deadline_order() {
        let mut queue = TimerQueue::new();
        queue.schedule_at(30, 'c');
        queue.schedule_at(10, 'a');
        queue.schedule_at(20, 'b');

        assert_eq!(drain(&mut queue, 100), ['a', 'b', 'c']);
    }

    #[test]
    fn equal_deadlines_fire_in_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.schedule_at(5, 1);
        queue.schedule_at(5, 2);
        queue.schedule_at(5, 3);

        assert_eq!(drain(&mut queue, 5), [1, 2, 3]);
    }

    #[test]
    fn nothing_pops_before_deadline() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule_after(100, 50, ());

        assert_eq!(queue.pop_due(149), None);
        assert!(queue.contains(id));
        assert_eq!(queue.pop_due(150), Some((id, ())));
        assert!(!queue.contains(id));
    }

    #[test]
    fn zero_delay_waits_for_the_next_pop() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule_after(7, 0, "now");
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next_deadline(), Some(7));
        assert_eq!(queue.pop_due(7), Some((id, "now")));
    }

    #[test]
    fn cancel_returns_payload_once() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule_at(10, "payload");

        assert_eq!(queue.cancel(id), Some("payload"));
        assert_eq!(queue.cancel(id), None);
        assert!(queue.is_empty());
        assert_eq!(queue.pop_due(u64::MAX), None);
    }

    #[test]
    fn cancelled_head_is_skipped_by_next_deadline() {
        let mut queue = TimerQueue::new();
        let first = queue.schedule_at(10, 'a');
        queue.schedule_at(20, 'b');

        queue.cancel(first);

        assert_eq!(queue.next_deadline(), Some(20));
        assert_eq!(drain(&mut queue, 20), ['b']);
    }

    #[test]
    fn fired_timer_cannot_be_cancelled() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule_at(0, ());
        assert!(queue.pop_due(0).is_some());
        assert_eq!(queue.cancel(id), None);
    }

    #[test]
    fn ids_are_not_reused() {
        let mut queue = TimerQueue::new();
        let a = queue.schedule_at(0, ());
        queue.cancel(a);
        let b = queue.schedule_at(0, ());
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn schedule_after_saturates() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule_after(u64::MAX - 1, 10, ());
        assert_eq!(queue.deadline(id), Some(u64::MAX));
    }

    #[test]
    fn clear_drops_everything() {
        let mut queue = TimerQueue::new();
        queue.schedule_at(1, ());
        queue.schedule_at(2, ());
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.next_deadline(), None);
    }
}
