// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred tasks: the timer facility behind click confirmation.
//!
//! [`Scheduler`] is the seam to the host's event loop. [`LocalScheduler`] is a
//! single-threaded implementation over [`TimerQueue`] whose clock is advanced
//! explicitly by the host, which also makes gesture sequences fully deterministic
//! in tests:
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use understory_time_creation::scheduler::{LocalScheduler, Scheduler, TimerId};
//!
//! let scheduler = LocalScheduler::new();
//! let fired = Rc::new(Cell::new(false));
//!
//! let flag = fired.clone();
//! scheduler.schedule(0, Box::new(move |_: TimerId| flag.set(true)));
//! // Zero delay still waits for the next turn.
//! assert!(!fired.get());
//!
//! assert_eq!(scheduler.run_pending(), 1);
//! assert!(fired.get());
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;

use understory_timing::TimerQueue;

pub use understory_timing::TimerId;

/// A deferred task. It receives the id it was scheduled under.
pub type Task = Box<dyn FnOnce(TimerId)>;

/// A facility for running tasks after a delay.
///
/// Implementations must never run a task from inside [`Scheduler::schedule`], even
/// with a zero delay.
pub trait Scheduler {
    /// Current time, in ticks.
    fn now(&self) -> u64;

    /// Runs `task` once, `delay` ticks from now.
    fn schedule(&self, delay: u64, task: Task) -> TimerId;

    /// Cancels a pending task. Returns `false` if it already ran or was cancelled.
    fn cancel(&self, id: TimerId) -> bool;
}

/// Single-threaded scheduler driven by an explicit clock.
pub struct LocalScheduler {
    now: Cell<u64>,
    timers: RefCell<TimerQueue<Task>>,
}

impl LocalScheduler {
    /// Creates a scheduler whose clock starts at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Creates a scheduler whose clock starts at `now`.
    #[must_use]
    pub fn starting_at(now: u64) -> Self {
        Self {
            now: Cell::new(now),
            timers: RefCell::new(TimerQueue::new()),
        }
    }

    /// Moves the clock to `now` (never backwards) and runs every task due by then.
    ///
    /// Tasks run in deadline order with no internal borrow held, so they may schedule
    /// or cancel. A task scheduled while draining runs in the same call if it is due.
    /// Returns the number of tasks run.
    pub fn advance_to(&self, now: u64) -> usize {
        if now > self.now.get() {
            self.now.set(now);
        }
        let mut ran = 0;
        loop {
            let due = self.timers.borrow_mut().pop_due(self.now.get());
            let Some((id, task)) = due else {
                break;
            };
            task(id);
            ran += 1;
        }
        ran
    }

    /// Advances the clock by `ticks` and runs due tasks.
    pub fn advance_by(&self, ticks: u64) -> usize {
        self.advance_to(self.now.get().saturating_add(ticks))
    }

    /// Runs the tasks already due without moving the clock: the host's next turn.
    pub fn run_pending(&self) -> usize {
        self.advance_to(self.now.get())
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Deadline of the earliest pending task.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.borrow().next_deadline()
    }
}

impl Scheduler for LocalScheduler {
    fn now(&self) -> u64 {
        self.now.get()
    }

    fn schedule(&self, delay: u64, task: Task) -> TimerId {
        self.timers
            .borrow_mut()
            .schedule_after(self.now.get(), delay, task)
    }

    fn cancel(&self, id: TimerId) -> bool {
        self.timers.borrow_mut().cancel(id).is_some()
    }
}

impl Default for LocalScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LocalScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalScheduler")
            .field("now", &self.now.get())
            .field("timers", &self.timers.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    fn recording(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> Task {
        let log = log.clone();
        Box::new(move |_: TimerId| log.borrow_mut().push(name))
    }

    #[test]
    fn tasks_wait_for_their_deadline() {
        let scheduler = LocalScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        scheduler.schedule(10, recording(&log, "late"));
        scheduler.schedule(0, recording(&log, "soon"));

        assert_eq!(scheduler.advance_by(5), 1);
        assert_eq!(*log.borrow(), ["soon"]);
        assert_eq!(scheduler.next_deadline(), Some(10));
        assert_eq!(scheduler.advance_to(10), 1);
        assert_eq!(*log.borrow(), ["soon", "late"]);
    }

    #[test]
    fn cancelled_tasks_never_run() {
        let scheduler = LocalScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let id = scheduler.schedule(0, recording(&log, "cancelled"));

        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert_eq!(scheduler.run_pending(), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn task_receives_its_own_id() {
        let scheduler = LocalScheduler::new();
        let seen = Rc::new(Cell::new(None));
        let s = seen.clone();
        let id = scheduler.schedule(3, Box::new(move |id: TimerId| s.set(Some(id))));

        scheduler.advance_by(3);
        assert_eq!(seen.get(), Some(id));
    }

    #[test]
    fn tasks_may_schedule_and_cancel_while_draining() {
        let scheduler = Rc::new(LocalScheduler::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        let victim = scheduler.schedule(1, recording(&log, "victim"));
        let s = Rc::downgrade(&scheduler);
        let l = log.clone();
        scheduler.schedule(
            0,
            Box::new(move |_: TimerId| {
                let Some(s) = s.upgrade() else { return };
                s.cancel(victim);
                s.schedule(0, recording(&l, "follow-up"));
            }),
        );

        assert_eq!(scheduler.advance_by(1), 2);
        assert_eq!(*log.borrow(), ["follow-up"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn clock_never_moves_backwards() {
        let scheduler = LocalScheduler::starting_at(100);
        scheduler.advance_to(50);
        assert_eq!(scheduler.now(), 100);
    }
}
