//! Cancellable scheduled tasks on the page event loop.
//!
//! DESIGN
//! ======
//! Components never touch `setTimeout` directly. They receive a `Scheduler`
//! and hold the returned `TaskHandle`, so cancel-and-replace (search) and
//! fire-once expiry (notifications) go through one seam that tests drive with
//! `ManualScheduler` instead of a browser clock.
//!
//! Dropping a `TaskHandle` detaches the task: it still fires. Only an explicit
//! `cancel()` stops it, and only if it has not fired yet.

#[cfg(test)]
#[path = "schedule_test.rs"]
mod schedule_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Source of time and deferred execution for UI components.
pub trait Scheduler {
    /// Milliseconds on this scheduler's clock.
    fn now_ms(&self) -> u64;

    /// Run `task` once after `delay`.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskHandle;
}

/// Backend hook behind a [`TaskHandle`].
pub trait PendingTask {
    /// Stop the task from firing if it has not fired yet.
    fn cancel(self: Box<Self>);
    /// The handle is going away; let the task run.
    fn release(self: Box<Self>);
}

/// Handle to a scheduled task.
#[must_use = "dropping a TaskHandle detaches the task; call cancel() to stop it"]
pub struct TaskHandle {
    pending: Option<Box<dyn PendingTask>>,
}

impl TaskHandle {
    pub fn new(pending: impl PendingTask + 'static) -> Self {
        Self { pending: Some(Box::new(pending)) }
    }

    /// Cancel the task. No effect if it already fired.
    pub fn cancel(mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
    }

    /// Let the task run without keeping the handle around.
    pub fn detach(self) {
        drop(self);
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.release();
        }
    }
}

impl std::fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("armed", &self.pending.is_some())
            .finish()
    }
}

pub(crate) fn duration_ms(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

// =============================================================
// Virtual clock
// =============================================================

/// Deterministic scheduler driven by explicit `advance` calls.
///
/// Tasks due at the same instant run in scheduling order. A task may schedule
/// or cancel other tasks while it runs.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<VirtualClock>>,
}

#[derive(Default)]
struct VirtualClock {
    now_ms: u64,
    next_seq: u64,
    queue: Vec<QueuedTask>,
}

struct QueuedTask {
    seq: u64,
    due_ms: u64,
    task: Box<dyn FnOnce()>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks that have neither fired nor been cancelled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.clock.borrow().queue.len()
    }

    /// Move the clock forward by `ms`, firing every task that falls due.
    pub fn advance_ms(&self, ms: u64) {
        let target = self.clock.borrow().now_ms.saturating_add(ms);
        loop {
            let next = {
                let mut clock = self.clock.borrow_mut();
                let due = clock
                    .queue
                    .iter()
                    .enumerate()
                    .filter(|(_, queued)| queued.due_ms <= target)
                    .min_by_key(|(_, queued)| (queued.due_ms, queued.seq))
                    .map(|(index, _)| index);
                match due {
                    Some(index) => {
                        let queued = clock.queue.remove(index);
                        clock.now_ms = queued.due_ms;
                        Some(queued.task)
                    }
                    None => {
                        clock.now_ms = target;
                        None
                    }
                }
            };
            // Run outside the borrow so the task can reschedule.
            match next {
                Some(task) => task(),
                None => break,
            }
        }
    }

    pub fn advance(&self, delay: Duration) {
        self.advance_ms(duration_ms(delay));
    }
}

impl Scheduler for ManualScheduler {
    fn now_ms(&self) -> u64 {
        self.clock.borrow().now_ms
    }

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskHandle {
        let mut clock = self.clock.borrow_mut();
        let seq = clock.next_seq;
        clock.next_seq += 1;
        let due_ms = clock.now_ms.saturating_add(duration_ms(delay));
        clock.queue.push(QueuedTask { seq, due_ms, task });
        TaskHandle::new(ManualPending { clock: Rc::downgrade(&self.clock), seq })
    }
}

struct ManualPending {
    clock: Weak<RefCell<VirtualClock>>,
    seq: u64,
}

impl PendingTask for ManualPending {
    fn cancel(self: Box<Self>) {
        let Some(clock) = self.clock.upgrade() else {
            return;
        };
        let removed = {
            let mut clock = clock.borrow_mut();
            clock
                .queue
                .iter()
                .position(|queued| queued.seq == self.seq)
                .map(|index| clock.queue.remove(index))
        };
        drop(removed);
    }

    fn release(self: Box<Self>) {}
}

// =============================================================
// Browser clock
// =============================================================

/// Scheduler backed by `setTimeout` through `gloo-timers`.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserScheduler;

#[cfg(feature = "hydrate")]
impl Scheduler for BrowserScheduler {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn now_ms(&self) -> u64 {
        js_sys::Date::now().max(0.0) as u64
    }

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskHandle {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        TaskHandle::new(BrowserPending(gloo_timers::callback::Timeout::new(millis, task)))
    }
}

#[cfg(feature = "hydrate")]
struct BrowserPending(gloo_timers::callback::Timeout);

#[cfg(feature = "hydrate")]
impl PendingTask for BrowserPending {
    fn cancel(self: Box<Self>) {
        drop(self.0.cancel());
    }

    fn release(self: Box<Self>) {
        // Keeps the JS callback alive; dropping the Timeout would clear it.
        // The closure is leaked even after it fires: one per detached task,
        // bounded by user actions (keystroke bursts, notifications).
        drop(self.0.forget());
    }
}
