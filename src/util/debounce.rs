//! Trailing-edge debounce built on [`Scheduler`].
//!
//! Each `call` cancels whatever is still pending and schedules the new task
//! after the quiet period, so only the last call in a burst runs.

#[cfg(test)]
#[path = "debounce_test.rs"]
mod debounce_test;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::schedule::{Scheduler, TaskHandle};

pub struct Debouncer {
    scheduler: Rc<dyn Scheduler>,
    wait: Duration,
    pending: Rc<RefCell<Option<TaskHandle>>>,
}

impl Debouncer {
    pub fn new(scheduler: Rc<dyn Scheduler>, wait: Duration) -> Self {
        Self { scheduler, wait, pending: Rc::new(RefCell::new(None)) }
    }

    /// Replace any pending task with `task`, due after the quiet period.
    pub fn call(&self, task: impl FnOnce() + 'static) {
        self.cancel();
        let slot = Rc::downgrade(&self.pending);
        let handle = self.scheduler.schedule(
            self.wait,
            Box::new(move || {
                if let Some(slot) = slot.upgrade() {
                    let fired = slot.borrow_mut().take();
                    drop(fired);
                }
                task();
            }),
        );
        *self.pending.borrow_mut() = Some(handle);
    }

    /// Cancel the pending task. Returns `true` if one was still waiting.
    pub fn cancel(&self) -> bool {
        let previous = self.pending.borrow_mut().take();
        match previous {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }

    #[must_use]
    pub fn wait(&self) -> Duration {
        self.wait
    }
}
