//! Search box → search intent.
//!
//! Typing dispatches on the trailing edge of a quiet period, and only for
//! queries long enough to be worth running. Enter dispatches at once with
//! whatever is in the box, bypassing both the wait and the length floor.

#[cfg(test)]
#[path = "search_test.rs"]
mod search_test;

use std::rc::Rc;
use std::time::Duration;

use crate::util::debounce::Debouncer;
use crate::util::schedule::Scheduler;

pub type SearchDispatch = Rc<dyn Fn(String)>;

/// Whether a keydown commits the search. Enter that confirms an IME
/// candidate arrives with `composing` set and must not commit.
#[must_use]
pub fn is_commit_key(key: &str, composing: bool) -> bool {
    key == "Enter" && !composing
}

pub struct SearchTrigger {
    debouncer: Debouncer,
    min_chars: usize,
    dispatch: SearchDispatch,
}

impl SearchTrigger {
    pub fn new(scheduler: Rc<dyn Scheduler>, quiet: Duration, min_chars: usize, dispatch: SearchDispatch) -> Self {
        Self { debouncer: Debouncer::new(scheduler, quiet), min_chars, dispatch }
    }

    /// Handle an input event. Returns `true` if a dispatch was scheduled.
    pub fn input(&self, raw: &str) -> bool {
        self.debouncer.cancel();
        let query = raw.trim();
        if query.chars().count() < self.min_chars {
            return false;
        }
        let query = query.to_owned();
        let dispatch = Rc::clone(&self.dispatch);
        self.debouncer.call(move || dispatch(query));
        true
    }

    /// Handle the commit key: dispatch now, dropping any pending dispatch.
    pub fn commit(&self, raw: &str) {
        self.debouncer.cancel();
        (self.dispatch)(raw.trim().to_owned());
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}
