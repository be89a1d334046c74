//! Flash message center: transient notifications with manual dismiss and
//! automatic expiry.
//!
//! DESIGN
//! ======
//! Every message arms its own expiry task on creation. Timers are never
//! cancelled: a user dismissal and a later expiry both funnel into `dismiss`,
//! which removes a message at most once. The second caller finds nothing and
//! returns `false` without touching the sink.
//!
//! Rendering goes through [`FlashSink`]. In the browser that appends and
//! removes `.flash-message` elements; tests record the calls instead.

#[cfg(test)]
#[path = "flash_test.rs"]
mod flash_test;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::schedule::Scheduler;

/// Visual severity of a flash message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Neutral notice; also the fallback for unknown categories.
    #[default]
    Info,
    /// A completed action.
    Success,
    Warning,
    /// A failure. The server's `error` category maps here.
    Danger,
}

impl Severity {
    /// Parse a category name. The server flashes `error` for failures, which
    /// renders as danger; anything unknown renders as info.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "success" => Self::Success,
            "warning" => Self::Warning,
            "danger" | "error" => Self::Danger,
            _ => Self::Info,
        }
    }

    /// Recover the severity from an element's class list (`flash-<kind>`).
    pub fn from_classes<'a>(classes: impl IntoIterator<Item = &'a str>) -> Self {
        classes
            .into_iter()
            .filter_map(|class| class.strip_prefix("flash-"))
            .find(|suffix| !matches!(*suffix, "message" | "messages" | "close"))
            .map_or(Self::Info, Self::parse)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }

    /// Class attribute for a rendered message.
    #[must_use]
    pub fn css_class(self) -> String {
        format!("flash-message flash-{}", self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FlashId(uuid::Uuid);

impl FlashId {
    fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for FlashId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlashMessage {
    pub id: FlashId,
    pub text: String,
    pub severity: Severity,
    pub created_at_ms: u64,
}

/// Mount point for rendered messages.
pub trait FlashSink {
    fn mount(&self, message: &FlashMessage);
    fn unmount(&self, id: FlashId);
}

/// Owner of the visible message set. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Rc<CenterInner>,
}

/// Non-owning reference for callbacks that must not keep the center alive.
#[derive(Clone)]
pub struct WeakNotificationCenter(Weak<CenterInner>);

struct CenterInner {
    messages: RefCell<Vec<FlashMessage>>,
    scheduler: Rc<dyn Scheduler>,
    sink: Rc<dyn FlashSink>,
    ttl: Duration,
}

impl NotificationCenter {
    pub fn new(scheduler: Rc<dyn Scheduler>, sink: Rc<dyn FlashSink>, ttl: Duration) -> Self {
        Self {
            inner: Rc::new(CenterInner {
                messages: RefCell::new(Vec::new()),
                scheduler,
                sink,
                ttl,
            }),
        }
    }

    /// Create, mount and arm a new message.
    pub fn show(&self, text: impl Into<String>, severity: Severity) -> FlashId {
        self.insert(text.into(), severity, true)
    }

    /// Track a message the server already rendered so it expires like the rest.
    pub fn adopt(&self, text: impl Into<String>, severity: Severity) -> FlashId {
        self.insert(text.into(), severity, false)
    }

    /// Remove a message now. Returns `false` if it was already gone.
    pub fn dismiss(&self, id: FlashId) -> bool {
        let removed = {
            let mut messages = self.inner.messages.borrow_mut();
            messages
                .iter()
                .position(|message| message.id == id)
                .map(|index| messages.remove(index))
        };
        match removed {
            Some(_) => {
                self.inner.sink.unmount(id);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn visible(&self) -> Vec<FlashMessage> {
        self.inner.messages.borrow().clone()
    }

    #[must_use]
    pub fn is_visible(&self, id: FlashId) -> bool {
        self.inner
            .messages
            .borrow()
            .iter()
            .any(|message| message.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.messages.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakNotificationCenter {
        WeakNotificationCenter(Rc::downgrade(&self.inner))
    }

    fn insert(&self, text: String, severity: Severity, mount: bool) -> FlashId {
        let message = FlashMessage {
            id: FlashId::new(),
            text,
            severity,
            created_at_ms: self.inner.scheduler.now_ms(),
        };
        let id = message.id;
        self.inner.messages.borrow_mut().push(message.clone());
        if mount {
            self.inner.sink.mount(&message);
        }

        let weak = self.downgrade();
        self.inner
            .scheduler
            .schedule(
                self.inner.ttl,
                Box::new(move || {
                    if let Some(center) = weak.upgrade() {
                        if center.dismiss(id) {
                            log::debug!("flash {id} expired");
                        }
                    }
                }),
            )
            .detach();
        id
    }
}

impl WeakNotificationCenter {
    #[must_use]
    pub fn upgrade(&self) -> Option<NotificationCenter> {
        self.0.upgrade().map(|inner| NotificationCenter { inner })
    }
}
