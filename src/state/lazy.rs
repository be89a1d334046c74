//! Deferred image loading on first visibility.
//!
//! Each image is registered with a [`VisibilityObserver`]. The first time it
//! becomes visible its deferred source is applied, the `lazy` marker is
//! cleared, and its [`Subscription`] is released, so an image resolves at
//! most once and is never observed again.
//!
//! TRADE-OFFS
//! ==========
//! Visibility observation is a progressive enhancement. Without it the loader
//! either leaves images unresolved (`Inert`) or resolves them all up front
//! (`Eager`), per [`LazyFallback`].

#[cfg(test)]
#[path = "lazy_test.rs"]
mod lazy_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

/// An element whose real source is deferred.
pub trait LazyTarget {
    fn apply_source(&self, src: &str);
    fn clear_lazy_marker(&self);
}

/// Registration returned by an observer; `unsubscribe` stops notifications.
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self { release: Some(Box::new(release)) }
    }

    pub fn unsubscribe(mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// Capability that reports when a target enters the viewport.
///
/// Implementations must call `on_visible` from the event loop, never from
/// inside `observe` itself.
pub trait VisibilityObserver<T> {
    fn observe(&self, target: &T, on_visible: Box<dyn FnMut()>) -> Subscription;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LazyFallback {
    /// Leave deferred images unresolved.
    #[default]
    Inert,
    /// Resolve every deferred image immediately.
    Eager,
}

pub struct LazyImage<T> {
    pub target: T,
    pub deferred_src: String,
    loaded: bool,
}

impl<T> LazyImage<T> {
    pub fn new(target: T, deferred_src: impl Into<String>) -> Self {
        Self { target, deferred_src: deferred_src.into(), loaded: false }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

pub struct LazyLoader<T> {
    state: Rc<RefCell<LoaderState<T>>>,
}

struct LoaderState<T> {
    images: Vec<LazyImage<T>>,
    subscriptions: Vec<Option<Subscription>>,
}

impl<T: LazyTarget + 'static> LazyLoader<T> {
    /// Register every image, or apply `fallback` when `observer` is absent.
    pub fn start(
        images: Vec<LazyImage<T>>,
        observer: Option<&dyn VisibilityObserver<T>>,
        fallback: LazyFallback,
    ) -> Self {
        let count = images.len();
        let state = Rc::new(RefCell::new(LoaderState {
            images,
            subscriptions: (0..count).map(|_| None).collect(),
        }));
        let loader = Self { state };

        match (observer, fallback) {
            (Some(observer), _) => loader.observe_all(observer),
            (None, LazyFallback::Eager) => {
                log::debug!("visibility observation unavailable; loading {count} images eagerly");
                for index in 0..count {
                    reveal(&loader.state, index);
                }
            }
            (None, LazyFallback::Inert) => {
                log::debug!("visibility observation unavailable; {count} images stay deferred");
            }
        }
        loader
    }

    fn observe_all(&self, observer: &dyn VisibilityObserver<T>) {
        let count = self.state.borrow().images.len();
        for index in 0..count {
            let weak: Weak<RefCell<LoaderState<T>>> = Rc::downgrade(&self.state);
            let on_visible = Box::new(move || {
                if let Some(state) = weak.upgrade() {
                    reveal(&state, index);
                }
            });
            let subscription = {
                let state = self.state.borrow();
                observer.observe(&state.images[index].target, on_visible)
            };
            self.state.borrow_mut().subscriptions[index] = Some(subscription);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.borrow().images.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_loaded(&self, index: usize) -> bool {
        self.state
            .borrow()
            .images
            .get(index)
            .is_some_and(LazyImage::is_loaded)
    }

    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.state
            .borrow()
            .images
            .iter()
            .filter(|image| image.loaded)
            .count()
    }

    /// Images still holding a live observer registration.
    #[must_use]
    pub fn observed_count(&self) -> usize {
        self.state
            .borrow()
            .subscriptions
            .iter()
            .filter(|subscription| subscription.is_some())
            .count()
    }
}

/// Resolve image `index` once. Returns `false` if it was already loaded.
fn reveal<T: LazyTarget>(state: &Rc<RefCell<LoaderState<T>>>, index: usize) -> bool {
    let (subscription, src) = {
        let mut state = state.borrow_mut();
        let Some(image) = state.images.get_mut(index) else {
            return false;
        };
        if image.loaded {
            return false;
        }
        image.loaded = true;
        let src = image.deferred_src.clone();
        (state.subscriptions[index].take(), src)
    };
    if let Some(subscription) = subscription {
        subscription.unsubscribe();
    }

    let state = state.borrow();
    if let Some(image) = state.images.get(index) {
        image.target.apply_source(&src);
        image.target.clear_lazy_marker();
    }
    true
}
