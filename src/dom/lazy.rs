//! `img[data-src]` elements and `IntersectionObserver`.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlImageElement, IntersectionObserver, IntersectionObserverEntry};

use crate::error::UiError;
use crate::state::lazy::{LazyTarget, Subscription, VisibilityObserver};

pub const LAZY_CLASS: &str = "lazy";

pub struct LazyImg(pub HtmlImageElement);

impl LazyTarget for LazyImg {
    fn apply_source(&self, src: &str) {
        self.0.set_src(src);
    }

    fn clear_lazy_marker(&self) {
        if let Err(err) = self.0.class_list().remove_1(LAZY_CLASS) {
            log::warn!("could not clear lazy marker: {err:?}");
        }
    }
}

struct Slot {
    target: Element,
    on_visible: Option<Box<dyn FnMut()>>,
    active: bool,
}

type Slots = Rc<RefCell<Vec<Slot>>>;

/// One shared `IntersectionObserver` for every lazy image.
pub struct IntersectionVisibility {
    observer: IntersectionObserver,
    slots: Slots,
}

impl IntersectionVisibility {
    /// `None` when the browser has no `IntersectionObserver`.
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let supported = js_sys::Reflect::has(&window, &JsValue::from_str("IntersectionObserver"));
        if !matches!(supported, Ok(true)) {
            log::debug!("IntersectionObserver unsupported");
            return None;
        }
        match Self::create() {
            Ok(visibility) => Some(visibility),
            Err(err) => {
                log::warn!("IntersectionObserver unavailable: {err}");
                None
            }
        }
    }

    fn create() -> Result<Self, UiError> {
        let slots: Slots = Rc::new(RefCell::new(Vec::new()));
        let for_callback = Rc::clone(&slots);
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if entry.is_intersecting() {
                        notify(&for_callback, &entry.target());
                    }
                }
            },
        );
        let observer = IntersectionObserver::new(callback.as_ref().unchecked_ref()).map_err(UiError::from_js)?;
        callback.forget();
        Ok(Self { observer, slots })
    }
}

/// Run the callback registered for `target`, unless it unsubscribed.
fn notify(slots: &Slots, target: &Element) {
    let taken = {
        let mut slots = slots.borrow_mut();
        slots
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| slot.active && slot.target == *target)
            .and_then(|(index, slot)| slot.on_visible.take().map(|callback| (index, callback)))
    };
    let Some((index, mut callback)) = taken else {
        return;
    };
    callback();
    let mut slots = slots.borrow_mut();
    if let Some(slot) = slots.get_mut(index) {
        if slot.active {
            slot.on_visible = Some(callback);
        }
    }
}

impl VisibilityObserver<LazyImg> for IntersectionVisibility {
    fn observe(&self, target: &LazyImg, on_visible: Box<dyn FnMut()>) -> Subscription {
        let element: Element = target.0.clone().into();
        self.observer.observe(&element);
        let index = {
            let mut slots = self.slots.borrow_mut();
            slots.push(Slot { target: element.clone(), on_visible: Some(on_visible), active: true });
            slots.len() - 1
        };
        let observer = self.observer.clone();
        let slots = Rc::clone(&self.slots);
        Subscription::new(move || {
            observer.unobserve(&element);
            if let Some(slot) = slots.borrow_mut().get_mut(index) {
                slot.active = false;
                slot.on_visible = None;
            }
        })
    }
}
