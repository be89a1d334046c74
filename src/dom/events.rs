//! DOM lookup and listener helpers.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, Event, EventTarget};

/// Every element matching `selector` under `root`, in document order.
pub fn select_all(root: &Element, selector: &str) -> Vec<Element> {
    match root.query_selector_all(selector) {
        Ok(list) => (0..list.length())
            .filter_map(|index| list.item(index))
            .flat_map(JsCast::dyn_into::<Element>)
            .collect(),
        Err(err) => {
            log::warn!("bad selector {selector}: {err:?}");
            Vec::new()
        }
    }
}

pub fn select_all_in(document: &Document, selector: &str) -> Vec<Element> {
    match document.document_element() {
        Some(root) => select_all(&root, selector),
        None => Vec::new(),
    }
}

pub fn select_one(root: &Element, selector: &str) -> Option<Element> {
    match root.query_selector(selector) {
        Ok(found) => found,
        Err(err) => {
            log::warn!("bad selector {selector}: {err:?}");
            None
        }
    }
}

/// Checked downcast of an element to a more specific interface.
pub fn cast<T: JsCast>(element: Element) -> Option<T> {
    match element.dyn_into::<T>() {
        Ok(cast) => Some(cast),
        Err(_) => None,
    }
}

/// Attach `handler` for `event` on `target` for the lifetime of the page.
pub fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    if let Err(err) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        log::warn!("could not listen for {event}: {err:?}");
        return;
    }
    closure.forget();
}

/// `classList.toggle(class, on)`, logging instead of failing.
pub fn set_class(element: &Element, class: &str, on: bool) {
    if let Err(err) = element.class_list().toggle_with_force(class, on) {
        log::warn!("could not toggle class {class}: {err:?}");
    }
}

/// Trimmed text content, or an empty string.
pub fn text_of(element: &Element) -> String {
    element.text_content().unwrap_or_default().trim().to_owned()
}
