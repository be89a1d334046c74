//! Flash messages as `.flash-message` elements.

use std::cell::RefCell;
use std::rc::Rc;

use web_sys::{Document, Element};

use super::events::{listen, select_one};
use crate::state::flash::{FlashId, FlashMessage, FlashSink, WeakNotificationCenter};

const CLOSE_GLYPH: &str = "\u{d7}";

pub struct DomFlashSink {
    document: Document,
    elements: RefCell<Vec<(FlashId, Element)>>,
    center: Rc<RefCell<Option<WeakNotificationCenter>>>,
}

impl DomFlashSink {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            elements: RefCell::new(Vec::new()),
            center: Rc::new(RefCell::new(None)),
        }
    }

    /// Route close-button clicks to `center`.
    pub fn bind(&self, center: WeakNotificationCenter) {
        *self.center.borrow_mut() = Some(center);
    }

    /// Take over a server-rendered message element.
    pub fn adopt(&self, id: FlashId, element: Element) {
        self.wire_close(id, &element);
        self.elements.borrow_mut().push((id, element));
    }

    fn wire_close(&self, id: FlashId, element: &Element) {
        let Some(button) = select_one(element, ".flash-close") else {
            return;
        };
        let center = Rc::clone(&self.center);
        listen(&button, "click", move |_| {
            let center = center.borrow().as_ref().and_then(WeakNotificationCenter::upgrade);
            if let Some(center) = center {
                center.dismiss(id);
            }
        });
    }

    fn container(&self) -> Option<Element> {
        match self.document.query_selector(".flash-messages") {
            Ok(Some(container)) => Some(container),
            _ => self.document.body().map(Element::from),
        }
    }

    fn render(&self, message: &FlashMessage) -> Result<Element, wasm_bindgen::JsValue> {
        let element = self.document.create_element("div")?;
        element.set_class_name(&message.severity.css_class());
        element.set_text_content(Some(&message.text));
        let close = self.document.create_element("button")?;
        close.set_class_name("flash-close");
        close.set_text_content(Some(CLOSE_GLYPH));
        element.append_child(&close)?;
        Ok(element)
    }
}

impl FlashSink for DomFlashSink {
    fn mount(&self, message: &FlashMessage) {
        let Some(container) = self.container() else {
            log::warn!("no container for flash message {}", message.id);
            return;
        };
        let element = match self.render(message) {
            Ok(element) => element,
            Err(err) => {
                log::error!("could not render flash message: {err:?}");
                return;
            }
        };
        if let Err(err) = container.append_child(&element) {
            log::error!("could not mount flash message: {err:?}");
            return;
        }
        self.adopt(message.id, element);
    }

    fn unmount(&self, id: FlashId) {
        let removed = {
            let mut elements = self.elements.borrow_mut();
            elements
                .iter()
                .position(|(known, _)| *known == id)
                .map(|index| elements.remove(index))
        };
        if let Some((_, element)) = removed {
            element.remove();
        }
    }
}

/// Message text of a server-rendered element, without its close glyph.
pub fn message_text(element: &Element) -> String {
    let text = element.text_content().unwrap_or_default();
    text.trim().trim_end_matches(CLOSE_GLYPH).trim().to_owned()
}
