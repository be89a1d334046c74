//! Browser entry: scans the page, boots the [`Dashboard`], and wires DOM
//! listeners to it.
//!
//! SYSTEM CONTEXT
//! ==============
//! Everything here is glue. Decisions live in `app` and `state`; this layer
//! reads the document into a `PageInventory`, turns browser features into
//! `Capabilities`, and applies what the dashboard returns back onto elements.
//! The booted dashboard sits in a thread-local so the exported page
//! functions (`likeNotebook`, `showNotification`, ...) can reach it.

pub mod charts;
pub mod events;
pub mod flash;
pub mod lazy;

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlElement, HtmlImageElement, HtmlInputElement, KeyboardEvent,
    ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};

use self::charts::ChartJsRenderer;
use self::events::{cast, listen, select_all_in, select_one, set_class, text_of};
use self::flash::{DomFlashSink, message_text};
use self::lazy::{IntersectionVisibility, LazyImg};
use crate::app::{Capabilities, ChartGroupMarkup, Dashboard, PageInventory};
use crate::config::{CONFIG_ELEMENT_ID, UiConfig};
use crate::error::UiError;
use crate::net::navigate::LocationNavigator;
use crate::net::service::{ComingSoonService, HttpNotebookService, NotebookService};
use crate::net::worker::{ServiceWorkerRegistrar, WorkerRegistrar};
use crate::state::charts::ChartRenderer;
use crate::state::flash::Severity;
use crate::state::lazy::{LazyImage, VisibilityObserver};
use crate::state::search::is_commit_key;
use crate::state::shortcuts::{KeyChord, fragment_id};
use crate::util::format::{format_file_size, relative_date};
use crate::util::schedule::BrowserScheduler;

type PageDashboard = Dashboard<LazyImg>;

thread_local! {
    static DASHBOARD: RefCell<Option<Rc<PageDashboard>>> = const { RefCell::new(None) };
}

const SEARCH_INPUT: &str = ".search-input input";
const VIEW_CONTAINER_ID: &str = "notebooksContainer";

fn current() -> Option<Rc<PageDashboard>> {
    DASHBOARD.with(|slot| slot.borrow().clone())
}

/// Boot once the document has been parsed.
pub fn start() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if document.ready_state() == "loading" {
        let mut pending = Some(document.clone());
        listen(&document, "DOMContentLoaded", move |_| {
            if let Some(document) = pending.take() {
                boot(&document);
            }
        });
    } else {
        boot(&document);
    }
}

fn read_config(document: &Document) -> (UiConfig, Option<UiError>) {
    let raw = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content());
    UiConfig::from_page(raw.as_deref())
}

/// Elements the listeners need after boot.
struct PageElements {
    upload_button: Option<Element>,
    filters: Vec<Element>,
    search_input: Option<HtmlInputElement>,
    view_buttons: Vec<Element>,
    view_container: Option<HtmlElement>,
    flash_messages: Vec<Element>,
    chart_groups: Vec<Vec<Element>>,
    fragment_links: Vec<Element>,
}

fn scan(document: &Document) -> (PageInventory<LazyImg>, PageElements) {
    let upload_button = document.query_selector(".upload-btn").unwrap_or_default();
    let filters = select_all_in(document, ".category-item, .tag-item");
    let search_input = match document.query_selector(SEARCH_INPUT) {
        Ok(Some(element)) => cast::<HtmlInputElement>(element),
        _ => None,
    };
    let view_buttons = select_all_in(document, ".view-btn");
    let view_container = document
        .get_element_by_id(VIEW_CONTAINER_ID)
        .and_then(cast::<HtmlElement>);
    let flash_messages = select_all_in(document, ".flash-message");
    let chart_groups = chart_button_groups(select_all_in(document, ".chart-btn"));
    let fragment_links = select_all_in(document, "a[href^=\"#\"]");
    let lazy_images = select_all_in(document, "img[data-src]")
        .into_iter()
        .filter_map(|element| {
            let src = element.get_attribute("data-src")?;
            let image = cast::<HtmlImageElement>(element)?;
            Some(LazyImage::new(LazyImg(image), src))
        })
        .collect();

    let inventory = PageInventory {
        upload_button: upload_button.is_some(),
        filter_controls: filters.len(),
        search_input: search_input.is_some(),
        view_buttons: view_buttons
            .iter()
            .map(|button| button.get_attribute("data-view").unwrap_or_default())
            .collect(),
        view_initially_active: view_buttons.iter().position(|button| button.class_list().contains("active")),
        view_container: view_container.is_some(),
        flash_messages: flash_messages
            .iter()
            .map(|element| {
                let class_name = element.class_name();
                (message_text(element), Severity::from_classes(class_name.split_whitespace()))
            })
            .collect(),
        chart_groups: chart_groups
            .iter()
            .map(|buttons| ChartGroupMarkup {
                buttons: buttons
                    .iter()
                    .map(|button| button.get_attribute("data-chart").unwrap_or_default())
                    .collect(),
                initially_active: buttons.iter().position(|button| button.class_list().contains("active")),
            })
            .collect(),
        fragment_links: fragment_links.len(),
        lazy_images,
    };
    let elements = PageElements {
        upload_button,
        filters,
        search_input,
        view_buttons,
        view_container,
        flash_messages,
        chart_groups,
        fragment_links,
    };
    (inventory, elements)
}

/// Chart buttons grouped by their parent element, in document order.
fn chart_button_groups(buttons: Vec<Element>) -> Vec<Vec<Element>> {
    let mut groups: Vec<(Option<Element>, Vec<Element>)> = Vec::new();
    for button in buttons {
        let parent = button.parent_element();
        let known = groups.iter().position(|(known, _)| *known == parent);
        match known {
            Some(index) => groups[index].1.push(button),
            None => groups.push((parent, vec![button])),
        }
    }
    groups.into_iter().map(|(_, members)| members).collect()
}

fn boot(document: &Document) {
    let (config, config_error) = read_config(document);
    if console_log::init_with_level(config.log_level()).is_err() {
        log::debug!("logger already installed");
    }
    if let Some(err) = config_error {
        log::warn!("ignoring page config: {err}");
    }

    let (inventory, elements) = scan(document);
    let sink = Rc::new(DomFlashSink::new(document.clone()));
    let service: Rc<dyn NotebookService> = match &config.notebook_api_base {
        Some(base) => Rc::new(HttpNotebookService::new(base.as_str())),
        None => Rc::new(ComingSoonService),
    };
    let caps = Capabilities {
        scheduler: Rc::new(BrowserScheduler),
        navigator: Rc::new(LocationNavigator),
        service,
        flash_sink: sink.clone(),
        charts: ChartJsRenderer::detect(document.clone()).map(|renderer| Rc::new(renderer) as Rc<dyn ChartRenderer>),
        visibility: IntersectionVisibility::detect()
            .map(|visibility| Rc::new(visibility) as Rc<dyn VisibilityObserver<LazyImg>>),
        worker: ServiceWorkerRegistrar::detect().map(|registrar| Rc::new(registrar) as Rc<dyn WorkerRegistrar>),
        spawn: Rc::new(|future: LocalBoxFuture<'static, ()>| wasm_bindgen_futures::spawn_local(future)),
    };

    let (dashboard, report) = Dashboard::boot(config, caps, inventory);
    sink.bind(dashboard.notifications().downgrade());
    for (id, element) in report.adopted_flash.iter().zip(elements.flash_messages.iter()) {
        sink.adopt(*id, element.clone());
    }

    wire_sidebar(&dashboard, &elements);
    wire_search(&dashboard, &elements);
    wire_view_toggle(&dashboard, &elements);
    wire_chart_buttons(&dashboard, &elements);
    wire_fragment_links(document, &elements);
    wire_shortcuts(document, &dashboard, elements.search_input.clone());

    DASHBOARD.with(|slot| *slot.borrow_mut() = Some(dashboard));
}

fn wire_sidebar(dashboard: &Rc<PageDashboard>, elements: &PageElements) {
    if let Some(button) = &elements.upload_button {
        let dashboard = Rc::clone(dashboard);
        listen(button, "click", move |_| dashboard.upload_clicked());
    }
    for item in &elements.filters {
        let dashboard = Rc::clone(dashboard);
        let label = select_one(item, "span").map(|span| text_of(&span)).unwrap_or_default();
        listen(item, "change", move |_| dashboard.filter_changed(&label));
    }
}

fn wire_search(dashboard: &Rc<PageDashboard>, elements: &PageElements) {
    let Some(input) = &elements.search_input else {
        return;
    };
    {
        let dashboard = Rc::clone(dashboard);
        let input_for_event = input.clone();
        listen(input, "input", move |_| {
            dashboard.search_input(&input_for_event.value());
        });
    }
    let dashboard = Rc::clone(dashboard);
    let input_for_event = input.clone();
    listen(input, "keydown", move |event| {
        if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
            if is_commit_key(&key.key(), key.is_composing()) {
                dashboard.search_commit(&input_for_event.value());
            }
        }
    });
}

fn wire_view_toggle(dashboard: &Rc<PageDashboard>, elements: &PageElements) {
    let Some(container) = &elements.view_container else {
        return;
    };
    let buttons = Rc::new(elements.view_buttons.clone());
    for (index, button) in elements.view_buttons.iter().enumerate() {
        let dashboard = Rc::clone(dashboard);
        let buttons = Rc::clone(&buttons);
        let container = container.clone();
        listen(button, "click", move |_| {
            let Some(layout) = dashboard.select_view(index) else {
                return;
            };
            let active = dashboard.active_view_button();
            for (other, button) in buttons.iter().enumerate() {
                set_class(button, "active", Some(other) == active);
            }
            if let Err(err) = container
                .style()
                .set_property("grid-template-columns", &layout.grid_template_columns())
            {
                log::warn!("could not apply layout: {err:?}");
            }
        });
    }
}

fn wire_chart_buttons(dashboard: &Rc<PageDashboard>, elements: &PageElements) {
    for (group, buttons) in elements.chart_groups.iter().enumerate() {
        // Markup may mark no button; the group still starts with one active.
        mark_active(buttons, dashboard.chart_group_active(group));
        let members = Rc::new(buttons.clone());
        for (index, button) in buttons.iter().enumerate() {
            let dashboard = Rc::clone(dashboard);
            let members = Rc::clone(&members);
            listen(button, "click", move |_| {
                if dashboard.chart_button_clicked(group, index).is_none() {
                    return;
                }
                mark_active(&members, dashboard.chart_group_active(group));
            });
        }
    }
}

fn mark_active(members: &[Element], active: Option<usize>) {
    for (index, member) in members.iter().enumerate() {
        set_class(member, "active", Some(index) == active);
    }
}

fn wire_fragment_links(document: &Document, elements: &PageElements) {
    for link in &elements.fragment_links {
        let document = document.clone();
        let href = link.get_attribute("href").unwrap_or_default();
        listen(link, "click", move |event| {
            event.prevent_default();
            let Some(target) = fragment_id(&href).and_then(|id| document.get_element_by_id(id)) else {
                return;
            };
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            options.set_block(ScrollLogicalPosition::Start);
            target.scroll_into_view_with_scroll_into_view_options(&options);
        });
    }
}

fn wire_shortcuts(document: &Document, dashboard: &Rc<PageDashboard>, search_input: Option<HtmlInputElement>) {
    let dashboard = Rc::clone(dashboard);
    listen(document, "keydown", move |event| {
        let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let chord = KeyChord {
            key: key.key(),
            ctrl: key.ctrl_key(),
            meta: key.meta_key(),
            shift: key.shift_key(),
            alt: key.alt_key(),
        };
        let response = dashboard.handle_key(&chord);
        if response.prevent_default {
            event.prevent_default();
        }
        if response.focus_search {
            if let Some(input) = &search_input {
                if let Err(err) = input.focus() {
                    log::warn!("could not focus search: {err:?}");
                }
            }
        }
    });
}

// =============================================================
// Page-script exports
// =============================================================

#[wasm_bindgen(js_name = likeNotebook)]
pub fn like_notebook(notebook_id: &str) {
    match current() {
        Some(dashboard) => dashboard.like(notebook_id),
        None => log::warn!("like before dashboard boot"),
    }
}

#[wasm_bindgen(js_name = downloadNotebook)]
pub fn download_notebook(notebook_id: &str) {
    match current() {
        Some(dashboard) => dashboard.download(notebook_id),
        None => log::warn!("download before dashboard boot"),
    }
}

#[wasm_bindgen(js_name = showNotification)]
pub fn show_notification(message: &str, kind: Option<String>) {
    let severity = kind.as_deref().map_or(Severity::Info, Severity::parse);
    match current() {
        Some(dashboard) => {
            dashboard.notify(message, severity);
        }
        None => log::warn!("notification before dashboard boot: {message}"),
    }
}

#[wasm_bindgen(js_name = formatFileSize)]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_file_size_js(bytes: f64) -> String {
    let bytes = if bytes.is_finite() && bytes > 0.0 { bytes as u64 } else { 0 };
    format_file_size(bytes)
}

#[wasm_bindgen(js_name = formatDate)]
pub fn format_date_js(date: &str) -> String {
    let then = js_sys::Date::new(&JsValue::from_str(date));
    relative_date(then.get_time(), js_sys::Date::now())
        .label(|| String::from(then.to_locale_date_string("default", &JsValue::UNDEFINED)))
}
