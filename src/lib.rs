//! Interaction controller for the notebook hub dashboard.
//!
//! This crate is compiled to WebAssembly and hydrates a server-rendered
//! dashboard page: flash messages that expire, a debounced search box, the
//! grid/list toggle, lazily loaded thumbnails, the Chart.js panels, and a few
//! page-wide shortcuts. The component logic is plain Rust and runs natively
//! under `cargo test`; only the [`dom`] layer (feature `hydrate`) touches the
//! browser.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`app`] | Boot sequence and the [`app::Dashboard`] event surface |
//! | [`state`] | Per-widget state machines (flash, search, view, lazy, charts, shortcuts) |
//! | [`net`] | Navigation, notebook actions, update worker |
//! | [`util`] | Scheduler, debouncer, formatting helpers |
//! | [`config`] | Page-overridable settings |
//! | [`error`] | Shared error types |
//! | `dom` | web-sys bindings and the wasm entry point (feature `hydrate`) |

pub mod app;
pub mod config;
#[cfg(feature = "hydrate")]
pub mod dom;
pub mod error;
pub mod net;
pub mod state;
pub mod util;

/// WASM entry point: installs the panic hook and boots the dashboard.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    dom::start();
}
