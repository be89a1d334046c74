//! Per-component interaction state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each module owns one widget's state machine and talks to the page only
//! through collaborator traits, so every transition is testable without a
//! browser.

pub mod charts;
pub mod flash;
pub mod lazy;
pub mod search;
pub mod shortcuts;
pub mod view_mode;
