//! Helpers shared across dashboard components.

pub mod debounce;
pub mod format;
pub mod schedule;
