//! Collaborators that leave the page: navigation, notebook calls, and the
//! update worker.
//!
//! SYSTEM CONTEXT
//! ==============
//! `navigate` builds and follows same-origin links, `service` runs like and
//! download actions, and `worker` registers the offline/update script. Each
//! exposes a trait so the dashboard can run against fakes in tests.

pub mod navigate;
pub mod service;
pub mod worker;
