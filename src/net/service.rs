//! Like and download actions on a notebook card.
//!
//! The dashboard ships with [`ComingSoonService`], which answers every action
//! with a placeholder notice. When the page configures `notebook_api_base`,
//! the browser build uses [`HttpNotebookService`] instead.
//!
//! ERROR HANDLING
//! ==============
//! Service failures never reach the caller. [`NotebookActions`] logs them
//! and shows a danger notification naming the action that failed.

#[cfg(test)]
#[path = "service_test.rs"]
mod service_test;

use std::rc::Rc;

use futures::future::LocalBoxFuture;

use super::navigate::{NavTarget, Navigator};
use crate::error::UiError;
use crate::state::flash::{NotificationCenter, Severity};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotebookAction {
    Like,
    Download,
}

impl NotebookAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Download => "download",
        }
    }

    pub fn coming_soon_message(self) -> &'static str {
        match self {
            Self::Like => "Like functionality coming soon!",
            Self::Download => "Download functionality coming soon!",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Like => "Error liking notebook",
            Self::Download => "Error downloading notebook",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Self::Like => "Notebook liked!",
            Self::Download => "Download started",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server responded with status {0}")]
    Status(u16),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServiceOutcome {
    /// The action is not available yet.
    ComingSoon,
    Done,
    /// Continue by navigating, e.g. to a file download.
    Redirect(NavTarget),
}

pub trait NotebookService {
    fn perform(&self, action: NotebookAction, id: &str) -> LocalBoxFuture<'static, Result<ServiceOutcome, ServiceError>>;
}

/// Placeholder backend: every action is "coming soon".
pub struct ComingSoonService;

impl NotebookService for ComingSoonService {
    fn perform(&self, action: NotebookAction, id: &str) -> LocalBoxFuture<'static, Result<ServiceOutcome, ServiceError>> {
        log::debug!("{} requested for notebook {id}", action.as_str());
        Box::pin(async { Ok(ServiceOutcome::ComingSoon) })
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn like_endpoint(base: &str, id: &str) -> String {
    format!("{}/{id}/like", base.trim_end_matches('/'))
}

#[cfg(any(test, feature = "hydrate"))]
fn download_target(base: &str, id: &str) -> NavTarget {
    NavTarget::path(format!("{}/{id}/download", base.trim_end_matches('/')))
}

/// Notebook REST endpoints under `base`.
#[cfg(feature = "hydrate")]
pub struct HttpNotebookService {
    base: String,
}

#[cfg(feature = "hydrate")]
impl HttpNotebookService {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

#[cfg(feature = "hydrate")]
impl NotebookService for HttpNotebookService {
    fn perform(&self, action: NotebookAction, id: &str) -> LocalBoxFuture<'static, Result<ServiceOutcome, ServiceError>> {
        match action {
            NotebookAction::Like => {
                let url = like_endpoint(&self.base, id);
                Box::pin(async move {
                    let resp = gloo_net::http::Request::post(&url)
                        .send()
                        .await
                        .map_err(|e| ServiceError::Transport(e.to_string()))?;
                    let status = resp.status();
                    if !(200..300).contains(&status) {
                        return Err(ServiceError::Status(status));
                    }
                    Ok(ServiceOutcome::Done)
                })
            }
            NotebookAction::Download => {
                let target = download_target(&self.base, id);
                Box::pin(async move { Ok(ServiceOutcome::Redirect(target)) })
            }
        }
    }
}

/// Runs notebook actions and reports their outcome to the user.
#[derive(Clone)]
pub struct NotebookActions {
    service: Rc<dyn NotebookService>,
    navigator: Rc<dyn Navigator>,
    notifications: NotificationCenter,
}

impl NotebookActions {
    pub fn new(service: Rc<dyn NotebookService>, navigator: Rc<dyn Navigator>, notifications: NotificationCenter) -> Self {
        Self { service, navigator, notifications }
    }

    /// Future that performs `action` and reports its outcome. It never fails.
    pub fn run(&self, action: NotebookAction, id: &str) -> LocalBoxFuture<'static, ()> {
        let pending = self.service.perform(action, id);
        let this = self.clone();
        Box::pin(async move {
            let result = pending.await.map_err(UiError::from);
            this.report_outcome(action, result);
        })
    }

    pub fn report_outcome(&self, action: NotebookAction, result: Result<ServiceOutcome, UiError>) {
        match result {
            Ok(ServiceOutcome::ComingSoon) => {
                self.notifications.show(action.coming_soon_message(), Severity::Info);
            }
            Ok(ServiceOutcome::Done) => {
                self.notifications.show(action.success_message(), Severity::Success);
            }
            Ok(ServiceOutcome::Redirect(target)) => self.navigator.navigate(&target),
            Err(err) => {
                log::error!("{}: {err}", action.failure_message());
                self.notifications.show(action.failure_message(), Severity::Danger);
            }
        }
    }
}
