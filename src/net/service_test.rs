use super::*;
use std::cell::RefCell;
use std::time::Duration;

use futures::executor::block_on;

use crate::state::flash::{FlashId, FlashMessage, FlashSink};
use crate::util::schedule::ManualScheduler;

#[derive(Default)]
struct Shown(RefCell<Vec<(String, Severity)>>);

impl FlashSink for Shown {
    fn mount(&self, message: &FlashMessage) {
        self.0.borrow_mut().push((message.text.clone(), message.severity));
    }

    fn unmount(&self, _id: FlashId) {}
}

#[derive(Default)]
struct Visited(RefCell<Vec<NavTarget>>);

impl Navigator for Visited {
    fn navigate(&self, target: &NavTarget) {
        self.0.borrow_mut().push(target.clone());
    }
}

struct Scripted(Result<ServiceOutcome, ServiceError>);

impl NotebookService for Scripted {
    fn perform(&self, _action: NotebookAction, _id: &str) -> LocalBoxFuture<'static, Result<ServiceOutcome, ServiceError>> {
        let result = self.0.clone();
        Box::pin(async move { result })
    }
}

fn actions(service: Rc<dyn NotebookService>) -> (NotebookActions, Rc<Shown>, Rc<Visited>) {
    let shown = Rc::new(Shown::default());
    let visited = Rc::new(Visited::default());
    let center = NotificationCenter::new(Rc::new(ManualScheduler::new()), shown.clone(), Duration::from_secs(5));
    (NotebookActions::new(service, visited.clone(), center), shown, visited)
}

#[test]
fn coming_soon_like_shows_info() {
    let (actions, shown, _) = actions(Rc::new(ComingSoonService));
    block_on(actions.run(NotebookAction::Like, "nb-1"));
    assert_eq!(
        *shown.0.borrow(),
        vec![("Like functionality coming soon!".to_owned(), Severity::Info)]
    );
}

#[test]
fn coming_soon_download_shows_info() {
    let (actions, shown, _) = actions(Rc::new(ComingSoonService));
    block_on(actions.run(NotebookAction::Download, "nb-1"));
    assert_eq!(shown.0.borrow()[0].0, "Download functionality coming soon!");
}

#[test]
fn failure_becomes_danger_notification() {
    let (actions, shown, _) = actions(Rc::new(Scripted(Err(ServiceError::Status(500)))));
    block_on(actions.run(NotebookAction::Like, "nb-1"));
    block_on(actions.run(NotebookAction::Download, "nb-1"));
    assert_eq!(
        *shown.0.borrow(),
        vec![
            ("Error liking notebook".to_owned(), Severity::Danger),
            ("Error downloading notebook".to_owned(), Severity::Danger),
        ]
    );
}

#[test]
fn done_shows_success() {
    let (actions, shown, _) = actions(Rc::new(Scripted(Ok(ServiceOutcome::Done))));
    block_on(actions.run(NotebookAction::Like, "nb-1"));
    assert_eq!(*shown.0.borrow(), vec![("Notebook liked!".to_owned(), Severity::Success)]);
}

#[test]
fn redirect_navigates_without_notification() {
    let target = download_target("/api/notebooks/", "nb-9");
    let (actions, shown, visited) = actions(Rc::new(Scripted(Ok(ServiceOutcome::Redirect(target.clone())))));
    block_on(actions.run(NotebookAction::Download, "nb-9"));
    assert!(shown.0.borrow().is_empty());
    assert_eq!(*visited.0.borrow(), vec![target]);
}

#[test]
fn endpoints_join_base_and_id() {
    assert_eq!(like_endpoint("/api/notebooks", "42"), "/api/notebooks/42/like");
    assert_eq!(like_endpoint("/api/notebooks/", "42"), "/api/notebooks/42/like");
    assert_eq!(download_target("/api/notebooks", "42"), NavTarget::path("/api/notebooks/42/download"));
}

#[test]
fn error_messages() {
    assert_eq!(ServiceError::Status(404).to_string(), "server responded with status 404");
    assert_eq!(ServiceError::Transport("offline".to_owned()).to_string(), "request failed: offline");
}

#[test]
fn service_errors_surface_through_ui_error() {
    let err = UiError::from(ServiceError::Status(500));
    assert!(matches!(err, UiError::Service(ServiceError::Status(500))));
    assert_eq!(err.to_string(), "server responded with status 500");
}

#[test]
fn browser_failure_reported_as_danger() {
    let (actions, shown, visited) = actions(Rc::new(Scripted(Ok(ServiceOutcome::Done))));
    actions.report_outcome(NotebookAction::Download, Err(UiError::Js("TypeError: failed to fetch".to_owned())));
    assert_eq!(*shown.0.borrow(), vec![("Error downloading notebook".to_owned(), Severity::Danger)]);
    assert!(visited.0.borrow().is_empty());
}
