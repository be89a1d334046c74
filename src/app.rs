//! Dashboard bootstrap: wires every component against one page.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser layer scans the document into a [`PageInventory`], builds the
//! [`Capabilities`] it can offer, and calls [`Dashboard::boot`] once. After
//! that, DOM listeners forward events to the `Dashboard` methods and apply
//! whatever they return (layouts, focus, default suppression).
//!
//! ERROR HANDLING
//! ==============
//! Steps run in a fixed order and are contained: a missing element skips its
//! step, a failing collaborator fails its step, and the remaining steps still
//! run. Every outcome lands in the [`BootReport`].

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::config::UiConfig;
use crate::net::navigate::{NavTarget, Navigator, search_target};
use crate::net::service::{NotebookAction, NotebookActions, NotebookService};
use crate::net::worker::{WorkerRegistrar, register_update_worker};
use crate::state::charts::{ChartButtonGroup, ChartPanel, ChartRenderer};
use crate::state::flash::{FlashId, FlashSink, NotificationCenter, Severity};
use crate::state::lazy::{LazyImage, LazyLoader, LazyTarget, VisibilityObserver};
use crate::state::search::SearchTrigger;
use crate::state::shortcuts::{KeyChord, Shortcut, match_shortcut};
use crate::state::view_mode::{Layout, ViewToggle};
use crate::util::schedule::Scheduler;

/// Runs a future to completion on the page's executor.
pub type Spawner = Rc<dyn Fn(LocalBoxFuture<'static, ()>)>;

/// Everything the dashboard may call out to. Optional entries are browser
/// features that might be missing.
pub struct Capabilities<T> {
    pub scheduler: Rc<dyn Scheduler>,
    pub navigator: Rc<dyn Navigator>,
    pub service: Rc<dyn NotebookService>,
    pub flash_sink: Rc<dyn FlashSink>,
    pub charts: Option<Rc<dyn ChartRenderer>>,
    pub visibility: Option<Rc<dyn VisibilityObserver<T>>>,
    pub worker: Option<Rc<dyn WorkerRegistrar>>,
    pub spawn: Spawner,
}

/// Markup of one chart selector group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChartGroupMarkup {
    pub buttons: Vec<String>,
    pub initially_active: Option<usize>,
}

/// What the current page contains, as found by the browser scan.
pub struct PageInventory<T> {
    pub upload_button: bool,
    pub filter_controls: usize,
    pub search_input: bool,
    /// `data-view` values of the view buttons, in document order.
    pub view_buttons: Vec<String>,
    pub view_initially_active: Option<usize>,
    pub view_container: bool,
    /// Server-rendered flash messages, in document order.
    pub flash_messages: Vec<(String, Severity)>,
    pub chart_groups: Vec<ChartGroupMarkup>,
    pub fragment_links: usize,
    pub lazy_images: Vec<LazyImage<T>>,
}

impl<T> Default for PageInventory<T> {
    fn default() -> Self {
        Self {
            upload_button: false,
            filter_controls: 0,
            search_input: false,
            view_buttons: Vec::new(),
            view_initially_active: None,
            view_container: false,
            flash_messages: Vec::new(),
            chart_groups: Vec::new(),
            fragment_links: 0,
            lazy_images: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootStep {
    Sidebar,
    Search,
    ViewToggle,
    Notifications,
    Charts,
    SmoothScroll,
    Shortcuts,
    UpdateWorker,
    LazyImages,
}

impl BootStep {
    pub const ORDER: [Self; 9] = [
        Self::Sidebar,
        Self::Search,
        Self::ViewToggle,
        Self::Notifications,
        Self::Charts,
        Self::SmoothScroll,
        Self::Shortcuts,
        Self::UpdateWorker,
        Self::LazyImages,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sidebar => "sidebar",
            Self::Search => "search",
            Self::ViewToggle => "view toggle",
            Self::Notifications => "notifications",
            Self::Charts => "charts",
            Self::SmoothScroll => "smooth scroll",
            Self::Shortcuts => "shortcuts",
            Self::UpdateWorker => "update worker",
            Self::LazyImages => "lazy images",
        }
    }
}

impl fmt::Display for BootStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Ready,
    Skipped(&'static str),
    Failed(String),
}

#[derive(Debug, Default)]
pub struct BootReport {
    pub steps: Vec<(BootStep, StepOutcome)>,
    /// Ids given to server-rendered messages, in document order.
    pub adopted_flash: Vec<FlashId>,
}

impl BootReport {
    fn record(&mut self, step: BootStep, outcome: StepOutcome) {
        match &outcome {
            StepOutcome::Ready => log::debug!("{step}: ready"),
            StepOutcome::Skipped(reason) => log::warn!("{step}: skipped ({reason})"),
            StepOutcome::Failed(reason) => log::warn!("{step}: failed ({reason})"),
        }
        self.steps.push((step, outcome));
    }

    #[must_use]
    pub fn outcome(&self, step: BootStep) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|(recorded, _)| *recorded == step)
            .map(|(_, outcome)| outcome)
    }

    #[must_use]
    pub fn ready_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|(_, outcome)| *outcome == StepOutcome::Ready)
            .count()
    }
}

/// What a keydown handler should do after the dashboard saw the event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyResponse {
    pub prevent_default: bool,
    pub focus_search: bool,
}

pub struct Dashboard<T> {
    config: UiConfig,
    navigator: Rc<dyn Navigator>,
    spawn: Spawner,
    notifications: NotificationCenter,
    actions: NotebookActions,
    search: Option<SearchTrigger>,
    view: RefCell<Option<ViewToggle>>,
    charts: ChartPanel,
    chart_groups: RefCell<Vec<ChartButtonGroup>>,
    lazy: Option<LazyLoader<T>>,
}

impl<T: LazyTarget + 'static> Dashboard<T> {
    /// Initialize every component for `page`, in [`BootStep::ORDER`].
    pub fn boot(config: UiConfig, caps: Capabilities<T>, page: PageInventory<T>) -> (Rc<Self>, BootReport) {
        let mut report = BootReport::default();
        let PageInventory {
            upload_button,
            filter_controls,
            search_input,
            view_buttons,
            view_initially_active,
            view_container,
            flash_messages,
            chart_groups,
            fragment_links,
            lazy_images,
        } = page;

        report.record(
            BootStep::Sidebar,
            if upload_button || filter_controls > 0 {
                StepOutcome::Ready
            } else {
                StepOutcome::Skipped("no sidebar controls")
            },
        );

        let search = if search_input {
            report.record(BootStep::Search, StepOutcome::Ready);
            Some(SearchTrigger::new(
                Rc::clone(&caps.scheduler),
                config.search_debounce(),
                config.search_min_chars,
                search_dispatch(&config, Rc::clone(&caps.navigator)),
            ))
        } else {
            report.record(BootStep::Search, StepOutcome::Skipped("no search input"));
            None
        };

        let view = if view_buttons.is_empty() || !view_container {
            report.record(BootStep::ViewToggle, StepOutcome::Skipped("no view buttons or container"));
            None
        } else {
            report.record(BootStep::ViewToggle, StepOutcome::Ready);
            Some(ViewToggle::new(view_buttons, view_initially_active, config.grid_min_track_px))
        };

        let notifications = NotificationCenter::new(Rc::clone(&caps.scheduler), caps.flash_sink, config.flash_ttl());
        report.adopted_flash = flash_messages
            .into_iter()
            .map(|(text, severity)| notifications.adopt(text, severity))
            .collect();
        report.record(BootStep::Notifications, StepOutcome::Ready);

        let mut charts = ChartPanel::dashboard();
        let groups: Vec<ChartButtonGroup> = chart_groups
            .into_iter()
            .filter_map(|group| ChartButtonGroup::new(group.buttons, group.initially_active))
            .collect();
        report.record(BootStep::Charts, init_charts(&mut charts, caps.charts.as_deref()));

        report.record(
            BootStep::SmoothScroll,
            if fragment_links > 0 {
                StepOutcome::Ready
            } else {
                StepOutcome::Skipped("no same-page links")
            },
        );
        report.record(BootStep::Shortcuts, StepOutcome::Ready);

        match &caps.worker {
            Some(worker) => {
                let registration = register_update_worker(worker.as_ref(), &config.worker_script);
                (caps.spawn)(Box::pin(async move {
                    registration.await;
                }));
                report.record(BootStep::UpdateWorker, StepOutcome::Ready);
            }
            None => report.record(BootStep::UpdateWorker, StepOutcome::Skipped("service workers unsupported")),
        }

        let lazy = if lazy_images.is_empty() {
            report.record(BootStep::LazyImages, StepOutcome::Skipped("no deferred images"));
            None
        } else {
            let loader = LazyLoader::start(lazy_images, caps.visibility.as_deref(), config.lazy_fallback);
            report.record(BootStep::LazyImages, StepOutcome::Ready);
            Some(loader)
        };

        let actions = NotebookActions::new(caps.service, Rc::clone(&caps.navigator), notifications.clone());
        let dashboard = Rc::new(Self {
            config,
            navigator: caps.navigator,
            spawn: caps.spawn,
            notifications,
            actions,
            search,
            view: RefCell::new(view),
            charts,
            chart_groups: RefCell::new(groups),
            lazy,
        });
        log::info!(
            "dashboard ready: {}/{} steps, {} adopted messages",
            report.ready_count(),
            report.steps.len(),
            report.adopted_flash.len()
        );
        (dashboard, report)
    }

    #[must_use]
    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    #[must_use]
    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    #[must_use]
    pub fn lazy_images(&self) -> Option<&LazyLoader<T>> {
        self.lazy.as_ref()
    }

    #[must_use]
    pub fn charts_built(&self) -> &[String] {
        self.charts.built()
    }

    // ---- sidebar ----

    pub fn upload_clicked(&self) {
        self.navigator.navigate(&NavTarget::path(self.config.upload_path.as_str()));
    }

    pub fn filter_changed(&self, label: &str) {
        log::debug!("filter changed: {label}");
    }

    // ---- search ----

    /// Returns `true` if a dispatch is now pending.
    pub fn search_input(&self, raw: &str) -> bool {
        self.search.as_ref().is_some_and(|search| search.input(raw))
    }

    pub fn search_commit(&self, raw: &str) {
        if let Some(search) = &self.search {
            search.commit(raw);
        }
    }

    #[must_use]
    pub fn has_search(&self) -> bool {
        self.search.is_some()
    }

    // ---- view toggle ----

    pub fn select_view(&self, index: usize) -> Option<Layout> {
        self.view.borrow_mut().as_mut()?.select(index)
    }

    #[must_use]
    pub fn active_view_button(&self) -> Option<usize> {
        self.view.borrow().as_ref()?.active()
    }

    // ---- notifications ----

    pub fn notify(&self, text: &str, severity: Severity) -> FlashId {
        self.notifications.show(text, severity)
    }

    pub fn dismiss(&self, id: FlashId) -> bool {
        self.notifications.dismiss(id)
    }

    // ---- charts ----

    /// Click on button `index` of selector group `group`. Returns the
    /// selected value.
    pub fn chart_button_clicked(&self, group: usize, index: usize) -> Option<String> {
        let mut groups = self.chart_groups.borrow_mut();
        groups.get_mut(group)?.click(index).map(str::to_owned)
    }

    #[must_use]
    pub fn chart_group_active(&self, group: usize) -> Option<usize> {
        self.chart_groups.borrow().get(group).map(ChartButtonGroup::active)
    }

    // ---- notebook actions ----

    pub fn like(&self, id: &str) {
        (self.spawn)(self.actions.run(NotebookAction::Like, id));
    }

    pub fn download(&self, id: &str) {
        (self.spawn)(self.actions.run(NotebookAction::Download, id));
    }

    // ---- keyboard ----

    pub fn handle_key(&self, chord: &KeyChord) -> KeyResponse {
        match match_shortcut(chord) {
            Some(Shortcut::FocusSearch) => KeyResponse {
                prevent_default: true,
                focus_search: self.search.is_some(),
            },
            None => KeyResponse::default(),
        }
    }
}

fn search_dispatch(config: &UiConfig, navigator: Rc<dyn Navigator>) -> Rc<dyn Fn(String)> {
    let path = config.search_path.clone();
    let param = config.search_param.clone();
    Rc::new(move |query: String| {
        log::debug!("searching for {query:?}");
        match search_target(&path, &param, &query) {
            Some(target) => navigator.navigate(&target),
            None => log::debug!("empty query; staying on page"),
        }
    })
}

fn init_charts(panel: &mut ChartPanel, renderer: Option<&dyn ChartRenderer>) -> StepOutcome {
    let Some(renderer) = renderer else {
        return StepOutcome::Skipped("charting library unavailable");
    };
    let report = panel.initialize_if_present(renderer);
    if !report.failed.is_empty() {
        let names: Vec<&str> = report.failed.iter().map(|(id, _)| id.as_str()).collect();
        return StepOutcome::Failed(format!("could not render {}", names.join(", ")));
    }
    if report.rendered.is_empty() {
        return StepOutcome::Skipped("no chart mounts on page");
    }
    StepOutcome::Ready
}
