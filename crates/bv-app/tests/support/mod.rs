#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex, Once};

use chrono::{DateTime, Duration, TimeZone, Utc};

use bv_app::{BuildEventCoordinator, BuildMonitorDeps};
use bv_core::build::ElapsedTime;
use bv_core::ports::*;
use bv_core::presentation::ViewStateSnapshot;
use bv_core::{
    BuildContext, BuildOutcome, ControlSettings, ErrorItem, ErrorLevel, FindProjectProperty,
    ProjectBuildInfo, ProjectHandle, ProjectRef, ProjectSnapshot, ProjectState,
};

pub const SOLUTION_NAME: &str = "App";

pub fn project_path(name: &str) -> String {
    format!("C:/src/{name}/{name}.vcxproj")
}

pub fn project_ref(name: &str) -> ProjectRef {
    ProjectRef::new(format!("{name}\\{name}.vcxproj")).with_full_path(project_path(name))
}

pub fn error_in(name: &str, text: &str) -> ErrorItem {
    ErrorItem::new(ErrorLevel::Error, text)
        .with_file(format!("C:/src/{name}/main.cpp"))
        .with_project_file(project_path(name))
        .with_position(10, 5)
}

// ---------------------------------------------------------------------------
// Recording mocks
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingEngine {
    pub cancels: AtomicUsize,
    /// Project whose state is captured when a cancel request arrives.
    pub watched: Mutex<Option<ProjectHandle>>,
    pub watched_states: Mutex<Vec<ProjectState>>,
}

impl BuildEngineControlPort for RecordingEngine {
    fn request_cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        if let Some(project) = self.watched.lock().unwrap().as_ref() {
            self.watched_states.lock().unwrap().push(project.state());
        }
    }
}

pub struct FixedSolution {
    pub info: Mutex<Option<SolutionInfo>>,
    pub projects: Vec<ProjectDescriptor>,
}

impl FixedSolution {
    pub fn with_projects(names: &[&str]) -> Self {
        Self {
            info: Mutex::new(Some(SolutionInfo {
                name: SOLUTION_NAME.to_string(),
                full_path: "C:/src/App.sln".to_string(),
            })),
            projects: names
                .iter()
                .map(|name| ProjectDescriptor {
                    unique_name: format!("{name}\\{name}.vcxproj"),
                    full_path: project_path(name),
                    name: Some(name.to_string()),
                })
                .collect(),
        }
    }

    pub fn close(&self) {
        *self.info.lock().unwrap() = None;
    }
}

impl SolutionPort for FixedSolution {
    fn current_solution(&self) -> Option<SolutionInfo> {
        self.info.lock().unwrap().clone()
    }

    fn enumerate_projects(&self) -> anyhow::Result<Vec<ProjectDescriptor>> {
        Ok(self.projects.clone())
    }
}

/// Navigator answers are consumed from a queue; an empty queue means success.
#[derive(Default)]
pub struct RecordingLocator {
    pub lookups: AtomicUsize,
    pub navigations: Arc<Mutex<Vec<String>>>,
    pub answers: Arc<Mutex<VecDeque<Result<bool, String>>>>,
}

impl RecordingLocator {
    pub fn answer(&self, answer: Result<bool, String>) {
        self.answers.lock().unwrap().push_back(answer);
    }

    pub fn navigated_texts(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }
}

struct RecordingNavigator {
    navigations: Arc<Mutex<Vec<String>>>,
    answers: Arc<Mutex<VecDeque<Result<bool, String>>>>,
}

impl DiagnosticNavigatorPort for RecordingNavigator {
    fn navigate_to(&self, item: &ErrorItem) -> Result<bool, NavigationError> {
        self.navigations.lock().unwrap().push(item.text.clone());
        match self.answers.lock().unwrap().pop_front() {
            None | Some(Ok(true)) => Ok(true),
            Some(Ok(false)) => Ok(false),
            Some(Err(message)) => Err(NavigationError::Failed(message)),
        }
    }
}

impl ProjectLocatorPort for RecordingLocator {
    fn find_project(
        &self,
        _full_path: &str,
    ) -> Result<Option<Arc<dyn DiagnosticNavigatorPort>>, LocatorError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(Some(Arc::new(RecordingNavigator {
            navigations: self.navigations.clone(),
            answers: self.answers.clone(),
        })))
    }
}

#[derive(Default)]
pub struct RecordingStatusBar {
    pub calls: Mutex<Vec<String>>,
}

impl RecordingStatusBar {
    pub fn texts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| c.strip_prefix("text:").map(str::to_string))
            .collect()
    }
}

impl StatusBarPort for RecordingStatusBar {
    fn set_text(&self, text: &str) {
        self.calls.lock().unwrap().push(format!("text:{text}"));
    }

    fn freeze(&self, frozen: bool) {
        self.calls.lock().unwrap().push(format!("freeze:{frozen}"));
    }
}

#[derive(Default)]
pub struct RecordingWindow {
    pub calls: Mutex<Vec<&'static str>>,
}

impl ToolWindowPort for RecordingWindow {
    fn show(&self) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push("show");
        Ok(())
    }

    fn show_no_activate(&self) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push("show_no_activate");
        Ok(())
    }

    fn hide(&self) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push("hide");
        Ok(())
    }

    fn close(&self) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push("close");
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingView {
    pub published: AtomicUsize,
    pub last: Mutex<Option<ViewStateSnapshot>>,
    pub elapsed_ticks: Mutex<Vec<Vec<ElapsedTime>>>,
}

impl RecordingView {
    pub fn last(&self) -> ViewStateSnapshot {
        self.last.lock().unwrap().clone().unwrap_or_default()
    }
}

impl ViewStatePort for RecordingView {
    fn publish(&self, view: &ViewStateSnapshot) {
        self.published.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(view.clone());
    }

    fn publish_elapsed(&self, ticks: &[ElapsedTime]) {
        self.elapsed_ticks.lock().unwrap().push(ticks.to_vec());
    }
}

#[derive(Default)]
pub struct RecordingListener {
    pub events: Mutex<Vec<String>>,
    pub outcomes: Mutex<Vec<BuildOutcome>>,
}

impl RecordingListener {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl BuildListenerPort for RecordingListener {
    fn on_build_begin(&self, _context: &BuildContext) {
        self.events.lock().unwrap().push("build_begin".to_string());
    }

    fn on_project_begin(&self, project: &ProjectSnapshot) {
        self.events
            .lock()
            .unwrap()
            .push(format!("project_begin:{}", project.name));
    }

    fn on_project_done(&self, project: &ProjectSnapshot, info: &ProjectBuildInfo) {
        self.events.lock().unwrap().push(format!(
            "project_done:{}:{:?}:{}",
            project.name,
            project.state,
            info.errors_box.count(ErrorLevel::Error)
        ));
    }

    fn on_build_done(&self, _context: &BuildContext, outcome: BuildOutcome) {
        self.events.lock().unwrap().push("build_done".to_string());
        self.outcomes.lock().unwrap().push(outcome);
    }

    fn on_build_cancelled(&self, _context: &BuildContext) {
        self.events.lock().unwrap().push("build_cancelled".to_string());
    }
}

/// Pauses one clock read until the test lets it continue.
pub struct ClockGate {
    entered: Barrier,
    released: Barrier,
}

impl ClockGate {
    /// Block until the gated read has started.
    pub fn wait_entered(&self) {
        self.entered.wait();
    }

    pub fn release(&self) {
        self.released.wait();
    }
}

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
    gate: Mutex<Option<Arc<ClockGate>>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()),
            gate: Mutex::new(None),
        }
    }

    pub fn advance(&self, seconds: i64) {
        *self.now.lock().unwrap() += Duration::seconds(seconds);
    }

    /// The next `now()` call, from any thread, parks on the returned gate.
    pub fn hold_next_read(&self) -> Arc<ClockGate> {
        let gate = Arc::new(ClockGate {
            entered: Barrier::new(2),
            released: Barrier::new(2),
        });
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }
}

impl ClockPort for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.entered.wait();
            gate.released.wait();
        }
        *self.now.lock().unwrap()
    }
}

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

/// Route coordinator logs to the test harness; `RUST_LOG` selects the level.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

pub struct Mocks {
    pub engine: Arc<RecordingEngine>,
    pub solution: Arc<FixedSolution>,
    pub locator: Arc<RecordingLocator>,
    pub status_bar: Arc<RecordingStatusBar>,
    pub window: Arc<RecordingWindow>,
    pub view: Arc<RecordingView>,
    pub listener: Arc<RecordingListener>,
    pub clock: Arc<ManualClock>,
}

pub fn fixture(settings: ControlSettings) -> (Mocks, BuildEventCoordinator) {
    fixture_with_listeners(settings, Vec::new())
}

pub fn fixture_with_listeners(
    settings: ControlSettings,
    extra_listeners: Vec<Arc<dyn BuildListenerPort>>,
) -> (Mocks, BuildEventCoordinator) {
    let mocks = mocks();
    let coordinator = coordinator(&mocks, settings, mocks.engine.clone(), extra_listeners);
    (mocks, coordinator)
}

/// Fixture whose engine control port is supplied by the test.
pub fn fixture_with_engine(
    settings: ControlSettings,
    engine: Arc<dyn BuildEngineControlPort>,
) -> (Mocks, BuildEventCoordinator) {
    let mocks = mocks();
    let coordinator = coordinator(&mocks, settings, engine, Vec::new());
    (mocks, coordinator)
}

fn mocks() -> Mocks {
    init_tracing();
    Mocks {
        engine: Arc::new(RecordingEngine::default()),
        solution: Arc::new(FixedSolution::with_projects(&["A", "B", "C"])),
        locator: Arc::new(RecordingLocator::default()),
        status_bar: Arc::new(RecordingStatusBar::default()),
        window: Arc::new(RecordingWindow::default()),
        view: Arc::new(RecordingView::default()),
        listener: Arc::new(RecordingListener::default()),
        clock: Arc::new(ManualClock::new()),
    }
}

fn coordinator(
    mocks: &Mocks,
    settings: ControlSettings,
    engine: Arc<dyn BuildEngineControlPort>,
    extra_listeners: Vec<Arc<dyn BuildListenerPort>>,
) -> BuildEventCoordinator {
    let mut listeners = extra_listeners;
    listeners.push(mocks.listener.clone());

    BuildEventCoordinator::new(BuildMonitorDeps {
        settings: Arc::new(settings),
        engine,
        solution: mocks.solution.clone(),
        locator: mocks.locator.clone(),
        status_bar: Some(mocks.status_bar.clone()),
        tool_window: mocks.window.clone(),
        view: mocks.view.clone(),
        listeners,
        clock: mocks.clock.clone(),
    })
}

pub fn project(coordinator: &BuildEventCoordinator, name: &str) -> ProjectHandle {
    coordinator
        .find_project(&project_path(name), FindProjectProperty::FullName)
        .unwrap_or_else(|| panic!("project {name} is not known"))
}

pub fn state_of(coordinator: &BuildEventCoordinator, name: &str) -> ProjectState {
    project(coordinator, name).state()
}
