use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{debug, info, info_span, warn};

use bv_core::ports::{BuildEventHandler, BuildListenerPort};
use bv_core::presentation::{messages, ResetIndicatorMode, ResultIcon, StatusIcon, ViewStateSnapshot};
use bv_core::solution::display_name_of;
use bv_core::{
    BuildAction, BuildContext, BuildEvent, BuildOutcome, BuildScope, ControlSettings, ErrorItem,
    ErrorsBox, FindProjectProperty, ProjectBuildInfo, ProjectEvent, ProjectHandle, ProjectOutcome,
    ProjectRef, ProjectState, SolutionItem,
};

use super::guard::absorb;
use super::navigation::ErrorNavigationPolicy;
use super::view_state::ViewState;
use super::window_action::{WindowStateActionResolver, WindowTrigger};
use crate::deps::BuildMonitorDeps;

/// State touched by the engine thread and the ticker alike. Held only for
/// short computations, never across a port call.
#[derive(Default)]
struct CoordinatorState {
    view: ViewState,
    solution: SolutionItem,
    /// Begin message of the running session; ticks append the extra suffix.
    base_status_text: String,
    /// Set by BuildBegin, cleared by BuildDone. Ticks only write while set.
    running: bool,
}

/// Turns build engine events into build state, policy decisions and view
/// state.
///
/// Engine events arrive serialized on one thread; `BuildProcess` ticks come
/// from a timer and may overlap with them. Every handler runs behind the
/// log-and-continue guard so no fault reaches the engine.
pub struct BuildEventCoordinator {
    deps: BuildMonitorDeps,
    context: BuildContext,
    navigation: ErrorNavigationPolicy,
    state: Mutex<CoordinatorState>,
    /// Serializes status bar writes. Taken before `state`, never the other way.
    status_output: Mutex<()>,
}

impl BuildEventCoordinator {
    pub fn new(deps: BuildMonitorDeps) -> Self {
        let navigation = ErrorNavigationPolicy::new(deps.locator.clone());
        let mut state = CoordinatorState::default();
        state.solution.update_solution(deps.solution.as_ref());
        Self {
            deps,
            context: BuildContext::new(),
            navigation,
            state: Mutex::new(state),
            status_output: Mutex::new(()),
        }
    }

    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    pub fn settings(&self) -> &ControlSettings {
        &self.deps.settings
    }

    /// Whether the automatic navigation already happened in this session.
    pub fn is_navigated(&self) -> bool {
        self.navigation.is_navigated()
    }

    pub fn view_snapshot(&self) -> ViewStateSnapshot {
        let now = self.deps.clock.now();
        let state = self.lock_state();
        state.view.snapshot(state.solution.name(), now)
    }

    /// Look a project up in the visible list, then in the solution snapshot.
    pub fn find_project(&self, key: &str, property: FindProjectProperty) -> Option<ProjectHandle> {
        let state = self.lock_state();
        state
            .view
            .project_list()
            .iter()
            .find(|p| match property {
                FindProjectProperty::FullName => p.id().matches_path(key),
                FindProjectProperty::UniqueName => p.unique_name() == key,
            })
            .cloned()
            .or_else(|| state.solution.find_project(key, property))
    }

    /// Forward a cancellation request to the engine, once per session.
    pub fn request_cancel(&self) -> bool {
        if !self.context.cancel() {
            debug!("cancellation already requested");
            return false;
        }
        info!(session = self.context.session_id(), "requesting build cancellation");
        self.deps.engine.request_cancel();
        true
    }

    /// Route one engine event to its handler.
    pub fn dispatch(&self, event: &BuildEvent) {
        event.deliver(self);
    }

    pub fn on_solution_opened(&self) {
        let _span = info_span!("usecase.build_monitor.solution_opened").entered();
        absorb("solution_opened", || {
            {
                let mut state = self.lock_state();
                state.solution.update_solution(self.deps.solution.as_ref());
                state.view.reset_indicators(ResetIndicatorMode::ResetValue);
                info!(solution = state.solution.name().unwrap_or_default(), "solution opened");
            }
            self.publish();
            Ok(())
        });
    }

    pub fn on_solution_closed(&self) {
        let _span = info_span!("usecase.build_monitor.solution_closed").entered();
        absorb("solution_closed", || {
            {
                let mut state = self.lock_state();
                state.view.reset_to_not_started();
                state.solution.update_solution(self.deps.solution.as_ref());
                state.view.clear_project_list();
                state.view.reset_indicators(ResetIndicatorMode::Disable);
                state.base_status_text.clear();
                state.running = false;
            }
            self.publish();
            info!("solution closed");
            Ok(())
        });
    }

    fn handle_build_begin(&self, scope: BuildScope, action: BuildAction) {
        let settings = self.deps.settings.clone();
        absorb("build_begin", || {
            let now = self.deps.clock.now();
            let session = self.context.begin_session(scope, action, now);
            self.navigation.reset();

            self.apply_window_action(WindowTrigger::BuildBegin);

            let message = {
                let mut guard = self.lock_state();
                let state = &mut *guard;
                state.solution.update_solution(self.deps.solution.as_ref());

                let message = messages::build_begin_major_message(
                    &state.solution,
                    &self.context,
                    &settings.messages,
                );
                state.base_status_text = message.clone();
                state.running = true;
                state.view.status_text = message.clone();
                state.view.status_icon = StatusIcon::for_build_begin(action);
                state.view.result_icon = ResultIcon::None;
                state.view.current_project = None;

                if settings.general.fill_project_list_on_build_begin {
                    if let Err(err) = state.solution.update_projects(self.deps.solution.as_ref()) {
                        warn!(error = %err, "failed to enumerate solution projects");
                    }
                    state.view.set_project_list(state.solution.projects());
                } else {
                    state.view.clear_project_list();
                }
                state.view.reset_indicators(ResetIndicatorMode::ResetValue);
                message
            };

            self.output_in_status_bar(&message, true);
            self.publish();
            self.notify(|listener| listener.on_build_begin(&self.context));
            info!(session, ?scope, ?action, "build started");
            Ok(())
        });
    }

    fn handle_project_begin(&self, project: &ProjectRef, event_time: Option<DateTime<Utc>>) {
        absorb("project_begin", || {
            let at = event_time.unwrap_or_else(|| self.deps.clock.now());
            let id = project.id();
            let name = project
                .name
                .clone()
                .unwrap_or_else(|| display_name_of(&project.unique_name));
            let item = self
                .lock_state()
                .solution
                .resolve_or_insert(&id, &project.unique_name, &name);

            let order = (self.context.scope() == BuildScope::Solution
                && self.context.action().is_queue_ordered())
            .then(|| self.context.next_queue_position());

            if !self.context.begin_project(&item, order, at) {
                return Ok(());
            }

            {
                let mut state = self.lock_state();
                state.view.add_project_if_absent(&item);
                state.view.current_project = Some(item.clone());
            }
            self.publish();

            let snapshot = item.snapshot(at);
            self.notify(|listener| listener.on_project_begin(&snapshot));
            debug!(project = %id, build_order = ?order, "project build started");
            Ok(())
        });
    }

    fn handle_project_done(
        &self,
        project: &ProjectRef,
        outcome: ProjectOutcome,
        info: Option<ProjectBuildInfo>,
    ) {
        if outcome.is_error() && self.deps.settings.general.stop_build_after_first_error {
            absorb("project_done.cancel", || {
                self.request_cancel();
                Ok(())
            });
        }

        let now = self.deps.clock.now();
        let mut finished: Option<(ProjectHandle, ProjectBuildInfo)> = None;

        absorb("project_done", || {
            let id = project.id();
            let item = self.find_project(id.as_str(), FindProjectProperty::FullName);
            let Some(item) = item else {
                anyhow::bail!("project {id} finished without being known");
            };
            let info = info.unwrap_or_else(|| ProjectBuildInfo::new(self.context.diagnostics_of(&id)));
            let state = self.context.end_project(&item, outcome, &info, now)?;

            {
                let mut view_state = self.lock_state();
                view_state.view.add_project_if_absent(&item);
                if view_state.view.is_current(&id) {
                    view_state.view.current_project = self.context.building().last();
                }
            }
            debug!(project = %id, ?state, "project build finished");
            finished = Some((item, info));
            Ok(())
        });

        absorb("project_done.indicators", || {
            {
                let mut state = self.lock_state();
                state.view.update_indicators(&self.context.builded_projects());
            }
            self.publish();
            Ok(())
        });

        absorb("project_done.listeners", || {
            if let Some((item, info)) = &finished {
                let snapshot = item.snapshot(now);
                self.notify(|listener| listener.on_project_done(&snapshot, info));
            }
            Ok(())
        });
    }

    fn handle_build_process(&self) {
        absorb("build_process", || {
            if !self.context.is_in_progress() {
                return Ok(());
            }
            let now = self.deps.clock.now();
            let _output = self.lock_status_output();
            let message = {
                let mut state = self.lock_state();
                if !state.running {
                    debug!("tick outside a running session ignored");
                    return Ok(());
                }
                let extra = messages::build_begin_extra_message(
                    &state.solution,
                    &self.context,
                    &self.deps.settings.messages,
                    now,
                );
                let message = format!("{}{}", state.base_status_text, extra);
                state.view.status_text = message.clone();
                message
            };
            self.write_status_bar(&message, true);

            let ticks = self.context.elapsed_tick(now);
            self.deps.view.publish_elapsed(&ticks);
            self.publish();
            Ok(())
        });
    }

    fn handle_build_done(&self) {
        let settings = self.deps.settings.clone();
        absorb("build_done", || {
            let now = self.deps.clock.now();
            self.context.finish_session(now);
            if self.context.is_cancelled() {
                let cancelled = self.context.cancel_building(now);
                if !cancelled.is_empty() {
                    info!(projects = cancelled.len(), "in-flight projects cancelled");
                }
            }
            let builded = self.context.builded_projects();

            let (outcome, message) = {
                let mut state = self.lock_state();
                state.running = false;
                if self.context.scope() == BuildScope::Solution {
                    mark_pending_as_skipped(&state, now);
                }
                state.view.update_indicators(&builded);

                let error_projects = builded.iter().filter(|p| p.state().is_error_state()).count();
                let outcome = BuildOutcome::classify(error_projects, self.context.is_cancelled());
                let message = messages::build_done_message(
                    &state.solution,
                    &self.context,
                    outcome,
                    &settings.messages,
                    now,
                );
                let (status_icon, result_icon) =
                    StatusIcon::for_build_done(outcome, state.view.has_warnings());
                state.view.status_text = message.clone();
                state.view.status_icon = status_icon;
                state.view.result_icon = result_icon;
                state.view.current_project = None;
                (outcome, message)
            };

            self.output_in_status_bar(&message, false);
            self.publish();
            self.notify(|listener| listener.on_build_done(&self.context, outcome));
            self.apply_window_action(WindowTrigger::BuildDone(outcome));

            let errors: Vec<ErrorsBox> = builded.iter().map(|p| p.errors_box()).collect();
            let navigated = self.navigation.on_build_done(
                builded.build_without_errors(),
                errors.iter().flat_map(|b| b.all()),
                &settings.general,
                |path| self.is_known_project(path),
            );
            info!(
                session = self.context.session_id(),
                ?outcome,
                projects = builded.len(),
                navigated,
                "build finished"
            );
            Ok(())
        });
    }

    fn handle_build_cancelled(&self) {
        absorb("build_cancelled", || {
            self.notify(|listener| listener.on_build_cancelled(&self.context));
            info!(session = self.context.session_id(), "build cancelled");
            Ok(())
        });
    }

    fn handle_error_raised(&self, project: &ProjectRef, error: &ErrorItem) {
        let settings = self.deps.settings.clone();
        absorb("error_raised", || {
            let id = project.id();
            let errors = self.context.record_diagnostic(&id, error.clone());

            if ErrorNavigationPolicy::should_cancel(error.level, self.context.action(), &settings.general)
            {
                self.request_cancel();
            }

            let navigated = self.navigation.on_error_raised(
                error.level,
                errors.all(),
                &settings.general,
                |path| self.is_known_project(path),
            );
            if navigated {
                info!(project = %id, "navigated to build failure");
            }
            Ok(())
        });
    }

    fn is_known_project(&self, full_path: &str) -> bool {
        self.find_project(full_path, FindProjectProperty::FullName)
            .is_some()
    }

    fn apply_window_action(&self, trigger: WindowTrigger) {
        let action = WindowStateActionResolver::resolve(&self.deps.settings.window, trigger);
        if let Err(err) = WindowStateActionResolver::apply(action, self.deps.tool_window.as_ref()) {
            warn!(?trigger, %action, error = %err, "window action failed");
        }
    }

    fn output_in_status_bar(&self, text: &str, freeze: bool) {
        let _output = self.lock_status_output();
        self.write_status_bar(text, freeze);
    }

    /// Caller holds the status output lock.
    fn write_status_bar(&self, text: &str, freeze: bool) {
        if !self.deps.settings.general.enable_status_bar_output {
            return;
        }
        let Some(status_bar) = &self.deps.status_bar else {
            return;
        };
        status_bar.freeze(false);
        status_bar.set_text(text);
        if freeze {
            status_bar.freeze(true);
        }
    }

    /// Copy the view under the lock, publish outside it.
    fn publish(&self) {
        let snapshot = self.view_snapshot();
        self.deps.view.publish(&snapshot);
    }

    fn notify<F>(&self, f: F)
    where
        F: Fn(&dyn BuildListenerPort),
    {
        for listener in &self.deps.listeners {
            f(listener.as_ref());
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, CoordinatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_status_output(&self) -> MutexGuard<'_, ()> {
        self.status_output.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Projects of a solution build that never started end up `Skipped`.
fn mark_pending_as_skipped(state: &CoordinatorState, at: DateTime<Utc>) {
    let candidates = state
        .view
        .project_list()
        .iter()
        .chain(state.solution.projects());
    for project in candidates {
        if project.state() != ProjectState::Pending {
            continue;
        }
        if let Err(err) = project.apply(ProjectEvent::SolutionDone, at) {
            warn!(project = %project.id(), error = %err, "failed to mark project skipped");
        }
    }
}

impl BuildEventHandler for BuildEventCoordinator {
    fn on_build_begin(&self, scope: BuildScope, action: BuildAction) {
        let _span = info_span!("usecase.build_monitor.build_begin", ?scope, ?action).entered();
        self.handle_build_begin(scope, action);
    }

    fn on_build_process(&self) {
        let _span = info_span!("usecase.build_monitor.build_process").entered();
        self.handle_build_process();
    }

    fn on_build_done(&self) {
        let _span = info_span!("usecase.build_monitor.build_done").entered();
        self.handle_build_done();
    }

    fn on_build_cancelled(&self) {
        let _span = info_span!("usecase.build_monitor.build_cancelled").entered();
        self.handle_build_cancelled();
    }

    fn on_project_begin(&self, project: &ProjectRef, event_time: Option<DateTime<Utc>>) {
        let _span =
            info_span!("usecase.build_monitor.project_begin", project = %project.unique_name)
                .entered();
        self.handle_project_begin(project, event_time);
    }

    fn on_project_done(
        &self,
        project: &ProjectRef,
        outcome: ProjectOutcome,
        info: Option<ProjectBuildInfo>,
    ) {
        let _span = info_span!(
            "usecase.build_monitor.project_done",
            project = %project.unique_name,
            ?outcome
        )
        .entered();
        self.handle_project_done(project, outcome, info);
    }

    fn on_error_raised(&self, project: &ProjectRef, error: &ErrorItem) {
        let _span = info_span!(
            "usecase.build_monitor.error_raised",
            project = %project.unique_name,
            level = ?error.level
        )
        .entered();
        self.handle_error_raised(project, error);
    }
}
