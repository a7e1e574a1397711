use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use super::{BuildAction, BuildScope, BuildingProjects, ElapsedTime, ProjectBuildInfo};
use crate::ids::ProjectId;
use crate::project::{
    ErrorItem, ErrorsBox, ProjectEvent, ProjectHandle, ProjectOutcome, ProjectState,
    ProjectTransitionError,
};

#[derive(Debug, thiserror::Error)]
pub enum BuildContextError {
    #[error("project {0} is already building")]
    AlreadyBuilding(ProjectId),
    #[error("project {0} is not building")]
    NotBuilding(ProjectId),
    #[error(transparent)]
    Transition(#[from] ProjectTransitionError),
}

/// Every project touched by the session, in the order it started building.
#[derive(Debug, Clone, Default)]
pub struct BuildedProjects {
    items: Vec<ProjectHandle>,
}

impl BuildedProjects {
    fn insert(&mut self, project: &ProjectHandle) -> bool {
        if self.items.iter().any(|p| p.id() == project.id()) {
            return false;
        }
        self.items.push(project.clone());
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectHandle> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn count_in(&self, state: ProjectState) -> usize {
        self.items.iter().filter(|p| p.state() == state).count()
    }

    /// No touched project failed and none reported an error diagnostic.
    pub fn build_without_errors(&self) -> bool {
        self.items
            .iter()
            .all(|p| !p.state().is_error_state() && p.errors_box().error_count() == 0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct SessionInfo {
    id: u64,
    scope: BuildScope,
    action: BuildAction,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

/// In-flight build session.
///
/// Each piece of state has its own lock so the elapsed-time ticker only ever
/// contends on the building-projects collection.
#[derive(Debug, Default)]
pub struct BuildContext {
    session: RwLock<SessionInfo>,
    cancelled: AtomicBool,
    building: BuildingProjects,
    builded: Mutex<BuildedProjects>,
    diagnostics: Mutex<HashMap<ProjectId, ErrorsBox>>,
}

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh session. Cancellation and the project collections of the
    /// previous session are discarded.
    pub fn begin_session(&self, scope: BuildScope, action: BuildAction, at: DateTime<Utc>) -> u64 {
        let id = {
            let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
            *session = SessionInfo {
                id: session.id + 1,
                scope,
                action,
                started_at: Some(at),
                finished_at: None,
            };
            session.id
        };
        self.cancelled.store(false, Ordering::SeqCst);
        self.building.clear();
        *lock(&self.builded) = BuildedProjects::default();
        lock(&self.diagnostics).clear();
        debug!(session = id, ?scope, ?action, "build session started");
        id
    }

    pub fn finish_session(&self, at: DateTime<Utc>) {
        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
        session.finished_at = Some(at);
    }

    pub fn session_id(&self) -> u64 {
        self.read_session().id
    }

    pub fn scope(&self) -> BuildScope {
        self.read_session().scope
    }

    pub fn action(&self) -> BuildAction {
        self.read_session().action
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.read_session().started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.read_session().finished_at
    }

    pub fn is_in_progress(&self) -> bool {
        let session = self.read_session();
        session.started_at.is_some() && session.finished_at.is_none()
    }

    /// Session duration, running while the session is open.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Option<Duration> {
        let session = self.read_session();
        let start = session.started_at?;
        Some(session.finished_at.unwrap_or(now) - start)
    }

    /// Position the next project would take in the build queue (1-based).
    pub fn next_queue_position(&self) -> u32 {
        lock(&self.builded).len() as u32 + 1
    }

    /// Move `project` to `Building` and track it.
    ///
    /// Inconsistent events (duplicate begin, project already terminal in this
    /// session) are logged and ignored; returns whether the project was started.
    pub fn begin_project(
        &self,
        project: &ProjectHandle,
        order: Option<u32>,
        at: DateTime<Utc>,
    ) -> bool {
        match self.try_begin_project(project, order, at) {
            Ok(()) => true,
            Err(err) => {
                warn!(project = %project.id(), error = %err, "ignoring project begin");
                false
            }
        }
    }

    fn try_begin_project(
        &self,
        project: &ProjectHandle,
        order: Option<u32>,
        at: DateTime<Utc>,
    ) -> Result<(), BuildContextError> {
        if self.building.contains(project.id()) {
            return Err(BuildContextError::AlreadyBuilding(project.id().clone()));
        }
        project.enter_building(self.session_id(), at)?;
        if order.is_some() {
            project.set_build_order(order);
        }
        self.building.insert(project.clone());
        lock(&self.builded).insert(project);
        Ok(())
    }

    /// Put `project` in its terminal state and stop tracking it as building.
    ///
    /// The project leaves the building collection before its state changes so
    /// a concurrent tick never observes a terminal project there.
    pub fn end_project(
        &self,
        project: &ProjectHandle,
        outcome: ProjectOutcome,
        info: &ProjectBuildInfo,
        at: DateTime<Utc>,
    ) -> Result<ProjectState, BuildContextError> {
        if self.building.remove(project.id()).is_none() {
            return Err(BuildContextError::NotBuilding(project.id().clone()));
        }
        let state = project.apply(ProjectEvent::Done(outcome), at)?;
        project.update_post_build_properties(info);
        Ok(state)
    }

    /// Request cancellation. Returns `true` only for the first request of the session.
    pub fn cancel(&self) -> bool {
        !self.cancelled.swap(true, Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Move every project still building to `Cancelled` and stop tracking it.
    ///
    /// Used when a cancelled session ends without a done event for some
    /// projects. Returns the projects that were cancelled.
    pub fn cancel_building(&self, at: DateTime<Utc>) -> Vec<ProjectHandle> {
        let in_flight = self.building.drain();
        for project in &in_flight {
            if let Err(err) = project.apply(ProjectEvent::Cancelled, at) {
                warn!(project = %project.id(), error = %err, "failed to cancel project");
            }
        }
        in_flight
    }

    pub fn building(&self) -> &BuildingProjects {
        &self.building
    }

    pub fn elapsed_tick(&self, now: DateTime<Utc>) -> Vec<ElapsedTime> {
        self.building.elapsed_tick(now)
    }

    pub fn builded_projects(&self) -> BuildedProjects {
        lock(&self.builded).clone()
    }

    /// Record a diagnostic raised while `project` builds; returns the
    /// project's diagnostics so far.
    pub fn record_diagnostic(&self, project: &ProjectId, item: ErrorItem) -> ErrorsBox {
        let mut diagnostics = lock(&self.diagnostics);
        let errors = diagnostics.entry(project.clone()).or_default();
        errors.push(item);
        errors.clone()
    }

    pub fn diagnostics_of(&self, project: &ProjectId) -> ErrorsBox {
        lock(&self.diagnostics)
            .get(project)
            .cloned()
            .unwrap_or_default()
    }

    fn read_session(&self) -> SessionInfo {
        *self.session.read().unwrap_or_else(PoisonError::into_inner)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
