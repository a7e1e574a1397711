use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::{ErrorsBox, ProjectEvent, ProjectState, ProjectStateMachine, ProjectTransitionError};
use crate::build::ProjectBuildInfo;
use crate::ids::ProjectId;

/// Shared reference to a project. Identity is [`ProjectItem::id`], never the pointer.
pub type ProjectHandle = Arc<ProjectItem>;

#[derive(Debug, Clone, Default)]
struct ProjectStatus {
    state: ProjectState,
    build_order: Option<u32>,
    build_start_time: Option<DateTime<Utc>>,
    build_finish_time: Option<DateTime<Utc>>,
    errors_box: ErrorsBox,
    /// Build session that last moved this project out of `Pending`.
    session: Option<u64>,
}

/// One project of the current solution.
///
/// The identity fields are immutable; the build status sits behind a
/// per-item lock so the elapsed-time ticker can read it while the engine
/// thread moves the project through its states.
#[derive(Debug)]
pub struct ProjectItem {
    id: ProjectId,
    unique_name: String,
    name: String,
    status: RwLock<ProjectStatus>,
}

/// Point-in-time copy of a project, handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSnapshot {
    pub id: ProjectId,
    pub unique_name: String,
    pub name: String,
    pub state: ProjectState,
    pub build_order: Option<u32>,
    pub build_start_time: Option<DateTime<Utc>>,
    pub build_finish_time: Option<DateTime<Utc>>,
    pub elapsed_ms: Option<i64>,
    pub errors: usize,
    pub warnings: usize,
    pub messages: usize,
}

impl ProjectItem {
    pub fn new(id: ProjectId, unique_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            unique_name: unique_name.into(),
            name: name.into(),
            status: RwLock::new(ProjectStatus::default()),
        }
    }

    pub fn arc(self) -> ProjectHandle {
        Arc::new(self)
    }

    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    pub fn unique_name(&self) -> &str {
        &self.unique_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ProjectState {
        self.read().state
    }

    pub fn build_order(&self) -> Option<u32> {
        self.read().build_order
    }

    pub fn build_start_time(&self) -> Option<DateTime<Utc>> {
        self.read().build_start_time
    }

    pub fn build_finish_time(&self) -> Option<DateTime<Utc>> {
        self.read().build_finish_time
    }

    pub fn errors_box(&self) -> ErrorsBox {
        self.read().errors_box.clone()
    }

    pub fn set_build_order(&self, order: Option<u32>) {
        self.write().build_order = order;
    }

    /// Apply a state machine event, keeping the timestamps consistent with the
    /// resulting state: entering `Building` stamps the start and clears the
    /// finish, entering a terminal state stamps the finish, a reset clears it.
    pub fn apply(
        &self,
        event: ProjectEvent,
        at: DateTime<Utc>,
    ) -> Result<ProjectState, ProjectTransitionError> {
        let mut status = self.write();
        Self::apply_locked(&mut status, event, at)
    }

    /// Move the project into `Building` for `session`.
    ///
    /// A project left in a terminal state by an earlier session is first reset
    /// to `Pending`; a terminal project of the same session is a duplicate
    /// begin and is rejected.
    pub fn enter_building(
        &self,
        session: u64,
        at: DateTime<Utc>,
    ) -> Result<(), ProjectTransitionError> {
        let mut status = self.write();
        if status.session != Some(session) && status.state.is_terminal() {
            Self::apply_locked(&mut status, ProjectEvent::Reset, at)?;
        }
        Self::apply_locked(&mut status, ProjectEvent::Begin, at)?;
        status.session = Some(session);
        Ok(())
    }

    /// Copy post-build data reported by the engine onto the item.
    pub fn update_post_build_properties(&self, info: &ProjectBuildInfo) {
        self.write().errors_box = info.errors_box.clone();
    }

    /// Elapsed build time: running time while building, total time once done.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Option<Duration> {
        let status = self.read();
        let start = status.build_start_time?;
        match (status.state, status.build_finish_time) {
            (ProjectState::Building, _) => Some(now - start),
            (_, Some(finish)) if finish >= start => Some(finish - start),
            _ => None,
        }
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> ProjectSnapshot {
        let elapsed_ms = self.elapsed(now).map(|d| d.num_milliseconds());
        let status = self.read();
        ProjectSnapshot {
            id: self.id.clone(),
            unique_name: self.unique_name.clone(),
            name: self.name.clone(),
            state: status.state,
            build_order: status.build_order,
            build_start_time: status.build_start_time,
            build_finish_time: status.build_finish_time,
            elapsed_ms,
            errors: status.errors_box.error_count(),
            warnings: status.errors_box.warning_count(),
            messages: status.errors_box.message_count(),
        }
    }

    fn apply_locked(
        status: &mut ProjectStatus,
        event: ProjectEvent,
        at: DateTime<Utc>,
    ) -> Result<ProjectState, ProjectTransitionError> {
        let next = ProjectStateMachine::transition(status.state, event)?;
        match next {
            ProjectState::Pending => status.build_finish_time = None,
            ProjectState::Building => {
                status.build_start_time = Some(at);
                status.build_finish_time = None;
            }
            _ => status.build_finish_time = Some(at),
        }
        status.state = next;
        Ok(next)
    }

    fn read(&self) -> RwLockReadGuard<'_, ProjectStatus> {
        self.status.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProjectStatus> {
        self.status.write().unwrap_or_else(PoisonError::into_inner)
    }
}
