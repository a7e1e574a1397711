//! Project build state machine.
//!
//! Defines a pure state transition function for a single project within a
//! build session.

use serde::{Deserialize, Serialize};

/// Project build state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectState {
    /// Not yet started in this session.
    #[default]
    Pending,
    Building,
    /// Built successfully.
    BuildDone,
    BuildError,
    /// Never reached `Building` before a solution-scope build completed.
    Skipped,
    UpToDate,
    Cancelled,
}

impl ProjectState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ProjectState::BuildDone
                | ProjectState::BuildError
                | ProjectState::Skipped
                | ProjectState::UpToDate
                | ProjectState::Cancelled
        )
    }

    pub fn is_error_state(self) -> bool {
        matches!(self, ProjectState::BuildError)
    }

    pub fn is_success_state(self) -> bool {
        matches!(self, ProjectState::BuildDone | ProjectState::UpToDate)
    }
}

/// How the build engine reported the end of a project build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectOutcome {
    Success,
    UpToDate,
    Error,
    Cancelled,
}

impl ProjectOutcome {
    pub fn is_error(self) -> bool {
        matches!(self, ProjectOutcome::Error)
    }
}

/// Events that drive a project's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectEvent {
    /// A new build session re-initializes the project.
    Reset,
    /// project-build-begin
    Begin,
    /// project-build-done
    Done(ProjectOutcome),
    /// solution-build-done reached the project while it was still pending.
    SolutionDone,
    /// build-cancelled
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("illegal project transition from {from:?} on {event:?}")]
pub struct ProjectTransitionError {
    pub from: ProjectState,
    pub event: ProjectEvent,
}

/// Pure project state machine.
pub struct ProjectStateMachine;

impl ProjectStateMachine {
    pub fn transition(
        state: ProjectState,
        event: ProjectEvent,
    ) -> Result<ProjectState, ProjectTransitionError> {
        use ProjectState::*;

        let next = match (state, event) {
            (_, ProjectEvent::Reset) => Pending,
            (Pending, ProjectEvent::Begin) => Building,
            (Building, ProjectEvent::Done(ProjectOutcome::Error)) => BuildError,
            (Building, ProjectEvent::Done(ProjectOutcome::UpToDate)) => UpToDate,
            (Building, ProjectEvent::Done(ProjectOutcome::Success)) => BuildDone,
            (Building, ProjectEvent::Done(ProjectOutcome::Cancelled)) => Cancelled,
            (Pending, ProjectEvent::SolutionDone) => Skipped,
            (Pending | Building, ProjectEvent::Cancelled) => Cancelled,
            (from, event) => return Err(ProjectTransitionError { from, event }),
        };
        Ok(next)
    }
}
