//! Build session domain module.
//!
//! A build session lasts from one `BuildBegin` to its matching `BuildDone`.
//! [`BuildContext`] aggregates the session: scope, action, cancellation and the
//! projects that are building or were touched.

mod building_projects;
mod context;
mod event;

use serde::{Deserialize, Serialize};

pub use building_projects::{BuildingProjects, ElapsedTime};
pub use context::{BuildContext, BuildContextError, BuildedProjects};
pub use event::{BuildEvent, ProjectBuildInfo, ProjectRef};

/// What the build targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildScope {
    #[default]
    Solution,
    Project,
    Batch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildAction {
    #[default]
    Build,
    Rebuild,
    Clean,
    Deploy,
}

impl BuildAction {
    /// Actions whose projects are ordered by their position in the build queue.
    pub fn is_queue_ordered(self) -> bool {
        matches!(self, BuildAction::Build | BuildAction::Rebuild)
    }
}

/// Aggregate classification of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildOutcome {
    Succeeded,
    HasErrors,
    Cancelled,
}

impl BuildOutcome {
    /// Errors win over cancellation: a build stopped after its first error
    /// still reports the error.
    pub fn classify(error_projects: usize, cancelled: bool) -> Self {
        if error_projects > 0 {
            BuildOutcome::HasErrors
        } else if cancelled {
            BuildOutcome::Cancelled
        } else {
            BuildOutcome::Succeeded
        }
    }

    pub fn is_failure(self) -> bool {
        !matches!(self, BuildOutcome::Succeeded)
    }
}
