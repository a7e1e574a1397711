use crate::build::{BuildAction, BuildScope, ProjectBuildInfo, ProjectRef};
use crate::project::{ErrorItem, ProjectOutcome};
use chrono::{DateTime, Utc};

/// Control surface the build engine exposes to the monitor.
pub trait BuildEngineControlPort: Send + Sync {
    /// Ask the engine to stop the build. Idempotent and advisory: projects
    /// already building may still finish.
    fn request_cancel(&self);
}

/// The seven build lifecycle callbacks, registered once against the engine.
///
/// Implementations must not panic or block: a fault while handling an event
/// is absorbed at the handler boundary.
pub trait BuildEventHandler: Send + Sync {
    fn on_build_begin(&self, scope: BuildScope, action: BuildAction);
    /// Periodic tick; may run concurrently with the other callbacks.
    fn on_build_process(&self);
    fn on_build_done(&self);
    fn on_build_cancelled(&self);
    fn on_project_begin(&self, project: &ProjectRef, event_time: Option<DateTime<Utc>>);
    fn on_project_done(
        &self,
        project: &ProjectRef,
        outcome: ProjectOutcome,
        info: Option<ProjectBuildInfo>,
    );
    fn on_error_raised(&self, project: &ProjectRef, error: &ErrorItem);
}
