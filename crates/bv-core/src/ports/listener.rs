use crate::build::{BuildContext, BuildOutcome, ProjectBuildInfo};
use crate::project::ProjectSnapshot;

/// Observers of the build lifecycle (task-bar progress and similar).
///
/// Every hook has an empty default so listeners only implement what they need.
pub trait BuildListenerPort: Send + Sync {
    fn on_build_begin(&self, _context: &BuildContext) {}
    fn on_project_begin(&self, _project: &ProjectSnapshot) {}
    fn on_project_done(&self, _project: &ProjectSnapshot, _info: &ProjectBuildInfo) {}
    fn on_build_done(&self, _context: &BuildContext, _outcome: BuildOutcome) {}
    fn on_build_cancelled(&self, _context: &BuildContext) {}
}
