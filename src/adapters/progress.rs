use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::info;

use bv_core::ports::BuildListenerPort;
use bv_core::{BuildContext, BuildOutcome, ProjectBuildInfo, ProjectSnapshot};

/// Console counterpart of a task-bar progress indicator.
pub struct ProgressListener {
    total: usize,
    done: AtomicUsize,
}

impl ProgressListener {
    /// `total` is the number of projects the solution holds.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            done: AtomicUsize::new(0),
        }
    }

    pub fn done(&self) -> usize {
        self.done.load(Ordering::SeqCst)
    }

    /// Percentage of finished projects, capped at 100.
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        (self.done() * 100 / self.total).min(100)
    }
}

impl BuildListenerPort for ProgressListener {
    fn on_build_begin(&self, context: &BuildContext) {
        self.done.store(0, Ordering::SeqCst);
        info!(
            target: "buildvision::progress",
            session = context.session_id(),
            scope = ?context.scope(),
            action = ?context.action(),
            "0%"
        );
    }

    fn on_project_done(&self, project: &ProjectSnapshot, _info: &ProjectBuildInfo) {
        self.done.fetch_add(1, Ordering::SeqCst);
        info!(
            target: "buildvision::progress",
            project = %project.name,
            state = ?project.state,
            "{}%",
            self.percent()
        );
    }

    fn on_build_done(&self, _context: &BuildContext, outcome: BuildOutcome) {
        info!(target: "buildvision::progress", ?outcome, "build finished");
    }

    fn on_build_cancelled(&self, context: &BuildContext) {
        info!(
            target: "buildvision::progress",
            session = context.session_id(),
            "build cancelled"
        );
    }
}
