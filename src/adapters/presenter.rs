use std::sync::{Mutex, PoisonError};

use tracing::trace;

use bv_core::build::ElapsedTime;
use bv_core::ports::ViewStatePort;
use bv_core::presentation::messages::format_duration;
use bv_core::presentation::{ResultIcon, ViewStateSnapshot};

/// Keeps the last published view; the shell prints it when the replay ends.
#[derive(Default)]
pub struct SummaryView {
    last: Mutex<Option<ViewStateSnapshot>>,
}

impl SummaryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<ViewStateSnapshot> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ViewStatePort for SummaryView {
    fn publish(&self, view: &ViewStateSnapshot) {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(view.clone());
    }

    fn publish_elapsed(&self, ticks: &[ElapsedTime]) {
        for tick in ticks {
            trace!(project = %tick.project, elapsed = %format_duration(tick.elapsed), "building");
        }
    }
}

fn result_label(icon: ResultIcon) -> &'static str {
    match icon {
        ResultIcon::None => "-",
        ResultIcon::Success => "ok",
        ResultIcon::SuccessWithWarnings => "ok (warnings)",
        ResultIcon::Errors => "FAILED",
        ResultIcon::Cancelled => "cancelled",
    }
}

/// Plain-text rendering of the tool window.
pub fn render_summary(view: &ViewStateSnapshot) -> String {
    let mut out = String::new();
    if let Some(name) = &view.solution_name {
        out.push_str(&format!("Solution: {name}\n"));
    }
    out.push_str(&format!(
        "Status:   {} [{}]\n",
        view.status_text,
        result_label(view.result_icon)
    ));

    if !view.project_list.is_empty() {
        out.push('\n');
        for project in &view.project_list {
            let order = project
                .build_order
                .map(|o| format!("{o:>3}."))
                .unwrap_or_else(|| "    ".to_string());
            let elapsed = project
                .elapsed_ms
                .map(|ms| format_duration(chrono::Duration::milliseconds(ms)))
                .unwrap_or_default();
            out.push_str(&format!(
                "{order} {:<24} {:<10} {:>6}  E:{} W:{}\n",
                project.name,
                format!("{:?}", project.state),
                elapsed,
                project.errors,
                project.warnings
            ));
        }
    }

    let values = &view.indicators.values;
    if view.indicators.enabled {
        out.push_str(&format!(
            "\nErrors: {}  Warnings: {}  Messages: {}\n",
            values.errors, values.warnings, values.messages
        ));
        out.push_str(&format!(
            "Succeeded: {}  Up-to-date: {}  Failed: {}  Skipped: {}  Cancelled: {}  Built: {}\n",
            values.succeeded_projects,
            values.up_to_date_projects,
            values.failed_projects,
            values.skipped_projects,
            values.cancelled_projects,
            values.builded_projects
        ));
    }
    out
}
