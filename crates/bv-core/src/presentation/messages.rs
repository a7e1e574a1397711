//! Status message text.
//!
//! The begin message is frozen as the base text of a session; each
//! `BuildProcess` tick appends a freshly computed extra suffix to it.

use std::fmt::Write;

use chrono::{DateTime, Duration, Local, Utc};

use crate::build::{BuildAction, BuildContext, BuildOutcome, BuildScope};
use crate::settings::{BuildMessagesSettings, DEFAULT_TIME_FORMAT};
use crate::solution::SolutionItem;

pub const BUILD_NOT_STARTED: &str = "Build not started";

fn action_verb(action: BuildAction) -> &'static str {
    match action {
        BuildAction::Build => "Build",
        BuildAction::Rebuild => "Rebuild",
        BuildAction::Clean => "Clean",
        BuildAction::Deploy => "Deploy",
    }
}

fn scope_target(scope: BuildScope, solution: &SolutionItem) -> String {
    match (scope, solution.name()) {
        (BuildScope::Solution, Some(name)) => format!("solution '{name}'"),
        (BuildScope::Solution, None) => "solution".to_string(),
        (BuildScope::Project, _) => "project".to_string(),
        (BuildScope::Batch, _) => "batch".to_string(),
    }
}

/// Falls back to `DEFAULT_TIME_FORMAT` when the configured format cannot render.
fn clock_time(at: DateTime<Utc>, settings: &BuildMessagesSettings) -> String {
    let local = at.with_timezone(&Local);
    let mut out = String::new();
    if write!(out, "{}", local.format(&settings.time_format)).is_ok() {
        return out;
    }
    tracing::warn!(
        format = %settings.time_format,
        "time format cannot be rendered, using default"
    );
    local.format(DEFAULT_TIME_FORMAT).to_string()
}

/// `m:ss` below one hour, `h:mm:ss` above.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

pub fn build_begin_major_message(
    solution: &SolutionItem,
    context: &BuildContext,
    settings: &BuildMessagesSettings,
) -> String {
    let mut message = format!(
        "{} {} started",
        action_verb(context.action()),
        scope_target(context.scope(), solution)
    );
    if let Some(started) = context.started_at() {
        message.push_str(" at ");
        message.push_str(&clock_time(started, settings));
    }
    message
}

/// Suffix appended to the frozen begin message on every tick.
pub fn build_begin_extra_message(
    solution: &SolutionItem,
    context: &BuildContext,
    settings: &BuildMessagesSettings,
    now: DateTime<Utc>,
) -> String {
    let mut parts = Vec::new();
    if settings.show_progress_in_extra_message {
        let touched = context.builded_projects().len();
        let finished = touched.saturating_sub(context.building().len());
        let total = match context.scope() {
            BuildScope::Solution if !solution.projects().is_empty() => solution.projects().len(),
            _ => touched,
        };
        if total > 0 {
            parts.push(format!("{finished} of {total} projects"));
        }
    }
    if settings.show_elapsed_in_extra_message {
        if let Some(elapsed) = context.elapsed(now) {
            parts.push(format_duration(elapsed));
        }
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

pub fn build_done_message(
    solution: &SolutionItem,
    context: &BuildContext,
    outcome: BuildOutcome,
    settings: &BuildMessagesSettings,
    now: DateTime<Utc>,
) -> String {
    let result = match outcome {
        BuildOutcome::Succeeded => "succeeded",
        BuildOutcome::HasErrors => "failed",
        BuildOutcome::Cancelled => "cancelled",
    };
    let mut message = format!(
        "{} {} {}",
        action_verb(context.action()),
        scope_target(context.scope(), solution),
        result
    );
    let finished = context.finished_at().unwrap_or(now);
    message.push_str(" at ");
    message.push_str(&clock_time(finished, settings));
    if let Some(elapsed) = context.elapsed(now) {
        message.push_str(&format!(" ({})", format_duration(elapsed)));
    }
    message
}
