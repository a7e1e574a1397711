use serde::Serialize;

use crate::build::BuildedProjects;
use crate::project::{ProjectHandle, ProjectState};

/// How indicators are reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetIndicatorMode {
    /// Zero the values, keep the indicators enabled.
    ResetValue,
    /// Zero the values and disable the indicators (no solution loaded).
    Disable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IndicatorValues {
    pub errors: usize,
    pub warnings: usize,
    pub messages: usize,
    pub succeeded_projects: usize,
    pub up_to_date_projects: usize,
    pub failed_projects: usize,
    pub skipped_projects: usize,
    pub cancelled_projects: usize,
    pub builded_projects: usize,
}

/// Aggregate metrics displayed next to the project list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Indicators {
    pub values: IndicatorValues,
    pub enabled: bool,
}

impl Default for Indicators {
    fn default() -> Self {
        Self {
            values: IndicatorValues::default(),
            enabled: true,
        }
    }
}

impl Indicators {
    pub fn reset(&mut self, mode: ResetIndicatorMode) {
        self.values = IndicatorValues::default();
        self.enabled = matches!(mode, ResetIndicatorMode::ResetValue);
    }

    /// Recompute every value from the visible projects and the session's
    /// touched projects.
    pub fn update(&mut self, projects: &[ProjectHandle], builded: &BuildedProjects) {
        let mut values = IndicatorValues {
            builded_projects: builded.len(),
            ..IndicatorValues::default()
        };
        for project in projects {
            let errors = project.errors_box();
            values.errors += errors.error_count();
            values.warnings += errors.warning_count();
            values.messages += errors.message_count();
            match project.state() {
                ProjectState::BuildDone => values.succeeded_projects += 1,
                ProjectState::UpToDate => values.up_to_date_projects += 1,
                ProjectState::BuildError => values.failed_projects += 1,
                ProjectState::Skipped => values.skipped_projects += 1,
                ProjectState::Cancelled => values.cancelled_projects += 1,
                ProjectState::Pending | ProjectState::Building => {}
            }
        }
        self.values = values;
        self.enabled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{BuildAction, BuildContext, BuildScope, ProjectBuildInfo};
    use crate::ids::ProjectId;
    use crate::project::{ErrorItem, ErrorLevel, ProjectItem, ProjectOutcome};
    use chrono::Utc;

    #[test]
    fn update_counts_states_and_diagnostics() {
        let now = Utc::now();
        let ctx = BuildContext::new();
        ctx.begin_session(BuildScope::Solution, BuildAction::Build, now);

        let projects: Vec<ProjectHandle> = ["a", "b", "c"]
            .iter()
            .map(|n| ProjectItem::new(ProjectId::new(*n), *n, *n).arc())
            .collect();
        ctx.begin_project(&projects[0], None, now);
        ctx.begin_project(&projects[1], None, now);
        ctx.end_project(&projects[0], ProjectOutcome::Success, &ProjectBuildInfo::default(), now)
            .unwrap();
        let info = ProjectBuildInfo::new(
            vec![
                ErrorItem::new(ErrorLevel::Error, "e"),
                ErrorItem::new(ErrorLevel::Warning, "w"),
            ]
            .into_iter()
            .collect(),
        );
        ctx.end_project(&projects[1], ProjectOutcome::Error, &info, now)
            .unwrap();

        let mut indicators = Indicators::default();
        indicators.update(&projects, &ctx.builded_projects());

        let values = indicators.values;
        assert_eq!(values.succeeded_projects, 1);
        assert_eq!(values.failed_projects, 1);
        assert_eq!(values.errors, 1);
        assert_eq!(values.warnings, 1);
        assert_eq!(values.builded_projects, 2);
        assert!(indicators.enabled);
    }

    #[test]
    fn reset_modes_zero_values() {
        let mut indicators = Indicators::default();
        indicators.values.errors = 3;

        indicators.reset(ResetIndicatorMode::Disable);
        assert_eq!(indicators.values, IndicatorValues::default());
        assert!(!indicators.enabled);

        indicators.reset(ResetIndicatorMode::ResetValue);
        assert!(indicators.enabled);
    }
}
