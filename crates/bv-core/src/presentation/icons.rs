use serde::Serialize;

use crate::build::{BuildAction, BuildOutcome};

/// Main state image of the tool window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusIcon {
    #[default]
    Standby,
    Building(BuildAction),
    Succeeded,
    Failed,
    Cancelled,
}

/// Secondary image summarising the result of the last build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultIcon {
    #[default]
    None,
    Success,
    SuccessWithWarnings,
    Errors,
    Cancelled,
}

impl StatusIcon {
    pub fn for_build_begin(action: BuildAction) -> Self {
        StatusIcon::Building(action)
    }

    /// Images shown once a build finished.
    pub fn for_build_done(outcome: BuildOutcome, has_warnings: bool) -> (StatusIcon, ResultIcon) {
        match outcome {
            BuildOutcome::Succeeded if has_warnings => {
                (StatusIcon::Succeeded, ResultIcon::SuccessWithWarnings)
            }
            BuildOutcome::Succeeded => (StatusIcon::Succeeded, ResultIcon::Success),
            BuildOutcome::HasErrors => (StatusIcon::Failed, ResultIcon::Errors),
            BuildOutcome::Cancelled => (StatusIcon::Cancelled, ResultIcon::Cancelled),
        }
    }

    /// Images shown while no build ran in the loaded solution.
    pub fn not_started() -> (StatusIcon, ResultIcon) {
        (StatusIcon::Standby, ResultIcon::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn done_icons_follow_outcome() {
        assert_eq!(
            StatusIcon::for_build_done(BuildOutcome::Succeeded, false),
            (StatusIcon::Succeeded, ResultIcon::Success)
        );
        assert_eq!(
            StatusIcon::for_build_done(BuildOutcome::Succeeded, true),
            (StatusIcon::Succeeded, ResultIcon::SuccessWithWarnings)
        );
        assert_eq!(
            StatusIcon::for_build_done(BuildOutcome::HasErrors, true),
            (StatusIcon::Failed, ResultIcon::Errors)
        );
        assert_eq!(
            StatusIcon::for_build_done(BuildOutcome::Cancelled, false),
            (StatusIcon::Cancelled, ResultIcon::Cancelled)
        );
    }
}
