use serde::Serialize;

use super::{Indicators, ResultIcon, StatusIcon};
use crate::project::ProjectSnapshot;

/// Read-only copy of the tool window state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ViewStateSnapshot {
    pub solution_name: Option<String>,
    pub status_text: String,
    pub status_icon: StatusIcon,
    pub result_icon: ResultIcon,
    pub current_project: Option<ProjectSnapshot>,
    pub project_list: Vec<ProjectSnapshot>,
    pub indicators: Indicators,
}
