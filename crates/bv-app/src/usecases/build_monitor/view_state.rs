use chrono::{DateTime, Utc};

use bv_core::presentation::messages::BUILD_NOT_STARTED;
use bv_core::presentation::{Indicators, ResetIndicatorMode, ResultIcon, StatusIcon, ViewStateSnapshot};
use bv_core::{BuildedProjects, ProjectHandle, ProjectId};

/// Mutable tool window state owned by the coordinator.
///
/// The coordinator is the single writer; readers only ever see a
/// [`ViewStateSnapshot`].
#[derive(Debug, Clone)]
pub struct ViewState {
    pub status_text: String,
    pub status_icon: StatusIcon,
    pub result_icon: ResultIcon,
    pub current_project: Option<ProjectHandle>,
    project_list: Vec<ProjectHandle>,
    pub indicators: Indicators,
}

impl Default for ViewState {
    fn default() -> Self {
        let (status_icon, result_icon) = StatusIcon::not_started();
        Self {
            status_text: BUILD_NOT_STARTED.to_string(),
            status_icon,
            result_icon,
            current_project: None,
            project_list: Vec::new(),
            indicators: Indicators::default(),
        }
    }
}

impl ViewState {
    pub fn project_list(&self) -> &[ProjectHandle] {
        &self.project_list
    }

    /// Replace the list, keeping the first occurrence of each identity.
    pub fn set_project_list(&mut self, projects: &[ProjectHandle]) {
        self.project_list.clear();
        for project in projects {
            self.add_project_if_absent(project);
        }
    }

    pub fn clear_project_list(&mut self) {
        self.project_list.clear();
    }

    /// Append `project` unless an item with the same identity is listed.
    pub fn add_project_if_absent(&mut self, project: &ProjectHandle) -> bool {
        if self.contains(project.id()) {
            return false;
        }
        self.project_list.push(project.clone());
        true
    }

    pub fn contains(&self, id: &ProjectId) -> bool {
        self.project_list.iter().any(|p| p.id() == id)
    }

    pub fn is_current(&self, id: &ProjectId) -> bool {
        self.current_project.as_ref().is_some_and(|p| p.id() == id)
    }

    /// Back to the "no build in this solution" look.
    pub fn reset_to_not_started(&mut self) {
        let (status_icon, result_icon) = StatusIcon::not_started();
        self.status_text = BUILD_NOT_STARTED.to_string();
        self.status_icon = status_icon;
        self.result_icon = result_icon;
        self.current_project = None;
    }

    pub fn reset_indicators(&mut self, mode: ResetIndicatorMode) {
        self.indicators.reset(mode);
    }

    pub fn update_indicators(&mut self, builded: &BuildedProjects) {
        self.indicators.update(&self.project_list, builded);
    }

    pub fn has_warnings(&self) -> bool {
        self.indicators.values.warnings > 0
    }

    pub fn snapshot(&self, solution_name: Option<&str>, now: DateTime<Utc>) -> ViewStateSnapshot {
        ViewStateSnapshot {
            solution_name: solution_name.map(str::to_string),
            status_text: self.status_text.clone(),
            status_icon: self.status_icon,
            result_icon: self.result_icon,
            current_project: self.current_project.as_ref().map(|p| p.snapshot(now)),
            project_list: self.project_list.iter().map(|p| p.snapshot(now)).collect(),
            indicators: self.indicators,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bv_core::ProjectItem;

    fn project(path: &str) -> ProjectHandle {
        ProjectItem::new(ProjectId::new(path), path, path).arc()
    }

    #[test]
    fn project_list_is_deduplicated_by_identity() {
        let mut view = ViewState::default();
        let a = project("a.csproj");
        let a_again = project("a.csproj");

        assert!(view.add_project_if_absent(&a));
        assert!(!view.add_project_if_absent(&a_again));
        assert!(view.add_project_if_absent(&project("b.csproj")));

        let ids: Vec<_> = view.project_list().iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, ["a.csproj", "b.csproj"]);
    }

    #[test]
    fn set_project_list_preserves_order() {
        let mut view = ViewState::default();
        let (a, b) = (project("a"), project("b"));
        view.set_project_list(&[b.clone(), a.clone(), b.clone()]);

        let ids: Vec<_> = view.project_list().iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn reset_to_not_started_clears_current_project() {
        let mut view = ViewState {
            status_text: "Build solution started".to_string(),
            status_icon: StatusIcon::Failed,
            ..ViewState::default()
        };
        view.current_project = Some(project("a"));

        view.reset_to_not_started();

        assert_eq!(view.status_text, BUILD_NOT_STARTED);
        assert_eq!(view.status_icon, StatusIcon::Standby);
        assert!(view.current_project.is_none());
    }

    #[test]
    fn snapshot_copies_projects() {
        let mut view = ViewState::default();
        let a = project("a");
        view.add_project_if_absent(&a);
        view.current_project = Some(a);

        let snapshot = view.snapshot(Some("app"), Utc::now());
        assert_eq!(snapshot.solution_name.as_deref(), Some("app"));
        assert_eq!(snapshot.project_list.len(), 1);
        assert_eq!(snapshot.current_project.map(|p| p.name), Some("a".to_string()));
    }
}
