//! Solution tree snapshot.

use crate::ids::ProjectId;
use crate::ports::{ProjectDescriptor, SolutionInfo, SolutionPort};
use crate::project::{ProjectHandle, ProjectItem};

/// Which project property a lookup matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindProjectProperty {
    FullName,
    UniqueName,
}

/// The loaded solution and its projects, as last refreshed from the host.
#[derive(Debug, Clone, Default)]
pub struct SolutionItem {
    info: Option<SolutionInfo>,
    projects: Vec<ProjectHandle>,
}

impl SolutionItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&self) -> Option<&SolutionInfo> {
        self.info.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.info.as_ref().map(|i| i.name.as_str())
    }

    pub fn is_open(&self) -> bool {
        self.info.is_some()
    }

    pub fn projects(&self) -> &[ProjectHandle] {
        &self.projects
    }

    /// Refresh the solution header; projects of a different (or closed)
    /// solution are dropped.
    pub fn update_solution(&mut self, port: &dyn SolutionPort) {
        let info = port.current_solution();
        if info != self.info {
            self.projects.clear();
        }
        self.info = info;
    }

    /// Re-create the project items from the host's enumeration. Every item
    /// starts over in `Pending`.
    pub fn update_projects(&mut self, port: &dyn SolutionPort) -> anyhow::Result<()> {
        if self.info.is_none() {
            self.projects.clear();
            return Ok(());
        }
        let descriptors = port.enumerate_projects()?;
        self.projects = descriptors.into_iter().map(project_from_descriptor).collect();
        Ok(())
    }

    pub fn find_project(&self, key: &str, property: FindProjectProperty) -> Option<ProjectHandle> {
        self.projects
            .iter()
            .find(|p| match property {
                FindProjectProperty::FullName => p.id().matches_path(key),
                FindProjectProperty::UniqueName => p.unique_name() == key,
            })
            .cloned()
    }

    /// Look a project up by identity, registering a new item when the
    /// snapshot does not know it yet.
    pub fn resolve_or_insert(&mut self, id: &ProjectId, unique_name: &str, name: &str) -> ProjectHandle {
        if let Some(found) = self.projects.iter().find(|p| p.id() == id) {
            return found.clone();
        }
        let project = ProjectItem::new(id.clone(), unique_name, name).arc();
        self.projects.push(project.clone());
        project
    }

    pub fn clear(&mut self) {
        self.info = None;
        self.projects.clear();
    }
}

fn project_from_descriptor(descriptor: ProjectDescriptor) -> ProjectHandle {
    let name = descriptor
        .name
        .clone()
        .unwrap_or_else(|| display_name_of(&descriptor.unique_name));
    let id = if descriptor.full_path.is_empty() {
        ProjectId::new(descriptor.unique_name.as_str())
    } else {
        ProjectId::new(descriptor.full_path)
    };
    ProjectItem::new(id, descriptor.unique_name, name).arc()
}

/// File stem of a unique name such as `src\app\app.csproj`.
pub fn display_name_of(unique_name: &str) -> String {
    let file = unique_name
        .rsplit(&['/', '\\'][..])
        .next()
        .unwrap_or(unique_name);
    match file.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => file.to_string(),
    }
}
