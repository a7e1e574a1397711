use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionInfo {
    pub name: String,
    pub full_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    pub unique_name: String,
    pub full_path: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Snapshot provider of the solution loaded in the host.
pub trait SolutionPort: Send + Sync {
    fn current_solution(&self) -> Option<SolutionInfo>;
    fn enumerate_projects(&self) -> anyhow::Result<Vec<ProjectDescriptor>>;
}
