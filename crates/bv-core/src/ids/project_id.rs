use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable project identity.
/// Format: the project's full path, or its unique name when the project has no file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Case-insensitive comparison against a raw path, the way project files
    /// are matched on case-insensitive filesystems.
    pub fn matches_path(&self, path: &str) -> bool {
        self.0.eq_ignore_ascii_case(path)
    }
}

impl Display for ProjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ProjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_id_creation() {
        let id = ProjectId::new("C:/src/app/app.csproj");
        assert_eq!(id.as_str(), "C:/src/app/app.csproj");
    }

    #[test]
    fn test_project_id_matches_path_ignoring_case() {
        let id: ProjectId = "C:/Src/App/App.csproj".into();
        assert!(id.matches_path("c:/src/app/app.csproj"));
        assert!(!id.matches_path("c:/src/lib/lib.csproj"));
    }

    #[test]
    fn test_project_id_serializes_transparently() {
        let id = ProjectId::new("core");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"core\"");
    }
}
