use std::sync::Arc;

use tracing::debug;

use bv_core::ports::{
    DiagnosticNavigatorPort, LocatorError, NavigationError, ProjectDescriptor, ProjectLocatorPort,
};
use bv_core::{ErrorItem, ProjectId};

use super::SharedOutput;

/// Locates the solution's projects and "navigates" by printing the
/// diagnostic location in the `file(line,col): text` form editors jump to.
pub struct ConsoleLocator {
    projects: Vec<ProjectId>,
    output: SharedOutput,
}

impl ConsoleLocator {
    pub fn new(projects: &[ProjectDescriptor], output: SharedOutput) -> Self {
        Self {
            projects: projects
                .iter()
                .map(|p| ProjectId::new(p.full_path.as_str()))
                .collect(),
            output,
        }
    }
}

impl ProjectLocatorPort for ConsoleLocator {
    fn find_project(
        &self,
        full_path: &str,
    ) -> Result<Option<Arc<dyn DiagnosticNavigatorPort>>, LocatorError> {
        if !self.projects.iter().any(|id| id.matches_path(full_path)) {
            debug!(full_path, "project not loaded");
            return Ok(None);
        }
        Ok(Some(Arc::new(ConsoleNavigator {
            output: self.output.clone(),
        })))
    }
}

struct ConsoleNavigator {
    output: SharedOutput,
}

fn location(item: &ErrorItem) -> Option<String> {
    let file = item.file.as_deref().filter(|f| !f.is_empty())?;
    Some(match (item.line, item.column) {
        (Some(line), Some(column)) => format!("{file}({line},{column})"),
        (Some(line), None) => format!("{file}({line})"),
        _ => file.to_string(),
    })
}

impl DiagnosticNavigatorPort for ConsoleNavigator {
    fn navigate_to(&self, item: &ErrorItem) -> Result<bool, NavigationError> {
        let Some(location) = location(item) else {
            return Ok(false);
        };
        let line = match item.code.as_deref() {
            Some(code) => format!("{location}: {code}: {}", item.text),
            None => format!("{location}: {}", item.text),
        };
        self.output
            .write_line(&line)
            .map_err(|e| NavigationError::OpenDocument(e.to_string()))?;
        Ok(true)
    }
}
