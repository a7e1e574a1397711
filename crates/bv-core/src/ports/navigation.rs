use std::sync::Arc;

use super::errors::{LocatorError, NavigationError};
use crate::project::ErrorItem;

/// Resolves projects of the host environment by their full path.
pub trait ProjectLocatorPort: Send + Sync {
    /// `Ok(None)` when no such project is loaded.
    fn find_project(
        &self,
        full_path: &str,
    ) -> Result<Option<Arc<dyn DiagnosticNavigatorPort>>, LocatorError>;
}

/// Navigation capability of one located project.
pub trait DiagnosticNavigatorPort: Send + Sync {
    /// Open the diagnostic's document at its position.
    ///
    /// Returns whether the editor actually moved.
    fn navigate_to(&self, item: &ErrorItem) -> Result<bool, NavigationError>;
}
