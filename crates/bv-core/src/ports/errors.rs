use thiserror::Error;

/// Resolving a project by path failed. Treated as "not navigated".
#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("project lookup failed: {0}")]
    Lookup(String),
}

/// The navigation layer failed while jumping to a diagnostic.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("navigation failed: {0}")]
    Failed(String),

    #[error("document could not be opened: {0}")]
    OpenDocument(String),
}
