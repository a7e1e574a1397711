use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("unknown window state action: {0}")]
    UnknownWindowState(String),

    #[error("unknown navigation condition: {0}")]
    UnknownNavigationCondition(String),

    #[error("invalid time format: {0}")]
    InvalidTimeFormat(String),

    #[error("settings parse failed: {0}")]
    Parse(String),
}
