use std::fmt;
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::{SettingsError, WindowStateAction};

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Clock format used when none is configured or the configured one is invalid.
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";

/// Whether chrono can render `format` without failing.
pub fn is_valid_time_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// When to jump to the location of a build failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum NavigateToBuildFailureReason {
    #[default]
    Never,
    OnErrorRaised,
    OnBuildDone,
}

impl FromStr for NavigateToBuildFailureReason {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "never" => Ok(NavigateToBuildFailureReason::Never),
            "on_error_raised" => Ok(NavigateToBuildFailureReason::OnErrorRaised),
            "on_build_done" => Ok(NavigateToBuildFailureReason::OnBuildDone),
            other => Err(SettingsError::UnknownNavigationCondition(other.to_string())),
        }
    }
}

impl TryFrom<String> for NavigateToBuildFailureReason {
    type Error = SettingsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for NavigateToBuildFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NavigateToBuildFailureReason::Never => "never",
            NavigateToBuildFailureReason::OnErrorRaised => "on_error_raised",
            NavigateToBuildFailureReason::OnBuildDone => "on_build_done",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    pub stop_build_after_first_error: bool,
    pub navigate_to_build_failure_reason: NavigateToBuildFailureReason,
    /// Show every solution project at build begin instead of only the built ones.
    pub fill_project_list_on_build_begin: bool,
    pub enable_status_bar_output: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub window_action_on_build_begin: WindowStateAction,
    pub window_action_on_build_error: WindowStateAction,
    pub window_action_on_build_success: WindowStateAction,
}

/// Options of the status message formatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildMessagesSettings {
    pub show_elapsed_in_extra_message: bool,
    pub show_progress_in_extra_message: bool,
    /// chrono format string for the begin/finish clock time.
    pub time_format: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSettings {
    #[serde(default = "current_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub general: GeneralSettings,

    #[serde(default)]
    pub window: WindowSettings,

    #[serde(default)]
    pub messages: BuildMessagesSettings,
}

impl ControlSettings {
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            toml::from_str(content).map_err(|err| SettingsError::Parse(err.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values serde accepts but the formatters cannot use.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !is_valid_time_format(&self.messages.time_format) {
            return Err(SettingsError::InvalidTimeFormat(
                self.messages.time_format.clone(),
            ));
        }
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|err| SettingsError::Parse(err.to_string()))
    }
}

fn current_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}
