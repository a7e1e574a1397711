use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SettingsError;

/// What to do with the tool window at a trigger point.
///
/// Parsing rejects unknown names, so a loaded configuration can only hold
/// mapped actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum WindowStateAction {
    #[default]
    Nothing,
    Show,
    ShowNoActivate,
    Hide,
    Close,
}

impl WindowStateAction {
    pub fn as_str(self) -> &'static str {
        match self {
            WindowStateAction::Nothing => "nothing",
            WindowStateAction::Show => "show",
            WindowStateAction::ShowNoActivate => "show_no_activate",
            WindowStateAction::Hide => "hide",
            WindowStateAction::Close => "close",
        }
    }
}

impl FromStr for WindowStateAction {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nothing" => Ok(WindowStateAction::Nothing),
            "show" => Ok(WindowStateAction::Show),
            "show_no_activate" => Ok(WindowStateAction::ShowNoActivate),
            "hide" => Ok(WindowStateAction::Hide),
            "close" => Ok(WindowStateAction::Close),
            other => Err(SettingsError::UnknownWindowState(other.to_string())),
        }
    }
}

impl TryFrom<String> for WindowStateAction {
    type Error = SettingsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for WindowStateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
