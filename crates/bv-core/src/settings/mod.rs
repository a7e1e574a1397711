//! Settings domain module.
//!
//! The coordinator consumes settings as a read-only value; loading and saving
//! belong to the infrastructure layer.

mod defaults;
mod error;
pub mod model;
mod window;

pub use error::SettingsError;
pub use model::{
    BuildMessagesSettings, ControlSettings, GeneralSettings, NavigateToBuildFailureReason,
    WindowSettings, CURRENT_SCHEMA_VERSION, DEFAULT_TIME_FORMAT,
};
pub use window::WindowStateAction;
