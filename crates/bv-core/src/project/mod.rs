//! Project domain module.
//!
//! A [`ProjectItem`] is one project of the current solution together with the
//! state it reached in the current build session and the diagnostics it produced.

mod error_item;
mod item;
pub mod state_machine;

pub use error_item::{ErrorItem, ErrorLevel, ErrorsBox};
pub use item::{ProjectHandle, ProjectItem, ProjectSnapshot};
pub use state_machine::{
    ProjectEvent, ProjectOutcome, ProjectState, ProjectStateMachine, ProjectTransitionError,
};
