//! # bv-core
//!
//! Core domain models and build-state logic for BuildVision.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

// Public module exports
pub mod build;
pub mod ids;
pub mod ports;
pub mod presentation;
pub mod project;
pub mod settings;
pub mod solution;

// Re-export commonly used types at the crate root
pub use build::{
    BuildAction, BuildContext, BuildEvent, BuildOutcome, BuildScope, BuildingProjects,
    BuildedProjects, ProjectBuildInfo, ProjectRef,
};
pub use ids::ProjectId;
pub use project::{
    ErrorItem, ErrorLevel, ErrorsBox, ProjectEvent, ProjectHandle, ProjectItem, ProjectOutcome,
    ProjectSnapshot, ProjectState,
};
pub use settings::{
    ControlSettings, NavigateToBuildFailureReason, SettingsError, WindowStateAction,
};
pub use solution::{FindProjectProperty, SolutionItem};
