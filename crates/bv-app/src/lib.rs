//! BuildVision Application Orchestration Layer
//!
//! This crate turns the build engine's lifecycle events into build state,
//! cancellation / navigation decisions and view state.

pub mod deps;
pub mod usecases;

pub use deps::BuildMonitorDeps;
pub use usecases::build_monitor::{
    BuildEventCoordinator, ErrorNavigationPolicy, WindowStateActionResolver, WindowTrigger,
};
