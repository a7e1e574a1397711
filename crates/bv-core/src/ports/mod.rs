//! Port interfaces for the application layer
//!
//! Ports define the contract between the build monitor and the host
//! environment (build engine, IDE object model, status bar, tool window,
//! presentation). Implementations live in the infrastructure layer or the
//! shell.
//!
//! Build-time ports are synchronous: the build engine delivers events on its
//! own thread and expects the handlers to return promptly. Only settings
//! persistence is async.

mod build_engine;
mod clock;
pub mod errors;
mod listener;
mod navigation;
mod settings;
mod solution;
mod status_bar;
mod tool_window;
mod view_state;

pub use build_engine::{BuildEngineControlPort, BuildEventHandler};
pub use clock::ClockPort;
pub use errors::{LocatorError, NavigationError};
pub use listener::BuildListenerPort;
pub use navigation::{DiagnosticNavigatorPort, ProjectLocatorPort};
pub use settings::SettingsPort;
pub use solution::{ProjectDescriptor, SolutionInfo, SolutionPort};
pub use status_bar::StatusBarPort;
pub use tool_window::ToolWindowPort;
pub use view_state::ViewStatePort;
