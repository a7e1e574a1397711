//! Build monitor use case.
//!
//! [`BuildEventCoordinator`] receives the build engine's lifecycle events,
//! keeps [`bv_core::BuildContext`] and the project items consistent, applies
//! the stop-on-error and navigate-on-error policies and publishes view state.

mod coordinator;
mod guard;
mod navigation;
mod view_state;
mod window_action;

pub use coordinator::BuildEventCoordinator;
pub use guard::{absorb, HandlerFault};
pub use navigation::ErrorNavigationPolicy;
pub use view_state::ViewState;
pub use window_action::{WindowStateActionResolver, WindowTrigger};
