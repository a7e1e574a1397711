use anyhow::Result;
use bv_core::ports::ToolWindowPort;
use bv_core::settings::WindowSettings;
use bv_core::{BuildOutcome, WindowStateAction};

/// Point of the build lifecycle at which a window action is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowTrigger {
    BuildBegin,
    BuildDone(BuildOutcome),
}

/// Maps the configured actions and the build outcome to one window request.
pub struct WindowStateActionResolver;

impl WindowStateActionResolver {
    pub fn resolve(settings: &WindowSettings, trigger: WindowTrigger) -> WindowStateAction {
        match trigger {
            WindowTrigger::BuildBegin => settings.window_action_on_build_begin,
            WindowTrigger::BuildDone(outcome) if outcome.is_failure() => {
                settings.window_action_on_build_error
            }
            WindowTrigger::BuildDone(_) => settings.window_action_on_build_success,
        }
    }

    /// Hand the request to the window executor. `Nothing` issues no call.
    pub fn apply(action: WindowStateAction, window: &dyn ToolWindowPort) -> Result<()> {
        match action {
            WindowStateAction::Nothing => Ok(()),
            WindowStateAction::Show => window.show(),
            WindowStateAction::ShowNoActivate => window.show_no_activate(),
            WindowStateAction::Hide => window.hide(),
            WindowStateAction::Close => window.close(),
        }
    }
}
