use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use bv_core::ports::{StatusBarPort, ToolWindowPort};

#[derive(Debug, Default)]
struct StatusLine {
    text: String,
    frozen: bool,
}

/// Status bar that logs each text change.
///
/// A frozen status bar keeps its text: writes are dropped until it is
/// unfrozen.
#[derive(Debug, Default)]
pub struct TracingStatusBar {
    line: Mutex<StatusLine>,
}

impl TracingStatusBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.lock().text.clone()
    }

    pub fn is_frozen(&self) -> bool {
        self.lock().frozen
    }

    fn lock(&self) -> MutexGuard<'_, StatusLine> {
        self.line.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StatusBarPort for TracingStatusBar {
    fn set_text(&self, text: &str) {
        let mut line = self.lock();
        if line.frozen {
            debug!(text, "status bar frozen, text dropped");
            return;
        }
        if line.text != text {
            info!(target: "buildvision::status", "{text}");
            line.text = text.to_string();
        }
    }

    fn freeze(&self, frozen: bool) {
        self.lock().frozen = frozen;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowVisibility {
    #[default]
    Closed,
    Hidden,
    /// Shown without taking focus.
    Visible,
    Active,
}

/// Tool window that tracks its visibility and logs transitions.
#[derive(Debug, Default)]
pub struct TracingToolWindow {
    visibility: Mutex<WindowVisibility>,
}

impl TracingToolWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visibility(&self) -> WindowVisibility {
        *self.visibility.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(&self, to: WindowVisibility) -> anyhow::Result<()> {
        let mut visibility = self.visibility.lock().unwrap_or_else(PoisonError::into_inner);
        if *visibility != to {
            info!(target: "buildvision::window", from = ?*visibility, ?to, "tool window");
            *visibility = to;
        }
        Ok(())
    }
}

impl ToolWindowPort for TracingToolWindow {
    fn show(&self) -> anyhow::Result<()> {
        self.transition(WindowVisibility::Active)
    }

    fn show_no_activate(&self) -> anyhow::Result<()> {
        // an active window stays active
        if self.visibility() == WindowVisibility::Active {
            return Ok(());
        }
        self.transition(WindowVisibility::Visible)
    }

    fn hide(&self) -> anyhow::Result<()> {
        self.transition(WindowVisibility::Hidden)
    }

    fn close(&self) -> anyhow::Result<()> {
        self.transition(WindowVisibility::Closed)
    }
}
