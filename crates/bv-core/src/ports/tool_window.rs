use anyhow::Result;

/// Executes window actions on the build monitor's tool window.
pub trait ToolWindowPort: Send + Sync {
    fn show(&self) -> Result<()>;
    fn show_no_activate(&self) -> Result<()>;
    fn hide(&self) -> Result<()>;
    fn close(&self) -> Result<()>;
}
