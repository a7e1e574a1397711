//! Console adapters for the host ports.
//!
//! Status bar and tool window changes are logged through `tracing`;
//! navigation and the final summary are written to a shared output
//! (stdout in the binary, a buffer in tests).

mod console;
mod navigator;
mod output;
mod presenter;
mod progress;

pub use console::{TracingStatusBar, TracingToolWindow, WindowVisibility};
pub use navigator::ConsoleLocator;
pub use output::SharedOutput;
pub use presenter::{render_summary, SummaryView};
pub use progress::ProgressListener;
