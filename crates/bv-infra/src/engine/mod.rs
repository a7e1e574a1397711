mod replay;
mod ticker;

pub use replay::{ReplayError, ReplayStats, ScriptedBuildEngine};
pub use ticker::BuildProcessTicker;
