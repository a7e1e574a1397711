pub mod engine;
pub mod settings;
pub mod solution;
pub mod time;

pub use engine::{BuildProcessTicker, ReplayError, ReplayStats, ScriptedBuildEngine};
pub use settings::FileSettingsRepository;
pub use solution::SolutionManifest;
pub use time::SystemClock;
