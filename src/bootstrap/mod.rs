pub mod config;
pub mod replay;
pub mod tracing;

pub use config::{init_settings, load_settings, resolve_settings_path};
pub use replay::{run_replay, ReplayOptions, ReplayReport};
pub use self::tracing::init_tracing_subscriber;
