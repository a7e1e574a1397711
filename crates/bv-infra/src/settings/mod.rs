pub mod file_repo;

use std::path::PathBuf;

pub use file_repo::FileSettingsRepository;

/// `<config_dir>/buildvision/settings.toml`, when the platform has a config dir.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("buildvision").join("settings.toml"))
}
