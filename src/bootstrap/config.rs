//! # Settings Loading
//!
//! Resolves which settings file applies and loads it through the
//! [`SettingsPort`]. A missing file is not an error: the repository returns
//! the defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

use bv_core::ports::SettingsPort;
use bv_core::ControlSettings;
use bv_infra::settings::default_settings_path;
use bv_infra::FileSettingsRepository;

/// The explicit path wins; otherwise the platform config dir is used.
pub fn resolve_settings_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => default_settings_path().context("no platform config directory available"),
    }
}

pub async fn load_settings(explicit: Option<&Path>) -> anyhow::Result<ControlSettings> {
    let path = resolve_settings_path(explicit)?;
    let repo = FileSettingsRepository::new(&path);
    let settings = repo.load().await?;
    debug!(path = %path.display(), ?settings, "settings loaded");
    Ok(settings)
}

/// Write the default settings unless a file already exists.
///
/// Returns the path and whether a file was written.
pub async fn init_settings(explicit: Option<&Path>) -> anyhow::Result<(PathBuf, bool)> {
    let path = resolve_settings_path(explicit)?;
    if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return Ok((path, false));
    }
    FileSettingsRepository::new(&path)
        .save(&ControlSettings::default())
        .await?;
    info!(path = %path.display(), "default settings written");
    Ok((path, true))
}
