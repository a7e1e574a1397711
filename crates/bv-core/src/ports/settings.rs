use async_trait::async_trait;

use crate::settings::ControlSettings;

/// Persistence of the control settings.
#[async_trait]
pub trait SettingsPort: Send + Sync {
    async fn load(&self) -> anyhow::Result<ControlSettings>;
    async fn save(&self, settings: &ControlSettings) -> anyhow::Result<()>;
}
