use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::fs;

use bv_core::ports::{ProjectDescriptor, SolutionInfo, SolutionPort};

#[derive(Debug, Deserialize)]
struct ManifestFile {
    name: String,
    path: String,
    #[serde(default)]
    projects: Vec<ProjectDescriptor>,
}

/// Solution snapshot provider backed by a TOML manifest:
///
/// ```toml
/// name = "App"
/// path = "C:/src/App.sln"
///
/// [[projects]]
/// unique_name = "App\\App.vcxproj"
/// full_path = "C:/src/App/App.vcxproj"
/// ```
pub struct SolutionManifest {
    info: SolutionInfo,
    projects: Vec<ProjectDescriptor>,
    open: AtomicBool,
}

impl SolutionManifest {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ManifestFile = toml::from_str(content).context("parse solution manifest failed")?;
        Ok(Self {
            info: SolutionInfo {
                name: file.name,
                full_path: file.path,
            },
            projects: file.projects,
            open: AtomicBool::new(true),
        })
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("read solution manifest failed: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid solution manifest: {}", path.display()))
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn set_open(&self, open: bool) {
        self.open.store(open, Ordering::SeqCst);
    }
}

impl SolutionPort for SolutionManifest {
    fn current_solution(&self) -> Option<SolutionInfo> {
        self.open
            .load(Ordering::SeqCst)
            .then(|| self.info.clone())
    }

    fn enumerate_projects(&self) -> Result<Vec<ProjectDescriptor>> {
        if !self.open.load(Ordering::SeqCst) {
            anyhow::bail!("solution {} is closed", self.info.name);
        }
        Ok(self.projects.clone())
    }
}
