//! # Build Monitor Dependencies / 构建监视器依赖
//!
//! **Note / 注意**: This is NOT a Builder pattern.
//! - No build steps / 无构建步骤
//! - No default values / 无默认值
//! - Just parameter grouping / 仅用于参数打包

use std::sync::Arc;

use bv_core::ports::*;
use bv_core::ControlSettings;

/// Dependency grouping for [`crate::BuildEventCoordinator`].
///
/// All dependencies are required except the status bar, which the host may
/// not provide.
pub struct BuildMonitorDeps {
    // Configuration / 配置
    pub settings: Arc<ControlSettings>,

    // Build engine / 构建引擎
    pub engine: Arc<dyn BuildEngineControlPort>,

    // Host environment / 宿主环境
    pub solution: Arc<dyn SolutionPort>,
    pub locator: Arc<dyn ProjectLocatorPort>,
    pub status_bar: Option<Arc<dyn StatusBarPort>>,
    pub tool_window: Arc<dyn ToolWindowPort>,

    // Presentation / 展示层
    pub view: Arc<dyn ViewStatePort>,
    pub listeners: Vec<Arc<dyn BuildListenerPort>>,

    pub clock: Arc<dyn ClockPort>,
}
