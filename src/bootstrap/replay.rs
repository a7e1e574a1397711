//! Wiring for the `replay` command.
//!
//! Builds the coordinator from the console adapters, starts the
//! `BuildProcess` ticker and replays the event script on a blocking thread,
//! the way a real build engine delivers events from its own thread.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, info_span, warn, Instrument};

use bv_app::{BuildEventCoordinator, BuildMonitorDeps};
use bv_core::ports::{BuildEventHandler, BuildListenerPort, SolutionPort};
use bv_core::presentation::ViewStateSnapshot;
use bv_core::ControlSettings;
use bv_infra::{BuildProcessTicker, ReplayStats, ScriptedBuildEngine, SolutionManifest, SystemClock};

use crate::adapters::{
    ConsoleLocator, ProgressListener, SharedOutput, SummaryView, TracingStatusBar,
    TracingToolWindow,
};

#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub script: PathBuf,
    pub solution: PathBuf,
    pub tick: Duration,
    /// Delay between scripted events.
    pub pace: Option<Duration>,
}

/// What the replay left behind.
#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub stats: ReplayStats,
    pub view: ViewStateSnapshot,
    pub navigated: bool,
}

pub async fn run_replay(
    options: ReplayOptions,
    settings: ControlSettings,
    output: SharedOutput,
) -> anyhow::Result<ReplayReport> {
    let span = info_span!("replay", script = %options.script.display());
    async move {
        let manifest = Arc::new(SolutionManifest::load(&options.solution).await?);
        let projects = manifest.enumerate_projects()?;

        let mut engine = ScriptedBuildEngine::from_path(&options.script)
            .with_context(|| format!("load event script failed: {}", options.script.display()))?;
        if let Some(pace) = options.pace {
            engine = engine.with_pace(pace);
        }
        let engine = Arc::new(engine);

        let view = Arc::new(SummaryView::new());
        let listeners: Vec<Arc<dyn BuildListenerPort>> =
            vec![Arc::new(ProgressListener::new(projects.len()))];

        let coordinator = Arc::new(BuildEventCoordinator::new(BuildMonitorDeps {
            settings: Arc::new(settings),
            engine: engine.clone(),
            solution: manifest.clone(),
            locator: Arc::new(ConsoleLocator::new(&projects, output)),
            status_bar: Some(Arc::new(TracingStatusBar::new())),
            tool_window: Arc::new(TracingToolWindow::new()),
            view: view.clone(),
            listeners,
            clock: Arc::new(SystemClock),
        }));
        info!(
            solution = manifest.name(),
            projects = projects.len(),
            events = engine.events().len(),
            "replay starting"
        );

        let interrupt = tokio::spawn({
            let coordinator = coordinator.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() && coordinator.request_cancel() {
                    warn!("interrupted, cancelling build");
                }
            }
        });

        let ticker = BuildProcessTicker::start(
            coordinator.clone() as Arc<dyn BuildEventHandler>,
            options.tick,
        );

        let stats = tokio::task::spawn_blocking({
            let engine = engine.clone();
            let coordinator = coordinator.clone();
            move || engine.run(coordinator.as_ref())
        })
        .await
        .context("replay thread failed")?;

        ticker.shutdown().await;
        interrupt.abort();

        info!(
            delivered = stats.delivered,
            skipped = stats.skipped,
            cancelled_sessions = stats.cancelled_sessions,
            "replay finished"
        );

        Ok(ReplayReport {
            stats,
            view: view.last().unwrap_or_else(|| coordinator.view_snapshot()),
            navigated: coordinator.is_navigated(),
        })
    }
    .instrument(span)
    .await
}
