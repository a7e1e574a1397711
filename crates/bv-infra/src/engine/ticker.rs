use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

use bv_core::ports::BuildEventHandler;

/// Periodic `BuildProcess` source, running beside the engine's own thread.
///
/// A tick runs the handler synchronously inside the task, so an abort only
/// lands between ticks. Use [`BuildProcessTicker::shutdown`] to wait for a
/// tick that is already running.
pub struct BuildProcessTicker {
    task: Option<JoinHandle<()>>,
}

impl BuildProcessTicker {
    /// Spawn the tick task on the current tokio runtime. The first tick fires
    /// one `period` after start.
    pub fn start(handler: Arc<dyn BuildEventHandler>, period: Duration) -> Self {
        let task = tokio::spawn(async move {
            let mut ticks = interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticks.tick().await;
            loop {
                ticks.tick().await;
                handler.on_build_process();
            }
        });
        debug!(period_ms = period.as_millis() as u64, "build process ticker started");
        Self { task: Some(task) }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop ticking and wait until no tick is in flight.
    pub async fn shutdown(mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        task.abort();
        if let Err(err) = task.await {
            if err.is_panic() {
                warn!(error = %err, "build process ticker panicked");
            }
        }
        debug!("build process ticker stopped");
    }

    /// Abort without waiting; a running tick may still finish afterwards.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("build process ticker aborted");
        }
    }
}

impl Drop for BuildProcessTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bv_core::{BuildAction, BuildScope, ErrorItem, ProjectBuildInfo, ProjectOutcome, ProjectRef};
    use chrono::{DateTime, Utc};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::time::advance;

    #[derive(Default)]
    struct TickCounter {
        ticks: AtomicUsize,
    }

    impl BuildEventHandler for TickCounter {
        fn on_build_begin(&self, _scope: BuildScope, _action: BuildAction) {}
        fn on_build_process(&self) {
            self.ticks.fetch_add(1, Ordering::SeqCst);
        }
        fn on_build_done(&self) {}
        fn on_build_cancelled(&self) {}
        fn on_project_begin(&self, _project: &ProjectRef, _time: Option<DateTime<Utc>>) {}
        fn on_project_done(
            &self,
            _project: &ProjectRef,
            _outcome: ProjectOutcome,
            _info: Option<ProjectBuildInfo>,
        ) {
        }
        fn on_error_raised(&self, _project: &ProjectRef, _error: &ErrorItem) {}
    }

    /// Handler whose tick takes a while, to catch it mid-flight.
    #[derive(Default)]
    struct SlowTick {
        entered: AtomicBool,
        finished: AtomicBool,
    }

    impl BuildEventHandler for SlowTick {
        fn on_build_begin(&self, _scope: BuildScope, _action: BuildAction) {}
        fn on_build_process(&self) {
            if self.entered.swap(true, Ordering::SeqCst) {
                return;
            }
            std::thread::sleep(Duration::from_millis(100));
            self.finished.store(true, Ordering::SeqCst);
        }
        fn on_build_done(&self) {}
        fn on_build_cancelled(&self) {}
        fn on_project_begin(&self, _project: &ProjectRef, _time: Option<DateTime<Utc>>) {}
        fn on_project_done(
            &self,
            _project: &ProjectRef,
            _outcome: ProjectOutcome,
            _info: Option<ProjectBuildInfo>,
        ) {
        }
        fn on_error_raised(&self, _project: &ProjectRef, _error: &ErrorItem) {}
    }

    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn ticks_once_per_period() -> anyhow::Result<()> {
        tokio::time::pause();
        let counter = Arc::new(TickCounter::default());
        let _ticker = BuildProcessTicker::start(counter.clone(), Duration::from_millis(250));
        settle().await;
        assert_eq!(counter.ticks.load(Ordering::SeqCst), 0);

        for _ in 0..3 {
            advance(Duration::from_millis(250)).await;
            settle().await;
        }
        assert_eq!(counter.ticks.load(Ordering::SeqCst), 3);
        Ok(())
    }

    #[tokio::test]
    async fn stop_ends_ticking() -> anyhow::Result<()> {
        tokio::time::pause();
        let counter = Arc::new(TickCounter::default());
        let mut ticker = BuildProcessTicker::start(counter.clone(), Duration::from_millis(100));
        settle().await;
        advance(Duration::from_millis(100)).await;
        settle().await;

        ticker.stop();
        settle().await;
        assert!(!ticker.is_running());

        advance(Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(counter.ticks.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn shutdown_waits_for_the_running_tick() -> anyhow::Result<()> {
        let handler = Arc::new(SlowTick::default());
        let ticker = BuildProcessTicker::start(handler.clone(), Duration::from_millis(5));
        while !handler.entered.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        ticker.shutdown().await;

        assert!(handler.finished.load(Ordering::SeqCst));
        Ok(())
    }
}
