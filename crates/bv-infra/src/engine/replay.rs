//! Build engine that replays a recorded event script.
//!
//! The script is JSON lines, one [`BuildEvent`] per line; blank lines and
//! lines starting with `#` are ignored.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use bv_core::ports::{BuildEngineControlPort, BuildEventHandler};
use bv_core::{BuildEvent, ProjectId};

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to open event script {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read event script")]
    Read(#[from] std::io::Error),

    #[error("malformed event on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Counters of one replay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub delivered: usize,
    /// Events dropped because the build was cancelled.
    pub skipped: usize,
    pub cancelled_sessions: usize,
}

/// Delivers scripted events on the calling thread, honouring cooperative
/// cancellation the way a real engine would.
pub struct ScriptedBuildEngine {
    events: Vec<BuildEvent>,
    pace: Option<Duration>,
    cancel_requested: AtomicBool,
}

impl ScriptedBuildEngine {
    pub fn new(events: Vec<BuildEvent>) -> Self {
        Self {
            events,
            pace: None,
            cancel_requested: AtomicBool::new(false),
        }
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ReplayError> {
        let mut events = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let event = serde_json::from_str(trimmed).map_err(|source| ReplayError::Parse {
                line: index + 1,
                source,
            })?;
            events.push(event);
        }
        debug!(events = events.len(), "event script parsed");
        Ok(Self::new(events))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ReplayError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Sleep between deliveries so concurrent ticks get a chance to run.
    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = Some(pace);
        self
    }

    pub fn events(&self) -> &[BuildEvent] {
        &self.events
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.cancel_requested.load(Ordering::SeqCst)
    }

    /// Replay the whole script into `handler`.
    ///
    /// Once cancellation is requested, projects that have not started yet are
    /// dropped together with their diagnostics, a single `BuildCancelled` is
    /// emitted and the script continues with the session's `BuildDone`.
    pub fn run(&self, handler: &dyn BuildEventHandler) -> ReplayStats {
        let mut stats = ReplayStats::default();
        let mut started: HashSet<ProjectId> = HashSet::new();
        let mut cancel_emitted = false;

        for event in &self.events {
            if let BuildEvent::BuildBegin { .. } = event {
                self.cancel_requested.store(false, Ordering::SeqCst);
                started.clear();
                cancel_emitted = false;
            }

            if self.is_cancel_requested() && !cancel_emitted {
                handler.on_build_cancelled();
                stats.delivered += 1;
                stats.cancelled_sessions += 1;
                cancel_emitted = true;
                info!("scripted build cancelled");
            }

            match event {
                BuildEvent::BuildCancelled if cancel_emitted => {
                    stats.skipped += 1;
                    continue;
                }
                BuildEvent::ProjectBegin { project, .. } if cancel_emitted => {
                    debug!(project = %project.unique_name, "dropping project begin after cancel");
                    stats.skipped += 1;
                    continue;
                }
                BuildEvent::ProjectBegin { project, .. } => {
                    started.insert(project.id());
                }
                BuildEvent::ProjectDone { project, .. } | BuildEvent::ErrorRaised { project, .. }
                    if cancel_emitted && !started.contains(&project.id()) =>
                {
                    stats.skipped += 1;
                    continue;
                }
                BuildEvent::BuildCancelled => {
                    cancel_emitted = true;
                    stats.cancelled_sessions += 1;
                }
                _ => {}
            }

            event.deliver(handler);
            stats.delivered += 1;

            if let Some(pace) = self.pace {
                thread::sleep(pace);
            }
        }
        stats
    }
}

impl BuildEngineControlPort for ScriptedBuildEngine {
    fn request_cancel(&self) {
        if !self.cancel_requested.swap(true, Ordering::SeqCst) {
            info!("cancellation requested");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bv_core::{
        BuildAction, BuildScope, ErrorItem, ProjectBuildInfo, ProjectOutcome, ProjectRef,
    };
    use chrono::{DateTime, Utc};
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    /// Records event names; cancels the engine on the first error.
    struct Recorder {
        names: Mutex<Vec<String>>,
        engine: Mutex<Option<Arc<ScriptedBuildEngine>>>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                names: Mutex::new(Vec::new()),
                engine: Mutex::new(None),
            }
        }

        fn push(&self, name: String) {
            self.names.lock().unwrap().push(name);
        }

        fn names(&self) -> Vec<String> {
            self.names.lock().unwrap().clone()
        }
    }

    impl BuildEventHandler for Recorder {
        fn on_build_begin(&self, _scope: BuildScope, _action: BuildAction) {
            self.push("build_begin".into());
        }
        fn on_build_process(&self) {
            self.push("build_process".into());
        }
        fn on_build_done(&self) {
            self.push("build_done".into());
        }
        fn on_build_cancelled(&self) {
            self.push("build_cancelled".into());
        }
        fn on_project_begin(&self, project: &ProjectRef, _time: Option<DateTime<Utc>>) {
            self.push(format!("project_begin:{}", project.unique_name));
        }
        fn on_project_done(
            &self,
            project: &ProjectRef,
            outcome: ProjectOutcome,
            _info: Option<ProjectBuildInfo>,
        ) {
            self.push(format!("project_done:{}:{outcome:?}", project.unique_name));
        }
        fn on_error_raised(&self, project: &ProjectRef, _error: &ErrorItem) {
            self.push(format!("error_raised:{}", project.unique_name));
            if let Some(engine) = self.engine.lock().unwrap().as_ref() {
                engine.request_cancel();
            }
        }
    }

    const SCRIPT: &str = r#"
# two projects, the first one fails
{"kind":"build_begin","scope":"solution","action":"build"}
{"kind":"project_begin","project":{"unique_name":"a"}}
{"kind":"error_raised","project":{"unique_name":"a"},"error":{"level":"error","text":"boom"}}
{"kind":"project_done","project":{"unique_name":"a"},"outcome":"error"}
{"kind":"project_begin","project":{"unique_name":"b"}}
{"kind":"error_raised","project":{"unique_name":"b"},"error":{"level":"error","text":"late"}}
{"kind":"project_done","project":{"unique_name":"b"},"outcome":"success"}
{"kind":"build_done"}
"#;

    #[test]
    fn parses_script_skipping_comments() {
        let engine = ScriptedBuildEngine::from_reader(Cursor::new(SCRIPT)).unwrap();
        assert_eq!(engine.events().len(), 8);
    }

    #[test]
    fn reports_line_of_malformed_event() {
        let script = "{\"kind\":\"build_begin\"}\n\n{\"kind\":\"explode\"}\n";
        let err = ScriptedBuildEngine::from_reader(Cursor::new(script))
            .err()
            .expect("script must be rejected");
        assert!(matches!(err, ReplayError::Parse { line: 3, .. }), "{err}");
    }

    #[test]
    fn missing_script_is_an_open_error() {
        let err = ScriptedBuildEngine::from_path("/nonexistent/events.jsonl")
            .err()
            .expect("missing file must fail");
        assert!(matches!(err, ReplayError::Open { .. }));
    }

    #[test]
    fn replays_all_events_without_cancellation() {
        let engine = ScriptedBuildEngine::from_reader(Cursor::new(SCRIPT)).unwrap();
        let recorder = Recorder::new();

        let stats = engine.run(&recorder);

        assert_eq!(stats.delivered, 8);
        assert_eq!(stats.skipped, 0);
        assert_eq!(recorder.names().last().map(String::as_str), Some("build_done"));
    }

    #[test]
    fn cancellation_drops_pending_projects_and_emits_cancel_once() {
        let engine = Arc::new(ScriptedBuildEngine::from_reader(Cursor::new(SCRIPT)).unwrap());
        let recorder = Recorder::new();
        *recorder.engine.lock().unwrap() = Some(engine.clone());

        let stats = engine.run(&recorder);

        assert_eq!(
            recorder.names(),
            vec![
                "build_begin",
                "project_begin:a",
                "error_raised:a",
                "build_cancelled",
                "project_done:a:Error",
                "build_done",
            ]
        );
        assert_eq!(stats.cancelled_sessions, 1);
        assert_eq!(stats.skipped, 3);
    }

    #[test]
    fn new_session_clears_cancellation() {
        let engine = ScriptedBuildEngine::new(vec![
            BuildEvent::BuildBegin {
                scope: BuildScope::Solution,
                action: BuildAction::Build,
            },
            BuildEvent::BuildDone,
        ]);
        engine.request_cancel();
        assert!(engine.is_cancel_requested());

        let recorder = Recorder::new();
        engine.run(&recorder);

        assert_eq!(recorder.names(), vec!["build_begin", "build_done"]);
        assert!(!engine.is_cancel_requested());
    }
}
