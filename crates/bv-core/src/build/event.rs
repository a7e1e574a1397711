use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BuildAction, BuildScope};
use crate::ids::ProjectId;
use crate::ports::BuildEventHandler;
use crate::project::{ErrorItem, ErrorLevel, ErrorsBox, ProjectOutcome};

/// Project as named by the build engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub unique_name: String,
    #[serde(default)]
    pub full_path: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl ProjectRef {
    pub fn new(unique_name: impl Into<String>) -> Self {
        Self {
            unique_name: unique_name.into(),
            full_path: None,
            name: None,
        }
    }

    pub fn with_full_path(mut self, full_path: impl Into<String>) -> Self {
        self.full_path = Some(full_path.into());
        self
    }

    /// Full path when known, unique name otherwise.
    pub fn id(&self) -> ProjectId {
        match self.full_path.as_deref() {
            Some(path) if !path.is_empty() => ProjectId::new(path),
            _ => ProjectId::new(self.unique_name.as_str()),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.unique_name)
    }
}

/// Post-build data the engine reports with `ProjectDone`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectBuildInfo {
    pub errors_box: ErrorsBox,
}

impl ProjectBuildInfo {
    pub fn new(errors_box: ErrorsBox) -> Self {
        Self { errors_box }
    }
}

/// Build lifecycle events as delivered by the build engine.
///
/// The engine serializes all events except `BuildProcess`, which comes from a
/// periodic source and may interleave with the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BuildEvent {
    BuildBegin {
        #[serde(default)]
        scope: BuildScope,
        #[serde(default)]
        action: BuildAction,
    },
    BuildProcess,
    BuildDone,
    BuildCancelled,
    ProjectBegin {
        project: ProjectRef,
        #[serde(default)]
        time: Option<DateTime<Utc>>,
    },
    ProjectDone {
        project: ProjectRef,
        outcome: ProjectOutcome,
        /// Full diagnostics of the project; when absent the diagnostics raised
        /// during the build are used.
        #[serde(default)]
        errors: Option<Vec<ErrorItem>>,
    },
    ErrorRaised {
        project: ProjectRef,
        error: ErrorItem,
    },
}

impl BuildEvent {
    pub fn name(&self) -> &'static str {
        match self {
            BuildEvent::BuildBegin { .. } => "build_begin",
            BuildEvent::BuildProcess => "build_process",
            BuildEvent::BuildDone => "build_done",
            BuildEvent::BuildCancelled => "build_cancelled",
            BuildEvent::ProjectBegin { .. } => "project_begin",
            BuildEvent::ProjectDone { .. } => "project_done",
            BuildEvent::ErrorRaised { .. } => "error_raised",
        }
    }

    pub fn error_level(&self) -> Option<ErrorLevel> {
        match self {
            BuildEvent::ErrorRaised { error, .. } => Some(error.level),
            _ => None,
        }
    }

    /// The project the event is about, if any.
    pub fn project(&self) -> Option<&ProjectRef> {
        match self {
            BuildEvent::ProjectBegin { project, .. }
            | BuildEvent::ProjectDone { project, .. }
            | BuildEvent::ErrorRaised { project, .. } => Some(project),
            _ => None,
        }
    }

    /// Invoke the matching callback of `handler`.
    pub fn deliver(&self, handler: &dyn BuildEventHandler) {
        match self {
            BuildEvent::BuildBegin { scope, action } => handler.on_build_begin(*scope, *action),
            BuildEvent::BuildProcess => handler.on_build_process(),
            BuildEvent::BuildDone => handler.on_build_done(),
            BuildEvent::BuildCancelled => handler.on_build_cancelled(),
            BuildEvent::ProjectBegin { project, time } => handler.on_project_begin(project, *time),
            BuildEvent::ProjectDone {
                project,
                outcome,
                errors,
            } => {
                let info = errors
                    .as_ref()
                    .map(|items| ProjectBuildInfo::new(items.iter().cloned().collect()));
                handler.on_project_done(project, *outcome, info);
            }
            BuildEvent::ErrorRaised { project, error } => handler.on_error_raised(project, error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_ref_prefers_full_path_for_identity() {
        let with_path = ProjectRef::new("app\\app.csproj").with_full_path("C:/src/app/app.csproj");
        assert_eq!(with_path.id().as_str(), "C:/src/app/app.csproj");

        let without_path = ProjectRef::new("app\\app.csproj");
        assert_eq!(without_path.id().as_str(), "app\\app.csproj");

        let empty_path = ProjectRef::new("lib").with_full_path("");
        assert_eq!(empty_path.id().as_str(), "lib");
    }

    #[test]
    fn events_parse_from_tagged_json() {
        let begin: BuildEvent =
            serde_json::from_str(r#"{"kind":"build_begin","scope":"solution","action":"rebuild"}"#)
                .unwrap();
        assert_eq!(
            begin,
            BuildEvent::BuildBegin {
                scope: BuildScope::Solution,
                action: BuildAction::Rebuild
            }
        );

        let raised: BuildEvent = serde_json::from_str(
            r#"{"kind":"error_raised","project":{"unique_name":"a"},
                "error":{"level":"error","file":"a.c","project_file":"a.vcxproj","line":3,"column":7,"text":"boom"}}"#,
        )
        .unwrap();
        assert_eq!(raised.error_level(), Some(ErrorLevel::Error));
        assert_eq!(raised.name(), "error_raised");
    }

    #[test]
    fn project_done_errors_default_to_none() {
        let done: BuildEvent = serde_json::from_str(
            r#"{"kind":"project_done","project":{"unique_name":"a"},"outcome":"up_to_date"}"#,
        )
        .unwrap();
        match done {
            BuildEvent::ProjectDone {
                outcome, errors, ..
            } => {
                assert_eq!(outcome, ProjectOutcome::UpToDate);
                assert!(errors.is_none());
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
