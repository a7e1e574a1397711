//! Cancellation and navigate-to-error policy.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bv_core::ports::ProjectLocatorPort;
use bv_core::settings::GeneralSettings;
use bv_core::{BuildAction, ErrorItem, ErrorLevel, NavigateToBuildFailureReason};
use tracing::{debug, warn};

/// Decides whether an error aborts the build and performs at most one
/// automatic navigation to a diagnostic per build session.
pub struct ErrorNavigationPolicy {
    locator: Arc<dyn ProjectLocatorPort>,
    /// One-shot latch, reset on build begin.
    navigated: AtomicBool,
}

impl ErrorNavigationPolicy {
    pub fn new(locator: Arc<dyn ProjectLocatorPort>) -> Self {
        Self {
            locator,
            navigated: AtomicBool::new(false),
        }
    }

    pub fn reset(&self) {
        self.navigated.store(false, Ordering::SeqCst);
    }

    pub fn is_navigated(&self) -> bool {
        self.navigated.load(Ordering::SeqCst)
    }

    /// Error diagnostics of a non-clean build abort it when configured.
    pub fn should_cancel(level: ErrorLevel, action: BuildAction, settings: &GeneralSettings) -> bool {
        level == ErrorLevel::Error
            && action != BuildAction::Clean
            && settings.stop_build_after_first_error
    }

    /// Navigation for a raised diagnostic (`OnErrorRaised` mode).
    ///
    /// `errors` are the raising project's diagnostics so far, in order;
    /// `is_known_project` tells whether a project path belongs to the
    /// monitored solution. Returns whether navigation happened now.
    pub fn on_error_raised<'a, I, K>(
        &self,
        level: ErrorLevel,
        errors: I,
        settings: &GeneralSettings,
        is_known_project: K,
    ) -> bool
    where
        I: IntoIterator<Item = &'a ErrorItem>,
        K: Fn(&str) -> bool,
    {
        if level != ErrorLevel::Error
            || settings.navigate_to_build_failure_reason
                != NavigateToBuildFailureReason::OnErrorRaised
        {
            return false;
        }
        self.navigate_first(errors, &is_known_project)
    }

    /// Navigation at the end of a failed session (`OnBuildDone` mode).
    ///
    /// `errors` are the diagnostics of every touched project in encounter order.
    pub fn on_build_done<'a, I, K>(
        &self,
        build_without_errors: bool,
        errors: I,
        settings: &GeneralSettings,
        is_known_project: K,
    ) -> bool
    where
        I: IntoIterator<Item = &'a ErrorItem>,
        K: Fn(&str) -> bool,
    {
        if build_without_errors
            || settings.navigate_to_build_failure_reason != NavigateToBuildFailureReason::OnBuildDone
        {
            return false;
        }
        self.navigate_first(errors, &is_known_project)
    }

    fn navigate_first<'a, I, K>(&self, errors: I, is_known_project: &K) -> bool
    where
        I: IntoIterator<Item = &'a ErrorItem>,
        K: Fn(&str) -> bool,
    {
        if self.is_navigated() {
            debug!("navigation already performed in this session");
            return false;
        }
        let navigated = errors
            .into_iter()
            .filter(|item| item.level == ErrorLevel::Error)
            .any(|item| self.navigate_to_error_item(item, is_known_project));
        if navigated {
            self.navigated.store(true, Ordering::SeqCst);
        }
        navigated
    }

    /// One navigation attempt.
    ///
    /// Missing location data, an unknown project or a failed lookup are plain
    /// negative results. A fault of the navigation layer itself counts as
    /// navigated so the latch closes and the attempt is not repeated.
    fn navigate_to_error_item<K>(&self, item: &ErrorItem, is_known_project: &K) -> bool
    where
        K: Fn(&str) -> bool,
    {
        if !item.is_navigable() {
            return false;
        }
        let Some(project_file) = item.project_file.as_deref() else {
            return false;
        };
        if !is_known_project(project_file) {
            return false;
        }

        let navigator = match self.locator.find_project(project_file) {
            Ok(Some(navigator)) => navigator,
            Ok(None) => return false,
            Err(err) => {
                debug!(project = project_file, error = %err, "project lookup failed");
                return false;
            }
        };

        match navigator.navigate_to(item) {
            Ok(moved) => moved,
            Err(err) => {
                // Known quirk: a navigation fault still closes the latch.
                warn!(
                    project = project_file,
                    file = item.file.as_deref().unwrap_or_default(),
                    error = %err,
                    "navigate to error item failed"
                );
                true
            }
        }
    }
}
