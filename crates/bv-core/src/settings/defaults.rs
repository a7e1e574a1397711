use super::model::*;
use super::WindowStateAction;

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            stop_build_after_first_error: false,
            navigate_to_build_failure_reason: NavigateToBuildFailureReason::Never,
            fill_project_list_on_build_begin: true,
            enable_status_bar_output: true,
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            window_action_on_build_begin: WindowStateAction::Nothing,
            window_action_on_build_error: WindowStateAction::Show,
            window_action_on_build_success: WindowStateAction::Nothing,
        }
    }
}

impl Default for BuildMessagesSettings {
    fn default() -> Self {
        Self {
            show_elapsed_in_extra_message: true,
            show_progress_in_extra_message: true,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            general: GeneralSettings::default(),
            window: WindowSettings::default(),
            messages: BuildMessagesSettings::default(),
        }
    }
}
