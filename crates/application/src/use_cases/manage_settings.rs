use std::sync::Arc;

use log::info;
use reading_time_domain::settings::{BadgePosition, ProgressPosition, ReadingTimeSettings};

use crate::error::ReadingTimeError;
use crate::models::{SettingsOutput, SettingsPatch};
use crate::ports::SettingsStore;
use crate::use_cases::estimate_reading_time::load_settings_or_default;

#[derive(Clone)]
pub struct ManageSettingsUseCase {
    settings_store: Arc<dyn SettingsStore>,
}

impl ManageSettingsUseCase {
    pub fn new(settings_store: Arc<dyn SettingsStore>) -> Self {
        Self { settings_store }
    }

    pub fn current(&self) -> SettingsOutput {
        let settings = load_settings_or_default(self.settings_store.as_ref()).sanitized();
        SettingsOutput::from(&settings)
    }

    pub fn update(&self, patch: SettingsPatch) -> Result<SettingsOutput, ReadingTimeError> {
        let settings = load_settings_or_default(self.settings_store.as_ref());
        let settings = apply_patch(settings, patch)?.sanitized();
        self.settings_store.save(&settings)?;
        info!("saved reading time settings");
        Ok(SettingsOutput::from(&settings))
    }

    pub fn reset(&self) -> Result<SettingsOutput, ReadingTimeError> {
        self.settings_store.reset()?;
        info!("reset reading time settings to defaults");
        Ok(SettingsOutput::from(&ReadingTimeSettings::default()))
    }
}

fn apply_patch(
    mut settings: ReadingTimeSettings,
    patch: SettingsPatch,
) -> Result<ReadingTimeSettings, ReadingTimeError> {
    if let Some(value) = patch.words_per_minute {
        settings.words_per_minute = value;
    }
    if let Some(value) = patch.chars_per_minute_cjk {
        settings.chars_per_minute_cjk = value;
    }
    if let Some(value) = patch.ai_adjustment {
        settings.ai_adjustment = value;
    }
    if let Some(value) = patch.exclude_code_blocks {
        settings.exclude_code_blocks = value;
    }
    if let Some(value) = patch.exclude_shortcodes {
        settings.exclude_shortcodes = value;
    }
    if let Some(value) = patch.badge_label {
        settings.badge_label = value;
    }
    if let Some(value) = patch.badge_label_under_one {
        settings.badge_label_under_one = value;
    }

    let display = &mut settings.display;
    if let Some(value) = patch.show_badge {
        display.show_badge = value;
    }
    if let Some(value) = patch.badge_position {
        display.badge_position =
            BadgePosition::parse(&value).ok_or_else(|| ReadingTimeError::InvalidSetting {
                key: "badge_position".to_string(),
                reason: format!("`{value}` is not one of before, after, both"),
            })?;
    }
    if let Some(value) = patch.badge_post_types {
        display.badge_post_types = value;
    }
    if let Some(value) = patch.badge_icon {
        display.badge_icon = value;
    }
    if let Some(value) = patch.show_progress_bar {
        display.show_progress_bar = value;
    }
    if let Some(value) = patch.progress_position {
        display.progress_position =
            ProgressPosition::parse(&value).ok_or_else(|| ReadingTimeError::InvalidSetting {
                key: "progress_position".to_string(),
                reason: format!("`{value}` is not one of top, bottom"),
            })?;
    }
    if let Some(value) = patch.progress_post_types {
        display.progress_post_types = value;
    }
    if let Some(value) = patch.progress_color {
        display.progress_color = value;
    }
    if let Some(value) = patch.progress_bg_color {
        display.progress_bg_color = value;
    }
    if let Some(value) = patch.progress_height {
        display.progress_height = value;
    }
    if let Some(value) = patch.progress_show_tooltip {
        display.progress_show_tooltip = value;
    }
    if let Some(value) = patch.reduce_motion_respect {
        display.reduce_motion_respect = value;
    }

    Ok(settings)
}
