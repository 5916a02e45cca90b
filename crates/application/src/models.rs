use reading_time_domain::document::PostMeta;
use reading_time_domain::settings::{
    BadgePosition as DomainBadgePosition, ProgressPosition as DomainProgressPosition,
    ReadingTimeSettings,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgePlacement {
    Before,
    After,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressPlacement {
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeOutput {
    pub placement: BadgePlacement,
    pub show_icon: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressBarOutput {
    pub placement: ProgressPlacement,
    pub color: String,
    pub background_color: String,
    pub height: u8,
    pub show_tooltip: bool,
    pub respect_reduced_motion: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingTimeOutput {
    pub path: String,
    pub post_type: String,
    pub html: String,
    pub minutes: u32,
    pub words: u32,
    pub adjusted: bool,
    pub is_override: bool,
    pub label: String,
    pub badge: Option<BadgeOutput>,
    pub progress_bar: Option<ProgressBarOutput>,
}

/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostMetaInput {
    pub override_minutes: Option<String>,
    pub disable_badge: Option<bool>,
    pub disable_progress: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMetaOutput {
    pub path: String,
    pub override_minutes: Option<u32>,
    pub disable_badge: bool,
    pub disable_progress: bool,
}

impl PostMetaOutput {
    pub(crate) fn new(path: String, meta: PostMeta) -> Self {
        Self {
            path,
            override_minutes: meta.override_minutes,
            disable_badge: meta.disable_badge,
            disable_progress: meta.disable_progress,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub words_per_minute: Option<u32>,
    pub chars_per_minute_cjk: Option<u32>,
    pub ai_adjustment: Option<bool>,
    pub exclude_code_blocks: Option<bool>,
    pub exclude_shortcodes: Option<bool>,
    pub badge_label: Option<String>,
    pub badge_label_under_one: Option<String>,
    pub show_badge: Option<bool>,
    pub badge_position: Option<String>,
    pub badge_post_types: Option<Vec<String>>,
    pub badge_icon: Option<bool>,
    pub show_progress_bar: Option<bool>,
    pub progress_position: Option<String>,
    pub progress_post_types: Option<Vec<String>>,
    pub progress_color: Option<String>,
    pub progress_bg_color: Option<String>,
    pub progress_height: Option<u8>,
    pub progress_show_tooltip: Option<bool>,
    pub reduce_motion_respect: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsOutput {
    pub words_per_minute: u32,
    pub chars_per_minute_cjk: u32,
    pub ai_adjustment: bool,
    pub exclude_code_blocks: bool,
    pub exclude_shortcodes: bool,
    pub badge_label: String,
    pub badge_label_under_one: String,
    pub show_badge: bool,
    pub badge_position: String,
    pub badge_post_types: Vec<String>,
    pub badge_icon: bool,
    pub show_progress_bar: bool,
    pub progress_position: String,
    pub progress_post_types: Vec<String>,
    pub progress_color: String,
    pub progress_bg_color: String,
    pub progress_height: u8,
    pub progress_show_tooltip: bool,
    pub reduce_motion_respect: bool,
}

impl From<DomainBadgePosition> for BadgePlacement {
    fn from(value: DomainBadgePosition) -> Self {
        match value {
            DomainBadgePosition::Before => Self::Before,
            DomainBadgePosition::After => Self::After,
            DomainBadgePosition::Both => Self::Both,
        }
    }
}

impl From<DomainProgressPosition> for ProgressPlacement {
    fn from(value: DomainProgressPosition) -> Self {
        match value {
            DomainProgressPosition::Top => Self::Top,
            DomainProgressPosition::Bottom => Self::Bottom,
        }
    }
}

impl From<&ReadingTimeSettings> for SettingsOutput {
    fn from(value: &ReadingTimeSettings) -> Self {
        let display = &value.display;
        Self {
            words_per_minute: value.words_per_minute,
            chars_per_minute_cjk: value.chars_per_minute_cjk,
            ai_adjustment: value.ai_adjustment,
            exclude_code_blocks: value.exclude_code_blocks,
            exclude_shortcodes: value.exclude_shortcodes,
            badge_label: value.badge_label.clone(),
            badge_label_under_one: value.badge_label_under_one.clone(),
            show_badge: display.show_badge,
            badge_position: display.badge_position.as_str().to_string(),
            badge_post_types: display.badge_post_types.clone(),
            badge_icon: display.badge_icon,
            show_progress_bar: display.show_progress_bar,
            progress_position: display.progress_position.as_str().to_string(),
            progress_post_types: display.progress_post_types.clone(),
            progress_color: display.progress_color.clone(),
            progress_bg_color: display.progress_bg_color.clone(),
            progress_height: display.progress_height,
            progress_show_tooltip: display.progress_show_tooltip,
            reduce_motion_respect: display.reduce_motion_respect,
        }
    }
}
