use reading_time_application::models::{
    BadgePlacement, PostMetaOutput, ProgressBarOutput, ProgressPlacement, ReadingTimeOutput,
    SettingsOutput, SettingsPatch,
};
use serde::Deserialize;
use serde::Serialize;

use crate::badge::{inject_badge, render_badge_with, BadgeHooks};
use crate::progress::render_progress_bar;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeDto {
    pub placement: &'static str,
    pub show_icon: bool,
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressBarDto {
    pub placement: &'static str,
    pub color: String,
    pub background_color: String,
    pub height: u8,
    pub show_tooltip: bool,
    pub respect_reduced_motion: bool,
    pub html: String,
}

impl From<ProgressBarOutput> for ProgressBarDto {
    fn from(value: ProgressBarOutput) -> Self {
        let html = render_progress_bar(&value);
        Self {
            placement: match value.placement {
                ProgressPlacement::Top => "top",
                ProgressPlacement::Bottom => "bottom",
            },
            color: value.color,
            background_color: value.background_color,
            height: value.height,
            show_tooltip: value.show_tooltip,
            respect_reduced_motion: value.respect_reduced_motion,
            html,
        }
    }
}

fn badge_placement_name(placement: BadgePlacement) -> &'static str {
    match placement {
        BadgePlacement::Before => "before",
        BadgePlacement::After => "after",
        BadgePlacement::Both => "both",
    }
}

/// An estimate ready for a page: `content` is the post HTML with the badge
/// already injected.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingTimeDto {
    pub path: String,
    pub post_type: String,
    pub minutes: u32,
    pub words: u32,
    pub adjusted: bool,
    pub is_override: bool,
    pub label: String,
    pub badge: Option<BadgeDto>,
    pub progress_bar: Option<ProgressBarDto>,
    pub content: String,
}

impl From<ReadingTimeOutput> for ReadingTimeDto {
    fn from(value: ReadingTimeOutput) -> Self {
        Self::render(value, &BadgeHooks::default())
    }
}

impl ReadingTimeDto {
    pub fn render(value: ReadingTimeOutput, hooks: &BadgeHooks) -> Self {
        let rendered = render_badge_with(&value, hooks);
        let (badge, content) = match (value.badge, rendered) {
            (Some(output), Some(html)) => {
                let content = inject_badge(&value.html, &html, output.placement);
                let badge = BadgeDto {
                    placement: badge_placement_name(output.placement),
                    show_icon: output.show_icon,
                    html,
                };
                (Some(badge), content)
            }
            _ => (None, value.html.clone()),
        };

        Self {
            path: value.path,
            post_type: value.post_type,
            minutes: value.minutes,
            words: value.words,
            adjusted: value.adjusted,
            is_override: value.is_override,
            label: value.label,
            badge,
            progress_bar: value.progress_bar.map(ProgressBarDto::from),
            content,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMetaDto {
    pub path: String,
    pub override_minutes: Option<u32>,
    pub disable_badge: bool,
    pub disable_progress: bool,
}

impl From<PostMetaOutput> for PostMetaDto {
    fn from(value: PostMetaOutput) -> Self {
        Self {
            path: value.path,
            override_minutes: value.override_minutes,
            disable_badge: value.disable_badge,
            disable_progress: value.disable_progress,
        }
    }
}

/// Settings keyed the same way as the settings file.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsDto {
    pub wpm: u32,
    pub cpm: u32,
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

impl From<SettingsOutput> for SettingsDto {
    fn from(value: SettingsOutput) -> Self {
        Self {
            wpm: value.words_per_minute,
            cpm: value.chars_per_minute_cjk,
            ai_adjustment: value.ai_adjustment,
            exclude_code_blocks: value.exclude_code_blocks,
            exclude_shortcodes: value.exclude_shortcodes,
            badge_label: value.badge_label,
            badge_label_under_one: value.badge_label_under_one,
            show_badge: value.show_badge,
            badge_position: value.badge_position,
            badge_post_types: value.badge_post_types,
            badge_icon: value.badge_icon,
            show_progress_bar: value.show_progress_bar,
            progress_position: value.progress_position,
            progress_post_types: value.progress_post_types,
            progress_color: value.progress_color,
            progress_bg_color: value.progress_bg_color,
            progress_height: value.progress_height,
            progress_show_tooltip: value.progress_show_tooltip,
            reduce_motion_respect: value.reduce_motion_respect,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsPatchDto {
    pub wpm: Option<u32>,
    pub cpm: Option<u32>,
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

impl From<SettingsPatchDto> for SettingsPatch {
    fn from(value: SettingsPatchDto) -> Self {
        Self {
            words_per_minute: value.wpm,
            chars_per_minute_cjk: value.cpm,
            ai_adjustment: value.ai_adjustment,
            exclude_code_blocks: value.exclude_code_blocks,
            exclude_shortcodes: value.exclude_shortcodes,
            badge_label: value.badge_label,
            badge_label_under_one: value.badge_label_under_one,
            show_badge: value.show_badge,
            badge_position: value.badge_position,
            badge_post_types: value.badge_post_types,
            badge_icon: value.badge_icon,
            show_progress_bar: value.show_progress_bar,
            progress_position: value.progress_position,
            progress_post_types: value.progress_post_types,
            progress_color: value.progress_color,
            progress_bg_color: value.progress_bg_color,
            progress_height: value.progress_height,
            progress_show_tooltip: value.progress_show_tooltip,
            reduce_motion_respect: value.reduce_motion_respect,
        }
    }
}
