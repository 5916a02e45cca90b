use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use reading_time_application::error::ReadingTimeError;
use reading_time_application::ports::SettingsStore;
use reading_time_domain::settings::{BadgePosition, ProgressPosition, ReadingTimeSettings};
use serde_json::{json, Map, Value};

/// Settings persisted as one flat JSON object, merged over the defaults.
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<ReadingTimeSettings, ReadingTimeError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(source) if source.kind() == ErrorKind::NotFound => {
                debug!("no settings at {}, using defaults", self.path.display());
                return Ok(ReadingTimeSettings::default());
            }
            Err(source) => {
                return Err(ReadingTimeError::Read {
                    path: self.path.clone(),
                    reason: source.to_string(),
                })
            }
        };

        let value: Value =
            serde_json::from_str(&content).map_err(|source| ReadingTimeError::Malformed {
                path: self.path.clone(),
                reason: source.to_string(),
            })?;
        let Value::Object(stored) = value else {
            return Err(ReadingTimeError::Malformed {
                path: self.path.clone(),
                reason: "expected a JSON object of settings".to_string(),
            });
        };

        Ok(merge_over_defaults(&stored).sanitized())
    }

    fn save(&self, settings: &ReadingTimeSettings) -> Result<(), ReadingTimeError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ReadingTimeError::Write {
                path: parent.to_path_buf(),
                reason: source.to_string(),
            })?;
        }

        let json = serde_json::to_string_pretty(&to_stored(settings)).map_err(|source| {
            ReadingTimeError::Write {
                path: self.path.clone(),
                reason: source.to_string(),
            }
        })?;
        fs::write(&self.path, json + "\n").map_err(|source| ReadingTimeError::Write {
            path: self.path.clone(),
            reason: source.to_string(),
        })
    }

    fn reset(&self) -> Result<(), ReadingTimeError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ReadingTimeError::Write {
                path: self.path.clone(),
                reason: source.to_string(),
            }),
        }
    }
}

fn to_stored(settings: &ReadingTimeSettings) -> Value {
    let display = &settings.display;
    json!({
        "wpm": settings.words_per_minute,
        "cpm": settings.chars_per_minute_cjk,
        "ai_adjustment": settings.ai_adjustment,
        "exclude_code_blocks": settings.exclude_code_blocks,
        "exclude_shortcodes": settings.exclude_shortcodes,
        "badge_label": settings.badge_label,
        "badge_label_under_one": settings.badge_label_under_one,
        "show_badge": display.show_badge,
        "badge_position": display.badge_position.as_str(),
        "badge_post_types": display.badge_post_types,
        "badge_icon": display.badge_icon,
        "show_progress_bar": display.show_progress_bar,
        "progress_position": display.progress_position.as_str(),
        "progress_post_types": display.progress_post_types,
        "progress_color": display.progress_color,
        "progress_bg_color": display.progress_bg_color,
        "progress_height": display.progress_height,
        "progress_show_tooltip": display.progress_show_tooltip,
        "reduce_motion_respect": display.reduce_motion_respect,
    })
}

fn merge_over_defaults(stored: &Map<String, Value>) -> ReadingTimeSettings {
    let stored = Lenient(stored);
    let mut settings = ReadingTimeSettings::default();

    if let Some(value) = stored.whole_number("wpm") {
        settings.words_per_minute = value;
    }
    if let Some(value) = stored.whole_number("cpm") {
        settings.chars_per_minute_cjk = value;
    }
    if let Some(value) = stored.flag("ai_adjustment") {
        settings.ai_adjustment = value;
    }
    if let Some(value) = stored.flag("exclude_code_blocks") {
        settings.exclude_code_blocks = value;
    }
    if let Some(value) = stored.flag("exclude_shortcodes") {
        settings.exclude_shortcodes = value;
    }
    if let Some(value) = stored.text("badge_label") {
        settings.badge_label = value;
    }
    if let Some(value) = stored.text("badge_label_under_one") {
        settings.badge_label_under_one = value;
    }

    let display = &mut settings.display;
    if let Some(value) = stored.flag("show_badge") {
        display.show_badge = value;
    }
    if let Some(value) = stored.text("badge_position") {
        match BadgePosition::parse(&value) {
            Some(position) => display.badge_position = position,
            None => warn!("ignoring unknown badge_position `{value}`"),
        }
    }
    if let Some(value) = stored.list("badge_post_types") {
        display.badge_post_types = value;
    }
    if let Some(value) = stored.flag("badge_icon") {
        display.badge_icon = value;
    }
    if let Some(value) = stored.flag("show_progress_bar") {
        display.show_progress_bar = value;
    }
    if let Some(value) = stored.text("progress_position") {
        match ProgressPosition::parse(&value) {
            Some(position) => display.progress_position = position,
            None => warn!("ignoring unknown progress_position `{value}`"),
        }
    }
    if let Some(value) = stored.list("progress_post_types") {
        display.progress_post_types = value;
    }
    if let Some(value) = stored.text("progress_color") {
        display.progress_color = value;
    }
    if let Some(value) = stored.text("progress_bg_color") {
        display.progress_bg_color = value;
    }
    if let Some(value) = stored.whole_number("progress_height") {
        display.progress_height = u8::try_from(value).unwrap_or(u8::MAX);
    }
    if let Some(value) = stored.flag("progress_show_tooltip") {
        display.progress_show_tooltip = value;
    }
    if let Some(value) = stored.flag("reduce_motion_respect") {
        display.reduce_motion_respect = value;
    }

    settings
}

/// Reads values the way a loosely typed options table stores them.
struct Lenient<'a>(&'a Map<String, Value>);

impl Lenient<'_> {
    fn whole_number(&self, key: &str) -> Option<u32> {
        let number = match self.0.get(key)? {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|value| value.trunc() as i64))?,
            Value::String(text) => text.trim().parse::<i64>().ok()?,
            Value::Bool(flag) => i64::from(*flag),
            _ => return None,
        };
        Some(u32::try_from(number.unsigned_abs()).unwrap_or(u32::MAX))
    }

    fn flag(&self, key: &str) -> Option<bool> {
        match self.0.get(key)? {
            Value::Bool(flag) => Some(*flag),
            Value::Number(number) => Some(number.as_f64().is_some_and(|value| value != 0.0)),
            Value::String(text) => Some(matches!(
                text.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )),
            Value::Null => Some(false),
            _ => None,
        }
    }

    fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }

    fn list(&self, key: &str) -> Option<Vec<String>> {
        match self.0.get(key)? {
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            ),
            Value::String(text) => Some(text.split(',').map(|item| item.trim().to_string()).collect()),
            _ => None,
        }
    }
}
