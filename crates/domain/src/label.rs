use crate::settings::{ReadingTimeSettings, TIME_TOKEN};

/// Substitutes `{time}` without any markup filtering; callers sanitize the templates first.
pub fn format_label(minutes: u32, settings: &ReadingTimeSettings) -> String {
    if minutes < 1 {
        return settings.badge_label_under_one.replace(TIME_TOKEN, "1");
    }
    settings
        .badge_label
        .replace(TIME_TOKEN, &minutes.to_string())
}
