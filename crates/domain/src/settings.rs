use std::ops::RangeInclusive;

pub const TIME_TOKEN: &str = "{time}";

pub const DEFAULT_WORDS_PER_MINUTE: u32 = 238;
pub const DEFAULT_CHARS_PER_MINUTE_CJK: u32 = 1000;
pub const DEFAULT_BADGE_LABEL: &str = "{time} min read";
pub const DEFAULT_BADGE_LABEL_UNDER_ONE: &str = "Less than 1 min read";
pub const DEFAULT_PROGRESS_COLOR: &str = "#6366f1";
pub const DEFAULT_PROGRESS_BG_COLOR: &str = "rgba(99,102,241,0.15)";
pub const DEFAULT_PROGRESS_HEIGHT: u8 = 3;

pub const WORDS_PER_MINUTE_RANGE: RangeInclusive<u32> = 60..=600;
pub const CHARS_PER_MINUTE_CJK_RANGE: RangeInclusive<u32> = 200..=2000;
pub const PROGRESS_HEIGHT_RANGE: RangeInclusive<u8> = 1..=10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BadgePosition {
    #[default]
    Before,
    After,
    Both,
}

impl BadgePosition {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "before" => Some(Self::Before),
            "after" => Some(Self::After),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::Both => "both",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressPosition {
    #[default]
    Top,
    Bottom,
}

impl ProgressPosition {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

/// Site-wide configuration, treated as immutable for the duration of a calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingTimeSettings {
    pub words_per_minute: u32,
    pub chars_per_minute_cjk: u32,
    pub ai_adjustment: bool,
    pub exclude_code_blocks: bool,
    pub exclude_shortcodes: bool,
    pub badge_label: String,
    pub badge_label_under_one: String,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySettings {
    pub show_badge: bool,
    pub badge_position: BadgePosition,
    pub badge_post_types: Vec<String>,
    pub badge_icon: bool,
    pub show_progress_bar: bool,
    pub progress_position: ProgressPosition,
    pub progress_post_types: Vec<String>,
    pub progress_color: String,
    pub progress_bg_color: String,
    pub progress_height: u8,
    pub progress_show_tooltip: bool,
    pub reduce_motion_respect: bool,
}

impl Default for ReadingTimeSettings {
    fn default() -> Self {
        Self {
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            chars_per_minute_cjk: DEFAULT_CHARS_PER_MINUTE_CJK,
            ai_adjustment: true,
            exclude_code_blocks: true,
            exclude_shortcodes: false,
            badge_label: DEFAULT_BADGE_LABEL.to_string(),
            badge_label_under_one: DEFAULT_BADGE_LABEL_UNDER_ONE.to_string(),
            display: DisplaySettings::default(),
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_badge: true,
            badge_position: BadgePosition::default(),
            badge_post_types: vec!["post".to_string()],
            badge_icon: true,
            show_progress_bar: true,
            progress_position: ProgressPosition::default(),
            progress_post_types: vec!["post".to_string()],
            progress_color: DEFAULT_PROGRESS_COLOR.to_string(),
            progress_bg_color: DEFAULT_PROGRESS_BG_COLOR.to_string(),
            progress_height: DEFAULT_PROGRESS_HEIGHT,
            progress_show_tooltip: true,
            reduce_motion_respect: true,
        }
    }
}

impl ReadingTimeSettings {
    pub fn sanitized(mut self) -> Self {
        self.words_per_minute = clamp_to(self.words_per_minute, &WORDS_PER_MINUTE_RANGE);
        self.chars_per_minute_cjk =
            clamp_to(self.chars_per_minute_cjk, &CHARS_PER_MINUTE_CJK_RANGE);
        self.badge_label = self.badge_label.trim().to_string();
        self.badge_label_under_one = self.badge_label_under_one.trim().to_string();
        self.display = self.display.sanitized();
        self
    }
}

impl DisplaySettings {
    pub fn sanitized(mut self) -> Self {
        self.progress_height = clamp_to(self.progress_height, &PROGRESS_HEIGHT_RANGE);
        if !is_hex_color(&self.progress_color) {
            self.progress_color = DEFAULT_PROGRESS_COLOR.to_string();
        }
        self.progress_bg_color = self.progress_bg_color.trim().to_string();
        self.badge_post_types = sanitize_post_types(self.badge_post_types);
        self.progress_post_types = sanitize_post_types(self.progress_post_types);
        self
    }

    pub fn badge_enabled_for(&self, post_type: &str) -> bool {
        self.show_badge && self.badge_post_types.iter().any(|allowed| allowed == post_type)
    }

    pub fn progress_enabled_for(&self, post_type: &str) -> bool {
        self.show_progress_bar
            && self
                .progress_post_types
                .iter()
                .any(|allowed| allowed == post_type)
    }
}

fn clamp_to<T: Ord + Copy>(value: T, range: &RangeInclusive<T>) -> T {
    value.clamp(*range.start(), *range.end())
}

/// Accepts `#rgb` and `#rrggbb`.
pub fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Lowercases and keeps `[a-z0-9_-]`, dropping keys that end up empty.
pub fn sanitize_key(value: &str) -> String {
    value
        .to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

fn sanitize_post_types(post_types: Vec<String>) -> Vec<String> {
    let mut sanitized: Vec<String> = Vec::with_capacity(post_types.len());
    for post_type in post_types {
        let key = sanitize_key(&post_type);
        if !key.is_empty() && !sanitized.contains(&key) {
            sanitized.push(key);
        }
    }
    sanitized
}
