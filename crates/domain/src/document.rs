pub const DEFAULT_POST_TYPE: &str = "post";
pub const MAX_OVERRIDE_MINUTES: u32 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentFormat {
    #[default]
    Html,
    Markdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDocument {
    pub body: String,
    pub format: ContentFormat,
    pub post_type: String,
}

impl PostDocument {
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            format: ContentFormat::Html,
            post_type: DEFAULT_POST_TYPE.to_string(),
        }
    }

    pub fn markdown(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            format: ContentFormat::Markdown,
            post_type: DEFAULT_POST_TYPE.to_string(),
        }
    }

    pub fn with_post_type(mut self, post_type: impl Into<String>) -> Self {
        self.post_type = post_type.into();
        self
    }
}

/// Per-post values edited alongside the post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PostMeta {
    pub override_minutes: Option<u32>,
    pub disable_badge: bool,
    pub disable_progress: bool,
}

impl PostMeta {
    /// Only positive overrides short-circuit the calculation.
    pub fn effective_override(&self) -> Option<u32> {
        self.override_minutes.filter(|minutes| *minutes > 0)
    }
}
