use std::path::{Path, PathBuf};
use std::sync::Arc;

use reading_time_domain::adjustment::StructureStats;
use reading_time_domain::document::{PostDocument, PostMeta};
use reading_time_domain::settings::ReadingTimeSettings;

use crate::error::ReadingTimeError;

pub trait PostRepository: Send + Sync {
    fn read(&self, post_ref: &str) -> Result<(PathBuf, PostDocument), ReadingTimeError>;
}

pub trait PostMetaStore: Send + Sync {
    fn read(&self, post_path: &Path) -> Result<PostMeta, ReadingTimeError>;

    fn write(&self, post_path: &Path, meta: &PostMeta) -> Result<(), ReadingTimeError>;
}

pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<ReadingTimeSettings, ReadingTimeError>;

    fn save(&self, settings: &ReadingTimeSettings) -> Result<(), ReadingTimeError>;

    fn reset(&self) -> Result<(), ReadingTimeError>;
}

pub trait MarkupProcessor: Send + Sync {
    fn to_html(&self, document: &PostDocument) -> String;

    fn auto_paragraph(&self, html: &str) -> String;

    fn remove_code_blocks(&self, html: &str) -> String;

    /// Tag-free, entity-decoded, trimmed text.
    fn plain_text(&self, html: &str) -> String;

    fn structure(&self, html: &str) -> StructureStats;

    fn sanitize_inline(&self, html: &str) -> String;
}

pub trait ShortcodeProcessor: Send + Sync {
    fn expand(&self, content: &str) -> String;

    fn strip(&self, content: &str) -> String;
}

pub trait PostWatchService: Send + Sync {
    fn start(
        &self,
        post_ref: &str,
        on_changed: Arc<dyn Fn(String) + Send + Sync>,
    ) -> Result<(), ReadingTimeError>;

    fn stop(&self);
}
