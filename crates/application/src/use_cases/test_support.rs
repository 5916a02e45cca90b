use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use reading_time_domain::adjustment::StructureStats;
use reading_time_domain::document::{PostDocument, PostMeta};
use reading_time_domain::settings::ReadingTimeSettings;

use crate::error::ReadingTimeError;
use crate::ports::{
    MarkupProcessor, PostMetaStore, PostRepository, PostWatchService, SettingsStore,
    ShortcodeProcessor,
};

pub(crate) struct StubRepository {
    path: PathBuf,
    document: PostDocument,
    error: Option<ReadingTimeError>,
}

impl StubRepository {
    pub(crate) fn ok(path: PathBuf, document: PostDocument) -> Self {
        Self {
            path,
            document,
            error: None,
        }
    }

    pub(crate) fn fail(error: ReadingTimeError) -> Self {
        Self {
            path: PathBuf::new(),
            document: PostDocument::html(""),
            error: Some(error),
        }
    }
}

impl PostRepository for StubRepository {
    fn read(&self, _post_ref: &str) -> Result<(PathBuf, PostDocument), ReadingTimeError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok((self.path.clone(), self.document.clone()))
    }
}

pub(crate) struct StubMetaStore {
    meta: PostMeta,
    error: Option<ReadingTimeError>,
    pub(crate) written: Mutex<Vec<(PathBuf, PostMeta)>>,
}

impl StubMetaStore {
    pub(crate) fn ok(meta: PostMeta) -> Self {
        Self {
            meta,
            error: None,
            written: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn fail(error: ReadingTimeError) -> Self {
        Self {
            meta: PostMeta::default(),
            error: Some(error),
            written: Mutex::new(Vec::new()),
        }
    }
}

impl PostMetaStore for StubMetaStore {
    fn read(&self, _post_path: &Path) -> Result<PostMeta, ReadingTimeError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(self.meta)
    }

    fn write(&self, post_path: &Path, meta: &PostMeta) -> Result<(), ReadingTimeError> {
        self.written
            .lock()
            .expect("meta store state should be lockable")
            .push((post_path.to_path_buf(), *meta));
        Ok(())
    }
}

pub(crate) struct StubSettingsStore {
    settings: ReadingTimeSettings,
    error: Option<ReadingTimeError>,
    pub(crate) saved: Mutex<Option<ReadingTimeSettings>>,
    pub(crate) reset_called: AtomicBool,
}

impl StubSettingsStore {
    pub(crate) fn ok(settings: ReadingTimeSettings) -> Self {
        Self {
            settings,
            error: None,
            saved: Mutex::new(None),
            reset_called: AtomicBool::new(false),
        }
    }

    pub(crate) fn fail(error: ReadingTimeError) -> Self {
        Self {
            settings: ReadingTimeSettings::default(),
            error: Some(error),
            saved: Mutex::new(None),
            reset_called: AtomicBool::new(false),
        }
    }
}

impl SettingsStore for StubSettingsStore {
    fn load(&self) -> Result<ReadingTimeSettings, ReadingTimeError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(self.settings.clone())
    }

    fn save(&self, settings: &ReadingTimeSettings) -> Result<(), ReadingTimeError> {
        self.saved
            .lock()
            .expect("settings store state should be lockable")
            .replace(settings.clone());
        Ok(())
    }

    fn reset(&self) -> Result<(), ReadingTimeError> {
        self.reset_called.store(true, Ordering::Relaxed);
        Ok(())
    }
}

/// Treats bodies as already-plain text; structure comes from the fixture.
pub(crate) struct StubMarkup {
    structure: StructureStats,
    pub(crate) to_html_called: AtomicBool,
    pub(crate) structure_called: AtomicBool,
    pub(crate) remove_code_called: AtomicBool,
    pub(crate) sanitized: Mutex<Vec<String>>,
}

impl StubMarkup {
    pub(crate) fn new() -> Self {
        Self {
            structure: StructureStats::default(),
            to_html_called: AtomicBool::new(false),
            structure_called: AtomicBool::new(false),
            remove_code_called: AtomicBool::new(false),
            sanitized: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_structure(mut self, structure: StructureStats) -> Self {
        self.structure = structure;
        self
    }
}

impl MarkupProcessor for StubMarkup {
    fn to_html(&self, document: &PostDocument) -> String {
        self.to_html_called.store(true, Ordering::Relaxed);
        document.body.clone()
    }

    fn auto_paragraph(&self, html: &str) -> String {
        html.to_string()
    }

    fn remove_code_blocks(&self, html: &str) -> String {
        self.remove_code_called.store(true, Ordering::Relaxed);
        html.to_string()
    }

    fn plain_text(&self, html: &str) -> String {
        html.trim().to_string()
    }

    fn structure(&self, _html: &str) -> StructureStats {
        self.structure_called.store(true, Ordering::Relaxed);
        self.structure.clone()
    }

    fn sanitize_inline(&self, html: &str) -> String {
        self.sanitized
            .lock()
            .expect("sanitizer state should be lockable")
            .push(html.to_string());
        html.to_string()
    }
}

pub(crate) struct StubShortcodes {
    pub(crate) expand_called: AtomicBool,
    pub(crate) strip_called: AtomicBool,
}

impl StubShortcodes {
    pub(crate) fn new() -> Self {
        Self {
            expand_called: AtomicBool::new(false),
            strip_called: AtomicBool::new(false),
        }
    }
}

impl ShortcodeProcessor for StubShortcodes {
    fn expand(&self, content: &str) -> String {
        self.expand_called.store(true, Ordering::Relaxed);
        content.to_string()
    }

    fn strip(&self, content: &str) -> String {
        self.strip_called.store(true, Ordering::Relaxed);
        content.to_string()
    }
}

pub(crate) struct StubWatchService {
    should_fail: bool,
    pub(crate) started_path: Mutex<Option<String>>,
    pub(crate) stop_called: AtomicBool,
}

impl StubWatchService {
    pub(crate) fn new(should_fail: bool) -> Self {
        Self {
            should_fail,
            started_path: Mutex::new(None),
            stop_called: AtomicBool::new(false),
        }
    }
}

impl PostWatchService for StubWatchService {
    fn start(
        &self,
        post_ref: &str,
        on_changed: Arc<dyn Fn(String) + Send + Sync>,
    ) -> Result<(), ReadingTimeError> {
        self.started_path
            .lock()
            .expect("watch state should be lockable")
            .replace(post_ref.to_string());
        if self.should_fail {
            return Err(ReadingTimeError::Watch {
                path: PathBuf::from(post_ref),
                reason: "watch failure".to_string(),
            });
        }
        on_changed(post_ref.to_string());
        Ok(())
    }

    fn stop(&self) {
        self.stop_called.store(true, Ordering::Relaxed);
    }
}
