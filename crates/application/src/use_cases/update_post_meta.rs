use std::sync::Arc;

use log::info;
use reading_time_domain::document::MAX_OVERRIDE_MINUTES;

use crate::error::ReadingTimeError;
use crate::models::{PostMetaInput, PostMetaOutput};
use crate::ports::{PostMetaStore, PostRepository};
use crate::use_cases::estimate_reading_time::read_meta_or_default;

#[derive(Clone)]
pub struct UpdatePostMetaUseCase {
    repository: Arc<dyn PostRepository>,
    meta_store: Arc<dyn PostMetaStore>,
}

impl UpdatePostMetaUseCase {
    pub fn new(repository: Arc<dyn PostRepository>, meta_store: Arc<dyn PostMetaStore>) -> Self {
        Self {
            repository,
            meta_store,
        }
    }

    pub fn execute(
        &self,
        post_ref: &str,
        input: PostMetaInput,
    ) -> Result<PostMetaOutput, ReadingTimeError> {
        let (path, _) = self.repository.read(post_ref)?;
        let mut meta = read_meta_or_default(self.meta_store.as_ref(), &path);

        if let Some(raw) = input.override_minutes.as_deref() {
            meta.override_minutes = parse_override(raw)?;
        }
        if let Some(disable_badge) = input.disable_badge {
            meta.disable_badge = disable_badge;
        }
        if let Some(disable_progress) = input.disable_progress {
            meta.disable_progress = disable_progress;
        }

        self.meta_store.write(&path, &meta)?;
        info!("updated reading time meta for {}", path.display());

        Ok(PostMetaOutput::new(path.to_string_lossy().into_owned(), meta))
    }
}

/// Blank or zero clears the override.
pub fn parse_override(raw: &str) -> Result<Option<u32>, ReadingTimeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let minutes = trimmed
        .parse::<u32>()
        .map_err(|_| ReadingTimeError::InvalidOverride(raw.to_string()))?;
    match minutes {
        0 => Ok(None),
        1..=MAX_OVERRIDE_MINUTES => Ok(Some(minutes)),
        _ => Err(ReadingTimeError::InvalidOverride(raw.to_string())),
    }
}
