use std::path::Path;
use std::sync::Arc;

use log::warn;
use reading_time_domain::adjustment::AdjustmentFilter;
use reading_time_domain::document::PostMeta;
use reading_time_domain::settings::ReadingTimeSettings;

use crate::calculator::ReadingTimeCalculator;
use crate::error::ReadingTimeError;
use crate::models::{BadgeOutput, ProgressBarOutput, ReadingTimeOutput};
use crate::ports::{
    MarkupProcessor, PostMetaStore, PostRepository, SettingsStore, ShortcodeProcessor,
};

#[derive(Clone)]
pub struct EstimateReadingTimeUseCase {
    repository: Arc<dyn PostRepository>,
    meta_store: Arc<dyn PostMetaStore>,
    settings_store: Arc<dyn SettingsStore>,
    markup: Arc<dyn MarkupProcessor>,
    shortcodes: Arc<dyn ShortcodeProcessor>,
    adjustment_filter: Option<AdjustmentFilter>,
}

impl EstimateReadingTimeUseCase {
    pub fn new(
        repository: Arc<dyn PostRepository>,
        meta_store: Arc<dyn PostMetaStore>,
        settings_store: Arc<dyn SettingsStore>,
        markup: Arc<dyn MarkupProcessor>,
        shortcodes: Arc<dyn ShortcodeProcessor>,
    ) -> Self {
        Self {
            repository,
            meta_store,
            settings_store,
            markup,
            shortcodes,
            adjustment_filter: None,
        }
    }

    pub fn with_adjustment_filter(mut self, filter: AdjustmentFilter) -> Self {
        self.adjustment_filter = Some(filter);
        self
    }

    pub fn execute(&self, post_ref: &str) -> Result<ReadingTimeOutput, ReadingTimeError> {
        let (path, document) = self.repository.read(post_ref)?;
        let meta = read_meta_or_default(self.meta_store.as_ref(), &path);
        let settings = load_settings_or_default(self.settings_store.as_ref());

        let mut calculator = ReadingTimeCalculator::new(
            settings,
            Arc::clone(&self.markup),
            Arc::clone(&self.shortcodes),
        );
        if let Some(filter) = &self.adjustment_filter {
            calculator = calculator.with_adjustment_filter(Arc::clone(filter));
        }

        let estimate = calculator.calculate(Some(&document), &meta);
        let display = &calculator.settings().display;

        let badge = (!estimate.is_empty()
            && !meta.disable_badge
            && display.badge_enabled_for(&document.post_type))
        .then(|| BadgeOutput {
            placement: display.badge_position.into(),
            show_icon: display.badge_icon,
        });
        let progress_bar = (!meta.disable_progress
            && display.progress_enabled_for(&document.post_type))
        .then(|| ProgressBarOutput {
            placement: display.progress_position.into(),
            color: display.progress_color.clone(),
            background_color: display.progress_bg_color.clone(),
            height: display.progress_height,
            show_tooltip: display.progress_show_tooltip,
            respect_reduced_motion: display.reduce_motion_respect,
        });

        Ok(ReadingTimeOutput {
            path: path.to_string_lossy().into_owned(),
            post_type: document.post_type.clone(),
            html: self.markup.to_html(&document),
            minutes: estimate.minutes,
            words: estimate.words,
            adjusted: estimate.adjusted,
            is_override: estimate.is_override,
            label: estimate.label,
            badge,
            progress_bar,
        })
    }
}

pub(crate) fn read_meta_or_default(meta_store: &dyn PostMetaStore, path: &Path) -> PostMeta {
    meta_store.read(path).unwrap_or_else(|error| {
        warn!("ignoring unreadable post meta: {error}");
        PostMeta::default()
    })
}

pub(crate) fn load_settings_or_default(settings_store: &dyn SettingsStore) -> ReadingTimeSettings {
    settings_store.load().unwrap_or_else(|error| {
        warn!("falling back to default settings: {error}");
        ReadingTimeSettings::default()
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use reading_time_domain::adjustment::AdjustmentFilter;
    use reading_time_domain::document::{PostDocument, PostMeta};
    use reading_time_domain::settings::{BadgePosition, ReadingTimeSettings};

    use crate::error::ReadingTimeError;
    use crate::models::{BadgePlacement, ProgressPlacement};
    use crate::use_cases::estimate_reading_time::EstimateReadingTimeUseCase;
    use crate::use_cases::test_support::{
        StubMarkup, StubMetaStore, StubRepository, StubSettingsStore, StubShortcodes,
    };

    fn words(count: usize) -> String {
        vec!["word"; count].join(" ")
    }

    fn use_case(
        repository: StubRepository,
        meta_store: StubMetaStore,
        settings_store: StubSettingsStore,
    ) -> EstimateReadingTimeUseCase {
        EstimateReadingTimeUseCase::new(
            Arc::new(repository),
            Arc::new(meta_store),
            Arc::new(settings_store),
            Arc::new(StubMarkup::new()),
            Arc::new(StubShortcodes::new()),
        )
    }

    #[test]
    fn estimates_post_with_badge_and_progress_bar() {
        let use_case = use_case(
            StubRepository::ok(PathBuf::from("/posts/intro.html"), PostDocument::html(words(500))),
            StubMetaStore::ok(PostMeta::default()),
            StubSettingsStore::ok(ReadingTimeSettings {
                ai_adjustment: false,
                ..ReadingTimeSettings::default()
            }),
        );

        let output = use_case.execute("/posts/intro.html").expect("estimate should succeed");

        assert_eq!(output.path, "/posts/intro.html");
        assert_eq!(output.minutes, 3);
        assert_eq!(output.words, 500);
        assert_eq!(output.label, "3 min read");
        assert_eq!(
            output.badge.map(|badge| badge.placement),
            Some(BadgePlacement::Before)
        );
        assert_eq!(
            output.progress_bar.map(|bar| bar.placement),
            Some(ProgressPlacement::Top)
        );
    }

    #[test]
    fn meta_overrides_and_opt_outs_are_honoured() {
        let use_case = use_case(
            StubRepository::ok(PathBuf::from("/posts/a.html"), PostDocument::html(words(50))),
            StubMetaStore::ok(PostMeta {
                override_minutes: Some(9),
                disable_badge: true,
                disable_progress: true,
            }),
            StubSettingsStore::ok(ReadingTimeSettings::default()),
        );

        let output = use_case.execute("/posts/a.html").expect("estimate should succeed");

        assert_eq!(output.minutes, 9);
        assert!(output.is_override);
        assert!(output.badge.is_none());
        assert!(output.progress_bar.is_none());
    }

    #[test]
    fn unreadable_meta_and_settings_degrade_to_defaults() {
        let use_case = use_case(
            StubRepository::ok(PathBuf::from("/posts/a.html"), PostDocument::html(words(10))),
            StubMetaStore::fail(ReadingTimeError::Malformed {
                path: PathBuf::from("/posts/a.html.meta.json"),
                reason: "expected value".to_string(),
            }),
            StubSettingsStore::fail(ReadingTimeError::Malformed {
                path: PathBuf::from("/etc/settings.json"),
                reason: "expected value".to_string(),
            }),
        );

        let output = use_case.execute("/posts/a.html").expect("estimate should degrade");

        assert_eq!(output.minutes, 1);
        assert_eq!(output.words, 10);
        assert!(!output.is_override);
        assert!(output.badge.is_some());
    }

    #[test]
    fn empty_post_gets_no_badge() {
        let use_case = use_case(
            StubRepository::ok(PathBuf::from("/posts/empty.html"), PostDocument::html("  ")),
            StubMetaStore::ok(PostMeta::default()),
            StubSettingsStore::ok(ReadingTimeSettings::default()),
        );

        let output = use_case.execute("/posts/empty.html").expect("estimate should succeed");

        assert_eq!(output.minutes, 0);
        assert!(output.badge.is_none());
        assert!(output.progress_bar.is_some());
    }

    #[test]
    fn post_types_outside_settings_are_not_decorated() {
        let mut settings = ReadingTimeSettings::default();
        settings.display.badge_position = BadgePosition::Both;
        let use_case = use_case(
            StubRepository::ok(
                PathBuf::from("/pages/about.html"),
                PostDocument::html(words(10)).with_post_type("page"),
            ),
            StubMetaStore::ok(PostMeta::default()),
            StubSettingsStore::ok(settings),
        );

        let output = use_case.execute("/pages/about.html").expect("estimate should succeed");

        assert_eq!(output.post_type, "page");
        assert!(output.badge.is_none());
        assert!(output.progress_bar.is_none());
    }

    #[test]
    fn repository_errors_propagate() {
        let use_case = use_case(
            StubRepository::fail(ReadingTimeError::PostNotFound(PathBuf::from("/missing.html"))),
            StubMetaStore::ok(PostMeta::default()),
            StubSettingsStore::ok(ReadingTimeSettings::default()),
        );

        let error = use_case.execute("/missing.html").expect_err("estimate should fail");

        match error {
            ReadingTimeError::PostNotFound(path) => {
                assert_eq!(path, PathBuf::from("/missing.html"));
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn adjustment_filter_is_forwarded_to_calculator() {
        let filter: AdjustmentFilter = Arc::new(|_: f64, _: &str| 0.5);
        let use_case = use_case(
            StubRepository::ok(PathBuf::from("/posts/a.html"), PostDocument::html(words(476))),
            StubMetaStore::ok(PostMeta::default()),
            StubSettingsStore::ok(ReadingTimeSettings::default()),
        )
        .with_adjustment_filter(filter);

        let output = use_case.execute("/posts/a.html").expect("estimate should succeed");

        assert!(output.adjusted);
        assert_eq!(output.minutes, 1);
    }
}
