use std::sync::Arc;

use log::debug;
use reading_time_domain::adjustment::{filtered_factor, AdjustmentFilter};
use reading_time_domain::counting::WordTally;
use reading_time_domain::document::{PostDocument, PostMeta};
use reading_time_domain::estimate::{minutes_from_raw, ReadingTimeEstimate};
use reading_time_domain::label;
use reading_time_domain::settings::ReadingTimeSettings;

use crate::ports::{MarkupProcessor, ShortcodeProcessor};

struct PreparedContent {
    structural_html: String,
    plain_text: String,
}

/// Estimates reading time from a post body, its meta and site settings.
///
/// Calculation never fails: anything it cannot count collapses to
/// [`ReadingTimeEstimate::empty`], which callers treat as "render nothing".
#[derive(Clone)]
pub struct ReadingTimeCalculator {
    settings: ReadingTimeSettings,
    markup: Arc<dyn MarkupProcessor>,
    shortcodes: Arc<dyn ShortcodeProcessor>,
    adjustment_filter: Option<AdjustmentFilter>,
}

impl ReadingTimeCalculator {
    pub fn new(
        settings: ReadingTimeSettings,
        markup: Arc<dyn MarkupProcessor>,
        shortcodes: Arc<dyn ShortcodeProcessor>,
    ) -> Self {
        let mut settings = settings.sanitized();
        settings.badge_label = markup.sanitize_inline(&settings.badge_label);
        settings.badge_label_under_one = markup.sanitize_inline(&settings.badge_label_under_one);

        Self {
            settings,
            markup,
            shortcodes,
            adjustment_filter: None,
        }
    }

    pub fn with_adjustment_filter(mut self, filter: AdjustmentFilter) -> Self {
        self.adjustment_filter = Some(filter);
        self
    }

    pub fn settings(&self) -> &ReadingTimeSettings {
        &self.settings
    }

    pub fn calculate(
        &self,
        document: Option<&PostDocument>,
        meta: &PostMeta,
    ) -> ReadingTimeEstimate {
        if let Some(minutes) = meta.effective_override() {
            let minutes = minutes.max(1);
            return ReadingTimeEstimate {
                minutes,
                words: 0,
                adjusted: false,
                is_override: true,
                label: self.format_label(minutes),
            };
        }

        let Some(document) = document else {
            return ReadingTimeEstimate::empty();
        };

        let prepared = self.prepare(document);
        if prepared.plain_text.is_empty() {
            return ReadingTimeEstimate::empty();
        }

        let tally = WordTally::of(&prepared.plain_text);
        let words = tally.total_words(
            self.settings.words_per_minute,
            self.settings.chars_per_minute_cjk,
        );
        if words == 0 {
            return ReadingTimeEstimate::empty();
        }

        let mut raw_minutes = f64::from(words) / f64::from(self.settings.words_per_minute);
        let mut adjusted = false;
        if self.settings.ai_adjustment {
            let factor = self.adjustment_factor(&prepared.structural_html, &document.body);
            if factor < 1.0 {
                raw_minutes *= factor;
                adjusted = true;
            }
        }

        let minutes = minutes_from_raw(raw_minutes);
        debug!(
            "estimated {minutes} min from {words} words ({} latin, {} cjk), adjusted: {adjusted}",
            tally.latin_words, tally.cjk_chars
        );

        ReadingTimeEstimate {
            minutes,
            words,
            adjusted,
            is_override: false,
            label: self.format_label(minutes),
        }
    }

    /// Label templates are sanitized in [`ReadingTimeCalculator::new`], so the
    /// substituted minutes are the only text added here.
    pub fn format_label(&self, minutes: u32) -> String {
        label::format_label(minutes, &self.settings)
    }

    fn prepare(&self, document: &PostDocument) -> PreparedContent {
        let html = self.markup.to_html(document);
        let html = if self.settings.exclude_shortcodes {
            self.shortcodes.strip(&html)
        } else {
            self.shortcodes.expand(&html)
        };

        let structural_html = self.markup.auto_paragraph(&html);
        let counted_html = if self.settings.exclude_code_blocks {
            self.markup.remove_code_blocks(&structural_html)
        } else {
            structural_html.clone()
        };
        let plain_text = self.markup.plain_text(&counted_html);

        PreparedContent {
            structural_html,
            plain_text,
        }
    }

    fn adjustment_factor(&self, structural_html: &str, raw_body: &str) -> f64 {
        let stats = self.markup.structure(structural_html);
        let factor = stats.factor();
        debug!("structure {stats:?} scored factor {factor}");
        filtered_factor(factor, self.adjustment_filter.as_ref(), raw_body)
    }
}
