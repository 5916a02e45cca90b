use std::sync::Arc;

pub const MIN_ADJUSTMENT_FACTOR: f64 = 0.75;
pub const WORDS_PER_HEADING: f64 = 300.0;
pub const LIST_DENSITY_THRESHOLD: f64 = 0.2;
pub const SHORT_PARAGRAPH_WORDS: f64 = 60.0;

const HEADING_BONUS: f64 = 0.08;
const LIST_BONUS: f64 = 0.08;
const SHORT_PARAGRAPH_BONUS: f64 = 0.07;
const BLOCKQUOTE_BONUS: f64 = 0.02;

/// Replaces the computed factor, given the factor and the raw post body.
pub type AdjustmentFilter = Arc<dyn Fn(f64, &str) -> f64 + Send + Sync>;

/// Scannability signals counted from paragraph-wrapped markup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructureStats {
    pub word_estimate: u32,
    pub headings: u32,
    pub list_items: u32,
    pub paragraphs: u32,
    pub blockquotes: u32,
    pub paragraph_word_counts: Vec<u32>,
}

impl StructureStats {
    pub fn score(&self) -> f64 {
        let mut score = 0.0;

        let word_estimate = f64::from(self.word_estimate.max(1));
        let heading_ratio = f64::from(self.headings) / (word_estimate / WORDS_PER_HEADING).max(1.0);
        if heading_ratio >= 1.0 {
            score += HEADING_BONUS;
        }

        let blocks = (self.paragraphs + self.list_items).max(1);
        if f64::from(self.list_items) / f64::from(blocks) >= LIST_DENSITY_THRESHOLD {
            score += LIST_BONUS;
        }

        if self.paragraphs > 0 {
            if let Some(average) = self.average_paragraph_words() {
                if average < SHORT_PARAGRAPH_WORDS {
                    score += SHORT_PARAGRAPH_BONUS;
                }
            }
        }

        if self.blockquotes >= 1 {
            score += BLOCKQUOTE_BONUS;
        }

        score
    }

    pub fn factor(&self) -> f64 {
        adjustment_factor(self.score())
    }

    fn average_paragraph_words(&self) -> Option<f64> {
        if self.paragraph_word_counts.is_empty() {
            return None;
        }
        let total: u64 = self
            .paragraph_word_counts
            .iter()
            .map(|count| u64::from(*count))
            .sum();
        Some(total as f64 / self.paragraph_word_counts.len() as f64)
    }
}

/// Structure can shorten the estimate by at most a quarter, never lengthen it.
pub fn adjustment_factor(score: f64) -> f64 {
    (1.0 - score).clamp(MIN_ADJUSTMENT_FACTOR, 1.0)
}

/// Filter output that cannot scale a duration falls back to no adjustment.
pub fn filtered_factor(factor: f64, filter: Option<&AdjustmentFilter>, raw_body: &str) -> f64 {
    let Some(filter) = filter else {
        return factor;
    };
    let replaced = filter(factor, raw_body);
    if replaced.is_finite() && replaced >= 0.0 {
        replaced
    } else {
        1.0
    }
}
