/// Han ideographs, Hiragana/Katakana and Hangul syllables are read per character.
pub fn is_cjk(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3040}'..='\u{30FF}' | '\u{AC00}'..='\u{D7AF}')
}

fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}')
}

/// Counts clusters of alphanumerics, apostrophes and inner hyphens.
pub fn count_latin_words(text: &str) -> u32 {
    let mut count = 0_u32;
    let mut in_word = false;
    let mut has_alphanumeric = false;

    for c in text.chars() {
        let continues_word =
            c.is_alphanumeric() || is_apostrophe(c) || (in_word && c == '-');
        if continues_word {
            in_word = true;
            has_alphanumeric |= c.is_alphanumeric();
            continue;
        }
        if in_word && has_alphanumeric {
            count += 1;
        }
        in_word = false;
        has_alphanumeric = false;
    }

    if in_word && has_alphanumeric {
        count += 1;
    }

    count
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WordTally {
    pub latin_words: u32,
    pub cjk_chars: u32,
}

impl WordTally {
    pub fn of(text: &str) -> Self {
        let cjk_chars = text.chars().filter(|c| is_cjk(*c)).count() as u32;
        let latin_words = if cjk_chars == 0 {
            count_latin_words(text)
        } else {
            let without_cjk: String = text.chars().filter(|c| !is_cjk(*c)).collect();
            count_latin_words(&without_cjk)
        };

        Self {
            latin_words,
            cjk_chars,
        }
    }

    /// CJK characters are converted to Latin-equivalent words so one
    /// words-per-minute rate covers mixed-script text.
    pub fn total_words(&self, words_per_minute: u32, chars_per_minute_cjk: u32) -> u32 {
        if self.cjk_chars == 0 {
            return self.latin_words;
        }

        let cpm = f64::from(chars_per_minute_cjk.max(1));
        let wpm = f64::from(words_per_minute.max(1));
        let equivalent_latin = f64::from(self.cjk_chars) / cpm * wpm;
        (f64::from(self.latin_words) + equivalent_latin).round() as u32
    }
}
