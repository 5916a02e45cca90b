#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReadingTimeEstimate {
    pub minutes: u32,
    pub words: u32,
    pub adjusted: bool,
    pub is_override: bool,
    pub label: String,
}

impl ReadingTimeEstimate {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.minutes == 0
    }
}

/// Rounds up and never reports less than a minute.
pub fn minutes_from_raw(raw_minutes: f64) -> u32 {
    if !raw_minutes.is_finite() || raw_minutes <= 0.0 {
        return 1;
    }
    (raw_minutes.ceil() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::{minutes_from_raw, ReadingTimeEstimate};

    #[test]
    fn empty_estimate_has_no_minutes_or_label() {
        let estimate = ReadingTimeEstimate::empty();
        assert!(estimate.is_empty());
        assert_eq!(estimate.words, 0);
        assert!(!estimate.adjusted);
        assert!(!estimate.is_override);
        assert!(estimate.label.is_empty());
    }

    #[test]
    fn minutes_use_ceiling_with_one_minute_floor() {
        assert_eq!(minutes_from_raw(0.01), 1);
        assert_eq!(minutes_from_raw(1.0), 1);
        assert_eq!(minutes_from_raw(1.0001), 2);
        assert_eq!(minutes_from_raw(0.0), 1);
        assert_eq!(minutes_from_raw(f64::NAN), 1);
    }
}
