// ABOUTME: Reading-time estimate derived from a word count.
// ABOUTME: minutes = max(1, round(words / words_per_minute)), labelled "1 minute" or "N minutes".

use std::fmt;

use serde::Serialize;

use crate::options::DEFAULT_WORDS_PER_MINUTE;

/// Estimated time to read a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadingTime {
    pub words: usize,
    pub minutes: u64,
}

impl ReadingTime {
    /// Estimate at the given reading speed. A speed of zero uses the default.
    pub fn from_words(words: usize, words_per_minute: u32) -> Self {
        let wpm = if words_per_minute == 0 {
            DEFAULT_WORDS_PER_MINUTE
        } else {
            words_per_minute
        };
        let minutes = (words as f64 / f64::from(wpm)).round().max(1.0) as u64;
        Self { words, minutes }
    }

    /// "1 minute" or "N minutes".
    pub fn label(&self) -> String {
        if self.minutes == 1 {
            "1 minute".to_string()
        } else {
            format!("{} minutes", self.minutes)
        }
    }
}

impl fmt::Display for ReadingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_time_rounds() {
        let rt = ReadingTime::from_words(500, 250);
        assert_eq!(rt.minutes, 2);
        assert_eq!(rt.label(), "2 minutes");

        // 375 / 250 = 1.5 rounds up
        assert_eq!(ReadingTime::from_words(375, 250).minutes, 2);
        assert_eq!(ReadingTime::from_words(374, 250).minutes, 1);
    }

    #[test]
    fn test_reading_time_floor_is_one_minute() {
        let rt = ReadingTime::from_words(40, 250);
        assert_eq!(rt.minutes, 1);
        assert_eq!(rt.to_string(), "1 minute");
        assert_eq!(ReadingTime::from_words(0, 250).minutes, 1);
    }

    #[test]
    fn test_zero_speed_uses_default() {
        assert_eq!(ReadingTime::from_words(500, 0).minutes, 2);
    }
}
