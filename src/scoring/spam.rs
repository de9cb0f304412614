// Spam and abuse detection over the report's title and description.
//
// Each check is independent: a report can trip several, and every one that
// fires adds its own penalty and flag. Checks 1-6 mark the report as spam,
// which lets the scorer cap the final score. Offensive language only costs
// points and never marks a report as spam on its own.

use serde::{Deserialize, Serialize};

use super::heuristics;
use super::weights::SpamPenalties;

/// Consecutive identical characters needed to count as keyboard mashing.
pub const REPEATED_CHAR_RUN: usize = 10;
/// Occurrences of one word needed to count as repetition spam.
pub const REPEATED_WORD_COUNT: usize = 5;
/// Descriptions longer than this must contain at least one space.
const SPACING_MIN_LEN: usize = 30;
/// Ratio checks only apply to text longer than this.
const RATIO_MIN_LEN: usize = 20;
const MAX_SPECIAL_CHAR_RATIO: f64 = 0.3;
const MIN_VOWEL_RATIO: f64 = 0.1;

/// Outcome of the spam/abuse checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpamAssessment {
    /// Points to subtract from the running score (always >= 0)
    pub penalty: i32,
    /// True if any of the spam checks fired (offensive language excluded)
    pub is_spam: bool,
    pub flags: Vec<String>,
}

impl SpamAssessment {
    fn hit(&mut self, penalty: i32, flag: &str, spam: bool) {
        self.penalty += penalty;
        self.is_spam |= spam;
        self.flags.push(flag.to_string());
    }
}

/// Run every spam/abuse check over a title and description.
pub fn detect_spam(title: &str, description: &str, penalties: &SpamPenalties) -> SpamAssessment {
    let mut result = SpamAssessment::default();
    let combined = format!("{title} {description}");
    let combined = combined.trim();
    let combined_len = heuristics::char_len(combined);

    if heuristics::has_repeated_characters(combined, REPEATED_CHAR_RUN) {
        result.hit(
            penalties.repeated_characters,
            "Possible spam: repeated characters",
            true,
        );
    }

    if heuristics::has_repeated_words(combined, REPEATED_WORD_COUNT) {
        result.hit(penalties.repeated_words, "Possible spam: repeated words", true);
    }

    if heuristics::char_len(description) > SPACING_MIN_LEN && !heuristics::has_whitespace(description)
    {
        result.hit(
            penalties.missing_spacing,
            "Description lacks proper spacing",
            true,
        );
    }

    if combined_len > RATIO_MIN_LEN
        && heuristics::special_char_ratio(combined) > MAX_SPECIAL_CHAR_RATIO
    {
        result.hit(
            penalties.special_characters,
            "Excessive special characters",
            true,
        );
    }

    if heuristics::has_spam_phrase(combined) {
        result.hit(penalties.spam_phrase, "Contains common test/spam phrase", true);
    }

    if combined_len > RATIO_MIN_LEN && heuristics::vowel_ratio(combined) < MIN_VOWEL_RATIO {
        result.hit(
            penalties.gibberish,
            "Unusual character distribution (possible gibberish)",
            true,
        );
    }

    if heuristics::has_offensive_language(combined) {
        result.hit(
            penalties.offensive_language,
            "Contains potentially inappropriate language",
            false,
        );
    }

    result
}
