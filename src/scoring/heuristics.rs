// Text heuristics: pure string measurements used by the spam detector and
// the dimension analyzers.
//
// Every function here is deterministic and allocation-light. Nothing keeps
// state between calls; the compiled patterns are process-wide statics that
// are built on first use and shared read-only across threads.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex_lite::Regex;

/// Function words that are too common to count as "repeated words".
///
/// Part of the scoring rules: editing this list changes historical scores.
const FUNCTION_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "had", "has", "have",
    "he", "her", "his", "i", "in", "is", "it", "its", "me", "my", "of", "on", "or", "our", "she",
    "so", "that", "the", "their", "them", "then", "there", "they", "this", "to", "was", "we",
    "were", "with", "you",
];

static TIME_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\d{1,2}(:\d{2})?\s*(am\b|pm\b|a\.m\.|p\.m\.)|\b(pm|morning|afternoon|evening|night|tonight|noon|midnight|yesterday|today|o'clock)\b",
    )
    .expect("time reference pattern")
});

static COLOR_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(black|white|red|blue|green|yellow|brown|gray|grey|orange|purple|pink|silver|gold|maroon|navy)\b",
    )
    .expect("color pattern")
});

static QUANTITY_OR_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d|\b(large|small|medium|big|tiny|huge|several|pair|dozen)\b")
        .expect("quantity pattern")
});

static VAGUE_LANGUAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(maybe|perhaps|not sure|i think|probably|possibly|i guess|might have been)\b")
        .expect("vague language pattern")
});

static SPAM_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(test|asdf|asdfgh|qwerty|lorem ipsum|dolor sit amet|sample report|dummy text|hello world|blah blah)\b",
    )
    .expect("spam phrase pattern")
});

static OFFENSIVE_LANGUAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(fuck\w*|shit\w*|bitch\w*|bastard\w*|asshole\w*|dickhead\w*|cunt\w*|motherfuck\w*|putang ?ina|gago|tangina)\b",
    )
    .expect("offensive language pattern")
});

/// True if any non-whitespace character repeats `threshold` or more times
/// in a row ("aaaaaaaaaa" with threshold 10).
pub fn has_repeated_characters(text: &str, threshold: usize) -> bool {
    if threshold == 0 || text.chars().count() < threshold {
        return false;
    }

    let mut prev: Option<char> = None;
    let mut run = 0usize;

    for c in text.chars() {
        if c.is_whitespace() {
            prev = None;
            run = 0;
            continue;
        }
        if Some(c) == prev {
            run += 1;
        } else {
            prev = Some(c);
            run = 1;
        }
        if run >= threshold {
            return true;
        }
    }

    false
}

/// True if any single lower-cased word occurs `threshold` or more times.
///
/// Tokens are split on anything that is not alphanumeric. Function words
/// ("the", "and", ...) are ignored so ordinary prose does not trip the check.
pub fn has_repeated_words(text: &str, threshold: usize) -> bool {
    if threshold == 0 {
        return false;
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        let token = token.to_lowercase();
        if FUNCTION_WORDS.contains(&token.as_str()) {
            continue;
        }
        let count = counts.entry(token).or_insert(0);
        *count += 1;
        if *count >= threshold {
            return true;
        }
    }

    false
}

/// Fraction of characters that are vowels. Returns 0.0 for empty text.
pub fn vowel_ratio(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let vowels = text
        .chars()
        .filter(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'))
        .count();
    vowels as f64 / total as f64
}

/// Fraction of characters that are neither letters, digits, nor whitespace.
/// Returns 0.0 for empty text.
pub fn special_char_ratio(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let special = text
        .chars()
        .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
        .count();
    special as f64 / total as f64
}

/// Number of distinct lower-cased words after stripping `. , ! ?`.
pub fn unique_word_count(text: &str) -> usize {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '.' | ',' | '!' | '?'))
        .collect::<String>()
        .to_lowercase();

    let mut seen: Vec<&str> = cleaned.split_whitespace().collect();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}

/// Longer than 20 characters, contains at least one letter, and is
/// unchanged by upper-casing.
pub fn is_all_caps(text: &str) -> bool {
    text.chars().count() > 20
        && text.chars().any(char::is_alphabetic)
        && text == text.to_uppercase()
}

pub fn has_whitespace(text: &str) -> bool {
    text.chars().any(char::is_whitespace)
}

pub fn has_time_reference(text: &str) -> bool {
    TIME_REFERENCE.is_match(text)
}

pub fn has_color_word(text: &str) -> bool {
    COLOR_WORD.is_match(text)
}

pub fn has_quantity_or_size(text: &str) -> bool {
    QUANTITY_OR_SIZE.is_match(text)
}

pub fn has_vague_language(text: &str) -> bool {
    VAGUE_LANGUAGE.is_match(text)
}

pub fn has_spam_phrase(text: &str) -> bool {
    SPAM_PHRASE.is_match(text)
}

pub fn has_offensive_language(text: &str) -> bool {
    OFFENSIVE_LANGUAGE.is_match(text)
}

/// Count characters, not bytes; descriptions are often typed on phones
/// and can carry accented letters or emoji.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_characters_threshold() {
        assert!(has_repeated_characters("aaaaaaaaaa", 10));
        assert!(!has_repeated_characters("aaaaaaaaa", 10));
        assert!(!has_repeated_characters("", 10));
    }

    #[test]
    fn test_whitespace_runs_do_not_count() {
        assert!(!has_repeated_characters("a            b", 10));
    }

    #[test]
    fn test_am_as_a_verb_is_not_a_time() {
        assert!(!has_time_reference("I am at the gym"));
        assert!(has_time_reference("around 2:30pm"));
        assert!(has_time_reference("at 9 am near the gate"));
    }

    #[test]
    fn test_spam_phrase_needs_word_boundary() {
        assert!(has_spam_phrase("this is a test"));
        assert!(!has_spam_phrase("the latest contest results"));
    }
}
