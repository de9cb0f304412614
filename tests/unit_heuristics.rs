// Unit tests for the text heuristics.
//
// These are the building blocks both the spam detector and the dimension
// analyzers lean on, so their edge cases get pinned down here: thresholds,
// empty input, case handling and word boundaries.

use iskoalert::scoring::heuristics::*;

// ============================================================
// Repetition
// ============================================================

#[test]
fn repeated_characters_at_threshold() {
    assert!(has_repeated_characters("zzzzzzzzzz", 10));
}

#[test]
fn repeated_characters_below_threshold() {
    assert!(!has_repeated_characters("zzzzzzzzz", 10));
}

#[test]
fn repeated_characters_run_inside_text() {
    assert!(has_repeated_characters("help!!!!!!!!!! someone", 10));
}

#[test]
fn repeated_characters_broken_runs_do_not_add_up() {
    assert!(!has_repeated_characters("aaaaabaaaaa", 10));
}

#[test]
fn repeated_words_counts_case_insensitively() {
    assert!(has_repeated_words("Fire fire FIRE fire fIrE", 5));
}

#[test]
fn repeated_words_ignores_punctuation() {
    assert!(has_repeated_words("help, help! help. help? help", 5));
}

#[test]
fn repeated_words_four_is_not_enough() {
    assert!(!has_repeated_words("help help help help", 5));
}

#[test]
fn repeated_words_skips_function_words() {
    let prose = "The guard told the students that the gate by the canteen and the \
                 library was closed for the day and the night.";
    assert!(!has_repeated_words(prose, 5));
}

#[test]
fn repeated_words_empty() {
    assert!(!has_repeated_words("", 5));
}

// ============================================================
// Ratios
// ============================================================

#[test]
fn vowel_ratio_empty_is_zero() {
    assert_eq!(vowel_ratio(""), 0.0);
}

#[test]
fn vowel_ratio_all_vowels() {
    assert_eq!(vowel_ratio("aeiou"), 1.0);
}

#[test]
fn vowel_ratio_counts_uppercase() {
    assert_eq!(vowel_ratio("AbCd"), 0.25);
}

#[test]
fn special_char_ratio_empty_is_zero() {
    assert_eq!(special_char_ratio(""), 0.0);
}

#[test]
fn special_char_ratio_ignores_whitespace() {
    assert_eq!(special_char_ratio("a! b?"), 0.4);
}

#[test]
fn special_char_ratio_all_symbols() {
    assert_eq!(special_char_ratio("#$%&"), 1.0);
}

// ============================================================
// Words and capitalization
// ============================================================

#[test]
fn unique_words_strips_sentence_punctuation() {
    assert_eq!(unique_word_count("Help! help. HELP, help?"), 1);
}

#[test]
fn unique_words_empty() {
    assert_eq!(unique_word_count("   "), 0);
}

#[test]
fn unique_words_counts_distinct() {
    assert_eq!(unique_word_count("a red bag and a blue bag"), 5);
}

#[test]
fn all_caps_needs_more_than_twenty_chars() {
    assert!(!is_all_caps("SHORT SHOUTING"));
    assert!(is_all_caps("THERE IS A FIRE IN THE LAB"));
}

#[test]
fn all_caps_needs_a_letter() {
    assert!(!is_all_caps("1234567890 1234567890 !!"));
}

#[test]
fn all_caps_mixed_case_is_not_caps() {
    assert!(!is_all_caps("There is a FIRE in the LAB right now"));
}

// ============================================================
// Specificity patterns
// ============================================================

#[test]
fn time_reference_clock_and_words() {
    assert!(has_time_reference("around 3:15pm"));
    assert!(has_time_reference("at 7 a.m. near the gate"));
    assert!(has_time_reference("Yesterday after class"));
    assert!(has_time_reference("late at night"));
}

#[test]
fn time_reference_not_in_ordinary_words() {
    assert!(!has_time_reference("the 2 amazing guards helped"));
    assert!(!has_time_reference("the knight statue"));
}

#[test]
fn color_words() {
    assert!(has_color_word("a Navy blue jacket"));
    assert!(!has_color_word("a Redskins cap"));
}

#[test]
fn quantity_digits_and_size_words() {
    assert!(has_quantity_or_size("took 2 phones"));
    assert!(has_quantity_or_size("a huge crack in the wall"));
    assert!(!has_quantity_or_size("a crack in the wall"));
}

#[test]
fn vague_phrases() {
    assert!(has_vague_language("I think it was stolen"));
    assert!(has_vague_language("it might have been a dog"));
    assert!(!has_vague_language("I saw it happen"));
}

#[test]
fn offensive_language_matches_word_forms() {
    assert!(has_offensive_language("this is bullshit, total shitshow"));
    assert!(!has_offensive_language("the shipment arrived late"));
}

#[test]
fn char_len_counts_characters_not_bytes() {
    assert_eq!(char_len("niño"), 4);
    assert_eq!(char_len(""), 0);
}
