// Dimension analyzers: one rule per report attribute.
//
// Each analyzer looks at a single aspect of the submission and returns a
// signed score delta with the flags and signals that explain it. They share
// nothing and can run in any order; ANALYZERS fixes the order only so the
// audit trail reads the same way every time.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use super::heuristics;
use super::weights::AnalyzerWeights;
use crate::db::models::{IncidentType, ReportSubmission};

/// Location strings containing one of these name a sub-area
/// ("Main Building - West Wing", "Library, 2nd Floor").
const LOCATION_SEPARATORS: &[char] = &['-', ',', '/'];

static THEFT_TERMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(stolen|stole|steal\w*|theft|thief|missing|took|taken|snatch\w*|robbed|robbery|pickpocket\w*)\b")
        .expect("theft pattern")
});

static HAZARD_TERMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(hazard\w*|danger\w*|unsafe|risk\w*|exposed|leak\w*|slippery|flood\w*|fire|smoke|loose)\b")
        .expect("hazard pattern")
});

static MEDICAL_TERMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(injur\w*|unconscious|collapsed|collapse|bleeding|faint\w*|seizure|breathing|ambulance|medical|hurt)\b")
        .expect("medical pattern")
});

static ACCIDENT_TERMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(crash\w*|collision|collided|fell|fall|slipped|tripped|hit|accident\w*|bumped)\b")
        .expect("accident pattern")
});

/// Contribution of one analyzer to the credibility score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionOutcome {
    pub delta: i32,
    pub red_flags: Vec<String>,
    pub positive_signals: Vec<String>,
}

impl DimensionOutcome {
    fn flag(&mut self, delta: i32, message: impl Into<String>) {
        self.delta += delta;
        self.red_flags.push(message.into());
    }

    fn signal(&mut self, delta: i32, message: impl Into<String>) {
        self.delta += delta;
        self.positive_signals.push(message.into());
    }
}

/// Signature shared by every analyzer.
pub type Analyzer = fn(&ReportSubmission, &AnalyzerWeights) -> DimensionOutcome;

/// All analyzers, in presentation order.
pub const ANALYZERS: &[(&str, Analyzer)] = &[
    ("description_length", analyze_description_length),
    ("description_quality", analyze_description_quality),
    ("photo_evidence", analyze_photo_evidence),
    ("location_specificity", analyze_location_specificity),
    ("incident_type", analyze_incident_type),
    ("title_quality", analyze_title_quality),
    ("completeness", analyze_completeness),
];

pub fn analyze_description_length(
    report: &ReportSubmission,
    weights: &AnalyzerWeights,
) -> DimensionOutcome {
    let mut outcome = DimensionOutcome::default();
    let len = heuristics::char_len(report.description.trim());

    match len {
        0..=19 => outcome.flag(
            weights.very_brief_description,
            "Very brief description (less than 20 characters)",
        ),
        20..=49 => outcome.flag(
            weights.short_description,
            "Short description (less than 50 characters)",
        ),
        50..=99 => outcome.signal(weights.adequate_description, "Adequate description length"),
        _ => outcome.signal(weights.detailed_description, "Detailed description provided"),
    }

    outcome
}

pub fn analyze_description_quality(
    report: &ReportSubmission,
    weights: &AnalyzerWeights,
) -> DimensionOutcome {
    let mut outcome = DimensionOutcome::default();
    let description = report.description.trim();

    if heuristics::has_time_reference(description) {
        outcome.signal(weights.specificity_indicator, "Includes time reference");
    }
    if heuristics::has_color_word(description) {
        outcome.signal(weights.specificity_indicator, "Includes color/visual details");
    }
    if heuristics::has_quantity_or_size(description) {
        outcome.signal(
            weights.specificity_indicator,
            "Includes specific quantities or measurements",
        );
    }

    if heuristics::has_vague_language(description) {
        outcome.flag(weights.vague_language, "Contains uncertain or vague language");
    }

    if heuristics::is_all_caps(description) {
        outcome.flag(
            weights.all_caps_description,
            "Excessive use of capital letters",
        );
    }

    let unique_words = heuristics::unique_word_count(description);
    if unique_words < 5 {
        outcome.flag(
            weights.low_vocabulary,
            "Description lacks detail (fewer than 5 distinct words)",
        );
    } else if unique_words >= 15 {
        outcome.signal(weights.rich_vocabulary, "Good vocabulary diversity");
    }

    outcome
}

/// A missing photo is noted for the reviewer but costs nothing.
pub fn analyze_photo_evidence(
    report: &ReportSubmission,
    weights: &AnalyzerWeights,
) -> DimensionOutcome {
    let mut outcome = DimensionOutcome::default();
    if report.photo().is_some() {
        outcome.signal(weights.photo_evidence, "Photo evidence provided");
    } else {
        outcome.flag(0, "No photo evidence provided");
    }
    outcome
}

pub fn analyze_location_specificity(
    report: &ReportSubmission,
    weights: &AnalyzerWeights,
) -> DimensionOutcome {
    let mut outcome = DimensionOutcome::default();
    let location = report.campus_location.trim();

    if location.is_empty() {
        outcome.flag(weights.missing_location, "No location specified");
    } else if location.contains(LOCATION_SEPARATORS) {
        outcome.signal(
            weights.specific_location,
            "Specific location provided (building and wing/area)",
        );
    } else {
        outcome.signal(weights.general_location, "General location provided");
    }

    outcome
}

/// `Others` is the catch-all and is always treated as consistent.
pub fn analyze_incident_type(
    report: &ReportSubmission,
    weights: &AnalyzerWeights,
) -> DimensionOutcome {
    let mut outcome = DimensionOutcome::default();
    let terms: &Regex = match report.incident_type {
        IncidentType::Theft => &*THEFT_TERMS,
        IncidentType::Hazard => &*HAZARD_TERMS,
        IncidentType::MedicalEmergency => &*MEDICAL_TERMS,
        IncidentType::Accident => &*ACCIDENT_TERMS,
        IncidentType::Others => return outcome,
    };

    if terms.is_match(&report.description) {
        outcome.signal(
            weights.consistent_type,
            "Incident type matches description content",
        );
    } else {
        outcome.flag(
            weights.inconsistent_type,
            format!(
                "Incident type ({}) may not match description",
                report.incident_type.label()
            ),
        );
    }

    outcome
}

pub fn analyze_title_quality(
    report: &ReportSubmission,
    weights: &AnalyzerWeights,
) -> DimensionOutcome {
    let mut outcome = DimensionOutcome::default();
    let title = report.title.trim();
    let len = heuristics::char_len(title);

    if (10..=150).contains(&len) {
        outcome.signal(weights.descriptive_title, "Descriptive title");
    } else if len < 5 {
        outcome.flag(0, "Title is too short");
    }

    if heuristics::is_all_caps(title) {
        outcome.flag(0, "Title is written in all capital letters");
    } else if len > 0 {
        outcome.signal(weights.normal_case_title, "Title uses normal capitalization");
    }

    outcome
}

pub fn analyze_completeness(
    report: &ReportSubmission,
    weights: &AnalyzerWeights,
) -> DimensionOutcome {
    let mut outcome = DimensionOutcome::default();

    let missing: Vec<&str> = [
        ("title", report.title.as_str()),
        ("description", report.description.as_str()),
        ("location", report.campus_location.as_str()),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
    .collect();

    if missing.is_empty() {
        outcome.signal(weights.complete_fields, "All required fields completed");
    } else {
        outcome.flag(0, format!("Missing required fields: {}", missing.join(", ")));
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(description: &str) -> ReportSubmission {
        ReportSubmission {
            user_id: 1,
            title: "Incident near the gym".to_string(),
            description: description.to_string(),
            campus_location: "Gymnasium".to_string(),
            incident_type: IncidentType::Others,
            image_path: None,
        }
    }

    #[test]
    fn test_length_bands() {
        let w = AnalyzerWeights::default();
        let cases = [
            (5, w.very_brief_description),
            (19, w.very_brief_description),
            (20, w.short_description),
            (49, w.short_description),
            (50, w.adequate_description),
            (99, w.adequate_description),
            (100, w.detailed_description),
        ];
        for (len, expected) in cases {
            let outcome = analyze_description_length(&report(&"x".repeat(len)), &w);
            assert_eq!(outcome.delta, expected, "length {len}");
        }
    }

    #[test]
    fn test_missing_photo_is_informational() {
        let outcome = analyze_photo_evidence(&report("anything"), &AnalyzerWeights::default());
        assert_eq!(outcome.delta, 0);
        assert_eq!(outcome.red_flags, vec!["No photo evidence provided"]);
    }

    #[test]
    fn test_others_is_neutral() {
        let outcome = analyze_incident_type(&report("nothing to match"), &AnalyzerWeights::default());
        assert_eq!(outcome, DimensionOutcome::default());
    }
}
