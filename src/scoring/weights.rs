// Scoring configuration: every tunable number the credibility scorer uses.
//
// The scorer is a pure function of (report, ScoringConfig). Keeping all the
// thresholds and magnitudes in one immutable value means rule tuning never
// touches control flow, and storing the applied config next to each report
// lets an old decision be replayed exactly.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Name of the default profile.
pub const CURRENT_PROFILE: &str = "current";
/// Name of the earlier baseline/threshold pair, kept selectable.
pub const LEGACY_PROFILE: &str = "legacy";

/// A named, immutable set of scoring parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Profile name, stored with every analysis (e.g. "current", "legacy-custom")
    pub name: String,
    /// Neutral starting score before any rule runs
    pub baseline: i32,
    /// Scores at or above this are auto-accepted
    pub accept_threshold: i32,
    /// Scores strictly below this are auto-rejected
    pub reject_threshold: i32,
    /// Ceiling applied once when the spam detector fires
    pub spam_score_cap: i32,
    pub spam: SpamPenalties,
    pub analyzers: AnalyzerWeights,
}

/// Points subtracted by each spam/abuse check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpamPenalties {
    pub repeated_characters: i32,
    pub repeated_words: i32,
    pub missing_spacing: i32,
    pub special_characters: i32,
    pub spam_phrase: i32,
    pub gibberish: i32,
    pub offensive_language: i32,
}

/// Signed score deltas for the dimension analyzers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerWeights {
    pub very_brief_description: i32,
    pub short_description: i32,
    pub adequate_description: i32,
    pub detailed_description: i32,
    /// Added once per specificity indicator (time, color, quantity)
    pub specificity_indicator: i32,
    pub vague_language: i32,
    pub all_caps_description: i32,
    pub low_vocabulary: i32,
    pub rich_vocabulary: i32,
    pub photo_evidence: i32,
    pub missing_location: i32,
    pub specific_location: i32,
    pub general_location: i32,
    pub consistent_type: i32,
    pub inconsistent_type: i32,
    pub descriptive_title: i32,
    pub normal_case_title: i32,
    pub complete_fields: i32,
}

impl Default for SpamPenalties {
    fn default() -> Self {
        Self {
            repeated_characters: 30,
            repeated_words: 30,
            missing_spacing: 20,
            special_characters: 20,
            spam_phrase: 25,
            gibberish: 25,
            offensive_language: 15,
        }
    }
}

impl Default for AnalyzerWeights {
    /// Positive deltas are sized so that a report without a photo tops out
    /// below the default accept threshold, whatever its length, vocabulary,
    /// title and location.
    fn default() -> Self {
        Self {
            very_brief_description: -25,
            short_description: -10,
            adequate_description: 2,
            detailed_description: 10,
            specificity_indicator: 2,
            vague_language: -10,
            all_caps_description: -15,
            low_vocabulary: -20,
            rich_vocabulary: 5,
            photo_evidence: 20,
            missing_location: -20,
            specific_location: 5,
            general_location: 2,
            consistent_type: 5,
            inconsistent_type: -5,
            descriptive_title: 2,
            normal_case_title: 2,
            complete_fields: 10,
        }
    }
}

impl AnalyzerWeights {
    /// Magnitudes the scorer shipped with before the retune. The `legacy`
    /// profile still uses them.
    pub fn legacy() -> Self {
        Self {
            very_brief_description: -25,
            short_description: -10,
            adequate_description: 5,
            detailed_description: 15,
            specificity_indicator: 5,
            vague_language: -10,
            all_caps_description: -15,
            low_vocabulary: -20,
            rich_vocabulary: 10,
            photo_evidence: 20,
            missing_location: -20,
            specific_location: 10,
            general_location: 5,
            consistent_type: 10,
            inconsistent_type: -5,
            descriptive_title: 5,
            normal_case_title: 5,
            complete_fields: 15,
        }
    }

    /// Highest total the analyzers can add to a report that has no photo.
    pub fn max_without_photo(&self) -> i32 {
        self.detailed_description.max(self.adequate_description).max(0)
            + 3 * self.specificity_indicator.max(0)
            + self.rich_vocabulary.max(0)
            + self.specific_location.max(self.general_location).max(0)
            + self.consistent_type.max(0)
            + self.descriptive_title.max(0)
            + self.normal_case_title.max(0)
            + self.complete_fields.max(0)
    }
}

impl Default for ScoringConfig {
    /// The `current` profile: baseline 40, accept at 90, reject below 20.
    fn default() -> Self {
        Self {
            name: CURRENT_PROFILE.to_string(),
            baseline: 40,
            accept_threshold: 90,
            reject_threshold: 20,
            spam_score_cap: 25,
            spam: SpamPenalties::default(),
            analyzers: AnalyzerWeights::default(),
        }
    }
}

impl ScoringConfig {
    /// The earlier scorer: start at 50, accept at 75, reject below 30, with
    /// the pre-retune rule magnitudes.
    pub fn legacy() -> Self {
        Self {
            name: LEGACY_PROFILE.to_string(),
            baseline: 50,
            accept_threshold: 75,
            reject_threshold: 30,
            analyzers: AnalyzerWeights::legacy(),
            ..Self::default()
        }
    }

    /// Look up a built-in profile by name.
    pub fn from_profile(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            CURRENT_PROFILE => Ok(Self::default()),
            LEGACY_PROFILE => Ok(Self::legacy()),
            other => anyhow::bail!(
                "Unknown scoring profile '{other}'. Expected '{CURRENT_PROFILE}' or '{LEGACY_PROFILE}'."
            ),
        }
    }

    /// Replace the thresholds, marking the profile as customized.
    pub fn with_thresholds(mut self, accept: Option<i32>, reject: Option<i32>) -> Self {
        if accept.is_none() && reject.is_none() {
            return self;
        }
        if let Some(accept) = accept {
            self.accept_threshold = accept;
        }
        if let Some(reject) = reject {
            self.reject_threshold = reject;
        }
        if !self.name.ends_with("-custom") {
            self.name = format!("{}-custom", self.name);
        }
        self
    }

    /// Check that the thresholds partition [0,100] into three non-empty bands.
    pub fn validate(&self) -> Result<()> {
        if !(0..=100).contains(&self.baseline) {
            anyhow::bail!("Scoring baseline must be within 0-100, got {}", self.baseline);
        }
        if !(1..=100).contains(&self.accept_threshold) {
            anyhow::bail!(
                "Accept threshold must be within 1-100, got {}",
                self.accept_threshold
            );
        }
        if !(1..=100).contains(&self.reject_threshold) {
            anyhow::bail!(
                "Reject threshold must be within 1-100, got {}",
                self.reject_threshold
            );
        }
        if self.accept_threshold <= self.reject_threshold {
            anyhow::bail!(
                "Accept threshold ({}) must be greater than reject threshold ({})",
                self.accept_threshold,
                self.reject_threshold
            );
        }
        if self.spam_score_cap >= self.accept_threshold {
            anyhow::bail!(
                "Spam score cap ({}) must stay below the accept threshold ({})",
                self.spam_score_cap,
                self.accept_threshold
            );
        }
        Ok(())
    }
}
