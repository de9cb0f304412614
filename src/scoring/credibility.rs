// Credibility scorer: turns one submission into a score, a recommended
// disposition, and the audit text shown to administrators.
//
// Order of operations:
//   baseline -> spam penalty -> dimension analyzers -> spam cap -> clamp
//
// The spam cap runs once, after every contribution has been added, so a
// spammy report cannot buy its way back up with a photo and a tidy location.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::dimensions::ANALYZERS;
use super::spam::detect_spam;
use super::weights::ScoringConfig;
use crate::db::models::{ReportStatus, ReportSubmission};

/// What the scorer recommends doing with a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    Accepted,
    Rejected,
    Pending,
}

impl Disposition {
    /// Map a clamped score onto exactly one disposition.
    pub fn from_score(score: u8, config: &ScoringConfig) -> Self {
        let score = i32::from(score);
        if score >= config.accept_threshold {
            Disposition::Accepted
        } else if score < config.reject_threshold {
            Disposition::Rejected
        } else {
            Disposition::Pending
        }
    }

    pub fn status(&self) -> ReportStatus {
        match self {
            Disposition::Accepted => ReportStatus::Accepted,
            Disposition::Rejected => ReportStatus::Rejected,
            Disposition::Pending => ReportStatus::Pending,
        }
    }

    pub fn requires_manual_review(&self) -> bool {
        matches!(self, Disposition::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::Accepted => "Accepted",
            Disposition::Rejected => "Rejected",
            Disposition::Pending => "Pending",
        }
    }
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of analyzing one report. Copied onto the report by
/// `apply_analysis`; never persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredibilityAnalysis {
    /// 0-100
    pub credibility_score: u8,
    pub recommended_action: Disposition,
    pub requires_manual_review: bool,
    pub is_spam: bool,
    pub red_flags: Vec<String>,
    pub positive_signals: Vec<String>,
    pub analysis_reason: String,
    /// Name of the ScoringConfig that produced this result
    pub profile: String,
}

/// Score a submission.
///
/// Pure and synchronous: no I/O, no shared state, safe to call from any
/// number of threads at once. Empty fields are scored as zero-length input.
pub fn analyze_report(report: &ReportSubmission, config: &ScoringConfig) -> CredibilityAnalysis {
    let mut score = config.baseline;
    let mut red_flags = Vec::new();
    let mut positive_signals = Vec::new();

    let spam = detect_spam(&report.title, &report.description, &config.spam);
    score -= spam.penalty;
    red_flags.extend(spam.flags);

    for (name, analyze) in ANALYZERS {
        let outcome = analyze(report, &config.analyzers);
        debug!(analyzer = name, delta = outcome.delta, "Dimension analyzed");
        score += outcome.delta;
        red_flags.extend(outcome.red_flags);
        positive_signals.extend(outcome.positive_signals);
    }

    if spam.is_spam {
        score = score.min(config.spam_score_cap);
    }

    let credibility_score = score.clamp(0, 100) as u8;
    let recommended_action = Disposition::from_score(credibility_score, config);

    debug!(
        raw_score = score,
        credibility_score,
        is_spam = spam.is_spam,
        action = %recommended_action,
        profile = %config.name,
        "Credibility analysis complete"
    );

    let analysis_reason = compose_reason(
        credibility_score,
        recommended_action,
        &red_flags,
        &positive_signals,
    );

    CredibilityAnalysis {
        credibility_score,
        recommended_action,
        requires_manual_review: recommended_action.requires_manual_review(),
        is_spam: spam.is_spam,
        red_flags,
        positive_signals,
        analysis_reason,
        profile: config.name.clone(),
    }
}

/// Build the administrator-facing explanation for a decision.
pub fn compose_reason(
    score: u8,
    action: Disposition,
    red_flags: &[String],
    positive_signals: &[String],
) -> String {
    match action {
        Disposition::Accepted => format!(
            "AUTOMATED ACCEPTANCE (Score: {score}/100)\n\n\
             This report has been automatically accepted based on high credibility indicators:\n\
             - Detailed and specific description\n\
             - Clear location information\n\
             - Evidence provided (if applicable)\n\n\
             The report has been forwarded to campus security for immediate action."
        ),
        Disposition::Rejected => format!(
            "AUTOMATED REJECTION (Score: {score}/100)\n\n\
             This report lacks sufficient detail or credibility indicators:\n\
             {}\n\n\
             Please provide more specific information and resubmit, or contact campus \
             security directly if this is an urgent matter.",
            bullet_list(red_flags)
        ),
        Disposition::Pending => format!(
            "MANUAL REVIEW REQUIRED (Score: {score}/100)\n\n\
             This report requires administrator evaluation due to mixed credibility signals.\n\n\
             Positive Indicators:\n\
             {}\n\n\
             Concerns:\n\
             {}\n\n\
             An administrator will review this report within 24 hours.",
            bullet_list(positive_signals),
            bullet_list(red_flags)
        ),
    }
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return "- None identified".to_string();
    }
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
