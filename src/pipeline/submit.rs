// Submission pipeline: score a new report, persist it with its analysis,
// and tell the reporter what happened.
//
// Scoring always runs before the insert. The database only accepts an
// AssessedReport, so there is no path that stores an unscored report.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use super::notices;
use crate::db::models::{apply_analysis, ReportSubmission};
use crate::db::Database;
use crate::scoring::{analyze_report, CredibilityAnalysis, ScoringConfig};

/// What `submit_report` produced.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub report_id: i64,
    pub analysis: CredibilityAnalysis,
    pub notification_id: i64,
}

/// Score, store and acknowledge one submission.
pub async fn submit_report(
    db: &Arc<dyn Database>,
    config: &ScoringConfig,
    submission: ReportSubmission,
) -> Result<SubmissionOutcome> {
    let analysis = analyze_report(&submission, config);
    let user_id = submission.user_id;
    let assessed = apply_analysis(submission, &analysis, config);

    let report_id = db.insert_report(&assessed).await?;
    info!(
        report_id,
        user_id,
        score = analysis.credibility_score,
        action = %analysis.recommended_action,
        is_spam = analysis.is_spam,
        "Report submitted"
    );

    let notice = notices::submission_notice(user_id, report_id, analysis.recommended_action);
    let notification_id = db.insert_notification(&notice).await?;

    Ok(SubmissionOutcome {
        report_id,
        analysis,
        notification_id,
    })
}
