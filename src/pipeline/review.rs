// Administrator actions on stored reports.
//
// Overrides only ever change status. The score, flags, signals and reason
// the scorer produced stay on the report as the record of the automated
// decision, and `replay_analysis` can check that record against the
// scorer as it stands today.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use super::notices;
use crate::db::models::{IncidentReport, ReportStatus, ScoreBand};
use crate::db::queries::now_timestamp;
use crate::db::Database;
use crate::scoring::{analyze_report, CredibilityAnalysis, Disposition};

/// Manually move a report to a new status and notify its reporter.
///
/// Errors if the report doesn't exist; nothing is written in that case.
pub async fn update_report_status(
    db: &Arc<dyn Database>,
    report_id: i64,
    new_status: ReportStatus,
    remarks: Option<&str>,
) -> Result<IncidentReport> {
    let Some(report) = db.get_report(report_id).await? else {
        warn!(report_id, "Status update for unknown report");
        anyhow::bail!("Report #{report_id} not found");
    };

    let old_status = report.status;
    let updated = report.with_status(new_status, now_timestamp());

    if !db
        .update_report_status(updated.id, updated.status, &updated.updated_at)
        .await?
    {
        warn!(report_id, "Report disappeared before its status could be updated");
        anyhow::bail!("Report #{report_id} not found");
    }

    let notice =
        notices::status_change_notice(updated.user_id, updated.id, old_status, new_status, remarks);
    db.insert_notification(&notice).await?;

    info!(
        report_id,
        from = old_status.as_str(),
        to = new_status.as_str(),
        score = updated.credibility_score,
        "Report status updated"
    );

    Ok(updated)
}

/// Reports waiting on manual review, optionally narrowed to one credibility
/// band. Each report is banded by the thresholds it was scored with, so a
/// report judged under another profile lands where that profile put it.
pub async fn review_queue(
    db: &Arc<dyn Database>,
    band: Option<ScoreBand>,
    keyword: Option<&str>,
) -> Result<Vec<IncidentReport>> {
    let mut queue = db.review_queue(0, 100, keyword).await?;
    if let Some(band) = band {
        queue.retain(|report| {
            ScoreBand::of(report.credibility_score, &report.scoring_config) == band
        });
    }
    debug!(count = queue.len(), ?band, "Review queue loaded");
    Ok(queue)
}

/// Accept every report waiting on manual review and notify each reporter.
/// Returns the accepted report ids.
pub async fn bulk_accept_pending(db: &Arc<dyn Database>) -> Result<Vec<i64>> {
    let accepted = db.accept_review_queue().await?;

    for &report_id in &accepted {
        let Some(report) = db.get_report(report_id).await? else {
            warn!(report_id, "Accepted report vanished before notification");
            continue;
        };
        let notice = notices::status_change_notice(
            report.user_id,
            report.id,
            ReportStatus::Pending,
            ReportStatus::Accepted,
            None,
        );
        db.insert_notification(&notice).await?;
    }

    info!(count = accepted.len(), "Review queue accepted in bulk");
    Ok(accepted)
}

/// Result of re-scoring a stored report.
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    pub report_id: i64,
    pub stored_score: u8,
    pub stored_action: Disposition,
    pub replayed: CredibilityAnalysis,
}

impl ReplayOutcome {
    pub fn score_matches(&self) -> bool {
        self.replayed.credibility_score == self.stored_score
    }

    pub fn action_matches(&self) -> bool {
        self.replayed.recommended_action == self.stored_action
    }

    /// The automated decision is reproduced exactly.
    pub fn reproduced(&self) -> bool {
        self.score_matches() && self.action_matches()
    }
}

/// Re-run the scorer on a stored report with the configuration it was
/// originally judged with.
///
/// The stored action is derived from the stored score, not the current
/// status, so a later manual override doesn't count as a mismatch.
pub fn replay_analysis(report: &IncidentReport) -> ReplayOutcome {
    let config = &report.scoring_config;
    let replayed = analyze_report(&report.submission(), config);
    ReplayOutcome {
        report_id: report.id,
        stored_score: report.credibility_score,
        stored_action: Disposition::from_score(report.credibility_score, config),
        replayed,
    }
}
