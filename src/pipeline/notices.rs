// Reporter notifications: the text a student sees in their inbox when a
// report is filed or its status changes.

use crate::db::models::{NewNotification, NotificationKind, ReportStatus};
use crate::scoring::Disposition;

/// Notice sent right after a report is filed.
///
/// A rejected report is not announced as rejected; the reporter is told it
/// is under review and nudged to add detail next time.
pub fn submission_notice(user_id: i64, report_id: i64, action: Disposition) -> NewNotification {
    let (title, message) = match action {
        Disposition::Accepted => (
            format!("Incident Report #{report_id} Accepted"),
            format!(
                "Your incident report #{report_id} has been accepted and forwarded to \
                 campus security."
            ),
        ),
        Disposition::Pending => (
            format!("Incident Report #{report_id} Received"),
            format!(
                "Your incident report #{report_id} has been received and is awaiting review \
                 by an administrator."
            ),
        ),
        Disposition::Rejected => (
            format!("Incident Report #{report_id} Received"),
            format!(
                "Your incident report #{report_id} has been submitted for review. \
                 Tip: Adding more details and photos helps us respond faster."
            ),
        ),
    };

    NewNotification {
        user_id,
        title,
        message,
        kind: NotificationKind::ReportReceived,
        related_report_id: Some(report_id),
    }
}

/// Notice sent when an administrator changes a report's status.
pub fn status_change_notice(
    user_id: i64,
    report_id: i64,
    old_status: ReportStatus,
    new_status: ReportStatus,
    remarks: Option<&str>,
) -> NewNotification {
    let remarks = remarks.map(str::trim).filter(|r| !r.is_empty());

    let message = match new_status {
        ReportStatus::Rejected => {
            let detail = match remarks {
                Some(reason) => format!("Reason: {reason}"),
                None => "Please review and resubmit with more details.".to_string(),
            };
            format!("Your incident report #{report_id} has been rejected. {detail}")
        }
        ReportStatus::Accepted => format!(
            "Your incident report #{report_id} has been accepted and is now being processed."
        ),
        ReportStatus::InProgress => format!(
            "Your incident report #{report_id} status has been updated to \"In-Progress\". \
             We are actively working on this."
        ),
        ReportStatus::Resolved => {
            format!("Your incident report #{report_id} has been resolved.")
        }
        ReportStatus::Pending => format!(
            "Your incident report #{report_id} status has been updated from {} to {}.",
            old_status.label(),
            new_status.label()
        ),
    };

    let kind = if new_status == ReportStatus::Resolved {
        NotificationKind::IncidentResolved
    } else {
        NotificationKind::IncidentStatusUpdate
    };

    NewNotification {
        user_id,
        title: format!("Incident Report #{report_id} Update"),
        message,
        kind,
        related_report_id: Some(report_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_without_remarks_asks_for_resubmission() {
        let notice = status_change_notice(7, 3, ReportStatus::Pending, ReportStatus::Rejected, None);
        assert_eq!(
            notice.message,
            "Your incident report #3 has been rejected. Please review and resubmit with more details."
        );
        assert_eq!(notice.kind, NotificationKind::IncidentStatusUpdate);
        assert_eq!(notice.title, "Incident Report #3 Update");
    }

    #[test]
    fn test_rejection_with_remarks_includes_reason() {
        let notice = status_change_notice(
            7,
            3,
            ReportStatus::Pending,
            ReportStatus::Rejected,
            Some("  Duplicate of #2 "),
        );
        assert!(notice.message.ends_with("Reason: Duplicate of #2"));
    }

    #[test]
    fn test_blank_remarks_are_ignored() {
        let notice =
            status_change_notice(7, 3, ReportStatus::Pending, ReportStatus::Rejected, Some("   "));
        assert!(notice.message.contains("Please review and resubmit"));
    }

    #[test]
    fn test_resolved_uses_resolved_kind() {
        let notice =
            status_change_notice(7, 3, ReportStatus::InProgress, ReportStatus::Resolved, None);
        assert_eq!(notice.kind, NotificationKind::IncidentResolved);
    }

    #[test]
    fn test_back_to_pending_mentions_both_statuses() {
        let notice =
            status_change_notice(7, 3, ReportStatus::InProgress, ReportStatus::Pending, None);
        assert!(notice.message.contains("from In Progress to Pending"));
    }

    #[test]
    fn test_rejected_submission_is_not_announced_as_rejected() {
        let notice = submission_notice(7, 3, Disposition::Rejected);
        assert!(!notice.message.contains("rejected"));
        assert!(notice.message.contains("Adding more details and photos"));
        assert_eq!(notice.kind, NotificationKind::ReportReceived);
        assert_eq!(notice.related_report_id, Some(3));
    }
}
