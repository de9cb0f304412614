// Composition tests: the report lifecycle end to end.
//
// These tests chain the scorer, the submission pipeline, the review
// actions and the SQLite store:
//   submit -> store -> notify -> queue -> override / bulk accept -> replay
// against a fresh in-memory database per test. No files, no network.

use std::sync::Arc;

use iskoalert::db::models::{
    IncidentType, ItemCategory, ItemEdit, ItemFilter, ItemStatus, NewLostFoundItem,
    NotificationKind, ReportStatus, ReportSubmission, ScoreBand,
};
use iskoalert::db::{self, Database};
use iskoalert::pipeline::review::{
    bulk_accept_pending, replay_analysis, review_queue, update_report_status,
};
use iskoalert::pipeline::lost_found::{
    archive_item, change_item_status, edit_item, post_item, Actor,
};
use iskoalert::pipeline::submit::submit_report;
use iskoalert::scoring::weights::ScoringConfig;
use iskoalert::scoring::Disposition;

fn database() -> Arc<dyn Database> {
    db::in_memory().unwrap()
}

fn accepted_report(user_id: i64) -> ReportSubmission {
    ReportSubmission {
        user_id,
        title: "Backpack stolen at the library".to_string(),
        description: "My black backpack was stolen from the reading area around 3:15pm today. \
                      It held a silver laptop and two notebooks. I left it on the table for \
                      ten minutes."
            .to_string(),
        campus_location: "Library - 2nd Floor".to_string(),
        incident_type: IncidentType::Theft,
        image_path: Some("uploads/backpack.jpg".to_string()),
    }
}

fn rejected_report(user_id: i64) -> ReportSubmission {
    ReportSubmission {
        user_id,
        title: "t".to_string(),
        description: "test test test test test".to_string(),
        campus_location: String::new(),
        incident_type: IncidentType::Others,
        image_path: None,
    }
}

fn package_report(user_id: i64) -> ReportSubmission {
    ReportSubmission {
        user_id,
        title: "Unattended package near entrance".to_string(),
        description: "I think someone left a strange package beside the entrance of the \
                      student center. I am not sure who brought it there, but it looked out of \
                      place and nobody nearby claimed it when I asked around. Guards were not \
                      present at the time, so I decided to report it here instead of waiting. \
                      Please send somebody to check it."
            .to_string(),
        campus_location: "Main Campus".to_string(),
        incident_type: IncidentType::Others,
        image_path: None,
    }
}

fn phone_report(user_id: i64) -> ReportSubmission {
    ReportSubmission {
        user_id,
        title: "Theft".to_string(),
        description: "My phone was stolen at the library around 2:30pm yesterday, it is a \
                      black Samsung phone, room 204"
            .to_string(),
        campus_location: "Library - 2nd Floor".to_string(),
        incident_type: IncidentType::Theft,
        image_path: Some("/uploads/phone.jpg".to_string()),
    }
}

fn lights_report(user_id: i64) -> ReportSubmission {
    ReportSubmission {
        user_id,
        title: "Flickering walkway lights".to_string(),
        description: "Perhaps it is nothing serious, but the lights along the walkway behind \
                      the gymnasium keep flickering on and off after classes end. Students \
                      walking back to the dorms seem uneasy there, and I believe the area could \
                      use a quick inspection soon."
            .to_string(),
        campus_location: "Gymnasium".to_string(),
        incident_type: IncidentType::Others,
        image_path: None,
    }
}

// ============================================================
// Submission
// ============================================================

#[tokio::test]
async fn accepted_submission_is_stored_and_acknowledged() {
    let db = database();
    let config = ScoringConfig::default();

    let outcome = submit_report(&db, &config, accepted_report(10)).await.unwrap();
    assert_eq!(outcome.analysis.recommended_action, Disposition::Accepted);

    let stored = db.get_report(outcome.report_id).await.unwrap().unwrap();
    assert_eq!(stored.status, ReportStatus::Accepted);
    assert!(stored.is_auto_processed);
    assert_eq!(stored.credibility_score, outcome.analysis.credibility_score);
    assert_eq!(stored.red_flags, outcome.analysis.red_flags);
    assert_eq!(stored.positive_signals, outcome.analysis.positive_signals);
    assert_eq!(stored.analysis_reason, outcome.analysis.analysis_reason);
    assert_eq!(stored.scoring_config, config);

    let inbox = db.get_notifications(10).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].id, outcome.notification_id);
    assert_eq!(inbox[0].kind, NotificationKind::ReportReceived);
    assert_eq!(inbox[0].related_report_id, Some(outcome.report_id));
    assert!(inbox[0].message.contains("accepted"));
    assert!(!inbox[0].is_read);
}

#[tokio::test]
async fn rejected_submission_is_auto_processed_and_not_queued() {
    let db = database();
    let outcome = submit_report(&db, &ScoringConfig::default(), rejected_report(11))
        .await
        .unwrap();

    let stored = db.get_report(outcome.report_id).await.unwrap().unwrap();
    assert_eq!(stored.status, ReportStatus::Rejected);
    assert!(stored.is_auto_processed);
    assert!(!stored.awaiting_review());
    assert!(db.review_queue(0, 100, None).await.unwrap().is_empty());

    let inbox = db.get_notifications(11).await.unwrap();
    assert!(inbox[0].message.contains("Adding more details and photos"));
}

#[tokio::test]
async fn pending_submission_enters_the_review_queue() {
    let db = database();
    let config = ScoringConfig::default();
    let outcome = submit_report(&db, &config, package_report(12)).await.unwrap();

    let stored = db.get_report(outcome.report_id).await.unwrap().unwrap();
    assert_eq!(stored.status, ReportStatus::Pending);
    assert!(!stored.is_auto_processed);
    assert!(stored.awaiting_review());

    let queue = db.review_queue(0, 100, None).await.unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id, outcome.report_id);
}

// ============================================================
// Review queue filters
// ============================================================

#[tokio::test]
async fn review_queue_filters_by_band_and_keyword() {
    let db = database();
    let config = ScoringConfig::default();
    let package = submit_report(&db, &config, package_report(1)).await.unwrap();
    let lights = submit_report(&db, &config, lights_report(2)).await.unwrap();
    submit_report(&db, &config, accepted_report(3)).await.unwrap();

    let (lo, hi) = ScoreBand::Medium.range(&config).unwrap();
    let medium = db.review_queue(lo, hi, None).await.unwrap();
    let ids: Vec<i64> = medium.iter().map(|r| r.id).collect();
    // Newest first
    assert_eq!(ids, vec![lights.report_id, package.report_id]);

    let (lo, hi) = ScoreBand::High.range(&config).unwrap();
    assert!(db.review_queue(lo, hi, None).await.unwrap().is_empty());

    let by_keyword = db.review_queue(0, 100, Some("gymnasium")).await.unwrap();
    assert_eq!(by_keyword.len(), 1);
    assert_eq!(by_keyword[0].id, lights.report_id);

    let blank_keyword = db.review_queue(0, 100, Some("  ")).await.unwrap();
    assert_eq!(blank_keyword.len(), 2);
}

#[tokio::test]
async fn queue_bands_use_the_thresholds_each_report_was_scored_with() {
    let db = database();
    let strict = ScoringConfig::default().with_thresholds(Some(100), None);
    let phone = submit_report(&db, &strict, phone_report(1)).await.unwrap();
    assert_eq!(phone.analysis.credibility_score, 95);
    assert_eq!(phone.analysis.recommended_action, Disposition::Pending);
    let package = submit_report(&db, &ScoringConfig::default(), package_report(2))
        .await
        .unwrap();

    // 95 is in the high band under the default thresholds, but this report
    // was judged with accept at 100.
    let high = review_queue(&db, Some(ScoreBand::High), None).await.unwrap();
    assert!(high.is_empty());

    let medium = review_queue(&db, Some(ScoreBand::Medium), None).await.unwrap();
    let ids: Vec<i64> = medium.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![package.report_id, phone.report_id]);

    let all = review_queue(&db, None, Some("samsung")).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, phone.report_id);
}

// ============================================================
// Manual override
// ============================================================

#[tokio::test]
async fn override_changes_status_but_keeps_the_analysis() {
    let db = database();
    let outcome = submit_report(&db, &ScoringConfig::default(), package_report(20))
        .await
        .unwrap();
    let before = db.get_report(outcome.report_id).await.unwrap().unwrap();

    let updated = update_report_status(
        &db,
        outcome.report_id,
        ReportStatus::Rejected,
        Some("Duplicate of an earlier report"),
    )
    .await
    .unwrap();
    assert_eq!(updated.status, ReportStatus::Rejected);

    let after = db.get_report(outcome.report_id).await.unwrap().unwrap();
    assert_eq!(after.status, ReportStatus::Rejected);
    assert_eq!(after.credibility_score, before.credibility_score);
    assert_eq!(after.red_flags, before.red_flags);
    assert_eq!(after.positive_signals, before.positive_signals);
    assert_eq!(after.analysis_reason, before.analysis_reason);
    assert_eq!(after.is_auto_processed, before.is_auto_processed);
    assert_eq!(after.updated_at, updated.updated_at);

    let inbox = db.get_notifications(20).await.unwrap();
    assert_eq!(inbox.len(), 2);
    assert_eq!(inbox[0].kind, NotificationKind::IncidentStatusUpdate);
    assert!(inbox[0]
        .message
        .ends_with("has been rejected. Reason: Duplicate of an earlier report"));

    assert!(db.review_queue(0, 100, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn resolving_sends_a_resolved_notice() {
    let db = database();
    let outcome = submit_report(&db, &ScoringConfig::default(), accepted_report(21))
        .await
        .unwrap();

    update_report_status(&db, outcome.report_id, ReportStatus::InProgress, None)
        .await
        .unwrap();
    update_report_status(&db, outcome.report_id, ReportStatus::Resolved, None)
        .await
        .unwrap();

    let inbox = db.get_notifications(21).await.unwrap();
    assert_eq!(inbox.len(), 3);
    assert_eq!(inbox[0].kind, NotificationKind::IncidentResolved);
    assert!(inbox[1].message.contains("\"In-Progress\""));
}

#[tokio::test]
async fn override_of_missing_report_fails_without_side_effects() {
    let db = database();
    let result = update_report_status(&db, 999, ReportStatus::Accepted, None).await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("#999"));
    assert_eq!(db.automation_stats().await.unwrap().total, 0);
}

// ============================================================
// Bulk acceptance
// ============================================================

#[tokio::test]
async fn bulk_accept_clears_the_queue_and_notifies_each_reporter() {
    let db = database();
    let config = ScoringConfig::default();
    let package = submit_report(&db, &config, package_report(30)).await.unwrap();
    let lights = submit_report(&db, &config, lights_report(31)).await.unwrap();
    let rejected = submit_report(&db, &config, rejected_report(32)).await.unwrap();

    let accepted = bulk_accept_pending(&db).await.unwrap();
    assert_eq!(accepted, vec![package.report_id, lights.report_id]);

    for id in &accepted {
        let report = db.get_report(*id).await.unwrap().unwrap();
        assert_eq!(report.status, ReportStatus::Accepted);
        assert!(!report.is_auto_processed);
    }
    let untouched = db.get_report(rejected.report_id).await.unwrap().unwrap();
    assert_eq!(untouched.status, ReportStatus::Rejected);

    for user in [30, 31] {
        let inbox = db.get_notifications(user).await.unwrap();
        assert_eq!(inbox.len(), 2);
        assert!(inbox[0].message.contains("accepted and is now being processed"));
    }
    assert_eq!(db.get_notifications(32).await.unwrap().len(), 1);

    assert!(db.review_queue(0, 100, None).await.unwrap().is_empty());
    assert!(bulk_accept_pending(&db).await.unwrap().is_empty());
}

// ============================================================
// Dashboard counters
// ============================================================

#[tokio::test]
async fn automation_stats_count_each_outcome() {
    let db = database();
    let config = ScoringConfig::default();
    submit_report(&db, &config, accepted_report(1)).await.unwrap();
    submit_report(&db, &config, rejected_report(2)).await.unwrap();
    let pending = submit_report(&db, &config, package_report(3)).await.unwrap();
    submit_report(&db, &config, lights_report(4)).await.unwrap();
    update_report_status(&db, pending.report_id, ReportStatus::InProgress, None)
        .await
        .unwrap();

    let stats = db.automation_stats().await.unwrap();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.auto_accepted, 1);
    assert_eq!(stats.auto_rejected, 1);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.awaiting_review, 1);
    assert_eq!(stats.in_progress, 1);
    assert_eq!(stats.resolved, 0);
    assert_eq!(stats.automation_rate(), 0.5);
}

#[tokio::test]
async fn reports_list_by_status_and_user() {
    let db = database();
    let config = ScoringConfig::default();
    submit_report(&db, &config, accepted_report(40)).await.unwrap();
    submit_report(&db, &config, package_report(40)).await.unwrap();
    submit_report(&db, &config, rejected_report(41)).await.unwrap();

    assert_eq!(db.list_reports(None).await.unwrap().len(), 3);
    let rejected = db
        .list_reports(Some(ReportStatus::Rejected))
        .await
        .unwrap();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].user_id, 41);

    let mine = db.list_user_reports(40).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|r| r.user_id == 40));
}

// ============================================================
// Replay
// ============================================================

#[tokio::test]
async fn replay_reproduces_stored_decisions() {
    let db = database();
    let config = ScoringConfig::default();
    for submission in [accepted_report(1), rejected_report(2), package_report(3)] {
        let outcome = submit_report(&db, &config, submission).await.unwrap();
        let stored = db.get_report(outcome.report_id).await.unwrap().unwrap();
        let replay = replay_analysis(&stored);
        assert!(replay.reproduced(), "report #{} drifted", stored.id);
        assert_eq!(replay.replayed, outcome.analysis);
    }
}

#[tokio::test]
async fn replay_uses_the_profile_the_report_was_scored_with() {
    let db = database();
    let outcome = submit_report(&db, &ScoringConfig::legacy(), package_report(5))
        .await
        .unwrap();
    assert_eq!(outcome.analysis.recommended_action, Disposition::Accepted);

    let stored = db.get_report(outcome.report_id).await.unwrap().unwrap();
    assert_eq!(stored.scoring_config.name, "legacy");

    let replay = replay_analysis(&stored);
    assert!(replay.reproduced());
    assert_eq!(replay.replayed.profile, "legacy");
}

#[tokio::test]
async fn replay_ignores_later_overrides() {
    let db = database();
    let outcome = submit_report(&db, &ScoringConfig::default(), package_report(6))
        .await
        .unwrap();
    let overridden = update_report_status(&db, outcome.report_id, ReportStatus::Accepted, None)
        .await
        .unwrap();

    let replay = replay_analysis(&overridden);
    assert!(replay.reproduced());
    assert_eq!(replay.stored_action, Disposition::Pending);
}

#[tokio::test]
async fn replay_detects_a_tampered_score() {
    let db = database();
    let outcome = submit_report(&db, &ScoringConfig::default(), package_report(7))
        .await
        .unwrap();
    let mut stored = db.get_report(outcome.report_id).await.unwrap().unwrap();
    stored.credibility_score = 95;

    let replay = replay_analysis(&stored);
    assert!(!replay.score_matches());
    assert!(!replay.action_matches());
}

// ============================================================
// Notifications
// ============================================================

#[tokio::test]
async fn marking_read_is_scoped_to_the_owner() {
    let db = database();
    let config = ScoringConfig::default();
    let mine = submit_report(&db, &config, accepted_report(50)).await.unwrap();
    submit_report(&db, &config, package_report(50)).await.unwrap();
    submit_report(&db, &config, accepted_report(51)).await.unwrap();

    assert_eq!(db.unread_count(50).await.unwrap(), 2);

    assert!(!db
        .mark_notification_read(mine.notification_id, 51)
        .await
        .unwrap());
    assert_eq!(db.unread_count(50).await.unwrap(), 2);

    assert!(db
        .mark_notification_read(mine.notification_id, 50)
        .await
        .unwrap());
    assert_eq!(db.unread_count(50).await.unwrap(), 1);

    assert_eq!(db.mark_all_read(50).await.unwrap(), 1);
    assert_eq!(db.unread_count(50).await.unwrap(), 0);
    assert_eq!(db.unread_count(51).await.unwrap(), 1);
}

// ============================================================
// Lost and found
// ============================================================

fn lost_id_card(user_id: i64) -> NewLostFoundItem {
    NewLostFoundItem {
        user_id,
        title: "Student ID".to_string(),
        description: "Lanyard with a maroon strap, lost near the canteen.".to_string(),
        email: "owner@example.edu".to_string(),
        location_found: "Canteen".to_string(),
        category: ItemCategory::Documents,
        status: ItemStatus::Lost,
        image_path: None,
    }
}

#[tokio::test]
async fn posted_item_appears_on_the_board() {
    let db = database();
    let item = post_item(&db, lost_id_card(60)).await.unwrap();
    assert_eq!(item.status, ItemStatus::Lost);
    assert_eq!(item.archived_at, None);

    let board = db.search_items(&ItemFilter::default()).await.unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0], item);

    // Listings are not incident reports
    assert!(db.review_queue(0, 100, None).await.unwrap().is_empty());
    assert!(db.get_notifications(60).await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_item_is_not_stored() {
    let db = database();
    let mut item = lost_id_card(61);
    item.title = "   ".to_string();
    let err = post_item(&db, item).await.unwrap_err();
    assert_eq!(err.to_string(), "Item name is required.");
    assert!(db.list_user_items(61, true).await.unwrap().is_empty());
}

#[tokio::test]
async fn only_the_poster_or_an_admin_may_change_an_item() {
    let db = database();
    let item = post_item(&db, lost_id_card(62)).await.unwrap();

    let err = change_item_status(&db, item.id, Actor::User(63), ItemStatus::Found)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("another user"));
    assert_eq!(db.get_item(item.id).await.unwrap().unwrap().status, ItemStatus::Lost);

    let found = change_item_status(&db, item.id, Actor::User(62), ItemStatus::Found)
        .await
        .unwrap();
    assert_eq!(found.status, ItemStatus::Found);

    let edit = ItemEdit {
        title: "Student ID and lanyard".to_string(),
        description: found.description.clone(),
        location_found: "Canteen - Counter 2".to_string(),
        category: ItemCategory::Documents,
        status: ItemStatus::Claimed,
    };
    let edited = edit_item(&db, item.id, Actor::Admin, edit).await.unwrap();
    let stored = db.get_item(item.id).await.unwrap().unwrap();
    assert_eq!(stored, edited);
    assert_eq!(stored.title, "Student ID and lanyard");
    assert_eq!(stored.status, ItemStatus::Claimed);
    assert_eq!(stored.user_id, 62);
}

#[tokio::test]
async fn archived_items_leave_the_board_but_stay_in_my_listings() {
    let db = database();
    let item = post_item(&db, lost_id_card(64)).await.unwrap();
    let other = post_item(&db, lost_id_card(65)).await.unwrap();

    let archived = archive_item(&db, item.id, Actor::User(64)).await.unwrap();
    assert_eq!(archived.status, ItemStatus::Archived);
    assert!(archived.archived_at.is_some());

    let again = archive_item(&db, item.id, Actor::Admin).await.unwrap_err();
    assert_eq!(again.to_string(), "Item already archived.");

    let board = db.search_items(&ItemFilter::default()).await.unwrap();
    assert_eq!(board.iter().map(|i| i.id).collect::<Vec<_>>(), vec![other.id]);

    assert!(db.list_user_items(64, false).await.unwrap().is_empty());
    assert_eq!(db.list_user_items(64, true).await.unwrap(), vec![archived]);

    // Admin view includes archived listings and filters by category
    let admin = ItemFilter {
        category: Some(ItemCategory::Documents),
        include_archived: true,
        ..ItemFilter::default()
    };
    assert_eq!(db.search_items(&admin).await.unwrap().len(), 2);
}

#[tokio::test]
async fn changing_a_missing_item_fails() {
    let db = database();
    let err = archive_item(&db, 404, Actor::Admin).await.unwrap_err();
    assert!(err.to_string().contains("#404"));
}
