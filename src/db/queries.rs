// Database queries: CRUD operations for reports and notifications.
//
// Every database interaction goes through this module. This keeps SQL
// contained in one place and gives the rest of the app clean Rust interfaces.

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::models::{
    AssessedReport, AutomationStats, IncidentReport, ItemFilter, LostFoundItem, NewLostFoundItem,
    NewNotification, Notification, ReportStatus,
};
use crate::scoring::weights::ScoringConfig;

const REPORT_COLUMNS: &str = "id, user_id, title, description, campus_location, incident_type,
    image_path, status, credibility_score, is_auto_processed, analysis_reason, red_flags,
    positive_signals, scoring_config, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, user_id, title, description, email, location_found, category,
    status, image_path, date_posted, archived_at";

/// Current time as stored in the database (RFC 3339, UTC, second precision).
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Turn a stored enum name back into its Rust type, surfacing bad values
/// as a column conversion error.
fn parse_column<T>(idx: usize, value: String) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = anyhow::Error>,
{
    value
        .parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

fn json_column<T: serde::de::DeserializeOwned>(idx: usize, json: &str) -> rusqlite::Result<T> {
    serde_json::from_str(json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

fn row_to_report(row: &Row<'_>) -> rusqlite::Result<IncidentReport> {
    let red_flags_json: String = row.get(11)?;
    let signals_json: String = row.get(12)?;
    // Rows written before migration v2 have no stored config; they were
    // scored with the default profile.
    let config_json: Option<String> = row.get(13)?;
    let scoring_config = match config_json {
        Some(json) => json_column::<ScoringConfig>(13, &json)?,
        None => ScoringConfig::default(),
    };

    Ok(IncidentReport {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        campus_location: row.get(4)?,
        incident_type: parse_column(5, row.get(5)?)?,
        image_path: row.get(6)?,
        status: parse_column(7, row.get(7)?)?,
        credibility_score: row.get(8)?,
        is_auto_processed: row.get(9)?,
        analysis_reason: row.get(10)?,
        red_flags: json_column(11, &red_flags_json)?,
        positive_signals: json_column(12, &signals_json)?,
        scoring_config,
        created_at: row.get(14)?,
        updated_at: row.get(15)?,
    })
}

// --- Incident reports ---

/// Store a scored report and return its new id.
pub fn insert_report(conn: &Connection, report: &AssessedReport) -> Result<i64> {
    let now = now_timestamp();
    let submission = &report.submission;
    conn.execute(
        "INSERT INTO incident_reports (user_id, title, description, campus_location,
            incident_type, image_path, status, credibility_score, is_auto_processed,
            analysis_reason, red_flags, positive_signals, scoring_config, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?14)",
        params![
            submission.user_id,
            submission.title,
            submission.description,
            submission.campus_location,
            submission.incident_type.as_str(),
            submission.image_path,
            report.status.as_str(),
            report.credibility_score,
            report.is_auto_processed,
            report.analysis_reason,
            serde_json::to_string(&report.red_flags)?,
            serde_json::to_string(&report.positive_signals)?,
            serde_json::to_string(&report.scoring_config)?,
            now,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Fetch one report by id.
pub fn get_report(conn: &Connection, id: i64) -> Result<Option<IncidentReport>> {
    let sql = format!("SELECT {REPORT_COLUMNS} FROM incident_reports WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let report = stmt.query_row(params![id], row_to_report).optional()?;
    Ok(report)
}

/// All reports, newest first, optionally restricted to one status.
pub fn list_reports(conn: &Connection, status: Option<ReportStatus>) -> Result<Vec<IncidentReport>> {
    let sql = format!(
        "SELECT {REPORT_COLUMNS} FROM incident_reports
         WHERE (?1 IS NULL OR status = ?1)
         ORDER BY created_at DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![status.map(|s| s.as_str())], row_to_report)?;
    let mut reports = Vec::new();
    for row in rows {
        reports.push(row?);
    }
    Ok(reports)
}

/// A single reporter's reports, newest first.
pub fn list_user_reports(conn: &Connection, user_id: i64) -> Result<Vec<IncidentReport>> {
    let sql = format!(
        "SELECT {REPORT_COLUMNS} FROM incident_reports
         WHERE user_id = ?1
         ORDER BY created_at DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id], row_to_report)?;
    let mut reports = Vec::new();
    for row in rows {
        reports.push(row?);
    }
    Ok(reports)
}

/// Reports waiting on an administrator: Pending and not auto-processed,
/// within an inclusive score range, optionally matching a keyword in the
/// title, description or location.
pub fn review_queue(
    conn: &Connection,
    min_score: u8,
    max_score: u8,
    keyword: Option<&str>,
) -> Result<Vec<IncidentReport>> {
    let sql = format!(
        "SELECT {REPORT_COLUMNS} FROM incident_reports
         WHERE status = 'Pending' AND is_auto_processed = 0
           AND credibility_score BETWEEN ?1 AND ?2
           AND (?3 IS NULL
                OR title LIKE ?3
                OR description LIKE ?3
                OR campus_location LIKE ?3)
         ORDER BY created_at DESC, id DESC"
    );
    let pattern = keyword
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(|k| format!("%{k}%"));
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![min_score, max_score, pattern], row_to_report)?;
    let mut reports = Vec::new();
    for row in rows {
        reports.push(row?);
    }
    Ok(reports)
}

/// Change a report's status. Only `status` and `updated_at` are written;
/// the credibility fields stay as the audit trail.
///
/// Returns false if no report has that id.
pub fn update_report_status(
    conn: &Connection,
    id: i64,
    status: ReportStatus,
    updated_at: &str,
) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE incident_reports SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), updated_at, id],
    )?;
    Ok(changed > 0)
}

/// Accept every report in the review queue in one transaction.
/// Returns the ids that were accepted.
pub fn accept_review_queue(conn: &Connection) -> Result<Vec<i64>> {
    let tx = conn.unchecked_transaction()?;
    let ids: Vec<i64> = {
        let mut stmt = tx.prepare(
            "SELECT id FROM incident_reports
             WHERE status = 'Pending' AND is_auto_processed = 0
             ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        let mut ids = Vec::new();
        for row in rows {
            ids.push(row?);
        }
        ids
    };

    let now = now_timestamp();
    for id in &ids {
        tx.execute(
            "UPDATE incident_reports SET status = 'Accepted', updated_at = ?1 WHERE id = ?2",
            params![now, id],
        )?;
    }
    tx.commit()?;
    Ok(ids)
}

/// Dashboard counters for the automated triage.
pub fn automation_stats(conn: &Connection) -> Result<AutomationStats> {
    let stats = conn.query_row(
        "SELECT
            COUNT(*),
            COALESCE(SUM(status = 'Pending'), 0),
            COALESCE(SUM(status = 'InProgress'), 0),
            COALESCE(SUM(status = 'Resolved'), 0),
            COALESCE(SUM(status = 'Accepted' AND is_auto_processed = 1), 0),
            COALESCE(SUM(status = 'Rejected' AND is_auto_processed = 1), 0),
            COALESCE(SUM(status = 'Pending' AND is_auto_processed = 0), 0)
         FROM incident_reports",
        [],
        |row| {
            Ok(AutomationStats {
                total: row.get(0)?,
                pending: row.get(1)?,
                in_progress: row.get(2)?,
                resolved: row.get(3)?,
                auto_accepted: row.get(4)?,
                auto_rejected: row.get(5)?,
                awaiting_review: row.get(6)?,
            })
        },
    )?;
    Ok(stats)
}

// --- Notifications ---

/// Store a notification and return its id.
pub fn insert_notification(conn: &Connection, notification: &NewNotification) -> Result<i64> {
    conn.execute(
        "INSERT INTO notifications (user_id, title, message, kind, related_report_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            notification.user_id,
            notification.title,
            notification.message,
            notification.kind.as_str(),
            notification.related_report_id,
            now_timestamp(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// A user's notifications, newest first.
pub fn get_notifications(conn: &Connection, user_id: i64) -> Result<Vec<Notification>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, title, message, kind, is_read, related_report_id, created_at
         FROM notifications
         WHERE user_id = ?1
         ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![user_id], |row| {
        Ok(Notification {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            message: row.get(3)?,
            kind: parse_column(4, row.get(4)?)?,
            is_read: row.get(5)?,
            related_report_id: row.get(6)?,
            created_at: row.get(7)?,
        })
    })?;
    let mut notifications = Vec::new();
    for row in rows {
        notifications.push(row?);
    }
    Ok(notifications)
}

pub fn unread_count(conn: &Connection, user_id: i64) -> Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM notifications WHERE user_id = ?1 AND is_read = 0",
        params![user_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Mark one notification read. Scoped to its owner so one user cannot
/// touch another's inbox. Returns false if nothing matched.
pub fn mark_notification_read(conn: &Connection, id: i64, user_id: i64) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE notifications SET is_read = 1 WHERE id = ?1 AND user_id = ?2",
        params![id, user_id],
    )?;
    Ok(changed > 0)
}

/// Mark all of a user's notifications read; returns how many changed.
pub fn mark_all_read(conn: &Connection, user_id: i64) -> Result<usize> {
    let changed = conn.execute(
        "UPDATE notifications SET is_read = 1 WHERE user_id = ?1 AND is_read = 0",
        params![user_id],
    )?;
    Ok(changed)
}

// --- Lost and found ---

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<LostFoundItem> {
    Ok(LostFoundItem {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        email: row.get(4)?,
        location_found: row.get(5)?,
        category: parse_column(6, row.get(6)?)?,
        status: parse_column(7, row.get(7)?)?,
        image_path: row.get(8)?,
        date_posted: row.get(9)?,
        archived_at: row.get(10)?,
    })
}

/// Store a new listing and return its id.
pub fn insert_item(conn: &Connection, item: &NewLostFoundItem) -> Result<i64> {
    conn.execute(
        "INSERT INTO lost_found_items (user_id, title, description, email, location_found,
            category, status, image_path, date_posted)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            item.user_id,
            item.title.trim(),
            item.description.trim(),
            item.email.trim(),
            item.location_found.trim(),
            item.category.as_str(),
            item.status.as_str(),
            item.image_path,
            now_timestamp(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_item(conn: &Connection, id: i64) -> Result<Option<LostFoundItem>> {
    let sql = format!("SELECT {ITEM_COLUMNS} FROM lost_found_items WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let item = stmt.query_row(params![id], row_to_item).optional()?;
    Ok(item)
}

/// Listings matching a filter, newest first.
pub fn search_items(conn: &Connection, filter: &ItemFilter) -> Result<Vec<LostFoundItem>> {
    let sql = format!(
        "SELECT {ITEM_COLUMNS} FROM lost_found_items
         WHERE (?1 = 1 OR status != 'Archived')
           AND (?2 IS NULL OR status = ?2)
           AND (?3 IS NULL OR category = ?3)
           AND (?4 IS NULL
                OR title LIKE ?4
                OR description LIKE ?4
                OR location_found LIKE ?4
                OR email LIKE ?4)
         ORDER BY date_posted DESC, id DESC"
    );
    let pattern = filter
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(|k| format!("%{k}%"));
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params![
            filter.include_archived,
            filter.status.map(|s| s.as_str()),
            filter.category.map(|c| c.as_str()),
            pattern,
        ],
        row_to_item,
    )?;
    let mut items = Vec::new();
    for row in rows {
        items.push(row?);
    }
    Ok(items)
}

/// One poster's listings, newest first.
pub fn list_user_items(
    conn: &Connection,
    user_id: i64,
    include_archived: bool,
) -> Result<Vec<LostFoundItem>> {
    let sql = format!(
        "SELECT {ITEM_COLUMNS} FROM lost_found_items
         WHERE user_id = ?1 AND (?2 = 1 OR status != 'Archived')
         ORDER BY date_posted DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id, include_archived], row_to_item)?;
    let mut items = Vec::new();
    for row in rows {
        items.push(row?);
    }
    Ok(items)
}

/// Write back the mutable fields of a listing. The poster, contact email,
/// photo and posting date never change.
///
/// Returns false if no listing has that id.
pub fn update_item(conn: &Connection, item: &LostFoundItem) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE lost_found_items
         SET title = ?1, description = ?2, location_found = ?3, category = ?4,
             status = ?5, archived_at = ?6
         WHERE id = ?7",
        params![
            item.title.trim(),
            item.description.trim(),
            item.location_found.trim(),
            item.category.as_str(),
            item.status.as_str(),
            item.archived_at,
            item.id,
        ],
    )?;
    Ok(changed > 0)
}
