// Database schema: table creation and migrations.
//
// We use a simple version-based migration approach: a `schema_version` table
// tracks which migrations have run, and each migration is a function that
// executes SQL statements.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet.
///
/// This is idempotent and safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- Tracks schema version for future migrations
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Incident reports with the automated credibility decision
        CREATE TABLE IF NOT EXISTS incident_reports (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,          -- reporter (owned by the account service)
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            campus_location TEXT NOT NULL,
            incident_type TEXT NOT NULL,       -- Theft / Hazard / MedicalEmergency / Accident / Others
            image_path TEXT,                   -- uploaded photo, if any
            status TEXT NOT NULL,              -- Pending / Accepted / Rejected / InProgress / Resolved
            credibility_score INTEGER NOT NULL CHECK (credibility_score BETWEEN 0 AND 100),
            is_auto_processed INTEGER NOT NULL DEFAULT 0,
            analysis_reason TEXT NOT NULL,
            red_flags TEXT NOT NULL,           -- JSON array, audit trail
            positive_signals TEXT NOT NULL,    -- JSON array, audit trail
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        -- Messages to reporters about their reports
        CREATE TABLE IF NOT EXISTS notifications (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            message TEXT NOT NULL,
            kind TEXT NOT NULL,
            is_read INTEGER NOT NULL DEFAULT 0,
            related_report_id INTEGER REFERENCES incident_reports(id),
            created_at TEXT NOT NULL
        );

        -- Review queue and dashboard counters filter on status
        CREATE INDEX IF NOT EXISTS idx_reports_status
            ON incident_reports(status, is_auto_processed);

        -- A reporter's own report list
        CREATE INDEX IF NOT EXISTS idx_reports_user
            ON incident_reports(user_id);

        -- Notification inbox lookups
        CREATE INDEX IF NOT EXISTS idx_notifications_user
            ON notifications(user_id, is_read);
        ",
    )
    .context("Failed to create database tables")?;

    // Record initial schema version if not already set
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    // Migration v2: store the scoring configuration each report was judged
    // with (JSON), so an automated decision can be replayed later.
    run_migration(conn, 2, |c| {
        c.execute_batch("ALTER TABLE incident_reports ADD COLUMN scoring_config TEXT;")
    })?;

    // Migration v3: the lost-and-found board
    run_migration(conn, 3, |c| {
        c.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS lost_found_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,      -- poster
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                email TEXT NOT NULL,           -- contact shown on the listing
                location_found TEXT NOT NULL,
                category TEXT NOT NULL,
                status TEXT NOT NULL,          -- Lost / Found / Claimed / Archived
                image_path TEXT,
                date_posted TEXT NOT NULL,
                archived_at TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_items_user
                ON lost_found_items(user_id);

            CREATE INDEX IF NOT EXISTS idx_items_status
                ON lost_found_items(status, category);
            ",
        )
    })?;

    Ok(())
}

/// Run a migration if it hasn't been applied yet.
/// The migration function receives the connection and should execute its SQL.
fn run_migration<F>(conn: &Connection, version: i64, migrate: F) -> Result<()>
where
    F: FnOnce(&Connection) -> rusqlite::Result<()>,
{
    let already_applied: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM schema_version WHERE version = ?1",
        [version],
        |row| row.get(0),
    )?;

    if !already_applied {
        migrate(conn).with_context(|| format!("Migration v{version} failed"))?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )?;
    }

    Ok(())
}

/// Count the number of tables in the database (useful for init confirmation).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}
