// Database trait: backend-agnostic async interface for report storage.
//
// Implementor: SqliteDatabase (wraps rusqlite). All methods are async so a
// sync backend behind a Mutex and a native async backend fit the same
// interface; the submission pipeline and CLI only ever see `Arc<dyn Database>`.
//
// The trait mirrors the queries.rs function signatures.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{
    AssessedReport, AutomationStats, IncidentReport, ItemFilter, LostFoundItem, NewLostFoundItem,
    NewNotification, Notification, ReportStatus,
};

#[async_trait]
pub trait Database: Send + Sync {
    // --- Lifecycle ---

    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> Result<i64>;

    // --- Incident reports ---

    /// Store a scored report and return its id.
    async fn insert_report(&self, report: &AssessedReport) -> Result<i64>;

    async fn get_report(&self, id: i64) -> Result<Option<IncidentReport>>;

    /// All reports, newest first, optionally filtered by status.
    async fn list_reports(&self, status: Option<ReportStatus>) -> Result<Vec<IncidentReport>>;

    /// One reporter's reports, newest first.
    async fn list_user_reports(&self, user_id: i64) -> Result<Vec<IncidentReport>>;

    /// Pending, not auto-processed reports within an inclusive score range.
    async fn review_queue(
        &self,
        min_score: u8,
        max_score: u8,
        keyword: Option<&str>,
    ) -> Result<Vec<IncidentReport>>;

    /// Manual status override. Returns false if the report doesn't exist.
    async fn update_report_status(
        &self,
        id: i64,
        status: ReportStatus,
        updated_at: &str,
    ) -> Result<bool>;

    /// Accept the whole review queue; returns the accepted ids.
    async fn accept_review_queue(&self) -> Result<Vec<i64>>;

    async fn automation_stats(&self) -> Result<AutomationStats>;

    // --- Notifications ---

    async fn insert_notification(&self, notification: &NewNotification) -> Result<i64>;

    /// A user's notifications, newest first.
    async fn get_notifications(&self, user_id: i64) -> Result<Vec<Notification>>;

    async fn unread_count(&self, user_id: i64) -> Result<i64>;

    /// Returns false if the notification doesn't exist or belongs to someone else.
    async fn mark_notification_read(&self, id: i64, user_id: i64) -> Result<bool>;

    async fn mark_all_read(&self, user_id: i64) -> Result<usize>;

    // --- Lost and found ---

    /// Store a new listing and return its id.
    async fn insert_item(&self, item: &NewLostFoundItem) -> Result<i64>;

    async fn get_item(&self, id: i64) -> Result<Option<LostFoundItem>>;

    /// Listings matching a filter, newest first.
    async fn search_items(&self, filter: &ItemFilter) -> Result<Vec<LostFoundItem>>;

    /// One poster's listings, newest first.
    async fn list_user_items(
        &self,
        user_id: i64,
        include_archived: bool,
    ) -> Result<Vec<LostFoundItem>>;

    /// Write back an edited or archived listing. Returns false if it doesn't exist.
    async fn update_item(&self, item: &LostFoundItem) -> Result<bool>;
}
