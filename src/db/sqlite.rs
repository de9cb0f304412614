// SqliteDatabase: rusqlite backend implementing the Database trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// The lock is never held across .await points.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{
    AssessedReport, AutomationStats, IncidentReport, ItemFilter, LostFoundItem, NewLostFoundItem,
    NewNotification, Notification, ReportStatus,
};
use super::queries;
use super::traits::Database;

pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn insert_report(&self, report: &AssessedReport) -> Result<i64> {
        let conn = self.conn.lock().await;
        queries::insert_report(&conn, report)
    }

    async fn get_report(&self, id: i64) -> Result<Option<IncidentReport>> {
        let conn = self.conn.lock().await;
        queries::get_report(&conn, id)
    }

    async fn list_reports(&self, status: Option<ReportStatus>) -> Result<Vec<IncidentReport>> {
        let conn = self.conn.lock().await;
        queries::list_reports(&conn, status)
    }

    async fn list_user_reports(&self, user_id: i64) -> Result<Vec<IncidentReport>> {
        let conn = self.conn.lock().await;
        queries::list_user_reports(&conn, user_id)
    }

    async fn review_queue(
        &self,
        min_score: u8,
        max_score: u8,
        keyword: Option<&str>,
    ) -> Result<Vec<IncidentReport>> {
        let conn = self.conn.lock().await;
        queries::review_queue(&conn, min_score, max_score, keyword)
    }

    async fn update_report_status(
        &self,
        id: i64,
        status: ReportStatus,
        updated_at: &str,
    ) -> Result<bool> {
        let conn = self.conn.lock().await;
        queries::update_report_status(&conn, id, status, updated_at)
    }

    async fn accept_review_queue(&self) -> Result<Vec<i64>> {
        let conn = self.conn.lock().await;
        queries::accept_review_queue(&conn)
    }

    async fn automation_stats(&self) -> Result<AutomationStats> {
        let conn = self.conn.lock().await;
        queries::automation_stats(&conn)
    }

    async fn insert_notification(&self, notification: &NewNotification) -> Result<i64> {
        let conn = self.conn.lock().await;
        queries::insert_notification(&conn, notification)
    }

    async fn get_notifications(&self, user_id: i64) -> Result<Vec<Notification>> {
        let conn = self.conn.lock().await;
        queries::get_notifications(&conn, user_id)
    }

    async fn unread_count(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn.lock().await;
        queries::unread_count(&conn, user_id)
    }

    async fn mark_notification_read(&self, id: i64, user_id: i64) -> Result<bool> {
        let conn = self.conn.lock().await;
        queries::mark_notification_read(&conn, id, user_id)
    }

    async fn mark_all_read(&self, user_id: i64) -> Result<usize> {
        let conn = self.conn.lock().await;
        queries::mark_all_read(&conn, user_id)
    }

    async fn insert_item(&self, item: &NewLostFoundItem) -> Result<i64> {
        let conn = self.conn.lock().await;
        queries::insert_item(&conn, item)
    }

    async fn get_item(&self, id: i64) -> Result<Option<LostFoundItem>> {
        let conn = self.conn.lock().await;
        queries::get_item(&conn, id)
    }

    async fn search_items(&self, filter: &ItemFilter) -> Result<Vec<LostFoundItem>> {
        let conn = self.conn.lock().await;
        queries::search_items(&conn, filter)
    }

    async fn list_user_items(
        &self,
        user_id: i64,
        include_archived: bool,
    ) -> Result<Vec<LostFoundItem>> {
        let conn = self.conn.lock().await;
        queries::list_user_items(&conn, user_id, include_archived)
    }

    async fn update_item(&self, item: &LostFoundItem) -> Result<bool> {
        let conn = self.conn.lock().await;
        queries::update_item(&conn, item)
    }
}
