// System status display: database size, schema, triage counters and the
// lost-and-found board.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::db::models::ItemFilter;
use crate::db::Database;
use crate::scoring::ScoringConfig;

/// Display system status to the terminal.
pub async fn show(db: &Arc<dyn Database>, db_display_path: &str, scoring: &ScoringConfig) -> Result<()> {
    let file_size = std::fs::metadata(Path::new(db_display_path))
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", db_display_path, file_size);
    println!("Tables: {}", db.table_count().await?);

    println!(
        "Scoring profile: {} (baseline {}, accept >= {}, reject < {})",
        scoring.name, scoring.baseline, scoring.accept_threshold, scoring.reject_threshold
    );

    let open_items = db.search_items(&ItemFilter::default()).await?.len();
    println!("Lost & found: {open_items} open listings");

    let stats = db.automation_stats().await?;
    if stats.total == 0 {
        println!("Reports: none yet");
        println!("  Run `iskoalert submit` to file one");
        return Ok(());
    }

    println!("Reports: {} total", stats.total);
    println!(
        "  Pending: {}  In progress: {}  Resolved: {}",
        stats.pending, stats.in_progress, stats.resolved
    );
    println!(
        "  Auto-accepted: {}  Auto-rejected: {}  Awaiting review: {}",
        stats.auto_accepted, stats.auto_rejected, stats.awaiting_review
    );
    println!(
        "  Automation rate: {:.1}%",
        stats.automation_rate() * 100.0
    );

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
