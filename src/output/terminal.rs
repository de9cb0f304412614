// Colored terminal output for credibility analyses, report lists, the
// review queue and the lost-and-found board.
//
// main.rs does the database work and hands the results here for display.

use colored::Colorize;

use crate::db::models::{IncidentReport, ItemStatus, LostFoundItem, Notification, ReportStatus};
use crate::pipeline::review::ReplayOutcome;
use crate::scoring::{CredibilityAnalysis, Disposition};

/// Display the result of scoring one submission.
pub fn display_analysis(analysis: &CredibilityAnalysis) {
    println!("\n{}", "=== Credibility Analysis ===".bold());
    println!(
        "  Score: {}  ->  {}",
        colorize_score(analysis.credibility_score, analysis.recommended_action),
        colorize_disposition(analysis.recommended_action)
    );
    println!("  Profile: {}", analysis.profile.dimmed());
    if analysis.is_spam {
        println!("  {} flagged as likely spam", "!!".red().bold());
    }
    display_signal_lists(&analysis.positive_signals, &analysis.red_flags);
}

/// Display a table of reports, newest first.
pub fn display_report_list(reports: &[IncidentReport]) {
    if reports.is_empty() {
        println!("No reports found.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Incident Reports ({}) ===", reports.len()).bold()
    );
    println!();
    println!(
        "  {:>5}  {:<36} {:<18} {:>5}  {:<11} {:<5}",
        "ID".dimmed(),
        "Title".dimmed(),
        "Type".dimmed(),
        "Score".dimmed(),
        "Status".dimmed(),
        "Auto".dimmed(),
    );
    println!("  {}", "-".repeat(88).dimmed());

    for report in reports {
        println!(
            "  {:>5}  {:<36} {:<18} {:>5}  {:<11} {:<5}",
            report.id,
            super::truncate_chars(&report.title, 33),
            report.incident_type.label(),
            report.credibility_score,
            colorize_status(report.status),
            if report.is_auto_processed { "yes" } else { "no" },
        );
    }
    println!();
}

/// Display one report with its full audit trail.
pub fn display_report_detail(report: &IncidentReport) {
    println!(
        "\n{}",
        format!("=== Report #{}: {} ===", report.id, report.title).bold()
    );
    println!("  Reporter: user {}", report.user_id);
    println!("  Type: {}", report.incident_type.label());
    println!("  Location: {}", display_or_dash(&report.campus_location));
    println!(
        "  Photo: {}",
        report.image_path.as_deref().unwrap_or("none").dimmed()
    );
    println!("  Status: {}", colorize_status(report.status));
    println!(
        "  Credibility: {}/100 ({})",
        report.credibility_score,
        if report.is_auto_processed {
            "decided automatically"
        } else {
            "manual review"
        }
    );
    println!("  Scored with: {}", report.scoring_config.name.dimmed());
    println!(
        "  Filed: {}  Updated: {}",
        report.created_at, report.updated_at
    );

    println!("\n  Description:");
    for line in report.description.lines() {
        println!("    {line}");
    }

    display_signal_lists(&report.positive_signals, &report.red_flags);

    println!("\n  Analysis:");
    for line in report.analysis_reason.lines() {
        println!("    {}", line.dimmed());
    }
    println!();
}

/// Display the manual review queue.
pub fn display_review_queue(reports: &[IncidentReport]) {
    if reports.is_empty() {
        println!("Review queue is empty.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Awaiting Review ({} reports) ===", reports.len()).bold()
    );
    println!();

    for report in reports {
        println!(
            "  #{:<5} [{:>3}] {}",
            report.id,
            report.credibility_score,
            report.title.bold()
        );
        println!(
            "         {} @ {}  {}",
            report.incident_type.label(),
            display_or_dash(&report.campus_location),
            report.created_at.dimmed()
        );
        if let Some(flag) = report.red_flags.first() {
            let more = report.red_flags.len() - 1;
            if more > 0 {
                println!("         {} {} (+{more} more)", "!".yellow(), flag);
            } else {
                println!("         {} {}", "!".yellow(), flag);
            }
        }
    }
    println!();
}

/// Display a replay of the automated decision.
pub fn display_replay(report: &IncidentReport, replay: &ReplayOutcome) {
    println!(
        "\n{}",
        format!("=== Audit for Report #{} ===", report.id).bold()
    );
    println!("  Profile: {}", report.scoring_config.name);
    println!(
        "  Stored:   {:>3}  {}",
        replay.stored_score,
        colorize_disposition(replay.stored_action)
    );
    println!(
        "  Replayed: {:>3}  {}",
        replay.replayed.credibility_score,
        colorize_disposition(replay.replayed.recommended_action)
    );

    if replay.reproduced() {
        println!("  {} decision reproduced", "ok".green().bold());
    } else {
        println!(
            "  {} decision differs from the stored one",
            "!!".red().bold()
        );
    }

    if report.status != replay.stored_action.status() {
        println!(
            "  Current status {} was set by an administrator",
            colorize_status(report.status)
        );
    }
    println!();
}

/// Display a user's notification inbox.
pub fn display_notifications(notifications: &[Notification], unread: i64) {
    if notifications.is_empty() {
        println!("No notifications.");
        return;
    }

    println!(
        "\n{}",
        format!(
            "=== Notifications ({} total, {} unread) ===",
            notifications.len(),
            unread
        )
        .bold()
    );
    println!();

    for n in notifications {
        let marker = if n.is_read {
            " ".normal()
        } else {
            "*".cyan().bold()
        };
        println!("  {} [{}] {}", marker, n.id, n.title.bold());
        println!("      {}", n.message);
        println!("      {}", n.created_at.dimmed());
    }
    println!();
}

/// Display lost-and-found listings.
pub fn display_item_list(items: &[LostFoundItem]) {
    if items.is_empty() {
        println!("No listings found.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Lost & Found ({} listings) ===", items.len()).bold()
    );
    println!();

    for item in items {
        println!(
            "  #{:<5} {} {}",
            item.id,
            colorize_item_status(item.status),
            item.title.bold()
        );
        println!(
            "         {} @ {}  {}",
            item.category,
            display_or_dash(&item.location_found),
            item.date_posted.dimmed()
        );
        println!("         {}", super::truncate_chars(&item.description, 70).dimmed());
    }
    println!();
}

/// Display one listing in full.
pub fn display_item_detail(item: &LostFoundItem) {
    println!(
        "\n{}",
        format!("=== Item #{}: {} ===", item.id, item.title).bold()
    );
    println!("  Status: {}", colorize_item_status(item.status));
    println!("  Category: {}", item.category);
    println!("  Location: {}", display_or_dash(&item.location_found));
    println!("  Contact: {} (user {})", item.email, item.user_id);
    println!(
        "  Photo: {}",
        item.image_path.as_deref().unwrap_or("none").dimmed()
    );
    println!("  Posted: {}", item.date_posted);
    if let Some(archived_at) = &item.archived_at {
        println!("  Archived: {archived_at}");
    }
    println!("\n  Description:");
    for line in item.description.lines() {
        println!("    {line}");
    }
    println!();
}

fn colorize_item_status(status: ItemStatus) -> colored::ColoredString {
    match status {
        ItemStatus::Lost => status.as_str().yellow(),
        ItemStatus::Found => status.as_str().cyan(),
        ItemStatus::Claimed => status.as_str().green(),
        ItemStatus::Archived => status.as_str().dimmed(),
    }
}

fn display_signal_lists(positive_signals: &[String], red_flags: &[String]) {
    if !positive_signals.is_empty() {
        println!("\n  Positive signals:");
        for signal in positive_signals {
            println!("    {} {}", "+".green(), signal);
        }
    }
    if !red_flags.is_empty() {
        println!("\n  Red flags:");
        for flag in red_flags {
            println!("    {} {}", "-".red(), flag);
        }
    }
}

fn display_or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

fn colorize_score(score: u8, action: Disposition) -> colored::ColoredString {
    let text = format!("{score}/100");
    match action {
        Disposition::Accepted => text.green().bold(),
        Disposition::Pending => text.yellow().bold(),
        Disposition::Rejected => text.red().bold(),
    }
}

/// Colorize a recommended action.
pub fn colorize_disposition(action: Disposition) -> colored::ColoredString {
    match action {
        Disposition::Accepted => action.as_str().green(),
        Disposition::Pending => action.as_str().yellow(),
        Disposition::Rejected => action.as_str().red(),
    }
}

/// Colorize a report status.
pub fn colorize_status(status: ReportStatus) -> colored::ColoredString {
    match status {
        ReportStatus::Pending => status.label().yellow(),
        ReportStatus::Accepted => status.label().green(),
        ReportStatus::Rejected => status.label().red(),
        ReportStatus::InProgress => status.label().cyan(),
        ReportStatus::Resolved => status.label().dimmed(),
    }
}
