use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::sync::Arc;
use tracing::info;

use iskoalert::config::Config;
use iskoalert::db::models::{
    IncidentType, ItemCategory, ItemEdit, ItemFilter, ItemStatus, NewLostFoundItem, ReportStatus,
    ReportSubmission, ScoreBand,
};
use iskoalert::db::Database;
use iskoalert::output::terminal;
use iskoalert::pipeline::lost_found::{self, Actor};
use iskoalert::pipeline::{review, submit};
use iskoalert::scoring::analyze_report;

/// IskoAlert: campus incident reporting with automated credibility triage.
///
/// Scores each submitted report for credibility, accepts or rejects the
/// clear-cut ones automatically, and queues the rest for an administrator.
#[derive(Parser)]
#[command(name = "iskoalert", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Fields shared by `analyze` and `submit`.
#[derive(clap::Args)]
struct ReportArgs {
    /// Short title of the incident
    #[arg(long)]
    title: String,

    /// What happened
    #[arg(long)]
    description: String,

    /// Where on campus (e.g. "Library - 2nd Floor")
    #[arg(long, default_value = "")]
    location: String,

    /// theft, hazard, medical-emergency, accident or others
    #[arg(long = "type", default_value = "others")]
    incident_type: String,

    /// Path of an attached photo
    #[arg(long)]
    image: Option<String>,

    /// Reporter's user id
    #[arg(long, default_value = "1")]
    user: i64,
}

impl ReportArgs {
    fn into_submission(self) -> Result<ReportSubmission> {
        Ok(ReportSubmission {
            user_id: self.user,
            title: self.title,
            description: self.description,
            campus_location: self.location,
            incident_type: self.incident_type.parse::<IncidentType>()?,
            image_path: self.image,
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Score a report without storing it
    Analyze {
        #[command(flatten)]
        report: ReportArgs,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Submit a report: score it, store it, notify the reporter
    Submit {
        #[command(flatten)]
        report: ReportArgs,
    },

    /// List reports
    Reports {
        /// Only reports with this status
        #[arg(long)]
        status: Option<String>,

        /// Only this reporter's reports
        #[arg(long)]
        user: Option<i64>,
    },

    /// Show one report with its analysis
    Show {
        id: i64,
    },

    /// Show reports waiting on manual review
    Queue {
        /// Credibility band: high, medium or low, judged by the thresholds
        /// each report was scored with
        #[arg(long)]
        band: Option<String>,

        /// Match title, description or location
        #[arg(long)]
        search: Option<String>,
    },

    /// Manually set a report's status
    Review {
        id: i64,

        /// pending, accepted, rejected, in-progress or resolved
        status: String,

        /// Note sent to the reporter (used as the rejection reason)
        #[arg(long)]
        remarks: Option<String>,
    },

    /// Accept every report in the review queue
    AcceptAll,

    /// Re-run the scorer on stored reports and compare with the stored decision
    Audit {
        /// Audit one report instead of all of them
        id: Option<i64>,
    },

    /// Show a user's notifications
    Notifications {
        #[arg(long, default_value = "1")]
        user: i64,

        /// Mark one notification read
        #[arg(long, conflicts_with = "read_all")]
        read: Option<i64>,

        /// Mark all of them read
        #[arg(long)]
        read_all: bool,
    },

    /// Lost-and-found board
    Items {
        #[command(subcommand)]
        command: ItemCommands,
    },

    /// Show system status (DB stats, scoring profile, automation counters)
    Status,
}

/// Who is acting: `--user <id>` for a poster, `--admin` for an administrator.
#[derive(clap::Args)]
struct ActorArgs {
    /// Acting user's id
    #[arg(long, required_unless_present = "admin", conflicts_with = "admin")]
    user: Option<i64>,

    /// Act as an administrator (may change any listing)
    #[arg(long)]
    admin: bool,
}

impl ActorArgs {
    fn actor(&self) -> Result<Actor> {
        match (self.admin, self.user) {
            (true, _) => Ok(Actor::Admin),
            (false, Some(user_id)) => Ok(Actor::User(user_id)),
            (false, None) => anyhow::bail!("Pass --user <id> or --admin"),
        }
    }
}

#[derive(Subcommand)]
enum ItemCommands {
    /// Post a lost or found item
    Post {
        /// Item name
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        /// Contact email shown on the listing
        #[arg(long)]
        email: String,

        /// Where it was lost or found
        #[arg(long, default_value = "")]
        location: String,

        /// electronics, documents, clothing, accessories, bags, keys or others
        #[arg(long, default_value = "others")]
        category: String,

        /// lost or found
        #[arg(long, default_value = "found")]
        status: String,

        /// Path of an attached photo
        #[arg(long)]
        image: Option<String>,

        /// Poster's user id
        #[arg(long, default_value = "1")]
        user: i64,
    },

    /// Browse the board
    List {
        /// Match title, description, location or contact email
        #[arg(long)]
        search: Option<String>,

        /// lost, found, claimed or archived
        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Include archived listings (administrator view)
        #[arg(long)]
        archived: bool,
    },

    /// Show one listing
    Show { id: i64 },

    /// One user's own listings
    Mine {
        #[arg(long, default_value = "1")]
        user: i64,

        /// Include archived listings
        #[arg(long)]
        archived: bool,
    },

    /// Edit a listing; omitted fields keep their value
    Edit {
        id: i64,

        #[command(flatten)]
        actor: ActorArgs,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// lost, found or claimed
        #[arg(long)]
        status: Option<String>,
    },

    /// Mark a listing lost, found or claimed
    Mark {
        id: i64,

        /// lost, found or claimed
        status: String,

        #[command(flatten)]
        actor: ActorArgs,
    },

    /// Archive a listing
    Archive {
        id: i64,

        #[command(flatten)]
        actor: ActorArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("iskoalert=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Init => {
            info!("Initializing IskoAlert database...");
            let db = iskoalert::db::initialize_sqlite(&config.db_path)?;
            let table_count = db.table_count().await?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("Scoring profile: {}", config.scoring.name);
            println!("\nIskoAlert is ready. Next step: iskoalert submit --help");
        }

        Commands::Analyze { report, json } => {
            let submission = report.into_submission()?;
            let analysis = analyze_report(&submission, &config.scoring);
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                terminal::display_analysis(&analysis);
                println!("\n{}", analysis.analysis_reason.dimmed());
            }
        }

        Commands::Submit { report } => {
            let submission = report.into_submission()?;
            let db = open_database(&config)?;
            let outcome = submit::submit_report(&db, &config.scoring, submission).await?;
            println!("Report #{} stored.", outcome.report_id);
            terminal::display_analysis(&outcome.analysis);
        }

        Commands::Reports { status, user } => {
            let db = open_database(&config)?;
            let status = status.as_deref().map(str::parse::<ReportStatus>).transpose()?;
            let mut reports = match user {
                Some(user_id) => db.list_user_reports(user_id).await?,
                None => db.list_reports(status).await?,
            };
            if user.is_some() {
                if let Some(status) = status {
                    reports.retain(|r| r.status == status);
                }
            }
            terminal::display_report_list(&reports);
        }

        Commands::Show { id } => {
            let db = open_database(&config)?;
            match db.get_report(id).await? {
                Some(report) => terminal::display_report_detail(&report),
                None => anyhow::bail!("Report #{id} not found"),
            }
        }

        Commands::Queue { band, search } => {
            let db = open_database(&config)?;
            let band = band.map(|b| b.parse::<ScoreBand>()).transpose()?;
            let queue = review::review_queue(&db, band, search.as_deref()).await?;
            terminal::display_review_queue(&queue);
        }

        Commands::Review {
            id,
            status,
            remarks,
        } => {
            let db = open_database(&config)?;
            let status = status.parse::<ReportStatus>()?;
            let report = review::update_report_status(&db, id, status, remarks.as_deref()).await?;
            println!(
                "Report #{} is now {} (credibility {}/100 unchanged).",
                report.id,
                terminal::colorize_status(report.status),
                report.credibility_score
            );
        }

        Commands::AcceptAll => {
            let db = open_database(&config)?;
            let accepted = review::bulk_accept_pending(&db).await?;
            if accepted.is_empty() {
                println!("Review queue is empty, nothing to accept.");
            } else {
                println!("Accepted {} reports.", accepted.len());
            }
        }

        Commands::Audit { id } => {
            let db = open_database(&config)?;
            let reports = match id {
                Some(id) => match db.get_report(id).await? {
                    Some(report) => vec![report],
                    None => anyhow::bail!("Report #{id} not found"),
                },
                None => db.list_reports(None).await?,
            };

            let mut mismatches = 0;
            for report in &reports {
                let replay = review::replay_analysis(report);
                if !replay.reproduced() {
                    mismatches += 1;
                }
                if id.is_some() || !replay.reproduced() {
                    terminal::display_replay(report, &replay);
                }
            }

            if mismatches == 0 {
                println!(
                    "{} all {} automated decisions reproduced",
                    "ok".green().bold(),
                    reports.len()
                );
            } else {
                println!(
                    "{} {} of {} decisions differ from the stored analysis",
                    "!!".red().bold(),
                    mismatches,
                    reports.len()
                );
            }
        }

        Commands::Notifications {
            user,
            read,
            read_all,
        } => {
            let db = open_database(&config)?;
            if let Some(notification_id) = read {
                if !db.mark_notification_read(notification_id, user).await? {
                    anyhow::bail!("Notification #{notification_id} not found for user {user}");
                }
            } else if read_all {
                let changed = db.mark_all_read(user).await?;
                println!("Marked {changed} notifications read.");
            }
            let notifications = db.get_notifications(user).await?;
            let unread = db.unread_count(user).await?;
            terminal::display_notifications(&notifications, unread);
        }

        Commands::Items { command } => {
            let db = open_database(&config)?;
            run_item_command(&db, command).await?;
        }

        Commands::Status => {
            let db = open_database(&config)?;
            iskoalert::status::show(&db, &config.db_path, &config.scoring).await?;
        }
    }

    Ok(())
}

/// Open the existing database.
fn open_database(config: &Config) -> Result<Arc<dyn Database>> {
    iskoalert::db::open_sqlite(&config.db_path)
}

async fn run_item_command(db: &Arc<dyn Database>, command: ItemCommands) -> Result<()> {
    match command {
        ItemCommands::Post {
            title,
            description,
            email,
            location,
            category,
            status,
            image,
            user,
        } => {
            let item = NewLostFoundItem {
                user_id: user,
                title,
                description,
                email,
                location_found: location,
                category: category.parse::<ItemCategory>()?,
                status: status.parse::<ItemStatus>()?,
                image_path: image,
            };
            let stored = lost_found::post_item(db, item).await?;
            println!("Item #{} posted.", stored.id);
            terminal::display_item_detail(&stored);
        }

        ItemCommands::List {
            search,
            status,
            category,
            archived,
        } => {
            let filter = ItemFilter {
                keyword: search,
                status: status.as_deref().map(str::parse::<ItemStatus>).transpose()?,
                category: category
                    .as_deref()
                    .map(str::parse::<ItemCategory>)
                    .transpose()?,
                include_archived: archived,
            };
            let items = db.search_items(&filter).await?;
            terminal::display_item_list(&items);
        }

        ItemCommands::Show { id } => match db.get_item(id).await? {
            Some(item) => terminal::display_item_detail(&item),
            None => anyhow::bail!("Item #{id} not found"),
        },

        ItemCommands::Mine { user, archived } => {
            let items = db.list_user_items(user, archived).await?;
            terminal::display_item_list(&items);
        }

        ItemCommands::Edit {
            id,
            actor,
            title,
            description,
            location,
            category,
            status,
        } => {
            let Some(current) = db.get_item(id).await? else {
                anyhow::bail!("Item #{id} not found");
            };
            let edit = ItemEdit {
                title: title.unwrap_or(current.title),
                description: description.unwrap_or(current.description),
                location_found: location.unwrap_or(current.location_found),
                category: match category {
                    Some(category) => category.parse::<ItemCategory>()?,
                    None => current.category,
                },
                status: match status {
                    Some(status) => status.parse::<ItemStatus>()?,
                    None => current.status,
                },
            };
            let updated = lost_found::edit_item(db, id, actor.actor()?, edit).await?;
            println!("Item #{} updated.", updated.id);
            terminal::display_item_detail(&updated);
        }

        ItemCommands::Mark { id, status, actor } => {
            let status = status.parse::<ItemStatus>()?;
            let updated = lost_found::change_item_status(db, id, actor.actor()?, status).await?;
            println!("Item #{} is now {}.", updated.id, updated.status);
        }

        ItemCommands::Archive { id, actor } => {
            let archived = lost_found::archive_item(db, id, actor.actor()?).await?;
            println!("Item #{} archived.", archived.id);
        }
    }
    Ok(())
}
