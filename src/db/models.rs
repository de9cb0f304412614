// Data models: the incident report as it moves from submission to the
// admin review queue, plus the notifications sent to reporters.
//
// The report is never mutated in place. A submission becomes an
// AssessedReport through `apply_analysis`, the database turns that into an
// IncidentReport with an id, and a manual override produces a new value via
// `IncidentReport::with_status`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::scoring::credibility::{CredibilityAnalysis, Disposition};
use crate::scoring::weights::ScoringConfig;

/// Kind of incident being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncidentType {
    Theft,
    Hazard,
    MedicalEmergency,
    Accident,
    Others,
}

impl IncidentType {
    /// Every variant in dropdown order.
    pub const ALL: [IncidentType; 5] = [
        IncidentType::Theft,
        IncidentType::Hazard,
        IncidentType::MedicalEmergency,
        IncidentType::Accident,
        IncidentType::Others,
    ];

    /// Stable identifier used in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentType::Theft => "Theft",
            IncidentType::Hazard => "Hazard",
            IncidentType::MedicalEmergency => "MedicalEmergency",
            IncidentType::Accident => "Accident",
            IncidentType::Others => "Others",
        }
    }

    /// Human-readable label for forms and terminal output.
    pub fn label(&self) -> &'static str {
        match self {
            IncidentType::MedicalEmergency => "Medical Emergency",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for IncidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for IncidentType {
    type Err = anyhow::Error;

    /// Accepts the stored identifier, the label, or kebab/snake case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "theft" => Ok(IncidentType::Theft),
            "hazard" => Ok(IncidentType::Hazard),
            "medicalemergency" | "medical" => Ok(IncidentType::MedicalEmergency),
            "accident" => Ok(IncidentType::Accident),
            "others" | "other" => Ok(IncidentType::Others),
            _ => anyhow::bail!(
                "Unknown incident type '{s}'. Expected one of: theft, hazard, medical-emergency, accident, others"
            ),
        }
    }
}

/// Where a report sits in the triage workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportStatus {
    Pending,
    Accepted,
    Rejected,
    InProgress,
    Resolved,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 5] = [
        ReportStatus::Pending,
        ReportStatus::Accepted,
        ReportStatus::Rejected,
        ReportStatus::InProgress,
        ReportStatus::Resolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::Accepted => "Accepted",
            ReportStatus::Rejected => "Rejected",
            ReportStatus::InProgress => "InProgress",
            ReportStatus::Resolved => "Resolved",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::InProgress => "In Progress",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ReportStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(ReportStatus::Pending),
            "accepted" => Ok(ReportStatus::Accepted),
            "rejected" => Ok(ReportStatus::Rejected),
            "inprogress" => Ok(ReportStatus::InProgress),
            "resolved" => Ok(ReportStatus::Resolved),
            _ => anyhow::bail!(
                "Unknown report status '{s}'. Expected one of: pending, accepted, rejected, in-progress, resolved"
            ),
        }
    }
}

/// A report as typed in by the student, before any scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSubmission {
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub campus_location: String,
    pub incident_type: IncidentType,
    /// Path of the uploaded photo, if the reporter attached one
    pub image_path: Option<String>,
}

impl ReportSubmission {
    /// The image path only if it is non-blank.
    pub fn photo(&self) -> Option<&str> {
        self.image_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// A scored submission, ready to be persisted.
///
/// Only `apply_analysis` can build one, so a report can never reach the
/// database without its credibility fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessedReport {
    pub submission: ReportSubmission,
    pub status: ReportStatus,
    pub credibility_score: u8,
    pub is_auto_processed: bool,
    pub analysis_reason: String,
    pub red_flags: Vec<String>,
    pub positive_signals: Vec<String>,
    pub scoring_config: ScoringConfig,
    sealed: (),
}

/// Copy a credibility analysis onto a submission.
///
/// Status comes from the recommended action alone; the report is
/// auto-processed exactly when no manual review is required. `config` must
/// be the configuration that produced `analysis`.
pub fn apply_analysis(
    submission: ReportSubmission,
    analysis: &CredibilityAnalysis,
    config: &ScoringConfig,
) -> AssessedReport {
    debug_assert_eq!(
        analysis.profile, config.name,
        "analysis was produced under a different scoring profile"
    );
    AssessedReport {
        submission,
        status: analysis.recommended_action.status(),
        credibility_score: analysis.credibility_score,
        is_auto_processed: !analysis.requires_manual_review,
        analysis_reason: analysis.analysis_reason.clone(),
        red_flags: analysis.red_flags.clone(),
        positive_signals: analysis.positive_signals.clone(),
        scoring_config: config.clone(),
        sealed: (),
    }
}

/// A persisted incident report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentReport {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub campus_location: String,
    pub incident_type: IncidentType,
    pub image_path: Option<String>,
    pub status: ReportStatus,
    pub credibility_score: u8,
    pub is_auto_processed: bool,
    pub analysis_reason: String,
    pub red_flags: Vec<String>,
    pub positive_signals: Vec<String>,
    /// The configuration the automated decision was made with
    pub scoring_config: ScoringConfig,
    pub created_at: String,
    pub updated_at: String,
}

impl IncidentReport {
    /// Manual override: a new status, everything from the automated
    /// analysis left exactly as it was.
    pub fn with_status(self, status: ReportStatus, updated_at: String) -> Self {
        Self {
            status,
            updated_at,
            ..self
        }
    }

    /// Rebuild the scorer input from the stored fields.
    pub fn submission(&self) -> ReportSubmission {
        ReportSubmission {
            user_id: self.user_id,
            title: self.title.clone(),
            description: self.description.clone(),
            campus_location: self.campus_location.clone(),
            incident_type: self.incident_type,
            image_path: self.image_path.clone(),
        }
    }

    /// Waiting on an administrator.
    pub fn awaiting_review(&self) -> bool {
        self.status == ReportStatus::Pending && !self.is_auto_processed
    }
}

/// Credibility band used to filter the review queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    /// Band a score falls in under the given thresholds. Lines up with
    /// `Disposition::from_score`: High is the accept band, Low the reject band.
    pub fn of(score: u8, config: &ScoringConfig) -> Self {
        match Disposition::from_score(score, config) {
            Disposition::Accepted => ScoreBand::High,
            Disposition::Pending => ScoreBand::Medium,
            Disposition::Rejected => ScoreBand::Low,
        }
    }

    /// Inclusive score range for this band, or `None` when the thresholds
    /// leave it empty.
    pub fn range(&self, config: &ScoringConfig) -> Option<(u8, u8)> {
        let accept = config.accept_threshold.clamp(0, 101);
        let reject = config.reject_threshold.clamp(0, 101);
        let (lo, hi) = match self {
            ScoreBand::High => (accept, 100),
            ScoreBand::Medium => (reject, accept - 1),
            ScoreBand::Low => (0, reject - 1),
        };
        (lo <= hi).then_some((lo as u8, hi as u8))
    }
}

impl FromStr for ScoreBand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(ScoreBand::High),
            "medium" => Ok(ScoreBand::Medium),
            "low" => Ok(ScoreBand::Low),
            _ => anyhow::bail!("Unknown credibility band '{s}'. Expected high, medium or low"),
        }
    }
}

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    ReportReceived,
    IncidentStatusUpdate,
    IncidentResolved,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::ReportReceived => "ReportReceived",
            NotificationKind::IncidentStatusUpdate => "IncidentStatusUpdate",
            NotificationKind::IncidentResolved => "IncidentResolved",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ReportReceived" => Ok(NotificationKind::ReportReceived),
            "IncidentStatusUpdate" => Ok(NotificationKind::IncidentStatusUpdate),
            "IncidentResolved" => Ok(NotificationKind::IncidentResolved),
            _ => anyhow::bail!("Unknown notification kind '{s}'"),
        }
    }
}

/// A notification about to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub related_report_id: Option<i64>,
}

/// A stored notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub is_read: bool,
    pub related_report_id: Option<i64>,
    pub created_at: String,
}

/// Dashboard counters for the automated triage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationStats {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub resolved: i64,
    pub auto_accepted: i64,
    pub auto_rejected: i64,
    pub awaiting_review: i64,
}

impl AutomationStats {
    /// Share of reports the scorer decided without an administrator.
    pub fn automation_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.auto_accepted + self.auto_rejected) as f64 / self.total as f64
    }
}

// --- Lost and found ---

/// What kind of thing a lost-and-found listing describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Electronics,
    Documents,
    Clothing,
    Accessories,
    Bags,
    Keys,
    Others,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 7] = [
        ItemCategory::Electronics,
        ItemCategory::Documents,
        ItemCategory::Clothing,
        ItemCategory::Accessories,
        ItemCategory::Bags,
        ItemCategory::Keys,
        ItemCategory::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::Electronics => "Electronics",
            ItemCategory::Documents => "Documents",
            ItemCategory::Clothing => "Clothing",
            ItemCategory::Accessories => "Accessories",
            ItemCategory::Bags => "Bags",
            ItemCategory::Keys => "Keys",
            ItemCategory::Others => "Others",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "electronics" => Ok(ItemCategory::Electronics),
            "documents" | "ids" => Ok(ItemCategory::Documents),
            "clothing" => Ok(ItemCategory::Clothing),
            "accessories" => Ok(ItemCategory::Accessories),
            "bags" | "bag" => Ok(ItemCategory::Bags),
            "keys" | "key" => Ok(ItemCategory::Keys),
            "others" | "other" => Ok(ItemCategory::Others),
            _ => anyhow::bail!(
                "Unknown item category '{s}'. Expected one of: electronics, documents, clothing, accessories, bags, keys, others"
            ),
        }
    }
}

/// Where a listing is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemStatus {
    Lost,
    Found,
    Claimed,
    Archived,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 4] = [
        ItemStatus::Lost,
        ItemStatus::Found,
        ItemStatus::Claimed,
        ItemStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Lost => "Lost",
            ItemStatus::Found => "Found",
            ItemStatus::Claimed => "Claimed",
            ItemStatus::Archived => "Archived",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lost" => Ok(ItemStatus::Lost),
            "found" => Ok(ItemStatus::Found),
            "claimed" => Ok(ItemStatus::Claimed),
            "archived" => Ok(ItemStatus::Archived),
            _ => anyhow::bail!(
                "Unknown item status '{s}'. Expected one of: lost, found, claimed, archived"
            ),
        }
    }
}

/// A listing as typed in by the student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLostFoundItem {
    pub user_id: i64,
    pub title: String,
    pub description: String,
    /// Contact address shown on the listing
    pub email: String,
    pub location_found: String,
    pub category: ItemCategory,
    /// Lost or Found; nothing else is valid on a new listing
    pub status: ItemStatus,
    pub image_path: Option<String>,
}

impl NewLostFoundItem {
    pub fn validate(&self) -> anyhow::Result<()> {
        require_text(&self.title, "Item name")?;
        require_text(&self.description, "Description")?;
        require_text(&self.email, "Email")?;
        if !matches!(self.status, ItemStatus::Lost | ItemStatus::Found) {
            anyhow::bail!("A new listing must be Lost or Found, not {}", self.status);
        }
        Ok(())
    }
}

/// Editable fields of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemEdit {
    pub title: String,
    pub description: String,
    pub location_found: String,
    pub category: ItemCategory,
    pub status: ItemStatus,
}

/// A stored lost-and-found listing.
///
/// Like `IncidentReport`, changes produce a new value; the caller writes it
/// back with `Database::update_item`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LostFoundItem {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub email: String,
    pub location_found: String,
    pub category: ItemCategory,
    pub status: ItemStatus,
    pub image_path: Option<String>,
    pub date_posted: String,
    pub archived_at: Option<String>,
}

impl LostFoundItem {
    pub fn is_archived(&self) -> bool {
        self.status == ItemStatus::Archived
    }

    /// Move to another live status (e.g. Found → Claimed).
    pub fn with_status(self, status: ItemStatus) -> anyhow::Result<Self> {
        if self.is_archived() {
            anyhow::bail!("Item #{} is archived and can no longer change", self.id);
        }
        if status == ItemStatus::Archived {
            anyhow::bail!("Use archive to archive item #{}", self.id);
        }
        if status == self.status {
            anyhow::bail!("Item is already {status}.");
        }
        Ok(Self { status, ..self })
    }

    /// Take the listing off the public board, recording when.
    pub fn archived(self, archived_at: String) -> anyhow::Result<Self> {
        if self.is_archived() {
            anyhow::bail!("Item already archived.");
        }
        Ok(Self {
            status: ItemStatus::Archived,
            archived_at: Some(archived_at),
            ..self
        })
    }

    /// Replace the editable fields.
    pub fn edited(self, edit: ItemEdit) -> anyhow::Result<Self> {
        if self.is_archived() {
            anyhow::bail!("Item #{} is archived and can no longer change", self.id);
        }
        if edit.status == ItemStatus::Archived {
            anyhow::bail!("Use archive to archive item #{}", self.id);
        }
        require_text(&edit.title, "Title")?;
        require_text(&edit.description, "Description")?;
        Ok(Self {
            title: edit.title,
            description: edit.description,
            location_found: edit.location_found,
            category: edit.category,
            status: edit.status,
            ..self
        })
    }
}

/// Filters for the lost-and-found board. The default shows every live
/// listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Matches title, description, location or contact email
    pub keyword: Option<String>,
    pub status: Option<ItemStatus>,
    pub category: Option<ItemCategory>,
    pub include_archived: bool,
}

fn require_text(value: &str, field: &str) -> anyhow::Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{field} is required.");
    }
    Ok(())
}
