// Credibility scoring: heuristics, spam detection, per-dimension rules,
// and the orchestrator that combines them into a disposition.

pub mod credibility;
pub mod dimensions;
pub mod heuristics;
pub mod spam;
pub mod weights;

pub use credibility::{analyze_report, CredibilityAnalysis, Disposition};
pub use weights::ScoringConfig;
