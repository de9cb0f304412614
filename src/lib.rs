// IskoAlert: campus incident reporting with automated credibility triage.
//
// This is the library root. Each module corresponds to a major subsystem:
// scoring decides, db remembers, pipeline ties a report's lifecycle
// together, output and status talk to the terminal.

pub mod config;
pub mod db;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod status;
