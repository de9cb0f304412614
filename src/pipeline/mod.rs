// Report lifecycle: what happens to a report after the scorer has looked
// at it: persistence, reporter notifications, manual overrides and replay.
// The lost-and-found board lives alongside it.

pub mod lost_found;
pub mod notices;
pub mod review;
pub mod submit;
