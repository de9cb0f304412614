use std::env;

use anyhow::{Context, Result};

use crate::scoring::weights::{ScoringConfig, CURRENT_PROFILE};

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    /// Scoring profile with any threshold overrides already applied
    pub scoring: ScoringConfig,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Everything has a default, so an empty environment yields the
    /// `current` profile and `./iskoalert.db`.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. `load` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("ISKOALERT_DB_PATH")
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| "./iskoalert.db".to_string());

        let profile = lookup("ISKOALERT_SCORING_PROFILE")
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| CURRENT_PROFILE.to_string());

        let accept = parse_threshold(&lookup, "ISKOALERT_ACCEPT_THRESHOLD")?;
        let reject = parse_threshold(&lookup, "ISKOALERT_REJECT_THRESHOLD")?;

        let scoring = ScoringConfig::from_profile(profile.trim())?.with_thresholds(accept, reject);
        scoring
            .validate()
            .with_context(|| format!("Invalid scoring configuration '{}'", scoring.name))?;

        Ok(Self { db_path, scoring })
    }
}

fn parse_threshold<F>(lookup: &F, key: &str) -> Result<Option<i32>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => {
            let value = raw
                .trim()
                .parse::<i32>()
                .with_context(|| format!("{key} must be an integer, got '{raw}'"))?;
            Ok(Some(value))
        }
        _ => Ok(None),
    }
}
