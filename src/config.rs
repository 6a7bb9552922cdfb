//! Engine tuning loaded from an optional JSON file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tuning for the static report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Airports with fewer scored flights are left out of the airport ranking.
    pub airport_min_volume: usize,
    pub top_airports: usize,
    pub airline_rankings_limit: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            airport_min_volume: 1000,
            top_airports: 5,
            airline_rankings_limit: 10,
        }
    }
}

/// Tuning for the interactive summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub airport_min_volume: usize,
    pub critical_airports: usize,
    /// Factor from sample size to estimated full volume (10 for a 10% sample).
    pub sample_multiplier: u64,
    /// Delay window, exclusive on both ends, for per-airline duration spreads.
    pub duration_window_min: (i32, i32),
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            airport_min_volume: 50,
            critical_airports: 12,
            sample_multiplier: 10,
            duration_window_min: (15, 180),
        }
    }
}

/// Engine settings, stored as a JSON object on disk:
/// ```json
/// {
///   "report": { "airport_min_volume": 1000, "top_airports": 5 },
///   "dashboard": { "airport_min_volume": 50, "sample_multiplier": 10 }
/// }
/// ```
/// Missing sections and fields fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub report: ReportConfig,
    pub dashboard: DashboardConfig,
}

impl EngineConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))
    }

    /// Loads `path` when given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}
