//! Analysis configuration.
//!
//! All policy knobs live here: the machine code table, the critical-stop
//! threshold, ranking depth, and the scheduled-time policy. Values load
//! from TOML with per-field defaults, so a config file only needs to name
//! what it overrides.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Machine code to display name. Codes absent from the table pass
    /// through unchanged rather than being rejected.
    #[serde(default = "default_machine_map")]
    pub machine_map: HashMap<String, String>,

    /// A stop is critical when its duration strictly exceeds this many hours.
    #[serde(default = "default_critical_threshold_hours")]
    pub critical_threshold_hours: f64,

    /// Entries kept in cause rankings.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Scheduled production hours per distinct calendar day, used when the
    /// caller does not supply an explicit baseline.
    #[serde(default = "default_scheduled_hours_per_day")]
    pub scheduled_hours_per_day: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            machine_map: default_machine_map(),
            critical_threshold_hours: default_critical_threshold_hours(),
            top_n: default_top_n(),
            scheduled_hours_per_day: default_scheduled_hours_per_day(),
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration from TOML content.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a configuration from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::from_toml_str(&content)?)
    }
}

fn default_machine_map() -> HashMap<String, String> {
    [
        ("78", "PET"),
        ("79", "TETRA 1000"),
        ("80", "TETRA 200"),
        ("89", "SIG 1000"),
        ("91", "SIG 200"),
    ]
    .iter()
    .map(|(code, name)| (code.to_string(), name.to_string()))
    .collect()
}

fn default_critical_threshold_hours() -> f64 {
    1.0
}

fn default_top_n() -> usize {
    10
}

fn default_scheduled_hours_per_day() -> f64 {
    24.0
}
