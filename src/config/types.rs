//! Typed view of the configuration document
//!
//! Every field is optional and unknown keys are ignored, so documents written
//! by newer versions (or edited by hand) still load.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// ARA server URL
    #[serde(default)]
    pub server: Option<String>,

    /// Project code on the server
    #[serde(default)]
    pub project: Option<String>,

    /// Branch of the cycle being recorded
    #[serde(default)]
    pub branch: Option<String>,

    /// Cycle name (e.g. "day", "night")
    #[serde(default)]
    pub cycle: Option<String>,

    /// Whether a failed quality check blocks the cycle
    #[serde(default)]
    pub blocking_validation: Option<bool>,

    /// Quality thresholds per test type
    #[serde(default)]
    pub thresholds: BTreeMap<String, QualityThreshold>,

    /// Platform rules per country
    #[serde(default)]
    pub rules: BTreeMap<String, Vec<PlatformRule>>,

    /// Version under test
    #[serde(default)]
    pub version: Option<VersionInfo>,
}

impl Config {
    /// Timestamp partitioning generated output, if configured
    pub fn version_millis(&self) -> Option<u64> {
        self.version.as_ref().and_then(|v| v.millis)
    }

    /// Blocking validation defaults to on
    pub fn is_blocking(&self) -> bool {
        self.blocking_validation.unwrap_or(true)
    }
}

/// Success percentages under which a test type is flagged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityThreshold {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<u32>,
}

/// Which executions of a country take part in a cycle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity_tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_types: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocking_validation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_in_thresholds: Option<bool>,
}

/// Version descriptor
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionInfo {
    /// Version label, e.g. a release number or commit id
    #[serde(default)]
    pub name: Option<String>,
    /// Release the version belongs to
    #[serde(default)]
    pub release: Option<String>,
    /// UNIX milliseconds at which the version was built
    #[serde(default)]
    pub millis: Option<u64>,
}
