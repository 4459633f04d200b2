//! Configuration I/O (YAML schema)
//!
//! Defines the versioned YAML schema. Loading and export live in
//! `scheduler_config.rs` next to the fields they touch.

use serde::{Deserialize, Serialize};

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1). Optional only so a missing field can be
    /// reported as `ConfigError::MissingVersion`.
    #[serde(default)]
    pub version: Option<u32>,

    /// Base preset
    pub preset: String,

    /// Fine-grained overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<ConfigOverrides>,
}

/// Configuration overrides applied on top of the preset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_passes: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub complex_chain_threshold: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_workers: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_rayon: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_profile: Option<bool>,
}
