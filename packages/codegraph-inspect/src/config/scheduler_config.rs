//! Scheduler configuration
//!
//! Preset-based defaults, range validation and YAML loading for the pass
//! scheduler.

use super::{
    error::{ConfigError, ConfigResult},
    io::{ConfigExportV1, ConfigOverrides},
    preset::Preset,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Worker pool settings for node-level execution within a pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Number of workers (0=auto, 1..=256)
    pub num_workers: usize,

    /// Process nodes with a Rayon pool; when false every pass runs on the
    /// calling thread
    pub enable_rayon: bool,
}

impl ParallelConfig {
    /// Sequential execution on the calling thread
    pub fn sequential() -> Self {
        Self {
            num_workers: 1,
            enable_rayon: false,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.num_workers > 256 {
            return Err(ConfigError::range_with_hint(
                "num_workers",
                self.num_workers,
                0,
                256,
                "Number of workers must be reasonable (0=auto)",
            ));
        }
        Ok(())
    }

    /// Worker count after resolving `0` to the detected core count
    pub fn effective_workers(&self) -> usize {
        if !self.enable_rayon {
            return 1;
        }
        match self.num_workers {
            0 => num_cpus::get().max(1),
            n => n,
        }
    }

    /// True when passes should fan out over a thread pool
    pub fn is_parallel(&self) -> bool {
        self.effective_workers() > 1
    }
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_workers: 0,
            enable_rayon: true,
        }
    }
}

/// Pass scheduler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Preset these values were derived from
    pub preset: Preset,

    /// Pass ceiling for the analysis phase (1..=1000)
    pub max_passes: u32,

    /// Dependency chains with more inspectors than this are reported (1..=64)
    pub complex_chain_threshold: usize,

    /// Node-level parallelism
    pub parallel: ParallelConfig,

    /// Keep per-invocation timing records
    pub record_profile: bool,
}

impl SchedulerConfig {
    /// Start from a preset
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            max_passes: preset.max_passes(),
            complex_chain_threshold: preset.complex_chain_threshold(),
            parallel: ParallelConfig::default(),
            record_profile: true,
        }
    }

    /// Override the pass ceiling
    pub fn with_max_passes(mut self, max_passes: u32) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Override the complex chain threshold
    pub fn with_chain_threshold(mut self, threshold: usize) -> Self {
        self.complex_chain_threshold = threshold;
        self
    }

    /// Override parallelism
    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enable or disable profiling records
    pub fn with_profile(mut self, enabled: bool) -> Self {
        self.record_profile = enabled;
        self
    }

    /// Validate all ranges
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_passes < 1 || self.max_passes > 1000 {
            return Err(ConfigError::range_with_hint(
                "max_passes",
                self.max_passes,
                1,
                1000,
                "The analysis phase needs at least one pass",
            ));
        }

        if self.complex_chain_threshold < 1 || self.complex_chain_threshold > 64 {
            return Err(ConfigError::range_with_hint(
                "complex_chain_threshold",
                self.complex_chain_threshold,
                1,
                64,
                "Chain threshold counts inspectors along a dependency path",
            ));
        }

        self.parallel.validate()
    }

    /// Load from a YAML file (schema v1)
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load from a YAML string (schema v1)
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let export: ConfigExportV1 = serde_yaml::from_str(content)?;

        match export.version {
            None => return Err(ConfigError::MissingVersion),
            Some(1) => {}
            Some(found) => {
                return Err(ConfigError::UnsupportedVersion {
                    found,
                    supported: vec![1],
                })
            }
        }

        let preset = Preset::from_str(&export.preset)
            .map_err(|_| ConfigError::UnknownPreset(export.preset.clone()))?;

        let mut config = Self::preset(preset);
        if let Some(overrides) = export.overrides {
            config.apply_overrides(overrides);
        }

        config.validate()?;
        Ok(config)
    }

    /// Export as YAML (schema v1) with every field written as an override
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: Some(1),
            preset: self.preset.as_str().to_string(),
            overrides: Some(ConfigOverrides {
                max_passes: Some(self.max_passes),
                complex_chain_threshold: Some(self.complex_chain_threshold),
                num_workers: Some(self.parallel.num_workers),
                enable_rayon: Some(self.parallel.enable_rayon),
                record_profile: Some(self.record_profile),
            }),
        };
        Ok(serde_yaml::to_string(&export)?)
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(max_passes) = overrides.max_passes {
            self.max_passes = max_passes;
        }
        if let Some(threshold) = overrides.complex_chain_threshold {
            self.complex_chain_threshold = threshold;
        }
        if let Some(num_workers) = overrides.num_workers {
            self.parallel.num_workers = num_workers;
        }
        if let Some(enable_rayon) = overrides.enable_rayon {
            self.parallel.enable_rayon = enable_rayon;
        }
        if let Some(record_profile) = overrides.record_profile {
            self.record_profile = record_profile;
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::preset(Preset::Balanced)
    }
}
