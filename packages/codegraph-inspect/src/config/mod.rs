//! Scheduler configuration
//!
//! Two tiers, following the rest of codegraph:
//! - Preset: `SchedulerConfig::preset(Preset::Fast)`
//! - YAML v1: `SchedulerConfig::from_yaml("inspect.yaml")`
//!
//! # Examples
//!
//! ```rust
//! use codegraph_inspect::config::{Preset, SchedulerConfig};
//!
//! let config = SchedulerConfig::preset(Preset::Fast).with_max_passes(5);
//! assert!(config.validate().is_ok());
//! ```

pub mod error;
pub mod io;
pub mod preset;
pub mod scheduler_config;

pub use error::{ConfigError, ConfigResult};
pub use io::{ConfigExportV1, ConfigOverrides};
pub use preset::Preset;
pub use scheduler_config::{ParallelConfig, SchedulerConfig};
