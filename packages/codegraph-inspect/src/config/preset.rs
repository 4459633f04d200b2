//! Preset configurations
//!
//! Presets provide complete scheduler defaults for common use cases.

use serde::{Deserialize, Serialize};

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// CI/CD: few passes, tight chain threshold
    ///
    /// - max_passes=3
    /// - complex_chain_threshold=3
    Fast,

    /// Development default
    ///
    /// - max_passes=10
    /// - complex_chain_threshold=3
    #[default]
    Balanced,

    /// Full analysis of deep inspector chains
    ///
    /// - max_passes=50
    /// - complex_chain_threshold=5
    Thorough,
}

impl Preset {
    /// Parse preset from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "thorough" => Ok(Self::Thorough),
            _ => Err(format!(
                "Unknown preset '{}'. Valid presets: fast, balanced, thorough",
                s
            )),
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Thorough => "thorough",
        }
    }

    /// Pass ceiling for the iterated analysis phase
    pub fn max_passes(&self) -> u32 {
        match self {
            Self::Fast => 3,
            Self::Balanced => 10,
            Self::Thorough => 50,
        }
    }

    /// Inspector count above which a dependency chain is flagged
    pub fn complex_chain_threshold(&self) -> usize {
        match self {
            Self::Fast | Self::Balanced => 3,
            Self::Thorough => 5,
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
