//! Error types for codegraph-inspect
//!
//! Build-time errors (registry, descriptors, config) abort a run before any node
//! is touched. Inspector failures are recovered per invocation and only ever
//! show up as `NodeError`s on the affected node.

use crate::config::ConfigError;
use thiserror::Error;

/// Main error type for inspector scheduling
#[derive(Debug, Error)]
pub enum InspectError {
    /// Descriptor metadata is malformed
    #[error("Invalid inspector descriptor '{name}': {reason}")]
    InvalidDescriptor { name: String, reason: String },

    /// Two inspectors registered under the same name
    #[error("Inspector '{0}' is registered more than once")]
    DuplicateInspector(String),

    /// An inspector returned an error for a node
    #[error("Inspector '{inspector}' failed on '{node}': {reason}")]
    InspectorFailed {
        inspector: String,
        node: String,
        reason: String,
    },

    /// An inspector panicked while inspecting a node
    #[error("Inspector '{inspector}' panicked on '{node}': {reason}")]
    InspectorPanicked {
        inspector: String,
        node: String,
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Internal error (worker pool setup etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl InspectError {
    /// Create an invalid descriptor error
    pub fn invalid_descriptor(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an inspector failure, usually from inside `Inspector::inspect`
    pub fn failed(
        inspector: impl Into<String>,
        node: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InspectorFailed {
            inspector: inspector.into(),
            node: node.into(),
            reason: reason.into(),
        }
    }

    /// Create an internal error
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal(reason.into())
    }

    /// Errors raised while building the registry or loading config.
    ///
    /// These are the only errors that abort a run.
    pub fn is_build_time(&self) -> bool {
        matches!(
            self,
            Self::InvalidDescriptor { .. }
                | Self::DuplicateInspector(_)
                | Self::Config(_)
                | Self::Internal(_)
        )
    }

    /// Get error category for logs
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidDescriptor { .. } => "descriptor",
            Self::DuplicateInspector(_) => "registry",
            Self::InspectorFailed { .. } => "inspector",
            Self::InspectorPanicked { .. } => "panic",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for codegraph-inspect operations
pub type Result<T> = std::result::Result<T, InspectError>;
