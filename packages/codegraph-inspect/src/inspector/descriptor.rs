//! Inspector descriptors
//!
//! Static metadata per inspector: name, required/produced tags, target kind and
//! priority. Immutable once registered.

use crate::domain::models::NodeKind;
use crate::errors::{InspectError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Node kind an inspector applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    FileArtifact,
    ClassArtifact,
    PackageArtifact,
    #[default]
    Any,
}

impl TargetKind {
    /// Check whether a node of `kind` is a valid target
    pub fn matches(&self, kind: NodeKind) -> bool {
        match self {
            Self::Any => true,
            Self::FileArtifact => kind == NodeKind::FileArtifact,
            Self::ClassArtifact => kind == NodeKind::ClassArtifact,
            Self::PackageArtifact => kind == NodeKind::PackageArtifact,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileArtifact => "file",
            Self::ClassArtifact => "class",
            Self::PackageArtifact => "package",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static inspector metadata
///
/// # Example
/// ```rust
/// use codegraph_inspect::{InspectorDescriptor, TargetKind};
///
/// let descriptor = InspectorDescriptor::new("java.type")
///     .requires("java.source")
///     .produces("declaration.type")
///     .target(TargetKind::FileArtifact)
///     .with_priority(10);
///
/// assert!(descriptor.required_tags().contains("java.source"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectorDescriptor {
    name: String,
    #[serde(default)]
    required_tags: BTreeSet<String>,
    #[serde(default)]
    produced_tags: BTreeSet<String>,
    #[serde(default)]
    target_kind: TargetKind,
    /// Higher runs earlier among eligible inspectors
    #[serde(default)]
    priority: i32,
}

impl InspectorDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required_tags: BTreeSet::new(),
            produced_tags: BTreeSet::new(),
            target_kind: TargetKind::Any,
            priority: 0,
        }
    }

    /// Add a required tag
    pub fn requires(mut self, tag: impl Into<String>) -> Self {
        self.required_tags.insert(tag.into());
        self
    }

    /// Add a produced tag
    pub fn produces(mut self, tag: impl Into<String>) -> Self {
        self.produced_tags.insert(tag.into());
        self
    }

    pub fn target(mut self, kind: TargetKind) -> Self {
        self.target_kind = kind;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required_tags(&self) -> &BTreeSet<String> {
        &self.required_tags
    }

    pub fn produced_tags(&self) -> &BTreeSet<String> {
        &self.produced_tags
    }

    pub fn target_kind(&self) -> TargetKind {
        self.target_kind
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// All required tags are present in `tags`
    pub fn is_satisfied_by(&self, tags: &BTreeSet<String>) -> bool {
        self.required_tags.iter().all(|tag| tags.contains(tag))
    }

    /// Tags this descriptor produces that `consumer` requires
    pub fn shared_tags(&self, consumer: &InspectorDescriptor) -> BTreeSet<String> {
        self.produced_tags
            .intersection(&consumer.required_tags)
            .cloned()
            .collect()
    }

    /// Reject malformed metadata
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(InspectError::invalid_descriptor(
                &self.name,
                "name must not be empty",
            ));
        }

        let empty_tag = self
            .required_tags
            .iter()
            .chain(self.produced_tags.iter())
            .any(|tag| tag.trim().is_empty());
        if empty_tag {
            return Err(InspectError::invalid_descriptor(
                &self.name,
                "tag names must not be empty",
            ));
        }

        Ok(())
    }
}
