//! Analyzed artifacts and their typed state
//!
//! A `Node` carries three separate pieces of state: typed properties, numeric
//! metrics (max-merge capable) and presence-only tags. Nodes are owned by the
//! storage layer; inspectors only reach them through `NodeDecorator`.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Kind of artifact a node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Plain source or resource file
    FileArtifact,
    /// Compiled unit (class file, object)
    ClassArtifact,
    /// Package or archive
    PackageArtifact,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileArtifact => "file",
            Self::ClassArtifact => "class",
            Self::PackageArtifact => "package",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordinal complexity scale used for max-merging across inspectors
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComplexityLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl ComplexityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "NONE" => Some(Self::None),
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            "CRITICAL" => Some(Self::Critical),
            _ => None,
        }
    }
}

/// Typed property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Complexity(ComplexityLevel),
    List(Vec<String>),
}

impl PropertyValue {
    /// Name of the value's type, for logs and error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Complexity(_) => "complexity",
            Self::List(_) => "list",
        }
    }

    fn hash_into<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Bool(v) => v.hash(state),
            Self::Int(v) => v.hash(state),
            Self::Float(v) => v.to_bits().hash(state),
            Self::Text(v) => v.hash(state),
            Self::Complexity(v) => v.hash(state),
            Self::List(v) => v.hash(state),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<usize> for PropertyValue {
    fn from(v: usize) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<ComplexityLevel> for PropertyValue {
    fn from(v: ComplexityLevel) -> Self {
        Self::Complexity(v)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(v: Vec<String>) -> Self {
        Self::List(v)
    }
}

/// Conversion out of a `PropertyValue` for typed reads
pub trait FromProperty: Sized {
    fn from_property(value: &PropertyValue) -> Option<Self>;
}

impl FromProperty for bool {
    fn from_property(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromProperty for i64 {
    fn from_property(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromProperty for f64 {
    fn from_property(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Float(v) => Some(*v),
            PropertyValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl FromProperty for String {
    fn from_property(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Text(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromProperty for ComplexityLevel {
    fn from_property(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Complexity(v) => Some(*v),
            PropertyValue::Text(v) => ComplexityLevel::from_str(v),
            _ => None,
        }
    }
}

impl FromProperty for Vec<String> {
    fn from_property(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::List(v) => Some(v.clone()),
            _ => None,
        }
    }
}

/// Error recorded on a node by an inspector or by the scheduler on its behalf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeError {
    /// Inspector that produced the error, if known
    pub inspector: Option<String>,
    pub message: String,
}

impl NodeError {
    pub fn new(inspector: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            inspector: inspector.map(str::to_string),
            message: message.into(),
        }
    }
}

/// 64-bit fingerprint of a node's tags, properties and metrics
pub type NodeStateHash = u64;

/// An analyzed artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: String,
    kind: NodeKind,
    properties: BTreeMap<String, PropertyValue>,
    metrics: BTreeMap<String, f64>,
    tags: BTreeSet<String>,
    errors: Vec<NodeError>,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            properties: BTreeMap::new(),
            metrics: BTreeMap::new(),
            tags: BTreeSet::new(),
            errors: Vec::new(),
        }
    }

    /// Seed a tag at discovery time
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Seed a property at discovery time
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn properties(&self) -> &BTreeMap<String, PropertyValue> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn metrics(&self) -> &BTreeMap<String, f64> {
        &self.metrics
    }

    pub fn metric(&self, key: &str) -> Option<f64> {
        self.metrics.get(key).copied()
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn errors(&self) -> &[NodeError] {
        &self.errors
    }

    /// Whole-node fingerprint used for convergence checks.
    ///
    /// Errors are excluded: recording a failure must not keep a phase iterating.
    pub fn state_hash(&self) -> NodeStateHash {
        let mut hasher = DefaultHasher::new();
        self.tags.len().hash(&mut hasher);
        for tag in &self.tags {
            tag.hash(&mut hasher);
        }
        self.properties.len().hash(&mut hasher);
        for (key, value) in &self.properties {
            key.hash(&mut hasher);
            value.hash_into(&mut hasher);
        }
        self.metrics.len().hash(&mut hasher);
        for (key, value) in &self.metrics {
            key.hash(&mut hasher);
            value.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }

    // Mutation is crate-private; inspectors go through NodeDecorator.

    pub(crate) fn insert_property(&mut self, key: String, value: PropertyValue) {
        self.properties.insert(key, value);
    }

    pub(crate) fn remove_property(&mut self, key: &str) -> Option<PropertyValue> {
        self.properties.remove(key)
    }

    pub(crate) fn insert_metric(&mut self, key: String, value: f64) {
        self.metrics.insert(key, value);
    }

    pub(crate) fn insert_tag(&mut self, tag: String) -> bool {
        self.tags.insert(tag)
    }

    pub(crate) fn remove_tag(&mut self, tag: &str) -> bool {
        self.tags.remove(tag)
    }

    pub(crate) fn push_error(&mut self, error: NodeError) {
        self.errors.push(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_hash_tracks_tags_properties_metrics() {
        let base = Node::new("a.rs", NodeKind::FileArtifact);
        let h0 = base.state_hash();

        let mut tagged = base.clone();
        tagged.insert_tag("source".into());
        assert_ne!(tagged.state_hash(), h0);

        let mut with_prop = base.clone();
        with_prop.insert_property("lines.count".into(), PropertyValue::Int(10));
        assert_ne!(with_prop.state_hash(), h0);

        let mut with_metric = base.clone();
        with_metric.insert_metric("size".into(), 1.5);
        assert_ne!(with_metric.state_hash(), h0);
    }

    #[test]
    fn test_state_hash_ignores_errors() {
        let mut node = Node::new("a.rs", NodeKind::FileArtifact);
        let before = node.state_hash();
        node.push_error(NodeError::new(Some("cloc"), "boom"));
        assert_eq!(node.state_hash(), before);
    }

    #[test]
    fn test_state_hash_distinguishes_value_types() {
        let a = Node::new("x", NodeKind::FileArtifact).with_property("k", 1i64);
        let b = Node::new("x", NodeKind::FileArtifact).with_property("k", 1.0f64);
        assert_ne!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn test_complexity_ordering() {
        assert!(ComplexityLevel::None < ComplexityLevel::Low);
        assert!(ComplexityLevel::High < ComplexityLevel::Critical);
        assert_eq!(ComplexityLevel::from_str("medium"), Some(ComplexityLevel::Medium));
        assert_eq!(ComplexityLevel::from_str("extreme"), None);
    }

    #[test]
    fn test_typed_reads() {
        assert_eq!(f64::from_property(&PropertyValue::Int(3)), Some(3.0));
        assert_eq!(i64::from_property(&PropertyValue::Float(3.0)), None);
        assert_eq!(
            ComplexityLevel::from_property(&PropertyValue::Text("high".into())),
            Some(ComplexityLevel::High)
        );
    }
}
