//! Node decorator
//!
//! The only write path from an inspector into a node. A decorator borrows the
//! node exclusively for one invocation, so two inspectors can never mutate the
//! same node at the same time.

use crate::domain::models::{ComplexityLevel, FromProperty, Node, NodeError, NodeKind, PropertyValue};
use std::collections::BTreeSet;
use tracing::trace;

pub struct NodeDecorator<'a> {
    node: &'a mut Node,
    inspector: &'a str,
}

impl<'a> NodeDecorator<'a> {
    pub fn new(node: &'a mut Node, inspector: &'a str) -> Self {
        Self { node, inspector }
    }

    /// Read-only view of the node
    pub fn node(&self) -> &Node {
        self.node
    }

    pub fn id(&self) -> &str {
        self.node.id()
    }

    pub fn kind(&self) -> NodeKind {
        self.node.kind()
    }

    /// Name of the inspector this decorator was handed to
    pub fn inspector(&self) -> &str {
        self.inspector
    }

    // ═══════════════════════════════════════════════════════════════
    // Properties
    // ═══════════════════════════════════════════════════════════════

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.node.insert_property(key.into(), value.into());
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.node.property(key)
    }

    /// Typed read; `None` when absent or of another type
    pub fn get_property<T: FromProperty>(&self, key: &str) -> Option<T> {
        self.node.property(key).and_then(T::from_property)
    }

    /// Typed read with a fallback
    pub fn get_property_or<T: FromProperty>(&self, key: &str, default: T) -> T {
        self.get_property(key).unwrap_or(default)
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get_property_or(key, default)
    }

    pub fn get_float(&self, key: &str, default: f64) -> f64 {
        self.get_property_or(key, default)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get_property_or(key, default)
    }

    pub fn get_text(&self, key: &str) -> Option<String> {
        self.get_property(key)
    }

    pub fn remove_property(&mut self, key: &str) -> Option<PropertyValue> {
        self.node.remove_property(key)
    }

    /// Boolean OR with the existing value; absent counts as unset
    pub fn or_property(&mut self, key: impl Into<String>, value: bool) {
        let key = key.into();
        let merged = self.get_property::<bool>(&key).map_or(value, |old| old || value);
        self.node.insert_property(key, PropertyValue::Bool(merged));
    }

    /// Boolean AND with the existing value; absent counts as unset
    pub fn and_property(&mut self, key: impl Into<String>, value: bool) {
        let key = key.into();
        let merged = self.get_property::<bool>(&key).map_or(value, |old| old && value);
        self.node.insert_property(key, PropertyValue::Bool(merged));
    }

    /// Numeric max-merge on a property; a non-numeric old value is replaced
    pub fn set_max_property(&mut self, key: impl Into<String>, value: f64) {
        let key = key.into();
        match self.get_property::<f64>(&key) {
            Some(old) if old >= value => {}
            _ => self.node.insert_property(key, PropertyValue::Float(value)),
        }
    }

    /// Keep the highest complexity level reported by any inspector
    pub fn set_max_complexity_property(&mut self, key: impl Into<String>, level: ComplexityLevel) {
        let key = key.into();
        let current = self.get_property::<ComplexityLevel>(&key);
        if current.map_or(true, |old| level > old) {
            self.node.insert_property(key, PropertyValue::Complexity(level));
        }
    }

    // ═══════════════════════════════════════════════════════════════
    // Metrics
    // ═══════════════════════════════════════════════════════════════

    pub fn set_metric(&mut self, key: impl Into<String>, value: f64) {
        self.node.insert_metric(key.into(), value);
    }

    pub fn metric(&self, key: &str) -> Option<f64> {
        self.node.metric(key)
    }

    /// Monotonic max-merge; a lower value leaves the metric untouched
    pub fn set_max_metric(&mut self, key: impl Into<String>, value: f64) {
        let key = key.into();
        match self.node.metric(&key) {
            Some(old) if old >= value => {}
            _ => self.node.insert_metric(key, value),
        }
    }

    // ═══════════════════════════════════════════════════════════════
    // Tags
    // ═══════════════════════════════════════════════════════════════

    pub fn enable_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if self.node.insert_tag(tag.clone()) {
            trace!(node = self.node.id(), inspector = self.inspector, tag = %tag, "tag enabled");
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.node.has_tag(tag)
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        self.node.remove_tag(tag)
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        self.node.tags()
    }

    // ═══════════════════════════════════════════════════════════════
    // Errors
    // ═══════════════════════════════════════════════════════════════

    /// Record an unexpected failure on the node
    pub fn error(&mut self, message: impl Into<String>) {
        self.node
            .push_error(NodeError::new(Some(self.inspector), message));
    }

    /// Record an error value on the node
    pub fn error_from(&mut self, error: &dyn std::error::Error) {
        self.error(error.to_string());
    }

    pub fn errors(&self) -> &[NodeError] {
        self.node.errors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> Node {
        Node::new("src/Main.java", NodeKind::FileArtifact)
    }

    #[test]
    fn test_properties_and_typed_reads() {
        let mut node = node();
        let mut decorator = NodeDecorator::new(&mut node, "cloc");
        decorator.set_property("lines.count", 120i64);
        decorator.set_property("language", "java");

        assert_eq!(decorator.get_int("lines.count", 0), 120);
        assert_eq!(decorator.get_int("missing", 7), 7);
        assert_eq!(decorator.get_float("lines.count", 0.0), 120.0);
        assert_eq!(decorator.get_text("language").as_deref(), Some("java"));
        assert!(!decorator.get_bool("language", false));
    }

    #[test]
    fn test_max_metric_is_monotonic() {
        let mut node = node();
        let mut decorator = NodeDecorator::new(&mut node, "size");
        decorator.set_max_metric("size", 10.0);
        decorator.set_max_metric("size", 4.0);
        assert_eq!(decorator.metric("size"), Some(10.0));
        decorator.set_max_metric("size", 12.5);
        assert_eq!(decorator.metric("size"), Some(12.5));
    }

    #[test]
    fn test_max_property_keeps_highest() {
        let mut node = node();
        let mut decorator = NodeDecorator::new(&mut node, "size");
        decorator.set_property("depth", 3i64);
        decorator.set_max_property("depth", 2.0);
        assert_eq!(decorator.get_int("depth", 0), 3);
        decorator.set_max_property("depth", 5.0);
        assert_eq!(decorator.get_float("depth", 0.0), 5.0);
    }

    #[test]
    fn test_boolean_aggregation() {
        let mut node = node();
        let mut decorator = NodeDecorator::new(&mut node, "flags");
        decorator.or_property("generated", false);
        assert!(!decorator.get_bool("generated", true));
        decorator.or_property("generated", true);
        decorator.or_property("generated", false);
        assert!(decorator.get_bool("generated", false));

        decorator.and_property("clean", true);
        decorator.and_property("clean", false);
        decorator.and_property("clean", true);
        assert!(!decorator.get_bool("clean", true));
    }

    #[test]
    fn test_max_complexity() {
        let mut node = node();
        let mut decorator = NodeDecorator::new(&mut node, "complexity");
        decorator.set_max_complexity_property("complexity", ComplexityLevel::Medium);
        decorator.set_max_complexity_property("complexity", ComplexityLevel::Low);
        assert_eq!(
            decorator.get_property::<ComplexityLevel>("complexity"),
            Some(ComplexityLevel::Medium)
        );
        decorator.set_max_complexity_property("complexity", ComplexityLevel::Critical);
        assert_eq!(
            decorator.get_property::<ComplexityLevel>("complexity"),
            Some(ComplexityLevel::Critical)
        );
    }

    #[test]
    fn test_tags_and_errors() {
        let mut node = node();
        {
            let mut decorator = NodeDecorator::new(&mut node, "java.source");
            decorator.enable_tag("java.source");
            assert!(decorator.has_tag("java.source"));
            assert!(decorator.remove_tag("java.source"));
            assert!(!decorator.remove_tag("java.source"));
            decorator.error("unexpected encoding");
        }
        assert_eq!(node.errors().len(), 1);
        assert_eq!(node.errors()[0].inspector.as_deref(), Some("java.source"));
    }
}
