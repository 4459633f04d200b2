//! Inspector registry
//!
//! An explicit value built once per run from built-ins and plugins, validated
//! up front and passed to the scheduler. There is no process-wide registry.

use super::descriptor::InspectorDescriptor;
use crate::domain::ports::Inspector;
use crate::errors::{InspectError, Result};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Shared inspector handle
pub type BoxedInspector = Arc<dyn Inspector>;

/// Validated, read-only set of inspectors
pub struct InspectorRegistry {
    /// Registration order is the arena order used by the dependency graph
    inspectors: Vec<BoxedInspector>,
    by_name: HashMap<String, usize>,
    /// Indices sorted by descending priority, ties by registration order
    priority_order: Vec<usize>,
}

impl InspectorRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Validate and index inspectors. Fails fast on malformed descriptors or
    /// duplicate names.
    pub fn build(inspectors: Vec<BoxedInspector>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(inspectors.len());

        for (idx, inspector) in inspectors.iter().enumerate() {
            let descriptor = inspector.descriptor();
            descriptor.validate()?;
            if by_name.insert(descriptor.name().to_string(), idx).is_some() {
                return Err(InspectError::DuplicateInspector(
                    descriptor.name().to_string(),
                ));
            }
        }

        let mut priority_order: Vec<usize> = (0..inspectors.len()).collect();
        priority_order.sort_by_key(|&idx| (Reverse(inspectors[idx].descriptor().priority()), idx));

        debug!(inspectors = inspectors.len(), "inspector registry built");

        Ok(Self {
            inspectors,
            by_name,
            priority_order,
        })
    }

    pub fn len(&self) -> usize {
        self.inspectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inspectors.is_empty()
    }

    /// Inspector by arena index
    pub fn inspector(&self, idx: usize) -> Option<&BoxedInspector> {
        self.inspectors.get(idx)
    }

    /// Inspector by name
    pub fn get(&self, name: &str) -> Option<&BoxedInspector> {
        self.by_name.get(name).map(|&idx| &self.inspectors[idx])
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Descriptors in registration order
    pub fn descriptors(&self) -> Vec<InspectorDescriptor> {
        self.inspectors
            .iter()
            .map(|inspector| inspector.descriptor().clone())
            .collect()
    }

    /// Names in registration order
    pub fn names(&self) -> Vec<String> {
        self.inspectors
            .iter()
            .map(|inspector| inspector.descriptor().name().to_string())
            .collect()
    }

    /// Execution order among eligible inspectors
    pub fn priority_order(&self) -> &[usize] {
        &self.priority_order
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoxedInspector> {
        self.inspectors.iter()
    }
}

impl fmt::Debug for InspectorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InspectorRegistry")
            .field("inspectors", &self.names())
            .finish()
    }
}

/// Collects inspectors before validation
#[derive(Default)]
pub struct RegistryBuilder {
    inspectors: Vec<BoxedInspector>,
}

impl RegistryBuilder {
    pub fn register<I: Inspector + 'static>(mut self, inspector: I) -> Self {
        self.inspectors.push(Arc::new(inspector));
        self
    }

    pub fn register_arc(mut self, inspector: BoxedInspector) -> Self {
        self.inspectors.push(inspector);
        self
    }

    /// Register dynamically loaded plugins after the built-ins
    pub fn extend(mut self, plugins: impl IntoIterator<Item = BoxedInspector>) -> Self {
        self.inspectors.extend(plugins);
        self
    }

    pub fn build(self) -> Result<InspectorRegistry> {
        InspectorRegistry::build(self.inspectors)
    }
}
