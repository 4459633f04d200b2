//! Ports between the scheduler and its collaborators
//!
//! `Inspector` is implemented by analysis plugins, `NodeStore` by the graph /
//! storage layer. The scheduler depends only on these traits.

use super::models::Node;
use crate::errors::Result;
use crate::inspector::decorator::NodeDecorator;
use crate::inspector::descriptor::InspectorDescriptor;
use crate::pipeline::phase::ExecutionPhase;
use parking_lot::Mutex;
use std::sync::Arc;

/// Node handle shared with the storage layer.
///
/// The mutex is the per-node single-writer boundary: a worker holds it for the
/// whole time it runs inspectors on that node.
pub type SharedNode = Arc<Mutex<Node>>;

/// Pluggable analysis unit
///
/// # Example
/// ```rust
/// use codegraph_inspect::{InspectorDescriptor, Inspector, NodeDecorator, Result};
///
/// struct LineCounter {
///     descriptor: InspectorDescriptor,
/// }
///
/// impl Inspector for LineCounter {
///     fn descriptor(&self) -> &InspectorDescriptor {
///         &self.descriptor
///     }
///
///     fn inspect(&self, decorator: &mut NodeDecorator<'_>) -> Result<()> {
///         decorator.set_property("lines.count", 42i64);
///         decorator.enable_tag("lines.count");
///         Ok(())
///     }
/// }
/// ```
pub trait Inspector: Send + Sync {
    /// Static metadata; must not change after registration
    fn descriptor(&self) -> &InspectorDescriptor;

    /// Eligibility check beyond kind and required tags.
    ///
    /// Return `false` for "not applicable" instead of failing in `inspect`.
    fn supports(&self, _node: &Node) -> bool {
        true
    }

    /// Analyze one node, writing results through the decorator
    fn inspect(&self, decorator: &mut NodeDecorator<'_>) -> Result<()>;
}

/// Source of nodes per execution phase
pub trait NodeStore: Send + Sync {
    /// Nodes taking part in `phase`. The scheduler never creates or deletes nodes.
    fn nodes_for_phase(&self, phase: ExecutionPhase) -> Vec<SharedNode>;
}
