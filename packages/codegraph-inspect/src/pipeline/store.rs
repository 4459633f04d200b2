//! In-memory node store
//!
//! Stands in for the graph/storage layer. Scanned nodes enter the
//! filesystem phase, extracted nodes enter the extracted-content phase, and
//! every node takes part in the analysis passes.

use super::phase::ExecutionPhase;
use crate::domain::models::Node;
use crate::domain::ports::{NodeStore, SharedNode};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct InMemoryNodeStore {
    /// Node id → (node, came from extraction)
    nodes: RwLock<BTreeMap<String, (SharedNode, bool)>>,
}

impl InMemoryNodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node discovered by the filesystem scan. Replaces any node with the same id.
    pub fn add_scanned(&self, node: Node) -> SharedNode {
        self.insert(node, false)
    }

    /// Add a node materialized by archive extraction
    pub fn add_extracted(&self, node: Node) -> SharedNode {
        self.insert(node, true)
    }

    pub fn get(&self, id: &str) -> Option<SharedNode> {
        self.nodes.read().get(id).map(|(node, _)| Arc::clone(node))
    }

    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }

    /// Clones of every node, sorted by id
    pub fn snapshot(&self) -> Vec<Node> {
        self.nodes
            .read()
            .values()
            .map(|(node, _)| node.lock().clone())
            .collect()
    }

    fn insert(&self, node: Node, extracted: bool) -> SharedNode {
        let id = node.id().to_string();
        let shared = Arc::new(Mutex::new(node));
        self.nodes
            .write()
            .insert(id, (Arc::clone(&shared), extracted));
        shared
    }
}

impl NodeStore for InMemoryNodeStore {
    fn nodes_for_phase(&self, phase: ExecutionPhase) -> Vec<SharedNode> {
        self.nodes
            .read()
            .values()
            .filter(|(_, extracted)| match phase {
                ExecutionPhase::FilesystemScan => !extracted,
                ExecutionPhase::ExtractedContent => *extracted,
                ExecutionPhase::AnalysisPass => true,
            })
            .map(|(node, _)| Arc::clone(node))
            .collect()
    }
}
