//! Tag dependency graph with Petgraph
//!
//! Vertices are inspector descriptors (arena indices in registration order),
//! edges connect a producer to a consumer and carry every tag they share.
//! Built once at startup; cycles are plain index pairs.

use crate::inspector::descriptor::InspectorDescriptor;
use crate::inspector::registry::InspectorRegistry;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Producer → consumer edge annotated with the shared tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDependencyEdge {
    pub producer: String,
    pub consumer: String,
    pub tags: BTreeSet<String>,
}

/// Directed graph over inspector descriptors
#[derive(Debug, Clone)]
pub struct TagDependencyGraph {
    /// Node weight = index into `descriptors`
    graph: DiGraph<usize, BTreeSet<String>>,

    /// Descriptors in registration order
    descriptors: Vec<InspectorDescriptor>,

    /// Name → node index mapping for O(1) lookups
    name_to_node: HashMap<String, NodeIndex>,
}

impl TagDependencyGraph {
    /// Build from descriptors.
    ///
    /// For every ordered pair (P, C) with a non-empty `P.produced ∩ C.required`
    /// one edge P → C is added. A descriptor that requires one of its own
    /// produced tags gets a self-loop; nothing here is an error.
    ///
    /// O(N²·T) for N inspectors and T tags per set.
    pub fn build(descriptors: &[InspectorDescriptor]) -> Self {
        let mut graph = DiGraph::with_capacity(descriptors.len(), descriptors.len());
        let mut name_to_node = HashMap::with_capacity(descriptors.len());

        for (idx, descriptor) in descriptors.iter().enumerate() {
            let node = graph.add_node(idx);
            name_to_node.insert(descriptor.name().to_string(), node);
        }

        for (p, producer) in descriptors.iter().enumerate() {
            if producer.produced_tags().is_empty() {
                continue;
            }
            for (c, consumer) in descriptors.iter().enumerate() {
                let shared = producer.shared_tags(consumer);
                if !shared.is_empty() {
                    graph.add_edge(NodeIndex::new(p), NodeIndex::new(c), shared);
                }
            }
        }

        Self {
            graph,
            descriptors: descriptors.to_vec(),
            name_to_node,
        }
    }

    pub fn from_registry(registry: &InspectorRegistry) -> Self {
        Self::build(&registry.descriptors())
    }

    /// Number of inspectors
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of producer → consumer edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn descriptors(&self) -> &[InspectorDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, name: &str) -> Option<&InspectorDescriptor> {
        self.name_to_node
            .get(name)
            .map(|&node| &self.descriptors[self.graph[node]])
    }

    /// All edges, ordered by (producer, consumer) registration index
    pub fn edges(&self) -> Vec<TagDependencyEdge> {
        let mut edges: Vec<_> = self
            .graph
            .edge_references()
            .map(|edge| (edge.source().index(), edge.target().index(), edge.weight()))
            .collect();
        edges.sort_by_key(|(p, c, _)| (*p, *c));

        edges
            .into_iter()
            .map(|(p, c, tags)| TagDependencyEdge {
                producer: self.descriptors[p].name().to_string(),
                consumer: self.descriptors[c].name().to_string(),
                tags: tags.clone(),
            })
            .collect()
    }

    /// Inspectors declaring `tag` as produced
    pub fn producers_of(&self, tag: &str) -> Vec<&str> {
        self.descriptors
            .iter()
            .filter(|d| d.produced_tags().contains(tag))
            .map(|d| d.name())
            .collect()
    }

    /// Inspectors declaring `tag` as required
    pub fn consumers_of(&self, tag: &str) -> Vec<&str> {
        self.descriptors
            .iter()
            .filter(|d| d.required_tags().contains(tag))
            .map(|d| d.name())
            .collect()
    }

    /// Direct producers feeding `name`
    pub fn dependencies_of(&self, name: &str) -> Vec<&str> {
        self.neighbors(name, Direction::Incoming)
    }

    /// Direct consumers of what `name` produces
    pub fn dependents_of(&self, name: &str) -> Vec<&str> {
        self.neighbors(name, Direction::Outgoing)
    }

    /// Dependency-respecting order, or `None` when the graph has cycles
    pub fn topological_order(&self) -> Option<Vec<&str>> {
        toposort(&self.graph, None).ok().map(|order| {
            order
                .into_iter()
                .map(|node| self.descriptors[self.graph[node]].name())
                .collect()
        })
    }

    pub(crate) fn graph(&self) -> &DiGraph<usize, BTreeSet<String>> {
        &self.graph
    }

    pub(crate) fn name_at(&self, node: NodeIndex) -> &str {
        self.descriptors[self.graph[node]].name()
    }

    fn neighbors(&self, name: &str, direction: Direction) -> Vec<&str> {
        let Some(&node) = self.name_to_node.get(name) else {
            return Vec::new();
        };

        let mut indices: Vec<usize> = self
            .graph
            .neighbors_directed(node, direction)
            .map(|n| self.graph[n])
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
            .into_iter()
            .map(|idx| self.descriptors[idx].name())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Vec<InspectorDescriptor> {
        vec![
            InspectorDescriptor::new("a").produces("t1"),
            InspectorDescriptor::new("b").requires("t1").produces("t2"),
            InspectorDescriptor::new("c").requires("t1").requires("t2"),
        ]
    }

    #[test]
    fn test_edges_carry_shared_tags() {
        let graph = TagDependencyGraph::build(&chain());
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);

        let edges = graph.edges();
        assert_eq!(edges[0].producer, "a");
        assert_eq!(edges[0].consumer, "b");
        assert!(edges[0].tags.contains("t1"));

        let b_to_c = edges
            .iter()
            .find(|e| e.producer == "b" && e.consumer == "c")
            .unwrap();
        assert_eq!(b_to_c.tags.len(), 1);
        assert!(b_to_c.tags.contains("t2"));
    }

    #[test]
    fn test_one_edge_per_pair() {
        let descriptors = vec![
            InspectorDescriptor::new("p").produces("x").produces("y"),
            InspectorDescriptor::new("c").requires("x").requires("y"),
        ];
        let graph = TagDependencyGraph::build(&descriptors);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges()[0].tags.len(), 2);
    }

    #[test]
    fn test_dependency_queries() {
        let graph = TagDependencyGraph::build(&chain());
        assert_eq!(graph.dependencies_of("c"), vec!["a", "b"]);
        assert_eq!(graph.dependents_of("a"), vec!["b", "c"]);
        assert!(graph.dependencies_of("a").is_empty());
        assert!(graph.dependents_of("missing").is_empty());
        assert_eq!(graph.producers_of("t2"), vec!["b"]);
        assert_eq!(graph.consumers_of("t1"), vec!["b", "c"]);
    }

    #[test]
    fn test_topological_order() {
        let graph = TagDependencyGraph::build(&chain());
        assert_eq!(graph.topological_order(), Some(vec!["a", "b", "c"]));

        let cyclic = TagDependencyGraph::build(&[
            InspectorDescriptor::new("x").requires("b").produces("a"),
            InspectorDescriptor::new("y").requires("a").produces("b"),
        ]);
        assert_eq!(cyclic.topological_order(), None);
    }

    #[test]
    fn test_self_reference_is_a_loop_not_an_error() {
        let graph = TagDependencyGraph::build(&[InspectorDescriptor::new("self")
            .requires("t")
            .produces("t")]);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.dependents_of("self"), vec!["self"]);
    }
}
