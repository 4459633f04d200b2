//! Dependency graph diagnostics
//!
//! Informational analysis of the inspector graph: cycles (Tarjan SCC),
//! duplicate producers, unused tags and long producer → consumer chains.
//! Nothing reported here changes how the scheduler runs.

use super::graph::TagDependencyGraph;
use petgraph::algo::{all_simple_paths, tarjan_scc};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

/// Upper bound on reported chains; dense graphs have exponentially many paths
pub const MAX_REPORTED_CHAINS: usize = 1_000;

/// A tag declared as produced by more than one inspector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateProducer {
    pub tag: String,
    pub producers: Vec<String>,
}

/// A producer → consumer path through the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyChain {
    /// Inspector names from first producer to last consumer
    pub path: Vec<String>,
}

impl DependencyChain {
    /// Number of inspectors on the path
    pub fn length(&self) -> usize {
        self.path.len()
    }
}

/// Diagnostics output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    /// Each entry is one strongly connected component (or self-loop), names sorted
    pub cycles: Vec<Vec<String>>,
    pub duplicate_producers: Vec<DuplicateProducer>,
    /// Produced by some inspector, required by none
    pub unused_tags: Vec<String>,
    /// Chains longer than `chain_threshold` inspectors
    pub complex_chains: Vec<DependencyChain>,
    pub chain_threshold: usize,
    /// True when `complex_chains` hit `MAX_REPORTED_CHAINS`
    pub chains_truncated: bool,
}

impl DiagnosticsReport {
    pub fn has_anomalies(&self) -> bool {
        !self.cycles.is_empty()
            || !self.duplicate_producers.is_empty()
            || !self.unused_tags.is_empty()
            || !self.complex_chains.is_empty()
    }

    /// Producers reported for `tag`, if it is duplicated
    pub fn duplicates_for(&self, tag: &str) -> Option<&[String]> {
        self.duplicate_producers
            .iter()
            .find(|d| d.tag == tag)
            .map(|d| d.producers.as_slice())
    }

    /// Emit one log line per anomaly class
    pub fn log_summary(&self) {
        if !self.has_anomalies() {
            info!("inspector dependency graph: no anomalies");
            return;
        }
        if !self.cycles.is_empty() {
            warn!(count = self.cycles.len(), cycles = ?self.cycles, "inspector dependency cycles (resolved over multiple passes)");
        }
        if !self.duplicate_producers.is_empty() {
            let tags: Vec<_> = self.duplicate_producers.iter().map(|d| d.tag.as_str()).collect();
            warn!(count = tags.len(), tags = ?tags, "tags produced by more than one inspector");
        }
        if !self.unused_tags.is_empty() {
            warn!(count = self.unused_tags.len(), tags = ?self.unused_tags, "tags produced but never required");
        }
        if !self.complex_chains.is_empty() {
            warn!(
                count = self.complex_chains.len(),
                threshold = self.chain_threshold,
                truncated = self.chains_truncated,
                "inspector chains above threshold"
            );
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Graph analyzer
pub struct GraphDiagnostics;

impl GraphDiagnostics {
    /// Run every check against `graph`
    pub fn analyze(graph: &TagDependencyGraph, chain_threshold: usize) -> DiagnosticsReport {
        let (complex_chains, chains_truncated) = Self::find_complex_chains(graph, chain_threshold);

        DiagnosticsReport {
            cycles: Self::find_cycles(graph),
            duplicate_producers: Self::find_duplicate_producers(graph),
            unused_tags: Self::find_unused_tags(graph),
            complex_chains,
            chain_threshold,
            chains_truncated,
        }
    }

    /// SCCs with more than one member, plus self-loops
    pub fn find_cycles(graph: &TagDependencyGraph) -> Vec<Vec<String>> {
        let inner = graph.graph();
        let mut cycles: Vec<Vec<String>> = tarjan_scc(inner)
            .into_iter()
            .filter(|scc| scc.len() > 1 || inner.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut names: Vec<String> =
                    scc.into_iter().map(|n| graph.name_at(n).to_string()).collect();
                names.sort();
                names
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// Tags with more than one distinct producer.
    ///
    /// Computed from descriptors rather than edges so that duplicates on tags
    /// nobody requires are still reported.
    pub fn find_duplicate_producers(graph: &TagDependencyGraph) -> Vec<DuplicateProducer> {
        let mut producers: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for descriptor in graph.descriptors() {
            for tag in descriptor.produced_tags() {
                producers.entry(tag.as_str()).or_default().insert(descriptor.name());
            }
        }

        producers
            .into_iter()
            .filter(|(_, names)| names.len() > 1)
            .map(|(tag, names)| DuplicateProducer {
                tag: tag.to_string(),
                producers: names.into_iter().map(str::to_string).collect(),
            })
            .collect()
    }

    pub fn find_unused_tags(graph: &TagDependencyGraph) -> Vec<String> {
        let required: BTreeSet<&str> = graph
            .descriptors()
            .iter()
            .flat_map(|d| d.required_tags().iter().map(String::as_str))
            .collect();

        let produced: BTreeSet<&str> = graph
            .descriptors()
            .iter()
            .flat_map(|d| d.produced_tags().iter().map(String::as_str))
            .collect();

        produced
            .difference(&required)
            .map(|tag| tag.to_string())
            .collect()
    }

    /// Simple paths with more than `threshold` inspectors between any producer
    /// and consumer. Returns the chains and whether the report was truncated.
    pub fn find_complex_chains(
        graph: &TagDependencyGraph,
        threshold: usize,
    ) -> (Vec<DependencyChain>, bool) {
        let inner = graph.graph();
        // path length = intermediates + 2, so > threshold means intermediates >= threshold - 1
        let min_intermediate = threshold.saturating_sub(1);

        let producers: Vec<NodeIndex> = inner
            .node_indices()
            .filter(|&n| inner.neighbors(n).next().is_some())
            .collect();
        let consumers: Vec<NodeIndex> = inner
            .node_indices()
            .filter(|&n| {
                inner
                    .neighbors_directed(n, petgraph::Direction::Incoming)
                    .next()
                    .is_some()
            })
            .collect();

        let mut chains = Vec::new();
        let mut truncated = false;

        'outer: for &from in &producers {
            for &to in &consumers {
                if from == to {
                    continue;
                }
                let paths =
                    all_simple_paths::<Vec<NodeIndex>, _>(inner, from, to, min_intermediate, None);
                for path in paths {
                    if path.len() <= threshold {
                        continue;
                    }
                    if chains.len() >= MAX_REPORTED_CHAINS {
                        truncated = true;
                        break 'outer;
                    }
                    chains.push(DependencyChain {
                        path: path
                            .into_iter()
                            .map(|n| graph.name_at(n).to_string())
                            .collect(),
                    });
                }
            }
        }

        chains.sort_by(|a, b| b.length().cmp(&a.length()).then_with(|| a.path.cmp(&b.path)));
        (chains, truncated)
    }
}
