//! Dependency graph and diagnostics integration tests

mod common;

use codegraph_inspect::dependency::MAX_REPORTED_CHAINS;
use codegraph_inspect::{GraphDiagnostics, InspectorDescriptor, TagDependencyGraph};
use common::*;
use pretty_assertions::assert_eq;

fn chain(names: &[&str]) -> Vec<InspectorDescriptor> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mut d = InspectorDescriptor::new(*name).produces(format!("{}.out", name));
            if i > 0 {
                d = d.requires(format!("{}.out", names[i - 1]));
            }
            d
        })
        .collect()
}

#[test]
fn test_duplicate_size_producers_reported_together() {
    let graph = TagDependencyGraph::build(&[
        InspectorDescriptor::new("file.size").produces("size"),
        InspectorDescriptor::new("class.size").produces("size"),
        InspectorDescriptor::new("report").requires("size"),
    ]);
    let report = GraphDiagnostics::analyze(&graph, 3);

    assert_eq!(
        report.duplicates_for("size"),
        Some(&["class.size".to_string(), "file.size".to_string()][..])
    );
    assert_eq!(report.duplicate_producers.len(), 1);
}

#[test]
fn test_unused_tag_reported() {
    let graph = TagDependencyGraph::build(&[
        InspectorDescriptor::new("cloc").produces("lines.count"),
        InspectorDescriptor::new("lang").produces("language"),
        InspectorDescriptor::new("stats").requires("language"),
    ]);
    let report = GraphDiagnostics::analyze(&graph, 3);

    assert_eq!(report.unused_tags, vec!["lines.count"]);
    assert!(report.cycles.is_empty());
}

#[test]
fn test_four_inspector_chain_is_complex() {
    let graph = TagDependencyGraph::build(&chain(&["A", "B", "C", "D"]));
    let report = GraphDiagnostics::analyze(&graph, 3);

    assert_eq!(report.complex_chains.len(), 1);
    assert_eq!(report.complex_chains[0].path, vec!["A", "B", "C", "D"]);
    assert!(!report.chains_truncated);
}

#[test]
fn test_two_inspector_chain_is_not_complex() {
    let graph = TagDependencyGraph::build(&chain(&["A", "B"]));
    let report = GraphDiagnostics::analyze(&graph, 3);
    assert!(report.complex_chains.is_empty());
}

#[test]
fn test_threshold_is_configurable() {
    let graph = TagDependencyGraph::build(&chain(&["A", "B", "C", "D"]));
    assert!(GraphDiagnostics::analyze(&graph, 4).complex_chains.is_empty());
    // A-B-C, B-C-D and A-B-C-D
    assert_eq!(GraphDiagnostics::analyze(&graph, 2).complex_chains.len(), 3);
}

#[test]
fn test_cycle_reported_but_not_blocking() {
    let descriptors = vec![
        InspectorDescriptor::new("A").requires("tagB").produces("tagA"),
        InspectorDescriptor::new("B").requires("tagA").produces("tagB"),
    ];
    let graph = TagDependencyGraph::build(&descriptors);
    let report = GraphDiagnostics::analyze(&graph, 3);
    assert_eq!(report.cycles, vec![vec!["A".to_string(), "B".to_string()]]);
    assert!(graph.topological_order().is_none());

    // the scheduler still builds and runs on the same metadata
    let sched = scheduler(
        descriptors.into_iter().map(FnInspector::tagger).collect(),
        sequential_config(),
    );
    assert!(sched.run(&file_store(1)).is_ok());
}

#[test]
fn test_disconnected_descriptors_are_fine() {
    let graph = TagDependencyGraph::build(&[
        InspectorDescriptor::new("solo"),
        InspectorDescriptor::new("other").requires("external.tag"),
    ]);
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.topological_order().map(|o| o.len()), Some(2));
    assert!(!GraphDiagnostics::analyze(&graph, 3).has_anomalies());
}

#[test]
fn test_dense_graph_chain_report_is_capped() {
    // every inspector produces and requires the same tag: complete digraph
    let descriptors: Vec<_> = (0..9)
        .map(|i| {
            InspectorDescriptor::new(format!("i{}", i))
                .requires("shared")
                .produces("shared")
        })
        .collect();
    let graph = TagDependencyGraph::build(&descriptors);
    let report = GraphDiagnostics::analyze(&graph, 3);

    assert!(report.chains_truncated);
    assert_eq!(report.complex_chains.len(), MAX_REPORTED_CHAINS);
    assert_eq!(report.cycles.len(), 1);
}

#[test]
fn test_scheduler_exposes_diagnostics() {
    let sched = scheduler(
        vec![
            FnInspector::tagger(InspectorDescriptor::new("a").produces("size")),
            FnInspector::tagger(InspectorDescriptor::new("b").produces("size")),
        ],
        sequential_config(),
    );

    let report = sched.diagnostics();
    assert!(report.has_anomalies());
    assert!(report.duplicates_for("size").is_some());
    assert_eq!(report.unused_tags, vec!["size"]);

    let json = report.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["unused_tags"][0], "size");

    assert_eq!(sched.dependency_graph().producers_of("size"), vec!["a", "b"]);
}
