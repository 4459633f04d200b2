//! Assertions over run summaries and nodes

use codegraph_inspect::{ExecutionPhase, InMemoryNodeStore, RunSummary};

pub fn assert_has_tag(store: &InMemoryNodeStore, id: &str, tag: &str) {
    let node = store.get(id).unwrap_or_else(|| panic!("node '{id}' missing"));
    let node = node.lock();
    assert!(
        node.has_tag(tag),
        "Expected tag '{tag}' on '{id}', tags: {:?}",
        node.tags()
    );
}

pub fn assert_lacks_tag(store: &InMemoryNodeStore, id: &str, tag: &str) {
    let node = store.get(id).unwrap_or_else(|| panic!("node '{id}' missing"));
    let node = node.lock();
    assert!(
        !node.has_tag(tag),
        "Expected no tag '{tag}' on '{id}', tags: {:?}",
        node.tags()
    );
}

/// Analysis phase converged at exactly `pass`
pub fn assert_converged_at(summary: &RunSummary, pass: u32) {
    let analysis = summary
        .phase(ExecutionPhase::AnalysisPass)
        .expect("analysis phase present");
    assert!(
        analysis.converged,
        "Expected convergence, passes: {:?}",
        analysis.passes.iter().map(|p| (p.pass_number, p.changed, p.pending_after)).collect::<Vec<_>>()
    );
    assert_eq!(analysis.converged_at, Some(pass));
}
