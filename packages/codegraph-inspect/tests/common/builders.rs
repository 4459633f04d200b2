//! Builders for registries, schedulers and stores

use super::fixtures::{init_tracing, FnInspector};
use codegraph_inspect::{
    InMemoryNodeStore, InspectorRegistry, Node, NodeKind, ParallelConfig, PassScheduler,
    SchedulerConfig,
};
use std::sync::Arc;

pub fn registry(inspectors: Vec<FnInspector>) -> Arc<InspectorRegistry> {
    let registry = inspectors
        .into_iter()
        .fold(InspectorRegistry::builder(), |builder, inspector| builder.register(inspector))
        .build()
        .expect("valid registry");
    Arc::new(registry)
}

pub fn sequential_config() -> SchedulerConfig {
    SchedulerConfig::default().with_parallel(ParallelConfig::sequential())
}

pub fn parallel_config(workers: usize) -> SchedulerConfig {
    SchedulerConfig::default().with_parallel(ParallelConfig {
        num_workers: workers,
        enable_rayon: true,
    })
}

pub fn scheduler(inspectors: Vec<FnInspector>, config: SchedulerConfig) -> PassScheduler {
    init_tracing();
    PassScheduler::new(registry(inspectors), config).expect("valid scheduler")
}

/// Store with `count` scanned file nodes named `file-000`, `file-001`, ...
pub fn file_store(count: usize) -> InMemoryNodeStore {
    let store = InMemoryNodeStore::new();
    for i in 0..count {
        store.add_scanned(Node::new(format!("file-{:03}", i), NodeKind::FileArtifact));
    }
    store
}

/// Store with one node that only enters the analysis phase through extraction
pub fn extracted_store(id: &str, kind: NodeKind) -> InMemoryNodeStore {
    let store = InMemoryNodeStore::new();
    store.add_extracted(Node::new(id, kind));
    store
}
