//! Inspector dependency graph and its diagnostics

pub mod diagnostics;
pub mod graph;

pub use diagnostics::{
    DependencyChain, DiagnosticsReport, DuplicateProducer, GraphDiagnostics, MAX_REPORTED_CHAINS,
};
pub use graph::{TagDependencyEdge, TagDependencyGraph};
