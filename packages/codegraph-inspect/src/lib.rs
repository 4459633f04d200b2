/*
 * Codegraph Inspect - Inspector Scheduling Engine
 *
 * Layout:
 * - domain/      : Node model + ports (Inspector, NodeStore)
 * - inspector/   : Descriptors, registry, decorator write path
 * - dependency/  : Tag dependency graph (petgraph) + diagnostics
 * - pipeline/    : Execution phases, pass scheduler, in-memory store
 * - tracking/    : Trigger tracking + execution profile
 * - config/      : Presets, validation, YAML v1
 *
 * Execution:
 * - FILESYSTEM_SCAN -> EXTRACTED_CONTENT -> ANALYSIS_PASS (iterated)
 * - Rayon across nodes within a pass, passes are barriers
 * - Whole-node state hashing for convergence
 */

#![allow(clippy::should_implement_trait)] // from_str naming intentional

pub mod config;
pub mod dependency;
pub mod domain;
pub mod errors;
pub mod inspector;
pub mod pipeline;
pub mod tracking;

pub use config::{ConfigError, ParallelConfig, Preset, SchedulerConfig};
pub use dependency::{DiagnosticsReport, GraphDiagnostics, TagDependencyEdge, TagDependencyGraph};
pub use domain::{
    ComplexityLevel, Inspector, Node, NodeError, NodeKind, NodeStore, PropertyValue, SharedNode,
};
pub use errors::{InspectError, Result};
pub use inspector::{BoxedInspector, InspectorDescriptor, InspectorRegistry, NodeDecorator, TargetKind};
pub use pipeline::{ExecutionPhase, InMemoryNodeStore, PassRecord, PassScheduler, PhaseOutcome, RunSummary};
pub use tracking::{
    ExecutionProfile, InspectorTriggerInfo, ProfileReport, ProgressSummary, ProgressTracker,
};
