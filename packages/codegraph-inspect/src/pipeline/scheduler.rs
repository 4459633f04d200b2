//! Multi-pass inspector scheduler
//!
//! Drives the three execution phases in order. The fixed phases run once;
//! the analysis phase repeats until a pass leaves every node unchanged or
//! `max_passes` is reached.
//!
//! Within a pass nodes are processed in parallel (rayon), one worker per node
//! at a time behind the node mutex. Passes are barriers: the convergence
//! check compares every node against its pre-pass fingerprint.
//!
//! Per node, inspectors are visited in priority order and eligibility is
//! re-checked right before each one, so a producer that sorts ahead of its
//! consumer satisfies it in the same pass. Every eligible inspector runs on
//! every pass.

use super::phase::{ExecutionPhase, NodeSnapshot, PassRecord};
use crate::config::SchedulerConfig;
use crate::dependency::{DiagnosticsReport, GraphDiagnostics, TagDependencyGraph};
use crate::domain::models::{Node, NodeError, NodeStateHash};
use crate::domain::ports::{Inspector, NodeStore, SharedNode};
use crate::errors::{InspectError, Result};
use crate::inspector::decorator::NodeDecorator;
use crate::inspector::registry::InspectorRegistry;
use crate::tracking::{ExecutionProfile, ProfileReport, ProgressSummary, ProgressTracker};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, debug_span, info, info_span, trace, warn};
use uuid::Uuid;

// ═══════════════════════════════════════════════════════════════════════════
// Run results
// ═══════════════════════════════════════════════════════════════════════════

/// Result of one phase
#[derive(Debug, Clone, Serialize)]
pub struct PhaseOutcome {
    pub phase: ExecutionPhase,
    /// Nodes that took part
    pub nodes: usize,
    pub passes: Vec<PassRecord>,
    /// Always true for the fixed phases
    pub converged: bool,
    /// Analysis pass at which convergence was detected
    pub converged_at: Option<u32>,
}

impl PhaseOutcome {
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    pub fn executions(&self) -> usize {
        self.passes.iter().map(|p| p.executions).sum()
    }

    pub fn failures(&self) -> usize {
        self.passes.iter().map(|p| p.failures).sum()
    }

    pub fn last_pass(&self) -> Option<&PassRecord> {
        self.passes.last()
    }
}

/// Result of one scheduler run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub phases: Vec<PhaseOutcome>,
    pub total_executions: usize,
    pub failed_executions: usize,
    /// Non-fatal convergence warnings
    pub non_converged: Vec<String>,
    pub progress: ProgressSummary,
    /// `None` when profiling is disabled
    pub profile: Option<ProfileReport>,
}

impl RunSummary {
    pub fn phase(&self, phase: ExecutionPhase) -> Option<&PhaseOutcome> {
        self.phases.iter().find(|p| p.phase == phase)
    }

    pub fn converged(&self) -> bool {
        self.non_converged.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Scheduler
// ═══════════════════════════════════════════════════════════════════════════

struct NodeSlot {
    id: String,
    node: SharedNode,
}

#[derive(Debug, Default, Clone, Copy)]
struct SlotStats {
    executions: usize,
    failures: usize,
    /// Skipped on its turn, eligible once the node's pass finished
    pending: usize,
}

/// Clears the running flag even if a run unwinds
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Fixed-point inspector scheduler
///
/// Graph and diagnostics are computed once in `new`; tracker and profile are
/// reset at the start of every `run`.
pub struct PassScheduler {
    registry: Arc<InspectorRegistry>,
    config: SchedulerConfig,
    graph: TagDependencyGraph,
    diagnostics: DiagnosticsReport,
    tracker: ProgressTracker,
    profile: ExecutionProfile,
    pool: Option<rayon::ThreadPool>,
    running: AtomicBool,
}

impl PassScheduler {
    /// Validate config, build the dependency graph and diagnostics, and set
    /// up the worker pool.
    pub fn new(registry: Arc<InspectorRegistry>, config: SchedulerConfig) -> Result<Self> {
        config.validate()?;

        let graph = TagDependencyGraph::from_registry(&registry);
        let diagnostics = GraphDiagnostics::analyze(&graph, config.complex_chain_threshold);
        diagnostics.log_summary();

        let pool = if config.parallel.is_parallel() {
            let workers = config.parallel.effective_workers();
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("inspect-worker-{}", i))
                .build()
                .map_err(|e| InspectError::internal(format!("failed to build worker pool: {}", e)))?;
            Some(pool)
        } else {
            None
        };

        info!(
            inspectors = registry.len(),
            edges = graph.edge_count(),
            max_passes = config.max_passes,
            workers = config.parallel.effective_workers(),
            "pass scheduler ready"
        );

        let profile = ExecutionProfile::with_registered(registry.names());

        Ok(Self {
            registry,
            config,
            graph,
            diagnostics,
            tracker: ProgressTracker::new(),
            profile,
            pool,
            running: AtomicBool::new(false),
        })
    }

    pub fn registry(&self) -> &InspectorRegistry {
        &self.registry
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn dependency_graph(&self) -> &TagDependencyGraph {
        &self.graph
    }

    pub fn diagnostics(&self) -> &DiagnosticsReport {
        &self.diagnostics
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    pub fn profile(&self) -> &ExecutionProfile {
        &self.profile
    }

    /// Execute every phase against `store`.
    ///
    /// Inspector failures never surface here; the only error is a second
    /// `run` overlapping one already in progress on this scheduler.
    pub fn run(&self, store: &dyn NodeStore) -> Result<RunSummary> {
        if self
            .running
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(InspectError::internal("scheduler run already in progress"));
        }
        let _guard = RunGuard(&self.running);

        let run_id = Uuid::new_v4();
        let span = info_span!("inspect_run", %run_id);
        let _enter = span.enter();

        self.tracker.reset();
        self.profile.reset();
        self.profile.start();
        let started_at = Utc::now();

        let mut phases = Vec::with_capacity(ExecutionPhase::ALL.len());
        let mut non_converged = Vec::new();

        for phase in ExecutionPhase::ALL {
            let outcome = self.run_phase(phase, store);
            if !outcome.converged {
                let message = format!(
                    "{} did not converge within {} passes",
                    phase, self.config.max_passes
                );
                warn!(phase = phase.name(), max_passes = self.config.max_passes, "{}", message);
                non_converged.push(message);
            }
            phases.push(outcome);
        }

        self.tracker.mark_completed();
        self.profile.finish();

        let total_executions: usize = phases.iter().map(PhaseOutcome::executions).sum();
        let failed_executions: usize = phases.iter().map(PhaseOutcome::failures).sum();
        let progress = self.tracker.summary();

        info!(
            executions = total_executions,
            failures = failed_executions,
            triggered = progress.triggered_count,
            duration = %progress.duration,
            "inspection run complete"
        );

        Ok(RunSummary {
            run_id,
            started_at,
            phases,
            total_executions,
            failed_executions,
            non_converged,
            progress,
            profile: self.config.record_profile.then(|| self.profile.report()),
        })
    }

    fn run_phase(&self, phase: ExecutionPhase, store: &dyn NodeStore) -> PhaseOutcome {
        let mut slots: Vec<NodeSlot> = store
            .nodes_for_phase(phase)
            .into_iter()
            .map(|node| {
                let id = node.lock().id().to_string();
                NodeSlot { id, node }
            })
            .collect();
        slots.sort_by(|a, b| a.id.cmp(&b.id));

        info!(phase = phase.name(), nodes = slots.len(), "phase started");

        let max_passes = if phase.is_iterated() {
            self.config.max_passes
        } else {
            1
        };

        let mut passes = Vec::new();
        let mut converged_at = None;

        for pass in 1..=max_passes {
            let pass_number = phase.is_iterated().then_some(pass);
            let record = self.run_pass(phase, pass_number, &slots);
            let done = record.is_converged();
            passes.push(record);
            if done {
                converged_at = pass_number;
                break;
            }
        }

        let converged = !phase.is_iterated() || converged_at.is_some();
        if let Some(pass) = converged_at {
            info!(phase = phase.name(), pass, "phase converged");
        }

        PhaseOutcome {
            phase,
            nodes: slots.len(),
            passes,
            converged,
            converged_at,
        }
    }

    fn run_pass(
        &self,
        phase: ExecutionPhase,
        pass_number: Option<u32>,
        slots: &[NodeSlot],
    ) -> PassRecord {
        let span = debug_span!("phase", phase = phase.name(), pass = ?pass_number);
        let _enter = span.enter();
        let start = Instant::now();

        let before: Vec<NodeStateHash> = slots.iter().map(|s| s.node.lock().state_hash()).collect();

        let stats: Vec<SlotStats> = match &self.pool {
            Some(pool) => pool.install(|| {
                slots
                    .par_iter()
                    .map(|slot| self.process_node(slot, phase, pass_number))
                    .collect()
            }),
            None => slots
                .iter()
                .map(|slot| self.process_node(slot, phase, pass_number))
                .collect(),
        };

        let executions: usize = stats.iter().map(|s| s.executions).sum();
        let failures: usize = stats.iter().map(|s| s.failures).sum();
        let pending_after: usize = stats.iter().map(|s| s.pending).sum();

        let changed_nodes = slots
            .iter()
            .zip(&before)
            .filter(|(slot, hash)| slot.node.lock().state_hash() != **hash)
            .count();
        let changed = changed_nodes > 0;

        let snapshot: NodeSnapshot = slots
            .iter()
            .zip(before)
            .map(|(slot, hash)| (slot.id.clone(), hash))
            .collect();

        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            executions,
            failures,
            changed_nodes,
            pending_after,
            duration_ms,
            "pass finished"
        );

        PassRecord {
            phase,
            pass_number,
            snapshot,
            changed,
            changed_nodes,
            executions,
            failures,
            pending_after,
            duration_ms,
        }
    }

    /// Run every eligible inspector on one node
    fn process_node(
        &self,
        slot: &NodeSlot,
        phase: ExecutionPhase,
        pass_number: Option<u32>,
    ) -> SlotStats {
        let mut stats = SlotStats::default();
        let mut node = slot.node.lock();
        let mut ran = vec![false; self.registry.len()];

        for &idx in self.registry.priority_order() {
            let Some(inspector) = self.registry.inspector(idx) else {
                continue;
            };
            if !is_eligible(inspector.as_ref(), &node) {
                continue;
            }
            ran[idx] = true;

            let name = inspector.descriptor().name();
            trace!(inspector = name, node = %slot.id, "invoking inspector");

            let started = Instant::now();
            let outcome = invoke(inspector.as_ref(), &mut node);
            let elapsed = started.elapsed();

            self.tracker.record_trigger(name, &slot.id);
            if self.config.record_profile {
                self.profile.record(name, phase, pass_number, elapsed);
            }
            stats.executions += 1;

            if let Err(err) = outcome {
                stats.failures += 1;
                warn!(
                    inspector = name,
                    node = %slot.id,
                    category = err.category(),
                    error = %err,
                    "inspector failed"
                );
                node.push_error(NodeError::new(Some(name), err.to_string()));
            }
        }

        stats.pending = self
            .registry
            .priority_order()
            .iter()
            .filter(|&&idx| !ran[idx])
            .filter_map(|&idx| self.registry.inspector(idx))
            .filter(|inspector| is_eligible(inspector.as_ref(), &node))
            .count();

        stats
    }
}

impl std::fmt::Debug for PassScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassScheduler")
            .field("inspectors", &self.registry.len())
            .field("config", &self.config)
            .field("parallel", &self.pool.is_some())
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Invocation
// ═══════════════════════════════════════════════════════════════════════════

/// Kind, required tags, then the inspector's own check. A panicking
/// `supports` counts as not applicable.
fn is_eligible(inspector: &dyn Inspector, node: &Node) -> bool {
    let descriptor = inspector.descriptor();
    descriptor.target_kind().matches(node.kind())
        && descriptor.is_satisfied_by(node.tags())
        && panic::catch_unwind(AssertUnwindSafe(|| inspector.supports(node))).unwrap_or(false)
}

/// Call `inspect`, turning an `Err` or a panic into an inspector error
fn invoke(inspector: &dyn Inspector, node: &mut Node) -> Result<()> {
    let name = inspector.descriptor().name();
    let node_id = node.id().to_string();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut decorator = NodeDecorator::new(node, name);
        inspector.inspect(&mut decorator)
    }));

    match outcome {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err @ InspectError::InspectorFailed { .. })) => Err(err),
        Ok(Err(err)) => Err(InspectError::failed(name, node_id, err.to_string())),
        Err(payload) => Err(InspectError::InspectorPanicked {
            inspector: name.to_string(),
            node: node_id,
            reason: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
