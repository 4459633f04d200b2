//! Execution phases and per-pass records

use crate::domain::models::NodeStateHash;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fixed sequence of run stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionPhase {
    /// Artifacts discovered on disk; runs once
    FilesystemScan,
    /// Artifacts materialized by archive extraction; runs once
    ExtractedContent,
    /// Iterated until convergence or the pass ceiling
    AnalysisPass,
}

impl ExecutionPhase {
    /// Phases in execution order
    pub const ALL: [ExecutionPhase; 3] = [
        ExecutionPhase::FilesystemScan,
        ExecutionPhase::ExtractedContent,
        ExecutionPhase::AnalysisPass,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::FilesystemScan => "FILESYSTEM_SCAN",
            Self::ExtractedContent => "EXTRACTED_CONTENT",
            Self::AnalysisPass => "ANALYSIS_PASS",
        }
    }

    /// Only the analysis phase is re-entered
    pub fn is_iterated(&self) -> bool {
        matches!(self, Self::AnalysisPass)
    }
}

impl fmt::Display for ExecutionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pre-pass node fingerprints keyed by node id
pub type NodeSnapshot = BTreeMap<String, NodeStateHash>;

/// Outcome of one phase execution or one analysis pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassRecord {
    pub phase: ExecutionPhase,
    /// `None` for the non-iterated phases
    pub pass_number: Option<u32>,
    /// Node state taken before the pass, compared against afterwards
    pub snapshot: NodeSnapshot,
    /// Any node's fingerprint differs from `snapshot`
    pub changed: bool,
    /// Number of nodes whose fingerprint changed
    pub changed_nodes: usize,
    pub executions: usize,
    pub failures: usize,
    /// (node, inspector) pairs that became eligible after their turn in the pass
    pub pending_after: usize,
    pub duration_ms: f64,
}

impl PassRecord {
    /// No node differs from its pre-pass fingerprint
    pub fn is_converged(&self) -> bool {
        !self.changed
    }
}
