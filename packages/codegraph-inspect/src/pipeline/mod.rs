//! Phase-driven execution: phases, the pass scheduler and a node store

pub mod phase;
pub mod scheduler;
pub mod store;

pub use phase::{ExecutionPhase, NodeSnapshot, PassRecord};
pub use scheduler::{PassScheduler, PhaseOutcome, RunSummary};
pub use store::InMemoryNodeStore;
