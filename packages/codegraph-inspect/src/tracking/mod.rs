//! Run telemetry: trigger tracking and execution profiling

pub mod profile;
pub mod progress;

pub use profile::{
    ExecutionProfile, ExecutionRecord, InspectorTiming, PassTiming, PhaseStat, ProfileReport,
};
pub use progress::{format_duration, InspectorTriggerInfo, ProgressSummary, ProgressTracker};
