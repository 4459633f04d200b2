//! Execution profile
//!
//! Append-only log of inspector invocations with an on-demand report.
//! Reports are computed from the log and never touch scheduling state.

use crate::pipeline::phase::ExecutionPhase;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

/// One inspector invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub inspector: String,
    pub phase: ExecutionPhase,
    pub pass_number: Option<u32>,
    pub duration_ms: f64,
}

/// Count and time for a slice of records
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseStat {
    pub executions: usize,
    pub total_ms: f64,
}

impl PhaseStat {
    fn add(&mut self, duration_ms: f64) {
        self.executions += 1;
        self.total_ms += duration_ms;
    }
}

/// Aggregated timing for one inspector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectorTiming {
    pub executions: usize,
    pub total_ms: f64,
    pub average_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub by_phase: BTreeMap<ExecutionPhase, PhaseStat>,
    /// In phase order, then pass number
    pub by_pass: Vec<PassTiming>,
}

impl InspectorTiming {
    fn new() -> Self {
        Self {
            executions: 0,
            total_ms: 0.0,
            average_ms: 0.0,
            min_ms: f64::INFINITY,
            max_ms: 0.0,
            by_phase: BTreeMap::new(),
            by_pass: Vec::new(),
        }
    }

    fn add(&mut self, record: &ExecutionRecord) {
        self.executions += 1;
        self.total_ms += record.duration_ms;
        self.min_ms = self.min_ms.min(record.duration_ms);
        self.max_ms = self.max_ms.max(record.duration_ms);
        self.by_phase
            .entry(record.phase)
            .or_default()
            .add(record.duration_ms);
    }

    fn finish(&mut self) {
        self.average_ms = self.total_ms / self.executions as f64;
    }

    /// Totals for one phase execution or analysis pass
    pub fn pass(&self, phase: ExecutionPhase, pass_number: Option<u32>) -> Option<&PassTiming> {
        self.by_pass
            .iter()
            .find(|p| p.phase == phase && p.pass_number == pass_number)
    }
}

/// Totals for one phase execution or analysis pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassTiming {
    pub phase: ExecutionPhase,
    pub pass_number: Option<u32>,
    pub executions: usize,
    pub total_ms: f64,
}

impl PassTiming {
    fn new(phase: ExecutionPhase, pass_number: Option<u32>, stat: PhaseStat) -> Self {
        Self {
            phase,
            pass_number,
            executions: stat.executions,
            total_ms: stat.total_ms,
        }
    }
}

/// Read-side view over the execution log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileReport {
    /// Wall clock from `start` to `finish` (or to report time)
    pub total_duration_ms: f64,
    pub total_executions: usize,
    pub registered_count: usize,
    /// Sorted names of inspectors invoked at least once
    pub executed: Vec<String>,
    /// Sorted names of registered inspectors never invoked
    pub unused: Vec<String>,
    /// executed / registered, 0.0 when nothing is registered
    pub utilization: f64,
    pub timings: BTreeMap<String, InspectorTiming>,
    /// Highest average time
    pub slowest: Option<String>,
    /// Lowest average time
    pub fastest: Option<String>,
    /// In phase order, then pass number
    pub passes: Vec<PassTiming>,
}

impl ProfileReport {
    pub fn timing(&self, inspector: &str) -> Option<&InspectorTiming> {
        self.timings.get(inspector)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Thread-safe execution log
///
/// Thread-safe append using Mutex (simpler alternative to a lock-free queue);
/// the critical section is a single `Vec::push`.
#[derive(Debug, Default)]
pub struct ExecutionProfile {
    records: Mutex<Vec<ExecutionRecord>>,
    registered: RwLock<BTreeSet<String>>,
    started: Mutex<Option<Instant>>,
    elapsed: Mutex<Option<Duration>>,
}

impl ExecutionProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile that classifies `names` as executed or unused
    pub fn with_registered<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let profile = Self::new();
        profile.set_registered(names);
        profile
    }

    pub fn set_registered<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.registered.write() = names.into_iter().map(Into::into).collect();
    }

    pub fn start(&self) {
        *self.started.lock() = Some(Instant::now());
        *self.elapsed.lock() = None;
    }

    pub fn finish(&self) {
        if let Some(started) = *self.started.lock() {
            *self.elapsed.lock() = Some(started.elapsed());
        }
    }

    /// Append one invocation; the duration is stored in milliseconds
    pub fn record(
        &self,
        inspector: &str,
        phase: ExecutionPhase,
        pass_number: Option<u32>,
        duration: Duration,
    ) {
        self.records.lock().push(ExecutionRecord {
            inspector: inspector.to_string(),
            phase,
            pass_number,
            duration_ms: duration.as_secs_f64() * 1000.0,
        });
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn records(&self) -> Vec<ExecutionRecord> {
        self.records.lock().clone()
    }

    /// Drop all records and timing; the registered set is kept
    pub fn reset(&self) {
        self.records.lock().clear();
        *self.started.lock() = None;
        *self.elapsed.lock() = None;
    }

    pub fn report(&self) -> ProfileReport {
        let records = self.records.lock().clone();
        let registered = self.registered.read().clone();

        let mut timings: BTreeMap<String, InspectorTiming> = BTreeMap::new();
        let mut passes: BTreeMap<(ExecutionPhase, Option<u32>), PhaseStat> = BTreeMap::new();
        let mut inspector_passes: BTreeMap<(&str, ExecutionPhase, Option<u32>), PhaseStat> =
            BTreeMap::new();
        for record in &records {
            timings
                .entry(record.inspector.clone())
                .or_insert_with(InspectorTiming::new)
                .add(record);
            passes
                .entry((record.phase, record.pass_number))
                .or_default()
                .add(record.duration_ms);
            inspector_passes
                .entry((record.inspector.as_str(), record.phase, record.pass_number))
                .or_default()
                .add(record.duration_ms);
        }
        for ((name, phase, pass_number), stat) in inspector_passes {
            if let Some(timing) = timings.get_mut(name) {
                timing.by_pass.push(PassTiming::new(phase, pass_number, stat));
            }
        }
        for timing in timings.values_mut() {
            timing.finish();
        }

        let executed: Vec<String> = timings.keys().cloned().collect();
        let unused: Vec<String> = registered
            .iter()
            .filter(|name| !timings.contains_key(*name))
            .cloned()
            .collect();

        let utilization = if registered.is_empty() {
            0.0
        } else {
            let executed_registered = registered.iter().filter(|n| timings.contains_key(*n)).count();
            executed_registered as f64 / registered.len() as f64
        };

        let by_average = |a: &&(&String, &InspectorTiming), b: &&(&String, &InspectorTiming)| {
            a.1.average_ms.total_cmp(&b.1.average_ms)
        };
        let entries: Vec<(&String, &InspectorTiming)> = timings.iter().collect();
        let slowest = entries.iter().max_by(by_average).map(|(name, _)| (*name).clone());
        let fastest = entries.iter().min_by(by_average).map(|(name, _)| (*name).clone());

        let started = *self.started.lock();
        let elapsed = *self.elapsed.lock();
        let total_duration_ms = match (elapsed, started) {
            (Some(elapsed), _) => elapsed.as_secs_f64() * 1000.0,
            (None, Some(started)) => started.elapsed().as_secs_f64() * 1000.0,
            (None, None) => records.iter().map(|r| r.duration_ms).sum(),
        };

        ProfileReport {
            total_duration_ms,
            total_executions: records.len(),
            registered_count: registered.len(),
            executed,
            unused,
            utilization,
            timings,
            slowest,
            fastest,
            passes: passes
                .into_iter()
                .map(|((phase, pass_number), stat)| PassTiming::new(phase, pass_number, stat))
                .collect(),
        }
    }
}
