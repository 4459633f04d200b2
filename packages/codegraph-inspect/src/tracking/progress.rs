//! Inspector trigger tracking
//!
//! Records, per inspector, when it first fired, on which artifact, its
//! processing rank and every artifact it touched. Safe to share across the
//! worker pool: the map is a `DashMap` and the rank counter is atomic, with
//! the rank drawn inside the entry lock so each inspector gets exactly one.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Per-inspector trigger record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectorTriggerInfo {
    pub inspector_name: String,
    /// 1-based rank, assigned once at first trigger
    pub processing_order: usize,
    pub first_artifact_id: String,
    pub first_trigger_time: DateTime<Utc>,
    /// Distinct artifacts processed
    pub files_processed: BTreeSet<String>,
    /// Every invocation, repeats included
    pub execution_count: u64,
}

impl InspectorTriggerInfo {
    fn first(inspector: &str, artifact: &str, order: usize) -> Self {
        let mut files_processed = BTreeSet::new();
        files_processed.insert(artifact.to_string());
        Self {
            inspector_name: inspector.to_string(),
            processing_order: order,
            first_artifact_id: artifact.to_string(),
            first_trigger_time: Utc::now(),
            files_processed,
            execution_count: 1,
        }
    }

    fn touch(&mut self, artifact: &str) {
        if !self.files_processed.contains(artifact) {
            self.files_processed.insert(artifact.to_string());
        }
        self.execution_count += 1;
    }
}

/// Point-in-time tracker summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub triggered_count: usize,
    pub total_executions: u64,
    /// Inspectors that processed at least one artifact
    pub inspectors_with_files: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_ms: u64,
    /// Human-readable form of `duration_ms`
    pub duration: String,
}

/// Thread-safe trigger tracker for one analysis run
#[derive(Debug)]
pub struct ProgressTracker {
    triggers: DashMap<String, InspectorTriggerInfo>,
    next_order: AtomicUsize,
    total_executions: AtomicU64,
    started_at: Mutex<DateTime<Utc>>,
    completed_at: Mutex<Option<DateTime<Utc>>>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            triggers: DashMap::new(),
            next_order: AtomicUsize::new(0),
            total_executions: AtomicU64::new(0),
            started_at: Mutex::new(Utc::now()),
            completed_at: Mutex::new(None),
        }
    }

    /// Record one invocation of `inspector` on `artifact`
    pub fn record_trigger(&self, inspector: &str, artifact: &str) {
        self.total_executions.fetch_add(1, Ordering::Relaxed);

        // Fast path: already known, no String allocation for the key
        if let Some(mut info) = self.triggers.get_mut(inspector) {
            info.touch(artifact);
            return;
        }

        // The shard write lock makes the closure run once per key
        self.triggers
            .entry(inspector.to_string())
            .and_modify(|info| info.touch(artifact))
            .or_insert_with(|| {
                let order = self.next_order.fetch_add(1, Ordering::SeqCst) + 1;
                InspectorTriggerInfo::first(inspector, artifact, order)
            });
    }

    pub fn has_triggered(&self, inspector: &str) -> bool {
        self.triggers.contains_key(inspector)
    }

    pub fn trigger_info(&self, inspector: &str) -> Option<InspectorTriggerInfo> {
        self.triggers.get(inspector).map(|info| info.clone())
    }

    /// All triggered inspectors sorted by processing order
    pub fn triggered_in_order(&self) -> Vec<InspectorTriggerInfo> {
        let mut infos: Vec<_> = self.triggers.iter().map(|e| e.value().clone()).collect();
        infos.sort_by_key(|info| info.processing_order);
        infos
    }

    pub fn processed_files(&self, inspector: &str) -> BTreeSet<String> {
        self.triggers
            .get(inspector)
            .map(|info| info.files_processed.clone())
            .unwrap_or_default()
    }

    pub fn processed_file_count(&self, inspector: &str) -> usize {
        self.triggers
            .get(inspector)
            .map_or(0, |info| info.files_processed.len())
    }

    pub fn triggered_count(&self) -> usize {
        self.triggers.len()
    }

    pub fn total_executions(&self) -> u64 {
        self.total_executions.load(Ordering::Relaxed)
    }

    /// Freeze the completion timestamp; later calls keep the first value
    pub fn mark_completed(&self) {
        let mut completed = self.completed_at.lock();
        if completed.is_none() {
            *completed = Some(Utc::now());
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.lock().is_some()
    }

    /// Clear everything for the next run
    pub fn reset(&self) {
        self.triggers.clear();
        self.next_order.store(0, Ordering::SeqCst);
        self.total_executions.store(0, Ordering::SeqCst);
        *self.started_at.lock() = Utc::now();
        *self.completed_at.lock() = None;
    }

    pub fn summary(&self) -> ProgressSummary {
        let started_at = *self.started_at.lock();
        let completed_at = *self.completed_at.lock();
        let end = completed_at.unwrap_or_else(Utc::now);
        let duration_ms = (end - started_at).num_milliseconds().max(0) as u64;

        let inspectors_with_files = self
            .triggers
            .iter()
            .filter(|e| !e.value().files_processed.is_empty())
            .count();

        ProgressSummary {
            triggered_count: self.triggers.len(),
            total_executions: self.total_executions(),
            inspectors_with_files,
            started_at,
            completed_at,
            duration_ms,
            duration: format_duration(duration_ms),
        }
    }
}

/// `1h 2m 3s`, `2m 5s`, `4.250s` or `12ms`
pub fn format_duration(ms: u64) -> String {
    let total_secs = ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else if total_secs > 0 {
        format!("{}.{:03}s", seconds, ms % 1000)
    } else {
        format!("{}ms", ms)
    }
}
