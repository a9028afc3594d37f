use indexmap::IndexMap;
use serde::Serialize;

use crate::types::{SeedIndex, Step, TaskId, WallTime};

/// Canonical unit of normalized telemetry output.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NormalizedRecord {
    /// Metric source this record belongs to.
    pub task_id: TaskId,
    /// Epoch or iteration index, in source order.
    pub step: Step,
    /// Seconds since the first record of the originating source.
    ///
    /// `None` for log records emitted before any timestamp was observed.
    pub wall_time: Option<WallTime>,
    /// Metric value (average return).
    pub value: f64,
    /// Seed segment index for array-derived records.
    pub seed: Option<SeedIndex>,
}

/// Records grouped by task, in order of first appearance.
///
/// Each task maps to an append-only sequence that preserves source order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RecordSet {
    tasks: IndexMap<TaskId, Vec<NormalizedRecord>>,
}

impl RecordSet {
    /// Create an empty record set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to its task group, creating the group on first sight.
    pub fn push(&mut self, record: NormalizedRecord) {
        self.tasks
            .entry(record.task_id.clone())
            .or_default()
            .push(record);
    }

    /// Records for one task, if any were seen.
    pub fn get(&self, task_id: &str) -> Option<&[NormalizedRecord]> {
        self.tasks.get(task_id).map(Vec::as_slice)
    }

    /// Task ids in order of first appearance.
    pub fn task_ids(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }

    /// Iterate `(task_id, records)` groups in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[NormalizedRecord])> {
        self.tasks
            .iter()
            .map(|(task_id, records)| (task_id.as_str(), records.as_slice()))
    }

    /// Number of distinct tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Total number of records across all tasks.
    pub fn record_count(&self) -> usize {
        self.tasks.values().map(Vec::len).sum()
    }

    /// True when no record was collected.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl FromIterator<NormalizedRecord> for RecordSet {
    fn from_iter<I: IntoIterator<Item = NormalizedRecord>>(iter: I) -> Self {
        let mut set = RecordSet::new();
        for record in iter {
            set.push(record);
        }
        set
    }
}
