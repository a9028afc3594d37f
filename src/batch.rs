//! Drivers that connect input discovery, adapters, and the record sink.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{ArrayDiscovery, ArraySegmentConfig, LogParseConfig};
use crate::errors::NormalizeError;
use crate::sink::RecordSink;
use crate::source::{ArraySegmenter, TextLogParser};
use crate::transport::fs::{DirectoryListing, file_name_str};
use crate::transport::npy::read_npy;
use crate::types::{SeedIndex, TaskId};

/// One written output file.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TaskOutput {
    /// Task the file belongs to, before file-name normalization.
    pub task_id: TaskId,
    /// Seed index for array output; `None` for log output.
    pub seed: Option<SeedIndex>,
    /// Path of the written CSV file.
    pub path: PathBuf,
    /// Data rows written, excluding the header.
    pub rows: usize,
}

/// Outcome of converting one array file.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArrayFileReport {
    /// Array file that was read.
    pub source: PathBuf,
    /// Task id derived from the file name.
    pub task_id: TaskId,
    /// Element count of the flattened array.
    pub original_len: usize,
    /// Trailing elements dropped because they did not fill a whole seed.
    pub discarded: usize,
    /// One entry per complete seed, in seed order.
    pub outputs: Vec<TaskOutput>,
}

/// Outcome of converting every eligible array in a directory.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ArrayBatchReport {
    /// Per-file outcomes in processing order.
    pub files: Vec<ArrayFileReport>,
}

impl ArrayBatchReport {
    /// Rows written across every file.
    pub fn total_rows(&self) -> usize {
        self.files
            .iter()
            .flat_map(|file| file.outputs.iter())
            .map(|output| output.rows)
            .sum()
    }

    /// Elements dropped across every file.
    pub fn total_discarded(&self) -> usize {
        self.files.iter().map(|file| file.discarded).sum()
    }
}

/// Outcome of converting one log file.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LogReport {
    /// Log file that was parsed.
    pub source: PathBuf,
    /// One entry per task, in first-appearance order.
    pub outputs: Vec<TaskOutput>,
}

/// Discovers source files and runs the matching adapter once per file.
#[derive(Clone, Debug, Default)]
pub struct DirectoryBatchDriver {
    segment: ArraySegmentConfig,
    discovery: ArrayDiscovery,
    log: LogParseConfig,
}

impl DirectoryBatchDriver {
    /// Create a driver with the given segmenting parameters.
    pub fn new(segment: ArraySegmentConfig) -> Self {
        Self {
            segment,
            ..Self::default()
        }
    }

    /// Override array file selection rules.
    pub fn with_discovery(mut self, discovery: ArrayDiscovery) -> Self {
        self.discovery = discovery;
        self
    }

    /// Override log parsing configuration.
    pub fn with_log_config(mut self, log: LogParseConfig) -> Self {
        self.log = log;
        self
    }

    /// Eligible array files under `input_dir` with their derived task ids, in file-name order.
    pub fn discover(&self, input_dir: &Path) -> Result<Vec<(PathBuf, TaskId)>, NormalizeError> {
        let files = DirectoryListing::new(input_dir).files()?;
        Ok(files
            .into_iter()
            .filter_map(|path| {
                let task_id =
                    file_name_str(&path).and_then(|name| self.discovery.task_id_for(name));
                match task_id {
                    Some(task_id) => Some((path, task_id)),
                    None => {
                        debug!("[seedcurves:array] skipping {}", path.display());
                        None
                    }
                }
            })
            .collect())
    }

    /// Convert every eligible array in `input_dir` into per-seed CSV files.
    pub fn convert_array_dir(
        &self,
        input_dir: &Path,
        output_dir: &Path,
    ) -> Result<ArrayBatchReport, NormalizeError> {
        let segmenter = ArraySegmenter::new(self.segment.clone())?;
        let eligible = self.discover(input_dir)?;
        let sink = RecordSink::create(output_dir)?;
        info!(
            "[seedcurves:array] converting {} arrays from {} (epochs_per_seed={}, wall_time_increment={})",
            eligible.len(),
            input_dir.display(),
            self.segment.epochs_per_seed,
            self.segment.wall_time_increment
        );

        let mut report = ArrayBatchReport::default();
        for (path, task_id) in eligible {
            report
                .files
                .push(convert_array_file(&segmenter, &sink, &path, &task_id)?);
        }
        Ok(report)
    }

    /// Convert one log file into per-task CSV files.
    pub fn convert_log_file(
        &self,
        log_path: &Path,
        output_dir: &Path,
    ) -> Result<LogReport, NormalizeError> {
        let records = TextLogParser::new(self.log.clone()).parse_file(log_path)?;
        let sink = RecordSink::create(output_dir)?;
        let mut outputs = Vec::with_capacity(records.task_count());
        for (task_id, task_records) in records.iter() {
            let path = sink.write(task_id, None, task_records)?;
            outputs.push(TaskOutput {
                task_id: task_id.to_string(),
                seed: None,
                path,
                rows: task_records.len(),
            });
        }
        Ok(LogReport {
            source: log_path.to_path_buf(),
            outputs,
        })
    }
}

/// Decode, segment, and write one array file.
pub fn convert_array_file(
    segmenter: &ArraySegmenter,
    sink: &RecordSink,
    path: &Path,
    task_id: &str,
) -> Result<ArrayFileReport, NormalizeError> {
    let values = read_npy(path)?.into_flat();
    let segmented = segmenter.segment(task_id, &values);
    let mut outputs = Vec::with_capacity(segmented.seed_count());
    for (seed, records) in segmented.seeds.iter().enumerate() {
        let seed = seed as SeedIndex;
        let written = sink.write(task_id, Some(seed), records)?;
        outputs.push(TaskOutput {
            task_id: task_id.to_string(),
            seed: Some(seed),
            path: written,
            rows: records.len(),
        });
    }
    Ok(ArrayFileReport {
        source: path.to_path_buf(),
        task_id: task_id.to_string(),
        original_len: segmented.original_len,
        discarded: segmented.discarded,
        outputs,
    })
}
