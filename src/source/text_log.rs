use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use tracing::{info, warn};

use crate::config::{LogParseConfig, MalformedTimestampPolicy};
use crate::constants::log::{METRIC_PATTERN, TIMESTAMP_FORMAT, TIMESTAMP_PATTERN};
use crate::data::{NormalizedRecord, RecordSet};
use crate::errors::NormalizeError;
use crate::types::{Step, WallTime};

static TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TIMESTAMP_PATTERN).expect("timestamp pattern compiles"));
static METRIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(METRIC_PATTERN).expect("metric pattern compiles"));

/// Parsing state threaded through a fold over log lines.
///
/// A fresh cursor has neither a start time nor a wall time. Feeding a line into
/// [`TextLogParser::step`] returns the next cursor, so a parse can be resumed
/// from any saved cursor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SourceCursor {
    /// First timestamp observed in the stream (wall_time = 0 reference).
    pub start_time: Option<NaiveDateTime>,
    /// Offset of the most recently observed timestamp from `start_time`.
    pub current_wall_time: Option<WallTime>,
}

impl SourceCursor {
    /// Advance the cursor past a timestamped line.
    pub fn observe(self, timestamp: NaiveDateTime) -> Self {
        let start_time = self.start_time.unwrap_or(timestamp);
        let elapsed = timestamp - start_time;
        Self {
            start_time: Some(start_time),
            current_wall_time: Some(elapsed.num_seconds() as WallTime),
        }
    }
}

/// Extracts per-task metric records from a sequential training log.
#[derive(Clone, Debug, Default)]
pub struct TextLogParser {
    config: LogParseConfig,
}

impl TextLogParser {
    /// Create a parser with explicit configuration.
    pub fn new(config: LogParseConfig) -> Self {
        Self { config }
    }

    /// Process one line: update the cursor from a leading timestamp, then try
    /// to extract a metric record.
    ///
    /// `line_number` is 1-based and only used for diagnostics.
    pub fn step(
        &self,
        cursor: SourceCursor,
        line_number: usize,
        line: &str,
    ) -> Result<(SourceCursor, Option<NormalizedRecord>), NormalizeError> {
        let cursor = match self.leading_timestamp(line_number, line)? {
            Some(timestamp) => cursor.observe(timestamp),
            None => cursor,
        };
        let record = extract_metric(line_number, line, cursor.current_wall_time);
        Ok((cursor, record))
    }

    /// Fold `lines` into per-task record groups, starting from `cursor`.
    ///
    /// Returns the final cursor alongside the collected records.
    pub fn parse_from<I, S>(
        &self,
        cursor: SourceCursor,
        lines: I,
    ) -> Result<(SourceCursor, RecordSet), NormalizeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut records = RecordSet::new();
        let mut cursor = cursor;
        for (idx, line) in lines.into_iter().enumerate() {
            let (next, record) = self.step(cursor, idx + 1, line.as_ref())?;
            cursor = next;
            if let Some(record) = record {
                records.push(record);
            }
        }
        Ok((cursor, records))
    }

    /// Parse a complete log from a fresh cursor.
    pub fn parse_lines<I, S>(&self, lines: I) -> Result<RecordSet, NormalizeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.parse_from(SourceCursor::default(), lines)
            .map(|(_, records)| records)
    }

    /// Read `path` entirely and parse it.
    pub fn parse_file(&self, path: &Path) -> Result<RecordSet, NormalizeError> {
        if !path.exists() {
            return Err(NormalizeError::InputNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let records = self.parse_lines(content.lines())?;
        info!(
            "[seedcurves:log] parsed {} records for {} tasks from {}",
            records.record_count(),
            records.task_count(),
            path.display()
        );
        Ok(records)
    }

    fn leading_timestamp(
        &self,
        line_number: usize,
        line: &str,
    ) -> Result<Option<NaiveDateTime>, NormalizeError> {
        let Some(captures) = TIMESTAMP_RE.captures(line) else {
            return Ok(None);
        };
        let raw = &captures[1];
        match NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
            Ok(timestamp) => Ok(Some(timestamp)),
            Err(err) => match self.config.malformed_timestamps {
                MalformedTimestampPolicy::Skip => {
                    warn!(
                        "[seedcurves:log] line {}: ignoring malformed timestamp '{}': {}",
                        line_number, raw, err
                    );
                    Ok(None)
                }
                MalformedTimestampPolicy::Fail => Err(NormalizeError::MalformedTimestamp {
                    line: line_number,
                    raw: raw.to_string(),
                    reason: err.to_string(),
                }),
            },
        }
    }
}

fn extract_metric(
    line_number: usize,
    line: &str,
    wall_time: Option<WallTime>,
) -> Option<NormalizedRecord> {
    let captures = METRIC_RE.captures(line)?;
    let step = match captures[1].parse::<Step>() {
        Ok(step) => step,
        Err(err) => {
            warn!(
                "[seedcurves:log] line {}: skipping metric with unusable epoch '{}': {}",
                line_number, &captures[1], err
            );
            return None;
        }
    };
    let value = match captures[3].parse::<f64>() {
        Ok(value) => value,
        Err(err) => {
            warn!(
                "[seedcurves:log] line {}: skipping metric with unusable return '{}': {}",
                line_number, &captures[3], err
            );
            return None;
        }
    };
    Some(NormalizedRecord {
        task_id: captures[2].to_string(),
        step,
        wall_time,
        value,
        seed: None,
    })
}
