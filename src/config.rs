use crate::constants::array::{
    ARRAY_EXTENSION, AVERAGE_RETURN_MARKER, DEFAULT_EPOCHS_PER_SEED, DEFAULT_WALL_TIME_INCREMENT,
};
use crate::errors::NormalizeError;

/// What the log parser does when a line starts with a timestamp-shaped prefix
/// that is not a valid calendar date/time (for example `31/02/2024 10:00:00`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MalformedTimestampPolicy {
    /// Warn and treat the line as carrying no timestamp.
    #[default]
    Skip,
    /// Abort the whole invocation with `NormalizeError::MalformedTimestamp`.
    Fail,
}

/// Text-log parsing configuration.
#[derive(Clone, Debug, Default)]
pub struct LogParseConfig {
    /// Handling of timestamp prefixes that fail calendar validation.
    pub malformed_timestamps: MalformedTimestampPolicy,
}

impl LogParseConfig {
    /// Override the malformed-timestamp policy.
    pub fn with_malformed_timestamps(mut self, policy: MalformedTimestampPolicy) -> Self {
        self.malformed_timestamps = policy;
        self
    }
}

/// Segmenting parameters shared by every array of a batch.
#[derive(Clone, Debug, PartialEq)]
pub struct ArraySegmentConfig {
    /// Number of consecutive samples that make up one seed run.
    pub epochs_per_seed: usize,
    /// Synthetic seconds between two recorded steps.
    pub wall_time_increment: f64,
}

impl Default for ArraySegmentConfig {
    fn default() -> Self {
        Self {
            epochs_per_seed: DEFAULT_EPOCHS_PER_SEED,
            wall_time_increment: DEFAULT_WALL_TIME_INCREMENT,
        }
    }
}

impl ArraySegmentConfig {
    /// Create a config with an explicit seed length and the default increment.
    pub fn new(epochs_per_seed: usize) -> Self {
        Self {
            epochs_per_seed,
            ..Self::default()
        }
    }

    /// Override the synthetic wall-time increment.
    pub fn with_wall_time_increment(mut self, wall_time_increment: f64) -> Self {
        self.wall_time_increment = wall_time_increment;
        self
    }

    /// Reject parameters that cannot produce a meaningful segmentation.
    pub fn validate(&self) -> Result<(), NormalizeError> {
        if self.epochs_per_seed == 0 {
            return Err(NormalizeError::Configuration(
                "epochs_per_seed must be greater than zero".to_string(),
            ));
        }
        if !self.wall_time_increment.is_finite() || self.wall_time_increment <= 0.0 {
            return Err(NormalizeError::Configuration(format!(
                "wall_time_increment must be a positive finite number (got {})",
                self.wall_time_increment
            )));
        }
        Ok(())
    }
}

/// Rules selecting array files inside an input directory.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayDiscovery {
    /// Required file extension, without the leading dot.
    pub extension: String,
    /// Substring every selected file name must contain; removed when deriving the task id.
    pub marker: String,
}

impl Default for ArrayDiscovery {
    fn default() -> Self {
        Self {
            extension: ARRAY_EXTENSION.to_string(),
            marker: AVERAGE_RETURN_MARKER.to_string(),
        }
    }
}

impl ArrayDiscovery {
    /// Override the selection marker.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Task id for `file_name`, or `None` when the file is not eligible.
    ///
    /// `Foo-v0_AverageReturn.npy` yields `Foo-v0`.
    pub fn task_id_for(&self, file_name: &str) -> Option<String> {
        let stem = file_name
            .strip_suffix(self.extension.as_str())
            .and_then(|rest| rest.strip_suffix('.'))?;
        if !stem.contains(self.marker.as_str()) {
            return None;
        }
        let task_id = stem.replacen(self.marker.as_str(), "", 1);
        if task_id.is_empty() {
            return None;
        }
        Some(task_id)
    }
}
