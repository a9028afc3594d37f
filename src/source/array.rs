use serde::Serialize;
use tracing::warn;

use crate::config::ArraySegmentConfig;
use crate::data::NormalizedRecord;
use crate::errors::NormalizeError;
use crate::types::{SeedIndex, Step, TaskId, WallTime};

/// Result of splitting one concatenated array into per-seed runs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SegmentedArray {
    /// Task the array belongs to.
    pub task_id: TaskId,
    /// Length of the input array before trimming.
    pub original_len: usize,
    /// Trailing elements dropped because they did not fill a whole seed.
    pub discarded: usize,
    /// One independent run per seed, each restarting at step 0 and wall time 0.
    pub seeds: Vec<Vec<NormalizedRecord>>,
}

impl SegmentedArray {
    /// Number of complete seed runs.
    pub fn seed_count(&self) -> usize {
        self.seeds.len()
    }

    /// Total records across every seed.
    pub fn record_count(&self) -> usize {
        self.seeds.iter().map(Vec::len).sum()
    }
}

/// Splits flat arrays of concatenated fixed-length seed runs.
#[derive(Clone, Debug, Default)]
pub struct ArraySegmenter {
    config: ArraySegmentConfig,
}

impl ArraySegmenter {
    /// Create a segmenter, rejecting unusable parameters up front.
    pub fn new(config: ArraySegmentConfig) -> Result<Self, NormalizeError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Segment `values` into `len / epochs_per_seed` seed runs.
    ///
    /// A trailing partial run is discarded and reported with a warning.
    pub fn segment(&self, task_id: &str, values: &[f64]) -> SegmentedArray {
        let epochs = self.config.epochs_per_seed;
        let num_full_seeds = values.len() / epochs;
        let remainder = values.len() % epochs;
        if remainder != 0 {
            warn!(
                "[seedcurves:array] trimming {} entries from '{}' (original length = {})",
                remainder,
                task_id,
                values.len()
            );
        }

        let trimmed = &values[..num_full_seeds * epochs];
        let seeds = trimmed
            .chunks_exact(epochs)
            .enumerate()
            .map(|(seed, segment)| self.seed_records(task_id, seed as SeedIndex, segment))
            .collect();

        SegmentedArray {
            task_id: task_id.to_string(),
            original_len: values.len(),
            discarded: remainder,
            seeds,
        }
    }

    fn seed_records(
        &self,
        task_id: &str,
        seed: SeedIndex,
        segment: &[f64],
    ) -> Vec<NormalizedRecord> {
        segment
            .iter()
            .enumerate()
            .map(|(idx, value)| NormalizedRecord {
                task_id: task_id.to_string(),
                step: idx as Step,
                wall_time: Some(idx as WallTime * self.config.wall_time_increment),
                value: *value,
                seed: Some(seed),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    fn segmenter(epochs: usize) -> ArraySegmenter {
        ArraySegmenter::new(ArraySegmentConfig::new(epochs)).unwrap()
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl CapturedLog {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn segment_with_log(epochs: usize, values: &[f64]) -> (SegmentedArray, String) {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, || {
            segmenter(epochs).segment("Foo-v0", values)
        });
        (result, log.contents())
    }

    #[test]
    fn trim_warning_names_task_and_lengths() {
        let values: Vec<f64> = (0..7).map(f64::from).collect();
        let (result, log) = segment_with_log(3, &values);

        assert_eq!(result.discarded, 1);
        assert!(log.contains("WARN"));
        assert!(log.contains("trimming 1 entries from 'Foo-v0' (original length = 7)"));
    }

    #[test]
    fn exact_multiple_logs_no_warning() {
        let values: Vec<f64> = (0..6).map(f64::from).collect();
        let (result, log) = segment_with_log(3, &values);

        assert_eq!(result.discarded, 0);
        assert!(!log.contains("trimming"));
    }

    #[test]
    fn splits_concatenated_runs_into_independent_seeds() {
        let result = segmenter(3).segment("Foo-v0", &[10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);

        assert_eq!(result.seed_count(), 2);
        assert_eq!(result.discarded, 0);
        assert_eq!(result.original_len, 6);
        for (seed, run) in result.seeds.iter().enumerate() {
            let steps: Vec<Step> = run.iter().map(|r| r.step).collect();
            let times: Vec<f64> = run.iter().map(|r| r.wall_time.unwrap()).collect();
            assert_eq!(steps, vec![0, 1, 2]);
            assert_eq!(times, vec![0.0, 2.0, 4.0]);
            assert!(run.iter().all(|r| r.seed == Some(seed as SeedIndex)));
            assert!(run.iter().all(|r| r.task_id == "Foo-v0"));
        }
        let values: Vec<Vec<f64>> = result
            .seeds
            .iter()
            .map(|run| run.iter().map(|r| r.value).collect())
            .collect();
        assert_eq!(values, vec![vec![10.0, 20.0, 30.0], vec![40.0, 50.0, 60.0]]);
    }

    #[test]
    fn trailing_partial_run_is_discarded() {
        let values: Vec<f64> = (0..7).map(f64::from).collect();
        let result = segmenter(3).segment("Foo-v0", &values);

        assert_eq!(result.seed_count(), 2);
        assert_eq!(result.record_count(), 6);
        assert_eq!(result.discarded, 1);
        assert!(
            result
                .seeds
                .iter()
                .flatten()
                .all(|record| record.value != 6.0)
        );
    }

    #[test]
    fn array_shorter_than_one_seed_yields_nothing() {
        let result = segmenter(5).segment("Short-v0", &[1.0, 2.0]);
        assert_eq!(result.seed_count(), 0);
        assert_eq!(result.record_count(), 0);
        assert_eq!(result.discarded, 2);

        let empty = segmenter(5).segment("Empty-v0", &[]);
        assert_eq!(empty.seed_count(), 0);
        assert_eq!(empty.discarded, 0);
    }

    #[test]
    fn counts_follow_division_law() {
        for len in 0..40usize {
            for k in 1..9usize {
                let values: Vec<f64> = (0..len).map(|v| v as f64).collect();
                let result = segmenter(k).segment("Law-v0", &values);
                assert_eq!(result.seed_count(), len / k);
                assert_eq!(result.record_count(), k * (len / k));
                assert_eq!(result.discarded, len % k);
            }
        }
    }

    #[test]
    fn custom_increment_scales_wall_time() {
        let segmenter =
            ArraySegmenter::new(ArraySegmentConfig::new(4).with_wall_time_increment(0.5)).unwrap();
        let result = segmenter.segment("Inc-v0", &[0.0; 4]);
        let times: Vec<f64> = result.seeds[0]
            .iter()
            .map(|r| r.wall_time.unwrap())
            .collect();
        assert_eq!(times, vec![0.0, 0.5, 1.0, 1.5]);
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(ArraySegmenter::new(ArraySegmentConfig::new(0)).is_err());
    }
}
