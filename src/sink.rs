use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::constants::sink::CSV_HEADER;
use crate::data::NormalizedRecord;
use crate::errors::NormalizeError;
use crate::transport::fs::ensure_dir;
use crate::types::SeedIndex;
use crate::utils::{format_csv_float, output_file_name};

/// Writes normalized record sequences as `wall_time,step,value` CSV files.
///
/// One file per task (log output) or per task and seed (array output). Existing
/// files are truncated and rewritten; no atomic-replace is attempted.
#[derive(Clone, Debug)]
pub struct RecordSink {
    output_dir: PathBuf,
}

impl RecordSink {
    /// Create a sink targeting `output_dir`, creating it (with parents) if absent.
    pub fn create(output_dir: impl Into<PathBuf>) -> Result<Self, NormalizeError> {
        let output_dir = output_dir.into();
        ensure_dir(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Directory files are written into.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Destination path for a task and optional seed.
    pub fn path_for(&self, task_id: &str, seed: Option<SeedIndex>) -> PathBuf {
        self.output_dir.join(output_file_name(task_id, seed))
    }

    /// Write `records` for one task (and seed) and return the written path.
    pub fn write(
        &self,
        task_id: &str,
        seed: Option<SeedIndex>,
        records: &[NormalizedRecord],
    ) -> Result<PathBuf, NormalizeError> {
        let path = self.path_for(task_id, seed);
        let mut writer = BufWriter::new(File::create(&path)?);
        write_csv(&mut writer, records)?;
        writer.flush()?;
        info!(
            "[seedcurves:sink] saved {} ({} rows)",
            path.display(),
            records.len()
        );
        Ok(path)
    }
}

/// Serialize `records` as CSV (header plus one row per record, input order).
///
/// A missing wall time is written as an empty field.
pub fn write_csv<W: Write>(writer: &mut W, records: &[NormalizedRecord]) -> std::io::Result<()> {
    writeln!(writer, "{CSV_HEADER}")?;
    for record in records {
        let wall_time = record.wall_time.map(format_csv_float).unwrap_or_default();
        writeln!(
            writer,
            "{},{},{}",
            wall_time,
            record.step,
            format_csv_float(record.value)
        )?;
    }
    Ok(())
}
