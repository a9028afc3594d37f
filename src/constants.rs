/// Constants used by text-log extraction.
pub mod log {
    /// Leading timestamp pattern matched at the start of a log line.
    pub const TIMESTAMP_PATTERN: &str = r"^(\d{2}/\d{2}/\d{4} \d{2}:\d{2}:\d{2})";
    /// `chrono` format used to parse the captured timestamp (`DD/MM/YYYY HH:MM:SS`).
    pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
    /// Metric marker pattern searched anywhere in a log line.
    ///
    /// Captures: epoch, environment name, average return.
    pub const METRIC_PATTERN: &str =
        r"\[INFO\] Epoch (\d+) \| EnvName: (\S+) .*?AverageReturn: (\d+(?:\.\d*)?|\.\d+)";
}

/// Constants used by array discovery and segmentation.
pub mod array {
    /// File extension (without the dot) of serialized arrays.
    pub const ARRAY_EXTENSION: &str = "npy";
    /// Marker substring identifying average-return arrays; stripped from the task id.
    pub const AVERAGE_RETURN_MARKER: &str = "_AverageReturn";
    /// Default number of recorded epochs per seed run.
    pub const DEFAULT_EPOCHS_PER_SEED: usize = 100;
    /// Default synthetic seconds per recorded step.
    pub const DEFAULT_WALL_TIME_INCREMENT: f64 = 2.0;
}

/// Constants used by `.npy` decoding.
pub mod npy {
    /// Magic prefix of every `.npy` file.
    pub const MAGIC: &[u8] = b"\x93NUMPY";
    /// Byte length of the magic prefix plus the two version bytes.
    pub const PREAMBLE_LEN: usize = 8;
}

/// Constants used by the CSV record sink.
pub mod sink {
    /// Header row written at the top of every output file.
    pub const CSV_HEADER: &str = "wall_time,step,value";
    /// Extension of written files.
    pub const CSV_EXTENSION: &str = "csv";
    /// Replacement for characters outside `[A-Za-z0-9_]` in output file names.
    pub const FILENAME_SUBSTITUTE: char = '_';
    /// Infix placed between the task name and the seed index.
    pub const SEED_INFIX: &str = "_seed";
    /// Default output directory used by the command-line runners.
    pub const DEFAULT_OUTPUT_DIR: &str = "moore_csv_out";
}
