#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Command-line runners shared by the bundled binaries.
pub mod apps;
/// Directory drivers connecting discovery, adapters, and the sink.
pub mod batch;
/// Parsing and segmenting configuration types.
pub mod config;
/// Centralized constants used by the adapters, decoder, and sink.
pub mod constants;
/// Normalized record and grouping types.
pub mod data;
/// CSV record sink.
pub mod sink;
/// Input adapters for text logs and flat arrays.
pub mod source;
/// Input transports (filesystem listing and `.npy` decoding).
pub mod transport;
/// Shared type aliases.
pub mod types;
/// File naming and number formatting helpers.
pub mod utils;

mod errors;

pub use batch::{ArrayBatchReport, ArrayFileReport, DirectoryBatchDriver, LogReport, TaskOutput};
pub use config::{ArrayDiscovery, ArraySegmentConfig, LogParseConfig, MalformedTimestampPolicy};
pub use data::{NormalizedRecord, RecordSet};
pub use errors::NormalizeError;
pub use sink::RecordSink;
pub use source::{ArraySegmenter, SegmentedArray, SourceCursor, TextLogParser};
pub use types::{SeedIndex, Step, TaskId, WallTime};
