//! Input adapters.
//!
//! Each adapter turns one source encoding into [`NormalizedRecord`](crate::data::NormalizedRecord)
//! sequences without touching the filesystem output:
//! - `TextLogParser` folds a [`SourceCursor`] over log lines and groups records by task.
//! - `ArraySegmenter` splits a flat array of concatenated runs into per-seed sequences.

/// Flat-array seed segmentation.
pub mod array;
/// Timestamped text-log extraction.
pub mod text_log;

pub use array::{ArraySegmenter, SegmentedArray};
pub use text_log::{SourceCursor, TextLogParser};
