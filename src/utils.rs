//! Naming and number formatting helpers shared by the sink and the drivers.

use crate::constants::sink::{CSV_EXTENSION, FILENAME_SUBSTITUTE, SEED_INFIX};
use crate::types::SeedIndex;

/// Replace every character outside `[A-Za-z0-9_]` with the filename substitute.
pub fn normalize_file_stem<T: AsRef<str>>(task_id: T) -> String {
    task_id
        .as_ref()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ch
            } else {
                FILENAME_SUBSTITUTE
            }
        })
        .collect()
}

/// Output file name for a task and optional seed.
///
/// `("Foo-v0", None)` => `Foo_v0.csv`, `("Foo-v0", Some(2))` => `Foo_v0_seed2.csv`.
pub fn output_file_name(task_id: &str, seed: Option<SeedIndex>) -> String {
    let stem = normalize_file_stem(task_id);
    match seed {
        Some(seed) => format!("{stem}{SEED_INFIX}{seed}.{CSV_EXTENSION}"),
        None => format!("{stem}.{CSV_EXTENSION}"),
    }
}

/// Format a float for CSV output.
///
/// Uses the shortest round-trip representation and always keeps a decimal
/// point for integral values (`2.0`, not `2`). NaN becomes an empty field.
pub fn format_csv_float(value: f64) -> String {
    if value.is_nan() {
        return String::new();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    format!("{value:?}")
}
