#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// Write a one-dimensional little-endian `f64` `.npy` file.
pub fn write_f64_npy(path: &Path, values: &[f64]) {
    let mut header = format!(
        "{{'descr': '<f8', 'fortran_order': False, 'shape': ({},), }}",
        values.len()
    );
    // Pad so the payload starts on a 64-byte boundary, as numpy does.
    let unpadded = 10 + header.len() + 1;
    header.push_str(&" ".repeat((64 - unpadded % 64) % 64));
    header.push('\n');

    let mut bytes = b"\x93NUMPY\x01\x00".to_vec();
    bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
    bytes.extend_from_slice(header.as_bytes());
    for value in values {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    fs::write(path, bytes).unwrap();
}

/// Parse a written CSV into `(wall_time, step, value)` rows.
pub fn read_rows(path: &Path) -> Vec<(Option<f64>, u64, f64)> {
    let content = fs::read_to_string(path).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("wall_time,step,value"));
    lines
        .map(|line| {
            let fields: Vec<&str> = line.split(',').collect();
            assert_eq!(fields.len(), 3, "unexpected row '{line}'");
            let wall_time = if fields[0].is_empty() {
                None
            } else {
                Some(fields[0].parse().unwrap())
            };
            (wall_time, fields[1].parse().unwrap(), fields[2].parse().unwrap())
        })
        .collect()
}

/// Sorted file names inside `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

/// Read every file in `dir` keyed by name.
pub fn snapshot(dir: &Path) -> Vec<(String, Vec<u8>)> {
    file_names(dir)
        .into_iter()
        .map(|name| {
            let bytes = fs::read(dir.join(&name)).unwrap();
            (name, bytes)
        })
        .collect()
}
