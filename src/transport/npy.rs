//! Minimal reader for NumPy `.npy` files holding numeric arrays.
//!
//! Layout: magic `\x93NUMPY`, major/minor version bytes, a little-endian header
//! length (`u16` for 1.x, `u32` for 2.x/3.x), a Python-dict header with `descr`,
//! `fortran_order` and `shape`, then the raw element bytes.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::constants::npy::{MAGIC, PREAMBLE_LEN};
use crate::errors::NormalizeError;

static DESCR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'descr'\s*:\s*'([^']*)'").expect("descr pattern compiles"));
static FORTRAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"'fortran_order'\s*:\s*(True|False)").expect("fortran pattern compiles")
});
static SHAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'shape'\s*:\s*\(([^)]*)\)").expect("shape pattern compiles"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ByteOrder {
    Little,
    Big,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ElementKind {
    Float,
    Int,
    UInt,
    Bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Dtype {
    order: ByteOrder,
    kind: ElementKind,
    size: usize,
}

impl Dtype {
    fn parse(descr: &str) -> Result<Self, String> {
        let mut chars = descr.chars();
        let order = match chars.next() {
            Some('<') | Some('|') => ByteOrder::Little,
            Some('>') => ByteOrder::Big,
            Some('=') if cfg!(target_endian = "big") => ByteOrder::Big,
            Some('=') => ByteOrder::Little,
            _ => return Err(format!("unsupported dtype '{descr}'")),
        };
        let kind = match chars.next() {
            Some('f') => ElementKind::Float,
            Some('i') => ElementKind::Int,
            Some('u') => ElementKind::UInt,
            Some('b') => ElementKind::Bool,
            _ => return Err(format!("unsupported dtype '{descr}'")),
        };
        let size = chars
            .as_str()
            .parse::<usize>()
            .map_err(|_| format!("unsupported dtype '{descr}'"))?;
        let supported = match kind {
            ElementKind::Float => matches!(size, 4 | 8),
            ElementKind::Int | ElementKind::UInt => matches!(size, 1 | 2 | 4 | 8),
            ElementKind::Bool => size == 1,
        };
        if !supported {
            return Err(format!("unsupported dtype '{descr}'"));
        }
        Ok(Self { order, kind, size })
    }

    fn decode(&self, chunk: &[u8]) -> f64 {
        match (self.kind, self.size) {
            (ElementKind::Float, 4) => f32::from_le_bytes(le_bytes(chunk, self.order)) as f64,
            (ElementKind::Float, _) => f64::from_le_bytes(le_bytes(chunk, self.order)),
            (ElementKind::Int, 1) => chunk[0] as i8 as f64,
            (ElementKind::Int, 2) => i16::from_le_bytes(le_bytes(chunk, self.order)) as f64,
            (ElementKind::Int, 4) => i32::from_le_bytes(le_bytes(chunk, self.order)) as f64,
            (ElementKind::Int, _) => i64::from_le_bytes(le_bytes(chunk, self.order)) as f64,
            (ElementKind::UInt, 1) => chunk[0] as f64,
            (ElementKind::UInt, 2) => u16::from_le_bytes(le_bytes(chunk, self.order)) as f64,
            (ElementKind::UInt, 4) => u32::from_le_bytes(le_bytes(chunk, self.order)) as f64,
            (ElementKind::UInt, _) => u64::from_le_bytes(le_bytes(chunk, self.order)) as f64,
            (ElementKind::Bool, _) => {
                if chunk[0] == 0 {
                    0.0
                } else {
                    1.0
                }
            }
        }
    }
}

fn le_bytes<const N: usize>(chunk: &[u8], order: ByteOrder) -> [u8; N] {
    let mut buf = [0u8; N];
    buf.copy_from_slice(&chunk[..N]);
    if order == ByteOrder::Big {
        buf.reverse();
    }
    buf
}

/// Decoded numeric array.
#[derive(Clone, Debug, PartialEq)]
pub struct NpyArray {
    /// Array dimensions as stored in the header (empty for a scalar).
    pub shape: Vec<usize>,
    /// Elements in row-major (C) order, converted to `f64`.
    pub values: Vec<f64>,
}

impl NpyArray {
    /// Consume the array into its flat row-major element sequence.
    pub fn into_flat(self) -> Vec<f64> {
        self.values
    }
}

/// Decode an in-memory `.npy` payload.
///
/// Fortran-ordered payloads are rearranged so `values` always follows
/// row-major order, matching `ndarray.flatten()`.
pub fn decode_npy(bytes: &[u8]) -> Result<NpyArray, String> {
    if bytes.len() < PREAMBLE_LEN || &bytes[..MAGIC.len()] != MAGIC {
        return Err("missing .npy magic prefix".to_string());
    }
    let major = bytes[MAGIC.len()];
    let (header_len, header_start) = match major {
        1 => {
            let raw = bytes
                .get(PREAMBLE_LEN..PREAMBLE_LEN + 2)
                .ok_or("truncated header length")?;
            (u16::from_le_bytes([raw[0], raw[1]]) as usize, PREAMBLE_LEN + 2)
        }
        2 | 3 => {
            let raw = bytes
                .get(PREAMBLE_LEN..PREAMBLE_LEN + 4)
                .ok_or("truncated header length")?;
            (
                u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize,
                PREAMBLE_LEN + 4,
            )
        }
        other => return Err(format!("unsupported .npy version {other}")),
    };
    let data_start = header_start + header_len;
    let header_bytes = bytes
        .get(header_start..data_start)
        .ok_or("truncated header")?;
    let header = std::str::from_utf8(header_bytes)
        .map_err(|err| format!("header is not text: {err}"))?;

    let descr = DESCR_RE
        .captures(header)
        .map(|captures| captures[1].to_string())
        .ok_or_else(|| format!("header has no plain 'descr' field: {}", header.trim()))?;
    let dtype = Dtype::parse(&descr)?;
    let fortran_order = FORTRAN_RE
        .captures(header)
        .map(|captures| &captures[1] == "True")
        .ok_or("header has no 'fortran_order' field")?;
    let shape = SHAPE_RE
        .captures(header)
        .ok_or("header has no 'shape' field")
        .and_then(|captures| {
            parse_shape(&captures[1]).map_err(|_| "header has an invalid 'shape'")
        })?;

    let count = shape
        .iter()
        .try_fold(1usize, |acc, dim| acc.checked_mul(*dim))
        .ok_or("shape overflows the element count")?;
    let byte_len = count
        .checked_mul(dtype.size)
        .ok_or("shape overflows the payload size")?;
    let data = &bytes[data_start..];
    if data.len() < byte_len {
        return Err(format!(
            "payload holds {} bytes but shape {:?} needs {}",
            data.len(),
            shape,
            byte_len
        ));
    }

    let values: Vec<f64> = data[..byte_len]
        .chunks_exact(dtype.size)
        .map(|chunk| dtype.decode(chunk))
        .collect();
    let values = if fortran_order {
        fortran_to_row_major(&values, &shape)
    } else {
        values
    };
    Ok(NpyArray { shape, values })
}

/// Read and decode the `.npy` file at `path`.
pub fn read_npy(path: &Path) -> Result<NpyArray, NormalizeError> {
    if !path.exists() {
        return Err(NormalizeError::InputNotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path)?;
    decode_npy(&bytes).map_err(|details| NormalizeError::MalformedArray {
        path: path.to_path_buf(),
        details,
    })
}

fn parse_shape(raw: &str) -> Result<Vec<usize>, std::num::ParseIntError> {
    raw.split(',')
        .map(str::trim)
        .filter(|dim| !dim.is_empty())
        .map(|dim| dim.trim_end_matches('L').parse::<usize>())
        .collect()
}

fn fortran_to_row_major(values: &[f64], shape: &[usize]) -> Vec<f64> {
    if shape.len() < 2 {
        return values.to_vec();
    }
    let mut strides = Vec::with_capacity(shape.len());
    let mut stride = 1usize;
    for dim in shape {
        strides.push(stride);
        stride *= dim;
    }
    let mut index = vec![0usize; shape.len()];
    let mut ordered = Vec::with_capacity(values.len());
    for _ in 0..values.len() {
        let offset: usize = index.iter().zip(&strides).map(|(i, s)| i * s).sum();
        ordered.push(values[offset]);
        for axis in (0..shape.len()).rev() {
            index[axis] += 1;
            if index[axis] < shape[axis] {
                break;
            }
            index[axis] = 0;
        }
    }
    ordered
}
