//! The RLE codec (tag 3): `u32 run_count`, then `run_count` records of
//! `(element, u32 run_length)` with elements in storage form. Runs over
//! null rows use the element null form; float runs compare NaN-equal so a
//! stretch of nulls collapses into one run. The sum of run lengths must
//! equal the declared row count.

use std::io::Read;

use crate::codecs::raw;
use crate::error::HybfError;
use crate::io::ByteReader;
use crate::types::{ColumnArray, ColumnType, LogicalType, StorageType};

/// Consecutive-equal spans of `values`, as `(start_index, run_length)`.
fn run_bounds<T: PartialEq>(values: &[T]) -> Vec<(usize, u32)> {
    let mut bounds = Vec::new();
    let mut start = 0usize;
    for i in 1..values.len() {
        if values[i] != values[start] {
            bounds.push((start, (i - start) as u32));
            start = i;
        }
    }
    if !values.is_empty() {
        bounds.push((start, (values.len() - start) as u32));
    }
    bounds
}

/// Run starts for the column, with float NaNs collapsed to one value.
fn column_run_bounds(data: &ColumnArray) -> Vec<(usize, u32)> {
    match data {
        ColumnArray::Int32(values) => run_bounds(values),
        ColumnArray::Int64(values) => run_bounds(values),
        ColumnArray::Float32(values) => {
            let bits: Vec<u32> = values.iter().map(|&v| raw::canon_f32_bits(v)).collect();
            run_bounds(&bits)
        }
        ColumnArray::Float64(values) => {
            let bits: Vec<u64> = values.iter().map(|&v| raw::canon_f64_bits(v)).collect();
            run_bounds(&bits)
        }
        ColumnArray::Bool(values) => run_bounds(values),
        ColumnArray::Utf8(values) => run_bounds(values),
    }
}

/// The number of consecutive-equal runs in the column.
pub fn run_count(data: &ColumnArray) -> usize {
    column_run_bounds(data).len()
}

/// The exact encoded size in bytes.
pub fn estimate_size(data: &ColumnArray, storage: &StorageType) -> usize {
    4 + column_run_bounds(data)
        .iter()
        .map(|&(start, _)| raw::element_size(data, start, storage) + 4)
        .sum::<usize>()
}

pub fn encode(
    data: &ColumnArray,
    storage: &StorageType,
    buf: &mut Vec<u8>,
) -> Result<(), HybfError> {
    let bounds = column_run_bounds(data);
    buf.extend_from_slice(&(bounds.len() as u32).to_be_bytes());

    for (start, len) in bounds {
        match data {
            ColumnArray::Int32(values) => {
                raw::put_int(buf, values[start] as i64, storage.bit_width)?
            }
            ColumnArray::Int64(values) => raw::put_int(buf, values[start], storage.bit_width)?,
            ColumnArray::Float32(values) => {
                buf.extend_from_slice(&raw::canon_f32_bits(values[start]).to_be_bytes())
            }
            ColumnArray::Float64(values) => {
                buf.extend_from_slice(&raw::canon_f64_bits(values[start]).to_be_bytes())
            }
            ColumnArray::Bool(values) => raw::put_bool(buf, values[start]),
            ColumnArray::Utf8(values) => raw::put_str(buf, values[start].as_deref())?,
        }
        buf.extend_from_slice(&len.to_be_bytes());
    }
    Ok(())
}

pub fn decode<R: Read>(
    reader: &mut ByteReader<R>,
    def: &ColumnType,
    rows: usize,
) -> Result<ColumnArray, HybfError> {
    let run_count = reader.read_u32("run count")? as usize;
    let width = def.storage.bit_width;
    let mut total = 0usize;

    macro_rules! expand_runs {
        ($read_value:expr, $variant:ident) => {{
            let mut values = Vec::with_capacity(rows);
            for _ in 0..run_count {
                let value = $read_value(reader)?;
                let len = reader.read_u32("run length")? as usize;
                total += len;
                if total > rows {
                    return Err(HybfError::InvalidEncoding(format!(
                        "run lengths exceed declared row count {}",
                        rows
                    )));
                }
                values.extend(std::iter::repeat(value).take(len));
            }
            ColumnArray::$variant(values)
        }};
    }

    let column = match def.logical {
        LogicalType::Int32 => expand_runs!(
            |r: &mut ByteReader<R>| raw::read_int(r, width).and_then(raw::narrow_to_i32),
            Int32
        ),
        LogicalType::Int64 => {
            expand_runs!(|r: &mut ByteReader<R>| raw::read_int(r, width), Int64)
        }
        LogicalType::Float32 => expand_runs!(raw::read_f32, Float32),
        LogicalType::Float64 => expand_runs!(raw::read_f64, Float64),
        LogicalType::Boolean => expand_runs!(raw::read_bool, Bool),
        LogicalType::String => expand_runs!(raw::read_str, Utf8),
    };

    if total != rows {
        return Err(HybfError::InvalidEncoding(format!(
            "run lengths sum to {} but the declared row count is {}",
            total, rows
        )));
    }
    Ok(column)
}

//==================================================================================
// Unit Tests
//==================================================================================
