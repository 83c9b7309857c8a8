//! The Dictionary codec (tag 4): a table of the column's distinct values
//! followed by a bit-packed stream of per-row codes.
//!
//! Payload layout: `u32 dict_size`; the entries in ascending code order,
//! each a single element in storage form (a null entry uses the element
//! null form, so the dictionary stays self-describing); `u8 code_width`;
//! then `row_count` codes packed MSB-first through the bitpack kernel.
//! Codes are assigned in first-appearance order, and a column's nulls share
//! one code assigned when the first null appears.

use std::collections::HashMap;
use std::hash::Hash;
use std::io::Read;

use crate::codecs::raw;
use crate::error::HybfError;
use crate::io::ByteReader;
use crate::kernels::bitpack;
use crate::types::{ColumnArray, ColumnType, LogicalType, StorageType};

/// Code widths the format allows for the packed stream.
const CODE_WIDTHS: [u8; 6] = [1, 2, 4, 8, 16, 32];

/// The smallest allowed code width that can express `dict_size` codes:
/// `ceil(log2(max(2, dict_size)))` rounded up into {1, 2, 4, 8, 16, 32}.
pub(crate) fn code_width_for(dict_size: usize) -> Result<u8, HybfError> {
    let n = dict_size.max(2);
    let min_bits = (usize::BITS - (n - 1).leading_zeros()) as u8;
    CODE_WIDTHS
        .into_iter()
        .find(|&w| w >= min_bits)
        .ok_or_else(|| {
            HybfError::InvalidEncoding(format!(
                "dictionary of {} entries needs more than 32-bit codes",
                dict_size
            ))
        })
}

/// Assigns codes in first-appearance order and returns the distinct keys in
/// code order alongside the per-row code stream.
fn build_codes<K: Eq + Hash + Clone>(keys: impl Iterator<Item = K>) -> (Vec<K>, Vec<u32>) {
    let mut assignment = HashMap::<K, u32>::new();
    let mut entries = Vec::new();
    let mut codes = Vec::new();

    for key in keys {
        let code = *assignment.entry(key.clone()).or_insert_with(|| {
            let next = entries.len() as u32;
            entries.push(key);
            next
        });
        codes.push(code);
    }
    (entries, codes)
}

/// The exact encoded size in bytes.
pub fn estimate_size(data: &ColumnArray, storage: &StorageType) -> usize {
    let (entry_bytes, dict_size) = match data {
        ColumnArray::Int32(values) => {
            let (entries, _) = build_codes(values.iter().copied());
            (entries.len() * storage.element_bytes(), entries.len())
        }
        ColumnArray::Int64(values) => {
            let (entries, _) = build_codes(values.iter().copied());
            (entries.len() * storage.element_bytes(), entries.len())
        }
        ColumnArray::Float32(values) => {
            let (entries, _) = build_codes(values.iter().map(|&v| raw::canon_f32_bits(v)));
            (entries.len() * 4, entries.len())
        }
        ColumnArray::Float64(values) => {
            let (entries, _) = build_codes(values.iter().map(|&v| raw::canon_f64_bits(v)));
            (entries.len() * 8, entries.len())
        }
        ColumnArray::Bool(values) => {
            let (entries, _) = build_codes(values.iter().copied());
            (entries.len(), entries.len())
        }
        ColumnArray::Utf8(values) => {
            let (entries, _) = build_codes(values.iter().map(|v| v.as_deref()));
            (
                entries
                    .iter()
                    .map(|e| 2 + e.map_or(0, str::len))
                    .sum::<usize>(),
                entries.len(),
            )
        }
    };
    let code_width = code_width_for(dict_size).unwrap_or(32);
    4 + entry_bytes + 1 + bitpack::packed_len(data.len(), code_width)
}

pub fn encode(
    data: &ColumnArray,
    storage: &StorageType,
    buf: &mut Vec<u8>,
) -> Result<(), HybfError> {
    // Build the dictionary, serialise the entries in code order, then pack
    // the code stream. Each branch only differs in the key type and the
    // element form of one entry.
    let (dict_size, codes) = match data {
        ColumnArray::Int32(values) => {
            let (entries, codes) = build_codes(values.iter().copied());
            buf.extend_from_slice(&(entries.len() as u32).to_be_bytes());
            let n = entries.len();
            for v in entries {
                raw::put_int(buf, v as i64, storage.bit_width)?;
            }
            (n, codes)
        }
        ColumnArray::Int64(values) => {
            let (entries, codes) = build_codes(values.iter().copied());
            buf.extend_from_slice(&(entries.len() as u32).to_be_bytes());
            let n = entries.len();
            for v in entries {
                raw::put_int(buf, v, storage.bit_width)?;
            }
            (n, codes)
        }
        ColumnArray::Float32(values) => {
            let (entries, codes) = build_codes(values.iter().map(|&v| raw::canon_f32_bits(v)));
            buf.extend_from_slice(&(entries.len() as u32).to_be_bytes());
            let n = entries.len();
            for bits in entries {
                buf.extend_from_slice(&bits.to_be_bytes());
            }
            (n, codes)
        }
        ColumnArray::Float64(values) => {
            let (entries, codes) = build_codes(values.iter().map(|&v| raw::canon_f64_bits(v)));
            buf.extend_from_slice(&(entries.len() as u32).to_be_bytes());
            let n = entries.len();
            for bits in entries {
                buf.extend_from_slice(&bits.to_be_bytes());
            }
            (n, codes)
        }
        ColumnArray::Bool(values) => {
            let (entries, codes) = build_codes(values.iter().copied());
            buf.extend_from_slice(&(entries.len() as u32).to_be_bytes());
            let n = entries.len();
            for v in entries {
                raw::put_bool(buf, v);
            }
            (n, codes)
        }
        ColumnArray::Utf8(values) => {
            let (entries, codes) = build_codes(values.iter().map(|v| v.as_deref()));
            buf.extend_from_slice(&(entries.len() as u32).to_be_bytes());
            let n = entries.len();
            for v in entries {
                raw::put_str(buf, v)?;
            }
            (n, codes)
        }
    };

    let code_width = code_width_for(dict_size)?;
    buf.push(code_width);
    bitpack::pack(&codes, code_width, buf)
}

pub fn decode<R: Read>(
    reader: &mut ByteReader<R>,
    def: &ColumnType,
    rows: usize,
) -> Result<ColumnArray, HybfError> {
    let dict_size = reader.read_u32("dictionary size")? as usize;
    let width = def.storage.bit_width;

    macro_rules! gather {
        ($read_entry:expr, $variant:ident) => {{
            let mut entries = Vec::with_capacity(dict_size);
            for _ in 0..dict_size {
                entries.push($read_entry(reader)?);
            }
            let codes = read_code_stream(reader, rows)?;
            let mut values = Vec::with_capacity(rows);
            for code in codes {
                let entry = entries.get(code as usize).ok_or_else(|| {
                    HybfError::InvalidEncoding(format!(
                        "dictionary code {} out of range (dictionary size is {})",
                        code, dict_size
                    ))
                })?;
                values.push(entry.clone());
            }
            ColumnArray::$variant(values)
        }};
    }

    Ok(match def.logical {
        LogicalType::Int32 => gather!(
            |r: &mut ByteReader<R>| raw::read_int(r, width).and_then(raw::narrow_to_i32),
            Int32
        ),
        LogicalType::Int64 => gather!(|r: &mut ByteReader<R>| raw::read_int(r, width), Int64),
        LogicalType::Float32 => gather!(raw::read_f32, Float32),
        LogicalType::Float64 => gather!(raw::read_f64, Float64),
        LogicalType::Boolean => gather!(raw::read_bool, Bool),
        LogicalType::String => gather!(raw::read_str, Utf8),
    })
}

fn read_code_stream<R: Read>(
    reader: &mut ByteReader<R>,
    rows: usize,
) -> Result<Vec<u32>, HybfError> {
    let code_width = reader.read_u8("code width")?;
    if !CODE_WIDTHS.contains(&code_width) {
        return Err(HybfError::InvalidEncoding(format!(
            "invalid dictionary code width: {}",
            code_width
        )));
    }
    if rows == 0 {
        return Ok(Vec::new());
    }
    let packed = reader.read_bytes(bitpack::packed_len(rows, code_width), "code stream")?;
    bitpack::unpack(&packed, code_width, rows)
}

//==================================================================================
// Unit Tests
//==================================================================================
