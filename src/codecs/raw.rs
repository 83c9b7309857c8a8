//! The Raw codec (tag 1): the whole column in its storage representation,
//! MSB-first, with no per-column metadata beyond the column definition.
//!
//! This module also owns the *element form* — how one value of each logical
//! type is serialised — which the SingleValue, RLE and Dictionary codecs
//! reuse for their embedded values and dictionary entries. Integers are
//! `bit_width`-bit big-endian two's complement; floats are IEEE-754
//! big-endian bit patterns (NaN is null); booleans are one byte (0 false,
//! 1 true, 2 null); strings are a `u16` big-endian length plus UTF-8 bytes,
//! with length `0xFFFF` marking null.
//!
//! Raw integer columns are packed as one contiguous code stream through the
//! bitpack kernel; at the byte-aligned storage widths this is identical to
//! aligned big-endian storage.

use std::io::Read;

use crate::error::HybfError;
use crate::io::ByteReader;
use crate::kernels::bitpack;
use crate::types::{ColumnArray, ColumnType, LogicalType, StorageType};

/// Canonical quiet-NaN bit patterns used when a codec materialises a null
/// float itself (Raw passes the caller's bits through untouched).
pub(crate) const NULL_F32_BITS: u32 = 0x7FC0_0000;
pub(crate) const NULL_F64_BITS: u64 = 0x7FF8_0000_0000_0000;

/// String-length sentinel marking a null row.
pub(crate) const STRING_NULL_LEN: u16 = 0xFFFF;

/// Tri-state boolean bytes.
pub(crate) const BOOL_FALSE: u8 = 0;
pub(crate) const BOOL_TRUE: u8 = 1;
pub(crate) const BOOL_NULL: u8 = 2;

//==================================================================================
// 1. Element forms (shared with the other codecs)
//==================================================================================

/// The bit pattern a float contributes to run/distinct statistics and to
/// codec-built values: every NaN payload denotes the same null.
pub(crate) fn canon_f32_bits(v: f32) -> u32 {
    if v.is_nan() {
        NULL_F32_BITS
    } else {
        v.to_bits()
    }
}

pub(crate) fn canon_f64_bits(v: f64) -> u64 {
    if v.is_nan() {
        NULL_F64_BITS
    } else {
        v.to_bits()
    }
}

/// Truncates `v` to `width` bits of two's complement, verifying the value
/// survives the round-trip back through sign extension.
pub(crate) fn int_code(v: i64, width: u8) -> Result<u64, HybfError> {
    let code = if width >= 64 {
        v as u64
    } else {
        (v as u64) & ((1u64 << width) - 1)
    };
    if sign_extend(code, width) != v {
        return Err(HybfError::InvalidEncoding(format!(
            "value {} exceeds {}-bit storage",
            v, width
        )));
    }
    Ok(code)
}

/// Reinterprets the low `width` bits of `code` as two's complement.
pub(crate) fn sign_extend(code: u64, width: u8) -> i64 {
    if width >= 64 {
        code as i64
    } else {
        let shift = 64 - width as u32;
        ((code << shift) as i64) >> shift
    }
}

/// Appends one integer element in storage form.
pub(crate) fn put_int(buf: &mut Vec<u8>, v: i64, width: u8) -> Result<(), HybfError> {
    let code = int_code(v, width)?;
    match width {
        8 => buf.push(code as u8),
        16 => buf.extend_from_slice(&(code as u16).to_be_bytes()),
        32 => buf.extend_from_slice(&(code as u32).to_be_bytes()),
        64 => buf.extend_from_slice(&code.to_be_bytes()),
        w => {
            return Err(HybfError::InvalidEncoding(format!(
                "invalid integer storage width: {}",
                w
            )))
        }
    }
    Ok(())
}

/// Reads one integer element in storage form.
pub(crate) fn read_int<R: Read>(
    reader: &mut ByteReader<R>,
    width: u8,
) -> Result<i64, HybfError> {
    let code = match width {
        8 => reader.read_u8("integer value")? as u64,
        16 => reader.read_u16("integer value")? as u64,
        32 => reader.read_u32("integer value")? as u64,
        64 => reader.read_u64("integer value")?,
        w => {
            return Err(HybfError::InvalidEncoding(format!(
                "invalid integer storage width: {}",
                w
            )))
        }
    };
    Ok(sign_extend(code, width))
}

pub(crate) fn put_f32(buf: &mut Vec<u8>, v: f32) {
    buf.extend_from_slice(&v.to_bits().to_be_bytes());
}

pub(crate) fn put_f64(buf: &mut Vec<u8>, v: f64) {
    buf.extend_from_slice(&v.to_bits().to_be_bytes());
}

pub(crate) fn read_f32<R: Read>(reader: &mut ByteReader<R>) -> Result<f32, HybfError> {
    Ok(f32::from_bits(reader.read_u32("float value")?))
}

pub(crate) fn read_f64<R: Read>(reader: &mut ByteReader<R>) -> Result<f64, HybfError> {
    Ok(f64::from_bits(reader.read_u64("float value")?))
}

pub(crate) fn put_bool(buf: &mut Vec<u8>, v: Option<bool>) {
    buf.push(match v {
        Some(false) => BOOL_FALSE,
        Some(true) => BOOL_TRUE,
        None => BOOL_NULL,
    });
}

pub(crate) fn read_bool<R: Read>(reader: &mut ByteReader<R>) -> Result<Option<bool>, HybfError> {
    match reader.read_u8("boolean value")? {
        BOOL_FALSE => Ok(Some(false)),
        BOOL_TRUE => Ok(Some(true)),
        BOOL_NULL => Ok(None),
        b => Err(HybfError::InvalidEncoding(format!(
            "invalid tri-state boolean byte: {}",
            b
        ))),
    }
}

pub(crate) fn put_str(buf: &mut Vec<u8>, v: Option<&str>) -> Result<(), HybfError> {
    match v {
        None => buf.extend_from_slice(&STRING_NULL_LEN.to_be_bytes()),
        Some(s) => {
            let bytes = s.as_bytes();
            if bytes.len() >= STRING_NULL_LEN as usize {
                return Err(HybfError::InvalidEncoding(format!(
                    "string of {} bytes cannot be framed by a u16 length",
                    bytes.len()
                )));
            }
            buf.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
            buf.extend_from_slice(bytes);
        }
    }
    Ok(())
}

pub(crate) fn read_str<R: Read>(
    reader: &mut ByteReader<R>,
) -> Result<Option<String>, HybfError> {
    let len = reader.read_u16("string length")?;
    if len == STRING_NULL_LEN {
        return Ok(None);
    }
    let bytes = reader.read_bytes(len as usize, "string value")?;
    let s = String::from_utf8(bytes)
        .map_err(|e| HybfError::InvalidEncoding(format!("string is not valid UTF-8: {}", e)))?;
    Ok(Some(s))
}

/// The serialised size in bytes of the element at `idx`.
pub(crate) fn element_size(
    data: &ColumnArray,
    idx: usize,
    storage: &StorageType,
) -> usize {
    match data {
        ColumnArray::Int32(_) | ColumnArray::Int64(_) => storage.element_bytes(),
        ColumnArray::Float32(_) => 4,
        ColumnArray::Float64(_) => 8,
        ColumnArray::Bool(_) => 1,
        ColumnArray::Utf8(values) => match &values[idx] {
            Some(s) => 2 + s.len(),
            None => 2,
        },
    }
}

//==================================================================================
// 2. Whole-column encode / decode
//==================================================================================

/// The exact encoded size of the column in bytes.
pub fn estimate_size(data: &ColumnArray, storage: &StorageType) -> usize {
    let n = data.len();
    match data {
        ColumnArray::Int32(_) | ColumnArray::Int64(_) => {
            bitpack::packed_len(n, storage.bit_width)
        }
        ColumnArray::Float32(_) => n * 4,
        ColumnArray::Float64(_) => n * 8,
        ColumnArray::Bool(_) => n,
        ColumnArray::Utf8(values) => values
            .iter()
            .map(|v| 2 + v.as_deref().map_or(0, str::len))
            .sum(),
    }
}

pub fn encode(
    data: &ColumnArray,
    storage: &StorageType,
    buf: &mut Vec<u8>,
) -> Result<(), HybfError> {
    match data {
        ColumnArray::Int32(values) => {
            let codes = values
                .iter()
                .map(|&v| int_code(v as i64, storage.bit_width))
                .collect::<Result<Vec<u64>, _>>()?;
            bitpack::pack(&codes, storage.bit_width, buf)
        }
        ColumnArray::Int64(values) => {
            let codes = values
                .iter()
                .map(|&v| int_code(v, storage.bit_width))
                .collect::<Result<Vec<u64>, _>>()?;
            bitpack::pack(&codes, storage.bit_width, buf)
        }
        ColumnArray::Float32(values) => {
            buf.reserve(values.len() * 4);
            for &v in values {
                put_f32(buf, v);
            }
            Ok(())
        }
        ColumnArray::Float64(values) => {
            buf.reserve(values.len() * 8);
            for &v in values {
                put_f64(buf, v);
            }
            Ok(())
        }
        ColumnArray::Bool(values) => {
            buf.reserve(values.len());
            for &v in values {
                put_bool(buf, v);
            }
            Ok(())
        }
        ColumnArray::Utf8(values) => {
            for v in values {
                put_str(buf, v.as_deref())?;
            }
            Ok(())
        }
    }
}

pub fn decode<R: Read>(
    reader: &mut ByteReader<R>,
    def: &ColumnType,
    rows: usize,
) -> Result<ColumnArray, HybfError> {
    let width = def.storage.bit_width;
    match def.logical {
        LogicalType::Int32 => {
            let codes = unpack_int_codes(reader, width, rows)?;
            let mut values = Vec::with_capacity(rows);
            for code in codes {
                values.push(narrow_to_i32(sign_extend(code, width))?);
            }
            Ok(ColumnArray::Int32(values))
        }
        LogicalType::Int64 => {
            let codes = unpack_int_codes(reader, width, rows)?;
            Ok(ColumnArray::Int64(
                codes.into_iter().map(|c| sign_extend(c, width)).collect(),
            ))
        }
        LogicalType::Float32 => {
            let mut values = Vec::with_capacity(rows);
            for _ in 0..rows {
                values.push(read_f32(reader)?);
            }
            Ok(ColumnArray::Float32(values))
        }
        LogicalType::Float64 => {
            let mut values = Vec::with_capacity(rows);
            for _ in 0..rows {
                values.push(read_f64(reader)?);
            }
            Ok(ColumnArray::Float64(values))
        }
        LogicalType::Boolean => {
            let mut values = Vec::with_capacity(rows);
            for _ in 0..rows {
                values.push(read_bool(reader)?);
            }
            Ok(ColumnArray::Bool(values))
        }
        LogicalType::String => {
            let mut values = Vec::with_capacity(rows);
            for _ in 0..rows {
                values.push(read_str(reader)?);
            }
            Ok(ColumnArray::Utf8(values))
        }
    }
}

fn unpack_int_codes<R: Read>(
    reader: &mut ByteReader<R>,
    width: u8,
    rows: usize,
) -> Result<Vec<u64>, HybfError> {
    if !matches!(width, 8 | 16 | 32 | 64) {
        return Err(HybfError::InvalidEncoding(format!(
            "invalid integer storage width: {}",
            width
        )));
    }
    if rows == 0 {
        return Ok(Vec::new());
    }
    let bytes = reader.read_bytes(bitpack::packed_len(rows, width), "integer column data")?;
    bitpack::unpack(&bytes, width, rows)
}

pub(crate) fn narrow_to_i32(v: i64) -> Result<i32, HybfError> {
    i32::try_from(v)
        .map_err(|_| HybfError::InvalidEncoding(format!("value {} overflows a 32-bit column", v)))
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(data: ColumnArray, storage: StorageType) -> ColumnArray {
        let mut buf = Vec::new();
        encode(&data, &storage, &mut buf).unwrap();
        assert_eq!(buf.len(), estimate_size(&data, &storage));

        let def = ColumnType::new("c", data.logical_type(), storage);
        let mut reader = ByteReader::new(buf.as_slice());
        decode(&mut reader, &def, data.len()).unwrap()
    }

    #[test]
    fn test_int32_narrowed_roundtrip() {
        let data = ColumnArray::Int32(vec![1, -2, 127, -128]);
        let storage = StorageType::new(LogicalType::Int32, 8);
        assert_eq!(roundtrip(data.clone(), storage), data);
    }

    #[test]
    fn test_int32_eight_bit_bytes() {
        let data = ColumnArray::Int32(vec![1, 2, 3]);
        let mut buf = Vec::new();
        encode(&data, &StorageType::new(LogicalType::Int32, 8), &mut buf).unwrap();
        assert_eq!(buf, vec![0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_int64_wide_roundtrip() {
        let data = ColumnArray::Int64(vec![i64::MIN, -1, 0, i64::MAX]);
        let storage = StorageType::new(LogicalType::Int64, 64);
        assert_eq!(roundtrip(data.clone(), storage), data);
    }

    #[test]
    fn test_int_value_exceeding_declared_width_errors() {
        let data = ColumnArray::Int32(vec![200]);
        let mut buf = Vec::new();
        let err = encode(&data, &StorageType::new(LogicalType::Int32, 8), &mut buf).unwrap_err();
        assert!(matches!(err, HybfError::InvalidEncoding(_)));
    }

    #[test]
    fn test_float_roundtrip_preserves_bits() {
        let data = ColumnArray::Float64(vec![1.5, -0.0, f64::INFINITY, f64::NAN]);
        let storage = StorageType::new(LogicalType::Float64, 64);
        let decoded = roundtrip(data.clone(), storage);
        assert!(decoded.value_eq(&data));

        let data = ColumnArray::Float32(vec![3.25, f32::NAN]);
        let storage = StorageType::new(LogicalType::Float32, 32);
        assert!(roundtrip(data.clone(), storage).value_eq(&data));
    }

    #[test]
    fn test_bool_tristate_roundtrip() {
        let data = ColumnArray::Bool(vec![Some(true), Some(false), None]);
        let storage = StorageType::new(LogicalType::Boolean, 8);
        assert_eq!(roundtrip(data.clone(), storage), data);

        let mut buf = Vec::new();
        encode(&data, &storage, &mut buf).unwrap();
        assert_eq!(buf, vec![1, 0, 2]);
    }

    #[test]
    fn test_string_roundtrip_with_nulls() {
        let data = ColumnArray::Utf8(vec![
            Some("hello".to_string()),
            None,
            Some(String::new()),
            Some("日本語".to_string()),
        ]);
        let storage = StorageType::new(LogicalType::String, 8);
        assert_eq!(roundtrip(data.clone(), storage), data);
    }

    #[test]
    fn test_string_null_sentinel_bytes() {
        let data = ColumnArray::Utf8(vec![None, Some("x".to_string())]);
        let mut buf = Vec::new();
        encode(&data, &StorageType::new(LogicalType::String, 8), &mut buf).unwrap();
        assert_eq!(buf, vec![0xFF, 0xFF, 0x00, 0x01, b'x']);
    }

    #[test]
    fn test_truncated_column_errors() {
        let data = ColumnArray::Int32(vec![300, 400]);
        let storage = StorageType::new(LogicalType::Int32, 16);
        let mut buf = Vec::new();
        encode(&data, &storage, &mut buf).unwrap();
        buf.pop();

        let def = ColumnType::new("c", LogicalType::Int32, storage);
        let mut reader = ByteReader::new(buf.as_slice());
        assert!(matches!(
            decode(&mut reader, &def, 2),
            Err(HybfError::Truncated(_))
        ));
    }

    #[test]
    fn test_invalid_bool_byte_errors() {
        let def = ColumnType::new(
            "c",
            LogicalType::Boolean,
            StorageType::new(LogicalType::Boolean, 8),
        );
        let bytes = [3u8];
        let mut reader = ByteReader::new(&bytes[..]);
        assert!(matches!(
            decode(&mut reader, &def, 1),
            Err(HybfError::InvalidEncoding(_))
        ));
    }
}
