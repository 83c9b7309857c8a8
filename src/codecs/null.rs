//! The Null codec (tag 5): a `u32` row count and nothing else. Decoding
//! materialises that many nulls of the column's logical type. Integer
//! columns are non-nullable, so an all-null integer payload is malformed.

use std::io::Read;

use crate::codecs::raw::{NULL_F32_BITS, NULL_F64_BITS};
use crate::error::HybfError;
use crate::io::ByteReader;
use crate::types::{ColumnArray, ColumnType, LogicalType, StorageType};

/// The exact encoded size: just the `u32` row count.
pub fn estimate_size(_data: &ColumnArray, _storage: &StorageType) -> usize {
    4
}

pub fn encode(
    data: &ColumnArray,
    _storage: &StorageType,
    buf: &mut Vec<u8>,
) -> Result<(), HybfError> {
    buf.extend_from_slice(&(data.len() as u32).to_be_bytes());
    Ok(())
}

pub fn decode<R: Read>(
    reader: &mut ByteReader<R>,
    def: &ColumnType,
    rows: usize,
) -> Result<ColumnArray, HybfError> {
    let stored = reader.read_u32("null column row count")? as usize;
    if stored != rows {
        return Err(HybfError::InvalidEncoding(format!(
            "null column row count {} does not match declared row count {}",
            stored, rows
        )));
    }

    match def.logical {
        LogicalType::Float32 => Ok(ColumnArray::Float32(vec![
            f32::from_bits(NULL_F32_BITS);
            rows
        ])),
        LogicalType::Float64 => Ok(ColumnArray::Float64(vec![
            f64::from_bits(NULL_F64_BITS);
            rows
        ])),
        LogicalType::Boolean => Ok(ColumnArray::Bool(vec![None; rows])),
        LogicalType::String => Ok(ColumnArray::Utf8(vec![None; rows])),
        LogicalType::Int32 | LogicalType::Int64 => Err(HybfError::InvalidEncoding(
            "integer columns are non-nullable and cannot be all-null".to_string(),
        )),
    }
}

//==================================================================================
// Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_is_row_count_only() {
        let data = ColumnArray::Float64(vec![f64::NAN; 1000]);
        let storage = StorageType::new(LogicalType::Float64, 64);
        let mut buf = Vec::new();
        encode(&data, &storage, &mut buf).unwrap();
        assert_eq!(buf, vec![0x00, 0x00, 0x03, 0xE8]);
        assert_eq!(buf.len(), estimate_size(&data, &storage));
    }

    #[test]
    fn test_decode_materialises_nulls() {
        let bytes = [0, 0, 0, 5];
        let def = ColumnType::new(
            "n",
            LogicalType::String,
            StorageType::new(LogicalType::String, 8),
        );
        let mut reader = ByteReader::new(&bytes[..]);
        let decoded = decode(&mut reader, &def, 5).unwrap();
        assert_eq!(decoded, ColumnArray::Utf8(vec![None; 5]));

        let def = ColumnType::new(
            "n",
            LogicalType::Float32,
            StorageType::new(LogicalType::Float32, 32),
        );
        let mut reader = ByteReader::new(&bytes[..]);
        let decoded = decode(&mut reader, &def, 5).unwrap();
        assert_eq!(decoded.null_count(), 5);
    }

    #[test]
    fn test_count_mismatch_errors() {
        let bytes = [0, 0, 0, 5];
        let def = ColumnType::new(
            "n",
            LogicalType::Boolean,
            StorageType::new(LogicalType::Boolean, 8),
        );
        let mut reader = ByteReader::new(&bytes[..]);
        assert!(matches!(
            decode(&mut reader, &def, 6),
            Err(HybfError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_integer_null_column_rejected() {
        let bytes = [0, 0, 0, 2];
        let def = ColumnType::new(
            "n",
            LogicalType::Int32,
            StorageType::new(LogicalType::Int32, 32),
        );
        let mut reader = ByteReader::new(&bytes[..]);
        assert!(matches!(
            decode(&mut reader, &def, 2),
            Err(HybfError::InvalidEncoding(_))
        ));
    }
}
