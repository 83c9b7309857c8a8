//! The SingleValue codec (tag 2): one element in storage form followed by a
//! `u32` row count. Decoding replicates the value; the stored count must
//! match the container's declared row count.

use std::io::Read;

use crate::codecs::raw;
use crate::error::HybfError;
use crate::io::ByteReader;
use crate::types::{ColumnArray, ColumnType, LogicalType, StorageType};

/// The exact encoded size: one element plus the `u32` row count.
pub fn estimate_size(data: &ColumnArray, storage: &StorageType) -> usize {
    raw::element_size(data, 0, storage) + 4
}

pub fn encode(
    data: &ColumnArray,
    storage: &StorageType,
    buf: &mut Vec<u8>,
) -> Result<(), HybfError> {
    if data.is_empty() {
        return Err(HybfError::InvalidEncoding(
            "single-value encoding requires at least one row".to_string(),
        ));
    }
    match data {
        ColumnArray::Int32(values) => raw::put_int(buf, values[0] as i64, storage.bit_width)?,
        ColumnArray::Int64(values) => raw::put_int(buf, values[0], storage.bit_width)?,
        ColumnArray::Float32(values) => raw::put_f32(buf, values[0]),
        ColumnArray::Float64(values) => raw::put_f64(buf, values[0]),
        ColumnArray::Bool(values) => raw::put_bool(buf, values[0]),
        ColumnArray::Utf8(values) => raw::put_str(buf, values[0].as_deref())?,
    }
    buf.extend_from_slice(&(data.len() as u32).to_be_bytes());
    Ok(())
}

pub fn decode<R: Read>(
    reader: &mut ByteReader<R>,
    def: &ColumnType,
    rows: usize,
) -> Result<ColumnArray, HybfError> {
    let width = def.storage.bit_width;
    let column = match def.logical {
        LogicalType::Int32 => {
            let v = raw::narrow_to_i32(raw::read_int(reader, width)?)?;
            ColumnArray::Int32(vec![v; rows])
        }
        LogicalType::Int64 => {
            let v = raw::read_int(reader, width)?;
            ColumnArray::Int64(vec![v; rows])
        }
        LogicalType::Float32 => ColumnArray::Float32(vec![raw::read_f32(reader)?; rows]),
        LogicalType::Float64 => ColumnArray::Float64(vec![raw::read_f64(reader)?; rows]),
        LogicalType::Boolean => ColumnArray::Bool(vec![raw::read_bool(reader)?; rows]),
        LogicalType::String => ColumnArray::Utf8(vec![raw::read_str(reader)?; rows]),
    };

    let stored = reader.read_u32("single-value row count")? as usize;
    if stored != rows {
        return Err(HybfError::InvalidEncoding(format!(
            "single-value row count {} does not match declared row count {}",
            stored, rows
        )));
    }
    Ok(column)
}

//==================================================================================
// Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn def_for(data: &ColumnArray, storage: StorageType) -> ColumnType {
        ColumnType::new("c", data.logical_type(), storage)
    }

    #[test]
    fn test_int_roundtrip() {
        let data = ColumnArray::Int32(vec![7; 5]);
        let storage = StorageType::new(LogicalType::Int32, 8);
        let mut buf = Vec::new();
        encode(&data, &storage, &mut buf).unwrap();
        // One 8-bit element plus the u32 count.
        assert_eq!(buf, vec![0x07, 0x00, 0x00, 0x00, 0x05]);
        assert_eq!(buf.len(), estimate_size(&data, &storage));

        let mut reader = ByteReader::new(buf.as_slice());
        let decoded = decode(&mut reader, &def_for(&data, storage), 5).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_string_roundtrip() {
        let data = ColumnArray::Utf8(vec![Some("same".to_string()); 9]);
        let storage = StorageType::new(LogicalType::String, 8);
        let mut buf = Vec::new();
        encode(&data, &storage, &mut buf).unwrap();
        assert_eq!(buf.len(), estimate_size(&data, &storage));

        let mut reader = ByteReader::new(buf.as_slice());
        let decoded = decode(&mut reader, &def_for(&data, storage), 9).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_count_mismatch_errors() {
        let data = ColumnArray::Int64(vec![-3; 4]);
        let storage = StorageType::new(LogicalType::Int64, 8);
        let mut buf = Vec::new();
        encode(&data, &storage, &mut buf).unwrap();

        let mut reader = ByteReader::new(buf.as_slice());
        let err = decode(&mut reader, &def_for(&data, storage), 7).unwrap_err();
        assert!(matches!(err, HybfError::InvalidEncoding(_)));
    }

    #[test]
    fn test_empty_column_rejected() {
        let data = ColumnArray::Int32(vec![]);
        let storage = StorageType::new(LogicalType::Int32, 32);
        let mut buf = Vec::new();
        assert!(encode(&data, &storage, &mut buf).is_err());
    }
}
