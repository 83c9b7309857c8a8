//! The stateless public API: `write_table`, `read_table` and
//! `sniff_format`, plus the write-side dispatch that chooses between the
//! Minimal and Compressed containers.

use std::io::{Read, Write};

use crate::codecs::raw;
use crate::config::SelectorConfig;
use crate::error::HybfError;
use crate::format::{self, compressed, minimal, FormatKind};
use crate::io::ByteReader;
use crate::types::{analyze_storage, Column, ColumnArray, ColumnType};

/// Writes a table with the default selector configuration.
///
/// Writes are never partial at the format level: on error the sink's
/// position is undefined and the caller owns truncation.
pub fn write_table<W: Write>(columns: &[Column], sink: &mut W) -> Result<(), HybfError> {
    write_table_with_config(columns, &SelectorConfig::default(), sink)
}

/// Writes a table, steering the per-column encoding selector with an
/// explicit configuration.
pub fn write_table_with_config<W: Write>(
    columns: &[Column],
    config: &SelectorConfig,
    sink: &mut W,
) -> Result<(), HybfError> {
    let row_count = validate_columns(columns)?;
    let defs: Vec<ColumnType> = columns
        .iter()
        .map(|c| ColumnType::new(c.name.clone(), c.data.logical_type(), analyze_storage(&c.data)))
        .collect();

    // Header (8) + row count (4) + definition records + raw data section.
    let estimate: usize = 12
        + defs
            .iter()
            .map(|d| format::column_def_size(&d.name))
            .sum::<usize>()
        + columns
            .iter()
            .zip(&defs)
            .map(|(c, d)| raw::estimate_size(&c.data, &d.storage))
            .sum::<usize>();

    let kind = if estimate < format::MINIMAL_SIZE_THRESHOLD {
        FormatKind::Minimal
    } else {
        FormatKind::Compressed
    };
    log::debug!(
        "writing {} columns, {} rows as {:?} ({} bytes estimated raw)",
        defs.len(),
        row_count,
        kind,
        estimate
    );

    match kind {
        FormatKind::Minimal => minimal::write(columns, &defs, row_count, sink),
        FormatKind::Compressed => compressed::write(columns, &defs, row_count, config, sink),
    }
}

/// Reads a whole table: the column definitions and one materialised array
/// per column, in file order. Never returns a partial table.
pub fn read_table<R: Read>(
    source: &mut R,
) -> Result<(Vec<ColumnType>, Vec<ColumnArray>), HybfError> {
    let mut reader = ByteReader::new(source);
    let header = format::read_header(&mut reader)?;
    match header.format {
        FormatKind::Minimal => minimal::read(&mut reader, &header),
        FormatKind::Compressed => compressed::read(&mut reader, &header),
    }
}

/// Reads and validates the 8-byte header, consuming nothing past it.
/// Rewind the source before a subsequent `read_table`.
pub fn sniff_format<R: Read>(source: &mut R) -> Result<FormatKind, HybfError> {
    let mut reader = ByteReader::new(source);
    Ok(format::read_header(&mut reader)?.format)
}

/// Validates names, column-count and row-count bounds, and that all columns
/// share one row count; returns that row count.
fn validate_columns(columns: &[Column]) -> Result<u32, HybfError> {
    if columns.len() > u16::MAX as usize {
        return Err(HybfError::UnsupportedType(format!(
            "{} columns exceed the u16 column-count field",
            columns.len()
        )));
    }
    for column in columns {
        if column.name.is_empty() {
            return Err(HybfError::InvalidEncoding(
                "column names must be at least one byte".to_string(),
            ));
        }
        if column.name.len() > 255 {
            return Err(HybfError::NameTooLong(column.name.len()));
        }
    }

    let rows = columns.first().map_or(0, |c| c.data.len());
    for column in columns {
        if column.data.len() != rows {
            return Err(HybfError::InvalidEncoding(format!(
                "column '{}' has {} rows but the table has {}",
                column.name,
                column.data.len(),
                rows
            )));
        }
    }
    u32::try_from(rows).map_err(|_| {
        HybfError::InvalidEncoding(format!("{} rows exceed the u32 row-count field", rows))
    })
}

//==================================================================================
// Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatched_column_lengths_rejected() {
        let columns = vec![
            Column::new("a", ColumnArray::Int32(vec![1, 2, 3])),
            Column::new("b", ColumnArray::Int32(vec![1, 2])),
        ];
        let mut sink = Vec::new();
        let err = write_table(&columns, &mut sink).unwrap_err();
        assert!(matches!(err, HybfError::InvalidEncoding(_)));
    }

    #[test]
    fn test_name_bounds_rejected() {
        let mut sink = Vec::new();

        let columns = vec![Column::new("", ColumnArray::Int32(vec![1]))];
        assert!(matches!(
            write_table(&columns, &mut sink),
            Err(HybfError::InvalidEncoding(_))
        ));

        let columns = vec![Column::new("n".repeat(256), ColumnArray::Int32(vec![1]))];
        assert!(matches!(
            write_table(&columns, &mut sink),
            Err(HybfError::NameTooLong(256))
        ));
    }

    #[test]
    fn test_empty_table_roundtrips() {
        let mut sink = Vec::new();
        write_table(&[], &mut sink).unwrap();
        assert_eq!(sink.len(), 12); // header + row count, nothing else

        let (defs, arrays) = read_table(&mut sink.as_slice()).unwrap();
        assert!(defs.is_empty());
        assert!(arrays.is_empty());
    }
}
