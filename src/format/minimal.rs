//! The Minimal container: raw payloads only, concatenated in column order
//! with no per-column framing. Chosen by the writer when the whole table is
//! estimated to stay under the size threshold, where codec tags and length
//! prefixes would cost more than they save.

use std::io::{Read, Write};

use crate::codecs::raw;
use crate::error::HybfError;
use crate::format::{self, FormatKind, Header};
use crate::io::{ByteReader, ByteWriter};
use crate::types::{Column, ColumnArray, ColumnType};

pub fn write<W: Write>(
    columns: &[Column],
    defs: &[ColumnType],
    row_count: u32,
    sink: &mut W,
) -> Result<(), HybfError> {
    let mut writer = ByteWriter::new(sink);
    format::write_header(&mut writer, FormatKind::Minimal, defs.len() as u16)?;
    writer.write_u32(row_count)?;
    format::write_column_defs(&mut writer, defs)?;

    let mut payload = Vec::new();
    for (column, def) in columns.iter().zip(defs) {
        payload.clear();
        raw::encode(&column.data, &def.storage, &mut payload)?;
        writer.write_bytes(&payload)?;
    }
    Ok(())
}

/// Reads the body of a Minimal file. The caller has already consumed and
/// validated the header.
pub fn read<R: Read>(
    reader: &mut ByteReader<R>,
    header: &Header,
) -> Result<(Vec<ColumnType>, Vec<ColumnArray>), HybfError> {
    let row_count = reader.read_u32("row count")? as usize;
    let defs = format::read_column_defs(reader, header.column_count)?;

    let mut arrays = Vec::with_capacity(defs.len());
    for def in &defs {
        arrays.push(raw::decode(reader, def, row_count)?);
    }
    Ok((defs, arrays))
}
