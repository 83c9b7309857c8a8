//! The Compressed container: every column independently encoded by the
//! selector, framed with its codec tag and a `u32` payload length so a
//! reader can skip encodings it does not recognise within the same tag
//! space.

use std::io::{Read, Write};

use crate::codecs::{self, ColumnEncoding};
use crate::config::SelectorConfig;
use crate::error::HybfError;
use crate::format::{self, FormatKind, Header};
use crate::io::{ByteReader, ByteWriter};
use crate::selector;
use crate::types::{Column, ColumnArray, ColumnType};

pub fn write<W: Write>(
    columns: &[Column],
    defs: &[ColumnType],
    row_count: u32,
    config: &SelectorConfig,
    sink: &mut W,
) -> Result<(), HybfError> {
    let mut writer = ByteWriter::new(sink);
    format::write_header(&mut writer, FormatKind::Compressed, defs.len() as u16)?;
    writer.write_u32(row_count)?;
    format::write_column_defs(&mut writer, defs)?;

    let mut payload = Vec::new();
    for (column, def) in columns.iter().zip(defs) {
        let encoding = selector::select_encoding(&column.name, &column.data, &def.storage, config);
        payload.clear();
        codecs::encode_column(encoding, &column.data, &def.storage, &mut payload)?;

        let payload_len = u32::try_from(payload.len()).map_err(|_| {
            HybfError::InvalidEncoding(format!(
                "column '{}' payload exceeds the u32 length field",
                column.name
            ))
        })?;
        writer.write_u8(encoding.tag())?;
        writer.write_u32(payload_len)?;
        writer.write_bytes(&payload)?;
    }
    Ok(())
}

/// Reads the body of a Compressed file. The caller has already consumed and
/// validated the header.
pub fn read<R: Read>(
    reader: &mut ByteReader<R>,
    header: &Header,
) -> Result<(Vec<ColumnType>, Vec<ColumnArray>), HybfError> {
    let row_count = reader.read_u32("row count")? as usize;
    let defs = format::read_column_defs(reader, header.column_count)?;

    let mut arrays = Vec::with_capacity(defs.len());
    for def in &defs {
        let tag = reader.read_u8("codec tag")?;
        let payload_len = reader.read_u32("payload length")? as usize;

        let encoding = match ColumnEncoding::from_tag(tag) {
            Ok(encoding) => encoding,
            Err(err) => {
                // Skip the payload so the source is left positioned at the
                // next column, then report the unknown tag.
                reader.skip(payload_len, "unknown codec payload")?;
                return Err(err);
            }
        };

        let payload = reader.read_bytes(payload_len, "column payload")?;
        let mut payload_reader = ByteReader::new(payload.as_slice());
        arrays.push(codecs::decode_column(
            encoding,
            &mut payload_reader,
            def,
            row_count,
        )?);
    }
    Ok((defs, arrays))
}
