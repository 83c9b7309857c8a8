//! Defines all on-disk structures and constants for the HYBF container
//! format. This is the single source of truth for the file header, the
//! column-definition records, and the two container variants.
//!
//! Both containers share the same prefix: an 8-byte header (magic, version,
//! format type, column count), a `u32` row count, then one definition record
//! per column. They differ only in the data section — `minimal` concatenates
//! raw payloads, `compressed` frames each column with a codec tag and a
//! payload length.

use std::io::{Read, Write};

use crate::error::HybfError;
use crate::io::{ByteReader, ByteWriter};
use crate::types::{ColumnType, LogicalType, StorageType};

pub mod compressed;
pub mod minimal;


//==================================================================================
// 1. Format constants
//==================================================================================

/// The magic number identifying a HYBF file.
pub const FILE_MAGIC: &[u8; 4] = b"HYBF";

/// The current version of the file format.
pub const FORMAT_VERSION: u8 = 1;

/// Estimated total size below which the writer chooses the Minimal
/// container. A hard constant of format version 1.
pub const MINIMAL_SIZE_THRESHOLD: usize = 4096;

/// Which container variant a file uses. The tag is byte 5 of the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    /// Raw columns only, no per-column framing; for tiny tables.
    Minimal = 1,
    /// Independently encoded columns with codec tags and payload lengths.
    Compressed = 2,
}

impl FormatKind {
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Result<Self, HybfError> {
        match tag {
            1 => Ok(Self::Minimal),
            2 => Ok(Self::Compressed),
            t => Err(HybfError::UnknownFormat(t)),
        }
    }
}

//==================================================================================
// 2. Header
//==================================================================================

/// The validated contents of the 8-byte file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub format: FormatKind,
    pub column_count: u16,
}

pub fn write_header<W: Write>(
    writer: &mut ByteWriter<W>,
    format: FormatKind,
    column_count: u16,
) -> Result<(), HybfError> {
    writer.write_bytes(FILE_MAGIC)?;
    writer.write_u8(FORMAT_VERSION)?;
    writer.write_u8(format.tag())?;
    writer.write_u16(column_count)
}

/// Reads and validates the header. Consumes exactly 8 bytes of the source,
/// which is what makes `sniff_format` safe to follow with a rewind and a
/// full read.
pub fn read_header<R: Read>(reader: &mut ByteReader<R>) -> Result<Header, HybfError> {
    let magic = reader.read_bytes(4, "magic")?;
    if magic != FILE_MAGIC {
        return Err(HybfError::InvalidMagic);
    }
    let version = reader.read_u8("version")?;
    if version != FORMAT_VERSION {
        return Err(HybfError::UnsupportedVersion(version));
    }
    let format = FormatKind::from_tag(reader.read_u8("format type")?)?;
    let column_count = reader.read_u16("column count")?;
    Ok(Header {
        format,
        column_count,
    })
}

//==================================================================================
// 3. Column definitions
//==================================================================================

pub(crate) fn write_column_defs<W: Write>(
    writer: &mut ByteWriter<W>,
    defs: &[ColumnType],
) -> Result<(), HybfError> {
    for def in defs {
        writer.write_name(&def.name)?;
        writer.write_u8(def.logical.tag())?;
        writer.write_u8(def.storage.base.tag())?;
        writer.write_u8(def.storage.bit_width)?;
    }
    Ok(())
}

pub(crate) fn read_column_defs<R: Read>(
    reader: &mut ByteReader<R>,
    column_count: u16,
) -> Result<Vec<ColumnType>, HybfError> {
    let mut defs = Vec::with_capacity(column_count as usize);
    for _ in 0..column_count {
        let name = reader.read_name()?;
        let logical = LogicalType::from_tag(reader.read_u8("logical type")?)?;
        let base = LogicalType::from_tag(reader.read_u8("storage base")?)?;
        let bit_width = reader.read_u8("storage width")?;
        defs.push(ColumnType::new(name, logical, StorageType::new(base, bit_width)));
    }
    Ok(defs)
}

/// The serialised size of one definition record.
pub(crate) fn column_def_size(name: &str) -> usize {
    1 + name.len() + 3
}
