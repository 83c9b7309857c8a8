//! This module defines the single, unified error type for the entire hybf
//! library. It uses the `thiserror` crate to provide ergonomic, context-aware
//! error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HybfError {
    // =========================================================================
    // === Header / framing errors
    // =========================================================================
    #[error("Invalid magic bytes: not a HYBF file")]
    InvalidMagic,

    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(u8),

    #[error("Unknown format type: {0}")]
    UnknownFormat(u8),

    #[error("Unknown logical type tag: {0}")]
    UnknownLogicalType(u8),

    #[error("Unknown codec tag: {0}")]
    UnknownCodec(u8),

    // =========================================================================
    // === Payload errors
    // =========================================================================
    /// The source ended before a field was fully read. The message names the
    /// field being read when the source ran out.
    #[error("Source truncated while reading {0}")]
    Truncated(String),

    /// An internal format invariant was violated (run sums, dictionary codes,
    /// bit-width overflow, malformed UTF-8, length mismatches).
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("Column name exceeds 255 bytes (got {0})")]
    NameTooLong(usize),

    /// Write-side: a column's element type has no logical-type mapping, or a
    /// codec cannot represent the column it was asked to encode.
    #[error("Unsupported column type: {0}")]
    UnsupportedType(String),

    // =========================================================================
    // === External error wrappers
    // =========================================================================
    /// An error originating from the underlying I/O subsystem. Premature
    /// end-of-source is reported as `Truncated`, not `Io`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
