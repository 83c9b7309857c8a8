//! This module defines the canonical, type-safe representations of the
//! user-visible (logical) and on-disk (storage) column types.
//!
//! The tag values are part of the wire format and must never change within a
//! format version; extending the set is reserved for a future version byte.

use std::fmt;

use crate::error::HybfError;

/// The user-visible element type of a column. Closed set with stable
/// 1-byte tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    /// Signed 32-bit integer.
    Int32 = 1,
    /// Signed 64-bit integer.
    Int64 = 2,
    /// IEEE-754 binary32; NaN encodes null.
    Float32 = 3,
    /// IEEE-754 binary64; NaN encodes null.
    Float64 = 4,
    /// UTF-8 text, nullable via a length sentinel.
    String = 5,
    /// Boolean, nullable via tri-state bytes.
    Boolean = 6,
}

impl LogicalType {
    /// The stable on-disk tag for this type.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Converts an on-disk tag back into a `LogicalType`.
    pub fn from_tag(tag: u8) -> Result<Self, HybfError> {
        match tag {
            1 => Ok(Self::Int32),
            2 => Ok(Self::Int64),
            3 => Ok(Self::Float32),
            4 => Ok(Self::Float64),
            5 => Ok(Self::String),
            6 => Ok(Self::Boolean),
            t => Err(HybfError::UnknownLogicalType(t)),
        }
    }

    /// The natural width of the type in bits. Strings and booleans are
    /// byte-oriented and report 8.
    pub fn natural_bit_width(self) -> u8 {
        match self {
            Self::Int32 | Self::Float32 => 32,
            Self::Int64 | Self::Float64 => 64,
            Self::String | Self::Boolean => 8,
        }
    }
}

/// Provides the canonical string representation for a `LogicalType`.
impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// How a column is physically laid out: the base type plus the number of
/// bits per value used by the raw encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StorageType {
    pub base: LogicalType,
    pub bit_width: u8,
}

impl StorageType {
    pub fn new(base: LogicalType, bit_width: u8) -> Self {
        StorageType { base, bit_width }
    }

    /// The size in whole bytes of one fixed-width element. Strings are
    /// variable-width and have no fixed element size.
    pub fn element_bytes(&self) -> usize {
        (self.bit_width as usize) / 8
    }
}

/// The on-disk descriptor of a column: its name, logical type, and analysed
/// storage type. Produced by analysis at write time, recorded verbatim in
/// the file, reconstructed on read, and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnType {
    pub name: String,
    pub logical: LogicalType,
    pub storage: StorageType,
}

impl ColumnType {
    pub fn new(name: impl Into<String>, logical: LogicalType, storage: StorageType) -> Self {
        ColumnType {
            name: name.into(),
            logical,
            storage,
        }
    }
}

//==================================================================================
// Unit Tests
//==================================================================================
