//! Write-time storage analysis: given a column's values, determine the
//! physical layout the raw encoding will use.
//!
//! Integers narrow to the smallest width in {8, 16, 32, 64} whose
//! two's-complement range covers the observed `[min, max]`; the reader
//! sign-extends from that width, so the interpretation is unambiguous from
//! the descriptor alone. Floats never narrow. Strings and booleans are
//! byte-oriented.

use crate::types::column::ColumnArray;
use crate::types::logical::{LogicalType, StorageType};

/// Analyses a column and returns the storage layout the raw encoding uses.
pub fn analyze_storage(data: &ColumnArray) -> StorageType {
    match data {
        ColumnArray::Int32(values) => StorageType::new(
            LogicalType::Int32,
            int_range_width(
                values.iter().map(|&v| v as i64),
                LogicalType::Int32.natural_bit_width(),
            ),
        ),
        ColumnArray::Int64(values) => StorageType::new(
            LogicalType::Int64,
            int_range_width(
                values.iter().copied(),
                LogicalType::Int64.natural_bit_width(),
            ),
        ),
        ColumnArray::Float32(_) => StorageType::new(LogicalType::Float32, 32),
        ColumnArray::Float64(_) => StorageType::new(LogicalType::Float64, 64),
        ColumnArray::Utf8(_) => StorageType::new(LogicalType::String, 8),
        ColumnArray::Bool(_) => StorageType::new(LogicalType::Boolean, 8),
    }
}

/// The smallest width in {8, 16, 32, 64} whose two's-complement range holds
/// every value, capped at the logical type's natural width. An empty column
/// keeps the natural width.
fn int_range_width(values: impl Iterator<Item = i64>, natural: u8) -> u8 {
    let mut min = i64::MAX;
    let mut max = i64::MIN;
    let mut any = false;
    for v in values {
        any = true;
        min = min.min(v);
        max = max.max(v);
    }
    if !any {
        return natural;
    }

    for width in [8u8, 16, 32] {
        if width > natural {
            break;
        }
        let lo = -(1i64 << (width - 1));
        let hi = (1i64 << (width - 1)) - 1;
        if min >= lo && max <= hi {
            return width;
        }
    }
    natural
}

//==================================================================================
// Unit Tests
//==================================================================================
