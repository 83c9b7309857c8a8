//! The per-column encoding selector: cheap single-pass statistics, an
//! applicability predicate per codec, and the smallest exact size estimate
//! wins. Ties break toward the earlier codec in tag order (Null,
//! SingleValue, Dictionary, RLE, Raw).
//!
//! The selector is pure: it never mutates its input and is safe to call
//! repeatedly. Decisions are logged at `debug` level through the `log`
//! facade so a writer's choices can be inspected without changing output.

use std::collections::HashSet;

use crate::codecs::{self, raw, rle, ColumnEncoding};
use crate::config::SelectorConfig;
use crate::types::{ColumnArray, StorageType};

//==================================================================================
// 1. Column statistics
//==================================================================================

/// The statistics the applicability predicates consume. All counts treat a
/// float column's NaNs as one null pseudo-value, exactly as the dictionary
/// codec would store them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ColumnProfile {
    pub row_count: usize,
    pub null_count: usize,
    pub unique_count: usize,
    pub run_count: usize,
}

impl ColumnProfile {
    pub fn analyze(data: &ColumnArray) -> Self {
        let unique_count = match data {
            ColumnArray::Int32(values) => values.iter().collect::<HashSet<_>>().len(),
            ColumnArray::Int64(values) => values.iter().collect::<HashSet<_>>().len(),
            ColumnArray::Float32(values) => values
                .iter()
                .map(|&v| raw::canon_f32_bits(v))
                .collect::<HashSet<_>>()
                .len(),
            ColumnArray::Float64(values) => values
                .iter()
                .map(|&v| raw::canon_f64_bits(v))
                .collect::<HashSet<_>>()
                .len(),
            ColumnArray::Bool(values) => values.iter().collect::<HashSet<_>>().len(),
            ColumnArray::Utf8(values) => values
                .iter()
                .map(|v| v.as_deref())
                .collect::<HashSet<_>>()
                .len(),
        };

        ColumnProfile {
            row_count: data.len(),
            null_count: data.null_count(),
            unique_count,
            run_count: rle::run_count(data),
        }
    }
}

//==================================================================================
// 2. Selection
//==================================================================================

/// Returns the codec with the smallest estimated payload among those whose
/// applicability predicate holds for the column.
pub(crate) fn select_encoding(
    name: &str,
    data: &ColumnArray,
    storage: &StorageType,
    config: &SelectorConfig,
) -> ColumnEncoding {
    let profile = ColumnProfile::analyze(data);

    // Candidates in tie-break order; Raw is the always-applicable fallback.
    let mut candidates = Vec::with_capacity(5);
    if profile.row_count > 0 && profile.null_count == profile.row_count {
        candidates.push(ColumnEncoding::Null);
    }
    if profile.row_count >= 2 && profile.null_count == 0 && profile.unique_count == 1 {
        candidates.push(ColumnEncoding::SingleValue);
    }
    if profile.row_count > 0
        && profile.unique_count as f64 / profile.row_count as f64 <= config.dictionary_unique_ratio
    {
        candidates.push(ColumnEncoding::Dictionary);
    }
    if profile.row_count > 0
        && profile.run_count * config.rle_min_mean_run as usize <= profile.row_count
    {
        candidates.push(ColumnEncoding::Rle);
    }
    candidates.push(ColumnEncoding::Raw);

    let mut best = ColumnEncoding::Raw;
    let mut best_size = usize::MAX;
    for &candidate in &candidates {
        let size = codecs::estimate_size(candidate, data, storage);
        if size < best_size {
            best = candidate;
            best_size = size;
        }
    }

    log::debug!(
        "column '{}': selected {} ({} bytes estimated, {} rows, {} unique, {} runs, {} nulls)",
        name,
        best,
        best_size,
        profile.row_count,
        profile.unique_count,
        profile.run_count,
        profile.null_count
    );
    best
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
