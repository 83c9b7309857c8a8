//! The single source of truth for tunable encoding-selector thresholds.
//!
//! The defaults are the constants of format version 1 and are what
//! `write_table` uses; `write_table_with_config` accepts an explicit
//! configuration for callers that want to trade file size against encode
//! cost. The configuration only steers which codec the selector prefers —
//! it never changes the on-disk layout of any codec, so files written with
//! any configuration are readable by any reader.

/// Thresholds consulted by the per-column encoding selector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectorConfig {
    /// Dictionary encoding is considered when
    /// `unique_count / row_count <= dictionary_unique_ratio`.
    pub dictionary_unique_ratio: f64,

    /// Run-length encoding is considered when the mean run length is at
    /// least this long, i.e. `run_count * rle_min_mean_run <= row_count`.
    pub rle_min_mean_run: u32,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        SelectorConfig {
            dictionary_unique_ratio: 0.10,
            rle_min_mean_run: 4,
        }
    }
}
