//! This file is the root of the `hybf` Rust crate.
//!
//! HYBF (Hybrid Binary Format) is a self-describing, column-oriented binary
//! container for tabular data. It is tuned for two regimes: very small tables,
//! where metadata overhead dominates and the Minimal container keeps framing
//! to a handful of bytes, and larger tables, where the Compressed container
//! lets every column pick its own encoding (raw with bit-width reduction,
//! single-value, run-length, bit-packed dictionary, or null).
//!
//! The crate is a pure library. A write is one pass over caller-supplied
//! column arrays into any `std::io::Write` sink; a read is one forward scan
//! over any `std::io::Read` source. There is no shared mutable state, no
//! global registry, and no cache.
//!
//! ## Quick start
//!
//! ```
//! use hybf::{read_table, write_table, Column, ColumnArray};
//!
//! let columns = vec![
//!     Column::new("id", ColumnArray::Int32(vec![1, 2, 3])),
//!     Column::new("tag", ColumnArray::Utf8(vec![
//!         Some("x".to_string()),
//!         None,
//!         Some("z".to_string()),
//!     ])),
//! ];
//!
//! let mut file = Vec::new();
//! write_table(&columns, &mut file)?;
//!
//! let (defs, arrays) = read_table(&mut file.as_slice())?;
//! assert_eq!(defs[0].name, "id");
//! assert_eq!(arrays[0], ColumnArray::Int32(vec![1, 2, 3]));
//! # Ok::<(), hybf::HybfError>(())
//! ```

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod codecs;
pub mod config;
pub mod format;
pub mod kernels;
pub mod types;

mod api;
mod error;
mod io;
mod selector;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use api::{read_table, sniff_format, write_table, write_table_with_config};
pub use codecs::ColumnEncoding;
pub use config::SelectorConfig;
pub use error::HybfError;
pub use format::FormatKind;
pub use types::{Column, ColumnArray, ColumnType, LogicalType, StorageType};
