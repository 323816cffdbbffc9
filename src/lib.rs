//! # data-handling
//!
//! Read and write tables in different file formats through one API. A
//! format type (`"csv"`, `"json"`, `"jsonl"`, or anything you register)
//! selects an adapter; the adapter does the actual I/O.
//!
//! ## Quick Start
//!
//! ```no_run
//! use data_handling::*;
//!
//! # fn main() -> Result<()> {
//! let table = Table::with_rows(
//!     ["id", "name", "role"],
//!     vec![
//!         vec![101.into(), "Neo".into(), "The One".into()],
//!         vec![102.into(), "Trinity".into(), "Hacker".into()],
//!     ],
//! )?;
//!
//! // One-off calls
//! save_data(&table, "output_folder/processed_data.csv", "csv")?;
//! let back = load_data("output_folder/processed_data.csv", "csv")?;
//! assert_eq!(back, table);
//!
//! // Configuration-driven
//! let store = DataStore::new(IoConfig::new("output_folder", FormatType::Json)?);
//! store.save_to("processed_data.json", &table)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Adding a Format
//!
//! Implement [`FormatAdapter`] and register it. Existing adapters and call
//! sites are untouched:
//!
//! ```no_run
//! use data_handling::*;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! struct Tsv;
//!
//! impl FormatAdapter for Tsv {
//!     fn id(&self) -> &str { "tsv" }
//!     fn extensions(&self) -> &[&str] { &[".tsv"] }
//!     fn read(&self, path: &Path, options: &ReadOptions) -> Result<Table> {
//!         resolve("csv")?.read(path, &options.clone().delimiter(b'\t'))
//!     }
//!     fn write(&self, path: &Path, table: &Table, options: &WriteOptions) -> Result<usize> {
//!         resolve("csv")?.write(path, table, &options.clone().delimiter(b'\t'))
//!     }
//! }
//!
//! register_format(Arc::new(Tsv));
//! # Ok::<(), DataIoError>(())
//! ```
//!
//! ## Table Equality Across Formats
//!
//! JSON keeps cell types. CSV stores text, so cells are re-inferred on read
//! (see [`table`] for the exact rules). A table round-trips through CSV when
//! none of its string cells looks like another scalar (`"42"`, `"true"`,
//! `""`). Through JSON and JSONL a table round-trips when it has at least
//! one row and no non-finite floats.
//!
//! ## Feature Flags
//!
//! - `io-csv` - CSV adapter (requires `csv`)
//! - `io-json` - JSON adapter
//! - `io-jsonl` - JSON Lines adapter
//! - `compression-gzip` - transparent `.gz` (requires `flate2`)
//! - `compression-zstd` - transparent `.zst` (requires `zstd`)
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade and installs no logger.

pub mod adapter;
pub mod config;
pub mod error;
pub mod io;
pub mod registry;
pub mod store;
pub mod table;
pub mod testing;

pub use adapter::{FormatAdapter, FormatType, ReadOptions, WriteOptions};
pub use config::IoConfig;
pub use error::{DataIoError, Result};
pub use registry::{FormatRegistry, register_format, registered_formats, resolve, resolve_path};
pub use store::{DataStore, load_data, save_data};
pub use table::{Cell, Table};

#[cfg(feature = "io-csv")]
pub use io::csv::CsvFormat;
#[cfg(feature = "io-json")]
pub use io::json::JsonFormat;
#[cfg(feature = "io-jsonl")]
pub use io::jsonl::JsonlFormat;
