//! MED Raw File Decoder Library
//!
//! A stateless, reusable library for turning MED-PC raw data files into tidy
//! two-column (time, event) tables.
//!
//! # Architecture
//!
//! One extraction is a linear pipeline over a single file:
//! - Loads the file into a grid of whitespace-separated tokens, skipping the
//!   fixed header
//! - Locates the data block of one named array variable (`C:` by default)
//!   using the `0:` rows that start every array section
//! - Flattens the block and splits each packed `time.event` value
//! - Writes `<output_dir>/<phase><subject><session>.csv` atomically
//!
//! The library does NOT:
//! - Iterate over many files
//! - Decide whether a failing file should skip or abort a batch
//! - Extract more than one variable per call
//!
//! Batch processing is in the application layer (med-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use med_decoder::{ExtractConfig, Extractor, SessionInfo};
//! use std::path::Path;
//!
//! let config = ExtractConfig::new()
//!     .with_var_cols(5)
//!     .with_marker("C:");
//! let extractor = Extractor::new(config).unwrap();
//!
//! let info = SessionInfo::new("A", "034", 1i64);
//! match extractor.extract(Path::new("raw/subject034"), &info, Path::new("tidy")) {
//!     Ok(summary) => println!("{} events -> {:?}", summary.rows, summary.output),
//!     Err(e) => eprintln!("Extraction failed: {}", e),
//! }
//! ```

// Public modules
pub mod config;
pub mod extractor;
pub mod grid;
pub mod locator;
pub mod output;
pub mod reshape;
pub mod types;

// Re-export main types for convenience
pub use config::ExtractConfig;
pub use extractor::{extract, ExtractSummary, Extractor};
pub use grid::{GridRow, RawGrid};
pub use locator::{locate_block, DataBlock, SectionMarkers};
pub use output::{write_tidy_csv, OutputKey};
pub use types::{DecoderError, Label, Phase, Result, SessionInfo, TidyRow};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
