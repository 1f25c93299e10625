//! Report Parser Library
//!
//! A Rust library for converting loosely structured, comma-delimited report
//! exports into well-formed tables.
//!
//! This library provides tools for:
//! - Decoding legacy single-byte codepage exports line by line
//! - Stripping encoding and formatting artifacts from each line
//! - Rebuilding rows from a recognisable title prefix and trailing code,
//!   skipping lines that cannot be rebuilt instead of failing the file
//! - Bounding each file to a fixed number of data lines
//! - Writing datasets to Excel workbooks, Parquet or CSV
//! - Discovering export files under a directory tree
//!
//! ## Usage
//!
//! ```no_run
//! use report_parser::{ParserConfig, TableParser};
//!
//! # fn example() -> report_parser::Result<()> {
//! let parser = TableParser::new(ParserConfig::default())?;
//! let result = parser.parse_file(std::path::Path::new("data_sets/report.csv"))?;
//!
//! println!(
//!     "Parsed {} rows, skipped {} lines",
//!     result.stats.rows_parsed, result.stats.lines_skipped
//! );
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod normalizer;
pub mod parser;
pub mod processor;
pub mod reconstructor;
pub mod sink;
pub mod stream;

// Re-export commonly used types
pub use config::{DiscoveryConfig, OutputConfig, ParserConfig, ProcessorConfig};
pub use error::{ParserError, Result, RowError};
pub use models::{Dataset, Header, ParseResult, ParseStats, ProcessingStats, Row};
pub use parser::TableParser;
pub use processor::BatchProcessor;
pub use sink::{DatasetSink, OutputFormat};
