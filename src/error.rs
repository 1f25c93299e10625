//! Error handling for report parsing operations.
//!
//! Two layers of errors exist. [`ParserError`] is fatal for the file (or run)
//! being processed and is propagated to the caller. [`RowError`] describes a
//! single line that could not be turned into a row; it is recorded and the
//! line is skipped, never propagated past the row step.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("Empty header in {origin}: no column names could be read from the first line")]
    EmptyHeader { origin: String },

    #[error("Duplicate column '{column}' in header of {origin}")]
    DuplicateColumn { origin: String, column: String },

    #[error("Unknown text encoding label: {label}")]
    UnknownEncoding { label: String },

    #[error("Invalid {kind} pattern '{pattern}': {reason}")]
    InvalidPattern {
        kind: &'static str,
        pattern: String,
        reason: String,
    },

    #[error("Directory traversal error: {0}")]
    DirectoryTraversal(#[from] walkdir::Error),

    #[error("Root directory not found at path: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Input file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Output {path} was already written by {previous} in this run")]
    OutputCollision { path: PathBuf, previous: PathBuf },

    #[error("Dataset too large for worksheet: {rows} rows x {columns} columns (limit {max_rows} x {max_columns})")]
    SheetLimitExceeded {
        rows: usize,
        columns: usize,
        max_rows: usize,
        max_columns: usize,
    },
}

impl ParserError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an empty header error for the given input
    pub fn empty_header(origin: impl Into<String>) -> Self {
        Self::EmptyHeader {
            origin: origin.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParserError>;

/// A data line that could not be rebuilt into a row.
///
/// Carries the original line and whatever fragments were recoverable so the
/// diagnostic is useful on its own.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error(
        "line {line_number}: could not reconstruct row from '{line}' (start: {start:?}, end: {end:?})"
    )]
    Reconstruction {
        line_number: usize,
        line: String,
        start: Option<String>,
        end: Option<String>,
    },

    #[error(
        "line {line_number}: expected {expected} fields, found {found} in reconstructed '{reconstructed}'"
    )]
    FieldCountMismatch {
        line_number: usize,
        expected: usize,
        found: usize,
        reconstructed: String,
    },
}

impl RowError {
    /// Line number (1-based, header is line 1) the error refers to
    pub fn line_number(&self) -> usize {
        match self {
            RowError::Reconstruction { line_number, .. }
            | RowError::FieldCountMismatch { line_number, .. } => *line_number,
        }
    }
}
