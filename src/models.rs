//! Core data structures for report parsing.
//!
//! Defines the header, row and dataset types produced by the parsing
//! pipeline along with per-file and per-run statistics.

use crate::error::{ParserError, Result, RowError};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Ordered, unique column names taken from the first line of a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    columns: Vec<String>,
}

impl Header {
    /// Build a header by splitting a cleaned line on the delimiter.
    ///
    /// Fails when no column name can be read (empty line or only blank
    /// fields) and when a name appears twice.
    pub fn parse(line: &str, delimiter: char, origin: &str) -> Result<Self> {
        if line.trim().is_empty() {
            return Err(ParserError::empty_header(origin));
        }

        let columns: Vec<String> = line.split(delimiter).map(str::to_string).collect();
        if columns.iter().all(|c| c.trim().is_empty()) {
            return Err(ParserError::empty_header(origin));
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(ParserError::DuplicateColumn {
                    origin: origin.to_string(),
                    column: column.clone(),
                });
            }
        }

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Bind split fields positionally, rejecting any other field count
    pub fn bind(
        &self,
        fields: Vec<String>,
        line_number: usize,
        reconstructed: &str,
    ) -> std::result::Result<Row, RowError> {
        if fields.len() != self.columns.len() {
            return Err(RowError::FieldCountMismatch {
                line_number,
                expected: self.columns.len(),
                found: fields.len(),
                reconstructed: reconstructed.to_string(),
            });
        }
        Ok(Row { values: fields })
    }
}

/// One parsed data line; always the same length as the header it was bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    values: Vec<String>,
}

impl Row {
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }
}

/// Header plus all rows parsed from one file, in read order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    header: Header,
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    /// Append a row bound against this dataset's header
    pub fn push(&mut self, row: Row) {
        debug_assert_eq!(row.len(), self.header.len());
        self.rows.push(row);
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Values of one column, top to bottom
    pub fn column_values(&self, index: usize) -> Vec<&str> {
        self.rows
            .iter()
            .map(|row| row.get(index).unwrap_or_default())
            .collect()
    }

    /// Look up a cell by row index and column name
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.header.columns().iter().position(|c| c == column)?;
        self.rows.get(row)?.get(index)
    }
}

/// Per-file parsing statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseStats {
    /// Data lines read (the header is not counted)
    pub lines_read: usize,

    /// Rows appended to the dataset
    pub rows_parsed: usize,

    /// Data lines dropped because they could not be reconstructed
    pub lines_skipped: usize,

    /// Whether reading stopped at the row ceiling rather than end of input
    pub ceiling_reached: bool,

    /// Skip diagnostics, capped by configuration
    pub skipped: Vec<String>,
}

impl ParseStats {
    /// Percentage of data lines that produced a row
    pub fn success_rate(&self) -> f64 {
        if self.lines_read == 0 {
            0.0
        } else {
            (self.rows_parsed as f64 / self.lines_read as f64) * 100.0
        }
    }

    pub(crate) fn record_skip(&mut self, error: &RowError, max_recorded: usize) {
        self.lines_skipped += 1;
        if self.skipped.len() < max_recorded {
            self.skipped.push(error.to_string());
        }
    }
}

/// Parsed dataset with the statistics gathered while building it
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub dataset: Dataset,
    pub stats: ParseStats,
}

/// Outcome of processing one discovered file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub stats: ParseStats,
}

/// Run-level statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub files_discovered: usize,
    pub files_processed: usize,
    pub files_failed: usize,
    pub rows_written: usize,
    pub lines_skipped: usize,
    pub reports: Vec<FileReport>,
    pub processing_time: Duration,
}

impl ProcessingStats {
    pub(crate) fn record(&mut self, report: FileReport) {
        self.files_processed += 1;
        self.rows_written += report.stats.rows_parsed;
        self.lines_skipped += report.stats.lines_skipped;
        self.reports.push(report);
    }
}
