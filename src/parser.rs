//! Table parser orchestration for one report file.
//!
//! Drives a [`RowStream`] to completion, appending rows to a [`Dataset`] and
//! recording every skipped line. Per-line failures are logged and counted;
//! only I/O and header failures abort the file.

use crate::config::ParserConfig;
use crate::error::{ParserError, Result};
use crate::models::{Dataset, ParseResult, ParseStats};
use crate::normalizer::LineNormalizer;
use crate::reconstructor::RowReconstructor;
use crate::stream::{LineOutcome, RowStream};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Converts report files into datasets
#[derive(Debug, Clone)]
pub struct TableParser {
    config: ParserConfig,
    normalizer: LineNormalizer,
    reconstructor: RowReconstructor,
}

impl TableParser {
    /// Validate the configuration and compile the patterns once
    pub fn new(config: ParserConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            normalizer: LineNormalizer::new(&config),
            reconstructor: RowReconstructor::new(&config)?,
            config,
        })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse the file at `path`
    pub fn parse_file(&self, path: &Path) -> Result<ParseResult> {
        if !path.is_file() {
            return Err(ParserError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path)?;
        self.parse_reader(BufReader::new(file), &path.display().to_string())
    }

    /// Parse any buffered reader; `origin` names the input in diagnostics
    pub fn parse_reader<R: BufRead>(&self, reader: R, origin: &str) -> Result<ParseResult> {
        let mut stream = RowStream::new(
            reader,
            &self.config,
            self.normalizer.clone(),
            self.reconstructor.clone(),
            origin,
        )?;

        let mut dataset = Dataset::new(stream.header().clone());
        let mut stats = ParseStats::default();

        for outcome in stream.by_ref() {
            match outcome? {
                LineOutcome::Row(row) => dataset.push(row),
                LineOutcome::Skipped(error) => {
                    warn!("Skipping line in {}: {}", origin, error);
                    stats.record_skip(&error, self.config.max_recorded_skips);
                }
            }
        }

        stats.lines_read = stream.lines_read();
        stats.rows_parsed = dataset.row_count();
        stats.ceiling_reached = stream.ceiling_reached();

        if stats.ceiling_reached {
            debug!(
                "Stopped {} at the row ceiling of {} data lines",
                origin, self.config.row_ceiling
            );
        }
        debug!(
            "Parsed {}: {} rows from {} data lines ({} skipped)",
            origin, stats.rows_parsed, stats.lines_read, stats.lines_skipped
        );

        Ok(ParseResult { dataset, stats })
    }
}
