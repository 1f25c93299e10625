//! Bounded streaming over the lines of one report file.
//!
//! [`RowStream`] reads the header when it is created and then yields one
//! [`LineOutcome`] per data line until end of input or the row ceiling,
//! whichever comes first. Lines beyond the ceiling are never read. The
//! stream owns its reader, so the underlying file is closed on every exit
//! path.

use crate::config::ParserConfig;
use crate::error::{ParserError, Result, RowError};
use crate::models::{Header, Row};
use crate::normalizer::LineNormalizer;
use crate::reconstructor::RowReconstructor;
use encoding_rs::Encoding;
use std::io::BufRead;
use tracing::debug;

/// Result of reading one data line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// The line was rebuilt into a row
    Row(Row),
    /// The line was dropped
    Skipped(RowError),
}

/// Reads `\n`-terminated lines and decodes them with a single-byte codepage
#[derive(Debug)]
pub struct LegacyLines<R> {
    reader: R,
    encoding: &'static Encoding,
    buffer: Vec<u8>,
}

impl<R: BufRead> LegacyLines<R> {
    pub fn new(reader: R, encoding: &'static Encoding) -> Self {
        Self {
            reader,
            encoding,
            buffer: Vec::new(),
        }
    }

    /// Next decoded line, terminator included; `None` at end of input
    pub fn next_line(&mut self) -> Result<Option<String>> {
        self.buffer.clear();
        if self.reader.read_until(b'\n', &mut self.buffer)? == 0 {
            return Ok(None);
        }

        let (decoded, had_errors) = self.encoding.decode_without_bom_handling(&self.buffer);
        if had_errors {
            debug!(
                "Replaced malformed byte sequences while decoding as {}",
                self.encoding.name()
            );
        }
        Ok(Some(decoded.into_owned()))
    }
}

/// Parser position within one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    AccumulatingRows,
    Finished,
}

/// Lazy, finite sequence of line outcomes for one file
#[derive(Debug)]
pub struct RowStream<R> {
    lines: LegacyLines<R>,
    header: Header,
    normalizer: LineNormalizer,
    reconstructor: RowReconstructor,
    row_ceiling: usize,
    lines_read: usize,
    state: StreamState,
}

impl<R: BufRead> RowStream<R> {
    /// Read the header line and prepare to stream data lines.
    ///
    /// Fails with [`ParserError::EmptyHeader`] when the input is empty or
    /// the first line has no column names.
    pub fn new(
        reader: R,
        config: &ParserConfig,
        normalizer: LineNormalizer,
        reconstructor: RowReconstructor,
        origin: &str,
    ) -> Result<Self> {
        let mut lines = LegacyLines::new(reader, config.resolve_encoding()?);

        let raw_header = lines
            .next_line()?
            .ok_or_else(|| ParserError::empty_header(origin))?;
        let header = Header::parse(&normalizer.normalize(&raw_header), config.delimiter, origin)?;

        debug!("Header for {}: {} columns", origin, header.len());

        Ok(Self {
            lines,
            header,
            normalizer,
            reconstructor,
            row_ceiling: config.row_ceiling,
            lines_read: 0,
            state: StreamState::AccumulatingRows,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Data lines consumed so far
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// True once `row_ceiling` data lines have been read
    pub fn ceiling_reached(&self) -> bool {
        self.lines_read >= self.row_ceiling
    }

    fn read_next(&mut self) -> Result<Option<LineOutcome>> {
        if self.lines_read >= self.row_ceiling {
            debug!("Row ceiling of {} data lines reached", self.row_ceiling);
            return Ok(None);
        }

        let Some(raw) = self.lines.next_line()? else {
            return Ok(None);
        };
        self.lines_read += 1;

        // Header occupies line 1
        let line_number = self.lines_read + 1;
        let cleaned = self.normalizer.normalize(&raw);

        let outcome = match self
            .reconstructor
            .reconstruct(&self.header, line_number, &cleaned)
        {
            Ok(row) => LineOutcome::Row(row),
            Err(error) => LineOutcome::Skipped(error),
        };
        Ok(Some(outcome))
    }
}

impl<R: BufRead> Iterator for RowStream<R> {
    type Item = Result<LineOutcome>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == StreamState::Finished {
            return None;
        }

        match self.read_next() {
            Ok(Some(outcome)) => Some(Ok(outcome)),
            Ok(None) => {
                self.state = StreamState::Finished;
                None
            }
            Err(e) => {
                self.state = StreamState::Finished;
                Some(Err(e))
            }
        }
    }
}
