//! Row reconstruction from cleaned lines.
//!
//! Report lines carry a readable title, an unparseable middle and a
//! fixed-shape trailing code. Two independent patterns locate the title
//! prefix and the trailing code; the middle is discarded and the two
//! fragments are rejoined with the delimiter before binding against the
//! header.

use crate::config::{ParserConfig, compile_pattern};
use crate::error::{Result, RowError};
use crate::models::{Header, Row};
use regex::Regex;

/// Fragments located in a cleaned line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragments<'a> {
    pub start: Option<&'a str>,
    pub end: Option<&'a str>,
}

/// Rebuilds rows from cleaned lines using the start and end patterns
#[derive(Debug, Clone)]
pub struct RowReconstructor {
    start_pattern: Regex,
    end_pattern: Regex,
    delimiter: char,
}

impl RowReconstructor {
    /// Compile the configured patterns
    pub fn new(config: &ParserConfig) -> Result<Self> {
        Ok(Self {
            start_pattern: compile_pattern("start", &config.start_pattern)?,
            end_pattern: compile_pattern("end", &config.end_pattern)?,
            delimiter: config.delimiter,
        })
    }

    /// Leftmost match of the title pattern
    pub fn match_start<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.start_pattern.find(line).map(|m| m.as_str())
    }

    /// Trailing code at the end of the line
    pub fn match_end<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.end_pattern.find(line).map(|m| m.as_str())
    }

    /// Locate both fragments without deciding success
    pub fn fragments<'a>(&self, line: &'a str) -> Fragments<'a> {
        Fragments {
            start: self.match_start(line),
            end: self.match_end(line),
        }
    }

    /// Rebuild one cleaned data line into a row bound to `header`
    pub fn reconstruct(
        &self,
        header: &Header,
        line_number: usize,
        line: &str,
    ) -> std::result::Result<Row, RowError> {
        let (start, end) = match self.fragments(line) {
            Fragments {
                start: Some(start),
                end: Some(end),
            } => (start, end),
            Fragments { start, end } => {
                return Err(RowError::Reconstruction {
                    line_number,
                    line: line.to_string(),
                    start: start.map(str::to_string),
                    end: end.map(str::to_string),
                });
            }
        };

        let mut reconstructed = String::with_capacity(start.len() + end.len() + 1);
        reconstructed.push_str(start);
        reconstructed.push(self.delimiter);
        reconstructed.push_str(end);

        let fields = reconstructed
            .split(self.delimiter)
            .map(str::to_string)
            .collect();
        header.bind(fields, line_number, &reconstructed)
    }
}
