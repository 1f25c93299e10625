//! Configuration management and validation.
//!
//! Provides configuration structures for line parsing, file discovery and
//! dataset output. Configuration is passed into constructors explicitly;
//! there is no process-wide state.

use crate::constants::{
    BOM_CHAR, BOM_MOJIBAKE, DEFAULT_DELIMITER, DEFAULT_DIRECTORY_MARKER, DEFAULT_ENCODING,
    DEFAULT_END_PATTERN, DEFAULT_FILE_MARKER, DEFAULT_MAX_RECORDED_SKIPS, DEFAULT_QUOTE_CHAR,
    DEFAULT_ROW_CEILING, DEFAULT_START_PATTERN, LEADING_DASH_TOKEN, TRAILING_DASH_TOKEN,
};
use crate::error::{ParserError, Result};
use crate::sink::OutputFormat;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Settings for turning one file into a dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Field delimiter for the header and reconstructed rows
    pub delimiter: char,

    /// Maximum number of data lines read per file
    pub row_ceiling: usize,

    /// WHATWG label of the input encoding
    pub encoding: String,

    /// Byte-order-mark remnants removed first
    pub bom_artifacts: Vec<String>,

    /// Literal tokens removed after line terminators, in order
    pub removed_tokens: Vec<String>,

    /// Character removed everywhere in the line
    pub quote_char: char,

    /// Pattern locating the title fragment
    pub start_pattern: String,

    /// Pattern locating the trailing code fragment
    pub end_pattern: String,

    /// Number of skip diagnostics kept per file
    pub max_recorded_skips: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            row_ceiling: DEFAULT_ROW_CEILING,
            encoding: DEFAULT_ENCODING.to_string(),
            bom_artifacts: vec![BOM_MOJIBAKE.to_string(), BOM_CHAR.to_string()],
            removed_tokens: vec![
                TRAILING_DASH_TOKEN.to_string(),
                LEADING_DASH_TOKEN.to_string(),
            ],
            quote_char: DEFAULT_QUOTE_CHAR,
            start_pattern: DEFAULT_START_PATTERN.to_string(),
            end_pattern: DEFAULT_END_PATTERN.to_string(),
            max_recorded_skips: DEFAULT_MAX_RECORDED_SKIPS,
        }
    }
}

impl ParserConfig {
    /// Set the row ceiling
    pub fn with_row_ceiling(mut self, row_ceiling: usize) -> Self {
        self.row_ceiling = row_ceiling;
        self
    }

    /// Set the input encoding label
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Replace both reconstruction patterns
    pub fn with_patterns(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_pattern = start.into();
        self.end_pattern = end.into();
        self
    }

    /// Set how many skip diagnostics are retained per file
    pub fn with_max_recorded_skips(mut self, max: usize) -> Self {
        self.max_recorded_skips = max;
        self
    }

    /// Resolve the configured encoding.
    ///
    /// Lines are split on the raw `\n` byte before decoding, so only
    /// ASCII-compatible encodings are accepted.
    pub fn resolve_encoding(&self) -> Result<&'static encoding_rs::Encoding> {
        let encoding =
            encoding_rs::Encoding::for_label(self.encoding.trim().as_bytes()).ok_or_else(|| {
                ParserError::UnknownEncoding {
                    label: self.encoding.clone(),
                }
            })?;

        if !encoding.is_ascii_compatible() {
            return Err(ParserError::configuration(format!(
                "encoding '{}' is not ASCII-compatible and cannot be split into lines",
                encoding.name()
            )));
        }
        Ok(encoding)
    }

    /// Validate settings, compiling patterns and resolving the encoding
    pub fn validate(&self) -> Result<()> {
        if self.row_ceiling == 0 {
            return Err(ParserError::configuration(
                "row ceiling must be greater than zero",
            ));
        }

        if self.delimiter.is_alphanumeric() || self.delimiter == self.quote_char {
            return Err(ParserError::configuration(format!(
                "delimiter '{}' must be a non-alphanumeric character distinct from the quote character",
                self.delimiter
            )));
        }

        if self.bom_artifacts.iter().chain(&self.removed_tokens).any(String::is_empty) {
            return Err(ParserError::configuration(
                "artifact tokens must not be empty",
            ));
        }

        compile_pattern("start", &self.start_pattern)?;
        compile_pattern("end", &self.end_pattern)?;
        self.resolve_encoding()?;

        debug!(
            "Parser configuration valid: delimiter={:?}, ceiling={}, encoding={}",
            self.delimiter, self.row_ceiling, self.encoding
        );
        Ok(())
    }
}

/// Compile a reconstruction pattern, mapping failures to a configuration error
pub(crate) fn compile_pattern(kind: &'static str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| ParserError::InvalidPattern {
        kind,
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Rules for selecting input files under a root directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Substring the containing directory path must include
    pub directory_marker: String,

    /// Substring the file name must include
    pub file_marker: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            directory_marker: DEFAULT_DIRECTORY_MARKER.to_string(),
            file_marker: DEFAULT_FILE_MARKER.to_string(),
        }
    }
}

/// Where and how datasets are written
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,

    /// Directory receiving output files; `None` writes next to each input
    pub output_dir: Option<PathBuf>,
}

/// Complete configuration for a processing run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessorConfig {
    pub parser: ParserConfig,
    pub discovery: DiscoveryConfig,
    pub output: OutputConfig,
}

impl ProcessorConfig {
    /// Replace the parser settings
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    /// Set the discovery markers
    pub fn with_markers(
        mut self,
        directory_marker: impl Into<String>,
        file_marker: impl Into<String>,
    ) -> Self {
        self.discovery.directory_marker = directory_marker.into();
        self.discovery.file_marker = file_marker.into();
        self
    }

    /// Set the output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output.format = format;
        self
    }

    /// Write all output into one directory
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output.output_dir = Some(output_dir.into());
        self
    }

    /// Validate the complete configuration
    pub fn validate(&self) -> Result<()> {
        self.parser.validate()?;

        if self.discovery.file_marker.is_empty() {
            return Err(ParserError::configuration("file marker must not be empty"));
        }

        Ok(())
    }
}
