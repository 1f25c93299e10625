//! Command-line interface components.

use crate::config::{ParserConfig, ProcessorConfig};
use crate::constants::{
    DEFAULT_DIRECTORY_MARKER, DEFAULT_ENCODING, DEFAULT_FILE_MARKER, DEFAULT_ROW_CEILING,
};
use crate::models::ProcessingStats;
use crate::processor::{BatchProcessor, print_summary};
use crate::sink::OutputFormat;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "report-parser")]
#[command(about = "Convert loosely structured report exports into clean workbook tables")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Root directory searched recursively for exports (defaults to the current directory)
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Convert a single file instead of searching a root directory
    #[arg(short, long, value_name = "FILE", conflicts_with = "root")]
    pub file: Option<PathBuf>,

    /// Directory for output files (defaults to next to each input)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Xlsx)]
    pub format: OutputFormat,

    /// Encoding of the input files (any WHATWG label, e.g. windows-1251, utf-8)
    #[arg(long, default_value = DEFAULT_ENCODING)]
    pub encoding: String,

    /// Maximum number of data lines read per file
    #[arg(long, default_value_t = DEFAULT_ROW_CEILING)]
    pub row_ceiling: usize,

    /// Substring a directory path must contain for its files to be converted
    #[arg(long, default_value = DEFAULT_DIRECTORY_MARKER)]
    pub dir_marker: String,

    /// Substring a file name must contain to be converted
    #[arg(long, default_value = DEFAULT_FILE_MARKER)]
    pub file_marker: String,

    /// Enable verbose logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors, hide progress
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Log level for this crate
    pub fn get_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    /// Build the processing configuration from the flags
    pub fn to_config(&self) -> ProcessorConfig {
        let parser = ParserConfig::default()
            .with_encoding(self.encoding.clone())
            .with_row_ceiling(self.row_ceiling);

        let config = ProcessorConfig::default()
            .with_parser(parser)
            .with_markers(self.dir_marker.clone(), self.file_marker.clone())
            .with_format(self.format);

        match &self.output_dir {
            Some(dir) => config.with_output_dir(dir),
            None => config,
        }
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("report_parser={}", args.get_log_level())));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

/// Run the conversion described by `args`
pub fn run(args: &Args) -> Result<ProcessingStats> {
    let processor = BatchProcessor::new(args.to_config())
        .context("Invalid configuration")?
        .with_progress(!args.quiet);

    let stats = match &args.file {
        Some(file) => processor
            .process_single(file)
            .with_context(|| format!("Failed to convert {}", file.display()))?,
        None => {
            let root = match &args.root {
                Some(root) => root.clone(),
                None => std::env::current_dir().context("Could not determine current directory")?,
            };
            processor
                .process_root(&root)
                .with_context(|| format!("Failed to process {}", root.display()))?
        }
    };

    if !args.quiet {
        print_summary(&stats);
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["report-parser"]);
        assert_eq!(args.format, OutputFormat::Xlsx);
        assert_eq!(args.row_ceiling, 50_000);
        assert_eq!(args.encoding, "windows-1251");
        assert_eq!(args.get_log_level(), "info");

        let config = args.to_config();
        assert_eq!(config.discovery.directory_marker, "data_sets");
        assert_eq!(config.output.output_dir, None);
    }

    #[test]
    fn test_args_to_config() {
        let args = Args::parse_from([
            "report-parser",
            "/data",
            "--format",
            "parquet",
            "--row-ceiling",
            "10",
            "--encoding",
            "utf-8",
            "--dir-marker",
            "exports",
            "-o",
            "/out",
            "-v",
        ]);

        assert_eq!(args.root, Some(PathBuf::from("/data")));
        assert_eq!(args.get_log_level(), "debug");

        let config = args.to_config();
        assert_eq!(config.output.format, OutputFormat::Parquet);
        assert_eq!(config.parser.row_ceiling, 10);
        assert_eq!(config.parser.encoding, "utf-8");
        assert_eq!(config.discovery.directory_marker, "exports");
        assert_eq!(config.output.output_dir, Some(PathBuf::from("/out")));
    }

    #[test]
    fn test_file_conflicts_with_root() {
        let result = Args::try_parse_from(["report-parser", "/data", "--file", "a.csv"]);
        assert!(result.is_err());
    }
}
