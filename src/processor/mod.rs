//! Batch processing of discovered report files.
//!
//! Orchestrates file discovery, parsing and dataset output. Files are handled
//! strictly one after another; a fatal error in one file is logged and
//! counted without affecting the others.

pub mod discovery;

#[cfg(test)]
pub mod tests;

use self::discovery::FileDiscovery;

use crate::config::ProcessorConfig;
use crate::error::{ParserError, Result};
use crate::models::{FileReport, ProcessingStats};
use crate::parser::TableParser;
use crate::sink::{DatasetSink, output_path_for};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs the parse-and-write pipeline over report files
pub struct BatchProcessor {
    config: ProcessorConfig,
    parser: TableParser,
    sink: Box<dyn DatasetSink>,
    show_progress: bool,
}

impl std::fmt::Debug for BatchProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchProcessor")
            .field("config", &self.config)
            .field("sink", &self.sink.extension())
            .field("show_progress", &self.show_progress)
            .finish()
    }
}

impl BatchProcessor {
    /// Create a processor from a validated configuration
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        config.validate()?;
        let parser = TableParser::new(config.parser.clone())?;
        let sink = config.output.format.sink();

        Ok(Self {
            config,
            parser,
            sink,
            show_progress: false,
        })
    }

    /// Replace the output sink
    pub fn with_sink(mut self, sink: Box<dyn DatasetSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Show a progress bar while processing discovered files
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Output location for one input file
    pub fn output_path(&self, input: &Path) -> PathBuf {
        output_path_for(
            input,
            self.config.output.output_dir.as_deref(),
            self.sink.extension(),
        )
    }

    /// Parse one file and write its dataset.
    ///
    /// Errors are fatal for this file only and are returned to the caller.
    pub fn process_file(&self, input: &Path) -> Result<FileReport> {
        let result = self.parser.parse_file(input)?;
        let output = self.output_path(input);

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        self.sink.write(&result.dataset, &output)?;

        debug!(
            "Converted {} -> {} ({} rows, {} skipped)",
            input.display(),
            output.display(),
            result.stats.rows_parsed,
            result.stats.lines_skipped
        );

        Ok(FileReport {
            input: input.to_path_buf(),
            output,
            stats: result.stats,
        })
    }

    /// Process one file, propagating its error instead of counting it
    pub fn process_single(&self, input: &Path) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        let report = self.process_file(input)?;

        let mut stats = ProcessingStats {
            files_discovered: 1,
            ..Default::default()
        };
        stats.record(report);
        stats.processing_time = start_time.elapsed();
        Ok(stats)
    }

    /// Discover every matching file under `root` and process each one
    pub fn process_root(&self, root: &Path) -> Result<ProcessingStats> {
        let start_time = Instant::now();

        let mut discovery = FileDiscovery::new(root.to_path_buf(), self.config.discovery.clone());
        let files = discovery.discover_files()?;
        info!(
            "Discovered {} files in {} directories under {}",
            files.len(),
            discovery.directory_count(),
            root.display()
        );

        let mut stats = self.process_files(&files);
        stats.processing_time = start_time.elapsed();
        Ok(stats)
    }

    /// Process a list of files sequentially, isolating failures per file.
    ///
    /// A file whose output path was already written earlier in the same
    /// call fails with [`ParserError::OutputCollision`] and is not parsed.
    pub fn process_files(&self, files: &[PathBuf]) -> ProcessingStats {
        let start_time = Instant::now();
        let mut stats = ProcessingStats {
            files_discovered: files.len(),
            ..Default::default()
        };

        let pb = if self.show_progress {
            let pb = ProgressBar::new(files.len() as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb
        } else {
            ProgressBar::hidden()
        };

        // Output path -> input that produced it
        let mut written: HashMap<PathBuf, PathBuf> = HashMap::new();

        for file in files {
            if let Some(name) = file.file_name() {
                pb.set_message(format!("Processing: {}", name.to_string_lossy()));
            }

            let output = self.output_path(file);
            let result = match written.get(&output) {
                Some(previous) => Err(ParserError::OutputCollision {
                    path: output,
                    previous: previous.clone(),
                }),
                None => self.process_file(file),
            };

            match result {
                Ok(report) => {
                    written.insert(report.output.clone(), report.input.clone());
                    stats.record(report);
                }
                Err(e) => {
                    warn!("Failed to process {}: {:#}", file.display(), e);
                    stats.files_failed += 1;
                }
            }
            pb.inc(1);
        }

        pb.finish_with_message("All files processed");
        stats.processing_time = start_time.elapsed();
        stats
    }
}

/// Print a run summary to stdout
pub fn print_summary(stats: &ProcessingStats) {
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time.as_millis().to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Files processed:".bright_cyan(),
        stats.files_processed.to_string().bright_white()
    );
    if stats.files_failed > 0 {
        println!(
            "  {} {}",
            "Files failed:".bright_red(),
            stats.files_failed.to_string().bright_red().bold()
        );
    }
    println!(
        "  {} {}",
        "Rows written:".bright_cyan(),
        stats.rows_written.to_string().bright_white().bold()
    );
    if stats.lines_skipped > 0 {
        println!(
            "  {} {}",
            "Lines skipped:".bright_yellow(),
            stats.lines_skipped.to_string().bright_yellow()
        );
    }

    for report in &stats.reports {
        let ceiling_note = if report.stats.ceiling_reached {
            " (row ceiling reached)".bright_yellow().to_string()
        } else {
            String::new()
        };
        println!(
            "    {} -> {}: {} rows, {} skipped{}",
            report.input.display(),
            report.output.display(),
            report.stats.rows_parsed,
            report.stats.lines_skipped,
            ceiling_note
        );
    }
}
