//! Basic processing integration tests

use super::{HEADER, good_export, good_line, write_export};
use crate::config::ProcessorConfig;
use crate::processor::BatchProcessor;
use crate::sink::OutputFormat;
use std::fs;
use tempfile::TempDir;

fn csv_processor() -> BatchProcessor {
    BatchProcessor::new(ProcessorConfig::default().with_format(OutputFormat::Csv)).unwrap()
}

#[test]
fn test_basic_processing_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("exports");
    write_export(&root.join("data_sets").join("catalog.csv"), &good_export(3));

    let stats = csv_processor().process_root(&root).unwrap();

    assert_eq!(stats.files_discovered, 1);
    assert_eq!(stats.files_processed, 1);
    assert_eq!(stats.files_failed, 0);
    assert_eq!(stats.rows_written, 3);
    assert_eq!(stats.lines_skipped, 0);

    // Same extension as the input, so the output must not replace it
    let report = &stats.reports[0];
    assert_eq!(report.output, root.join("data_sets").join("catalog.clean.csv"));
    assert!(report.output.exists());
    assert!(report.input.exists());

    let original = fs::read_to_string(&report.input).unwrap();
    assert!(original.contains("## junk"));
}

#[test]
fn test_rerun_ignores_earlier_outputs() {
    let temp_dir = TempDir::new().unwrap();
    let data_sets = temp_dir.path().join("data_sets");
    write_export(&data_sets.join("catalog.csv"), &good_export(3));

    let processor = csv_processor();
    let first = processor.process_root(temp_dir.path()).unwrap();
    let second = processor.process_root(temp_dir.path()).unwrap();

    assert_eq!(first.files_discovered, 1);
    assert_eq!(second.files_discovered, 1);
    assert_eq!(second.reports[0].output, data_sets.join("catalog.clean.csv"));
    assert!(!data_sets.join("catalog.clean.clean.csv").exists());
}

#[test]
fn test_output_directory_and_content() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("exports");
    let out_dir = temp_dir.path().join("out");
    write_export(&root.join("data_sets").join("catalog.txt.csv"), &good_export(2));

    let config = ProcessorConfig::default()
        .with_format(OutputFormat::Csv)
        .with_output_dir(&out_dir);
    let stats = BatchProcessor::new(config).unwrap().process_root(&root).unwrap();
    assert_eq!(stats.files_processed, 1);

    let content = fs::read_to_string(out_dir.join("catalog.txt.csv")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], HEADER);
    assert_eq!(lines[1], "1,Catalog Winter 2020 Summer Blue Coats,AB 1 34");
    assert_eq!(lines[2], "2,Catalog Winter 2020 Summer Blue Coats,AB 2 34");
}

#[test]
fn test_default_workbook_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_export(
        &temp_dir.path().join("data_sets").join("catalog.csv"),
        &good_export(2),
    );

    let processor = BatchProcessor::new(ProcessorConfig::default()).unwrap();
    let report = processor.process_file(&input).unwrap();

    assert_eq!(report.output, temp_dir.path().join("data_sets").join("catalog.xlsx"));
    assert!(report.output.exists());
    assert_eq!(report.stats.rows_parsed, 2);
}

#[test]
fn test_malformed_lines_are_skipped_not_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("exports");

    let mut lines = vec![HEADER.to_string()];
    for i in 1..=10 {
        if i == 5 {
            lines.push("not,parseable,at,all???".to_string());
        } else {
            lines.push(good_line(i));
        }
    }
    write_export(&root.join("data_sets").join("partial.csv"), &lines);

    let stats = csv_processor().process_root(&root).unwrap();

    assert_eq!(stats.files_processed, 1);
    assert_eq!(stats.rows_written, 9);
    assert_eq!(stats.lines_skipped, 1);
    assert!(stats.reports[0].stats.skipped[0].contains("not,parseable,at,all???"));
}

#[test]
fn test_multiple_files_processed_in_order() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("exports");
    write_export(&root.join("data_sets").join("b.csv"), &good_export(2));
    write_export(&root.join("data_sets").join("a.csv"), &good_export(4));
    write_export(&root.join("other").join("c.csv"), &good_export(8));

    let stats = csv_processor()
        .with_progress(false)
        .process_root(&root)
        .unwrap();

    assert_eq!(stats.files_discovered, 2);
    assert_eq!(stats.files_processed, 2);
    assert_eq!(stats.rows_written, 6);

    let inputs: Vec<_> = stats
        .reports
        .iter()
        .map(|r| r.input.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(inputs, vec!["a.csv", "b.csv"]);
}

#[test]
fn test_process_single_file() {
    let temp_dir = TempDir::new().unwrap();
    // Discovery markers do not apply to a single explicit file
    let input = write_export(&temp_dir.path().join("adhoc.txt"), &good_export(4));

    let stats = csv_processor().process_single(&input).unwrap();

    assert_eq!(stats.files_processed, 1);
    assert_eq!(stats.rows_written, 4);
    assert!(temp_dir.path().join("adhoc.csv").exists());
}
