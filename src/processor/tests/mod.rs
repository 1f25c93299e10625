//! Integration tests for the processor module
//!
//! Tests the complete discover, parse and write pipeline using temporary
//! export trees.

pub mod basic_processing;

use std::fs;
use std::path::{Path, PathBuf};

/// Header line shared by the generated exports
pub const HEADER: &str = "id,title,code";

/// A data line both reconstruction patterns accept, yielding `id` in column 0
pub fn good_line(id: usize) -> String {
    format!(
        "{},\"Catalog\" Winter 2020 Summer Blue Coats ## junk -, ## AB {} 34",
        id, id
    )
}

/// Write a file with the given lines, creating parent directories
pub fn write_export(path: &Path, lines: &[String]) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(path, content).unwrap();
    path.to_path_buf()
}

/// Header followed by `count` good data lines
pub fn good_export(count: usize) -> Vec<String> {
    std::iter::once(HEADER.to_string())
        .chain((1..=count).map(good_line))
        .collect()
}
