//! File discovery module for report exports
//!
//! Walks a root directory recursively and selects the files to parse:
//! regular files whose containing directory path includes the directory
//! marker and whose name includes the file marker. Outputs a previous run
//! wrote beside their inputs (`{stem}.clean.{ext}`) are never selected.

use crate::config::DiscoveryConfig;
use crate::constants::OUTPUT_INFIX;
use crate::error::{ParserError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// File discovery component for report exports
#[derive(Debug)]
pub struct FileDiscovery {
    root: PathBuf,
    config: DiscoveryConfig,
    directory_count: usize,
}

impl FileDiscovery {
    /// Create a new file discovery instance
    pub fn new(root: PathBuf, config: DiscoveryConfig) -> Self {
        Self {
            root,
            config,
            directory_count: 0,
        }
    }

    /// Number of distinct directories matching files were found in
    pub fn directory_count(&self) -> usize {
        self.directory_count
    }

    /// Discover matching files under the root, in sorted walk order
    ///
    /// With the default markers, a layout such as:
    /// ```text
    /// root/
    ///   data_sets/
    ///     spring.csv        <- selected
    ///     notes.txt
    ///     2021/
    ///       winter.csv      <- selected (path still contains "data_sets")
    ///   archive/
    ///     old.csv
    /// ```
    pub fn discover_files(&mut self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(ParserError::RootNotFound {
                path: self.root.clone(),
            });
        }

        debug!(
            "Searching {} for '{}' files under '{}' directories",
            self.root.display(),
            self.config.file_marker,
            self.config.directory_marker
        );

        let mut files = Vec::new();
        let mut directories = HashSet::new();

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if self.is_selected(path) {
                if let Some(parent) = path.parent() {
                    directories.insert(parent.to_path_buf());
                }
                files.push(path.to_path_buf());
            }
        }

        self.directory_count = directories.len();
        debug!(
            "Found {} files in {} directories",
            files.len(),
            self.directory_count
        );

        Ok(files)
    }

    /// Check both markers against a file path
    fn is_selected(&self, path: &Path) -> bool {
        if is_previous_output(path) {
            debug!("Ignoring earlier output {}", path.display());
            return false;
        }

        let in_marked_directory = path
            .parent()
            .is_some_and(|dir| dir.to_string_lossy().contains(&self.config.directory_marker));

        let marked_name = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().contains(&self.config.file_marker));

        in_marked_directory && marked_name
    }
}

/// True for names like `report.clean.csv`
fn is_previous_output(path: &Path) -> bool {
    let infix = format!("{}.", OUTPUT_INFIX);
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().contains(&infix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Helper to create a test export tree
    fn create_test_tree(temp_dir: &TempDir) -> PathBuf {
        let root = temp_dir.path().join("exports");
        let data_sets = root.join("data_sets");
        let nested = data_sets.join("2021");
        let archive = root.join("archive");

        fs::create_dir_all(&nested).unwrap();
        fs::create_dir_all(&archive).unwrap();

        fs::write(data_sets.join("spring.csv"), "id").unwrap();
        fs::write(data_sets.join("notes.txt"), "notes").unwrap();
        fs::write(nested.join("winter.csv"), "id").unwrap();
        fs::write(archive.join("old.csv"), "id").unwrap();

        root
    }

    #[test]
    fn test_discover_marked_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_test_tree(&temp_dir);

        let mut discovery = FileDiscovery::new(root, DiscoveryConfig::default());
        let files = discovery.discover_files().unwrap();

        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        // Sorted walk: data_sets/2021/winter.csv comes before data_sets/spring.csv
        assert_eq!(names, vec!["winter.csv", "spring.csv"]);
        assert_eq!(discovery.directory_count(), 2);
    }

    #[test]
    fn test_marker_in_file_name_not_extension() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("my_data_sets");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("report.csv.bak"), "id").unwrap();
        fs::write(dir.join("report.CSV"), "id").unwrap();

        let mut discovery = FileDiscovery::new(temp_dir.path().to_path_buf(), DiscoveryConfig::default());
        let files = discovery.discover_files().unwrap();

        // Marker matching is a case-sensitive substring test on the name
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("report.csv.bak"));
    }

    #[test]
    fn test_custom_markers() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_test_tree(&temp_dir);

        let config = DiscoveryConfig {
            directory_marker: "archive".to_string(),
            file_marker: ".csv".to_string(),
        };
        let mut discovery = FileDiscovery::new(root, config);
        let files = discovery.discover_files().unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("archive/old.csv"));
    }

    #[test]
    fn test_previous_outputs_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("data_sets");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("report.csv"), "id").unwrap();
        fs::write(dir.join("report.clean.csv"), "id").unwrap();
        fs::write(dir.join("report.clean.clean.csv"), "id").unwrap();
        fs::write(dir.join("cleanup.csv"), "id").unwrap();

        let mut discovery = FileDiscovery::new(temp_dir.path().to_path_buf(), DiscoveryConfig::default());
        let files = discovery.discover_files().unwrap();

        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["cleanup.csv", "report.csv"]);
    }

    #[test]
    fn test_empty_root() {
        let temp_dir = TempDir::new().unwrap();

        let mut discovery = FileDiscovery::new(temp_dir.path().to_path_buf(), DiscoveryConfig::default());
        let files = discovery.discover_files().unwrap();

        assert!(files.is_empty());
        assert_eq!(discovery.directory_count(), 0);
    }

    #[test]
    fn test_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("missing");

        let mut discovery = FileDiscovery::new(root.clone(), DiscoveryConfig::default());
        match discovery.discover_files() {
            Err(ParserError::RootNotFound { path }) => assert_eq!(path, root),
            other => panic!("Expected RootNotFound error, got {:?}", other),
        }
    }
}
