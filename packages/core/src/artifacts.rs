//! Staged-artifact discovery and verification.
//!
//! After the parse stage, the output directory is the contract boundary:
//! the run only counts as successful if it holds at least one file with the
//! expected extension.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use pricestage_shared::{PriceStageError, Result};

/// A staged output file discovered in the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    /// File name (no directory component).
    pub name: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// Size in bytes.
    pub size_bytes: u64,
}

impl Artifact {
    /// Human-readable size for the report.
    pub fn display_size(&self) -> String {
        format_size(self.size_bytes)
    }
}

/// List regular files in `dir` whose extension matches `extension`
/// (case-insensitive, no leading dot), sorted by name. Non-recursive: the
/// parse collaborator writes flat output.
pub fn scan(dir: &Path, extension: &str) -> Result<Vec<Artifact>> {
    let entries = std::fs::read_dir(dir).map_err(|e| PriceStageError::io(dir, e))?;

    let mut artifacts = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PriceStageError::io(dir, e))?;
        let path = entry.path();

        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if !matches {
            continue;
        }

        let metadata = entry.metadata().map_err(|e| PriceStageError::io(&path, e))?;
        if !metadata.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        artifacts.push(Artifact {
            name,
            path,
            size_bytes: metadata.len(),
        });
    }

    artifacts.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(dir = %dir.display(), count = artifacts.len(), "scanned for artifacts");
    Ok(artifacts)
}

/// Scan for artifacts and fail with [`PriceStageError::NoArtifacts`] if none
/// are found. An empty output directory after a "successful" parse means the
/// pipeline produced nothing usable and must not be reported as success.
pub fn verify(dir: &Path, extension: &str) -> Result<Vec<Artifact>> {
    let artifacts = scan(dir, extension)?;
    if artifacts.is_empty() {
        return Err(PriceStageError::NoArtifacts {
            path: dir.to_path_buf(),
        });
    }
    Ok(artifacts)
}

/// Render a byte count the way the report displays it.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str, len: usize) {
        std::fs::write(dir.join(name), vec![b'x'; len]).expect("write test file");
    }

    #[test]
    fn scan_filters_extension_and_sorts() {
        let tmp = tempfile::tempdir().expect("tempdir");
        touch(tmp.path(), "prices.csv", 10);
        touch(tmp.path(), "stores.CSV", 20);
        touch(tmp.path(), "raw_dump.xml", 30);
        touch(tmp.path(), "notes.txt", 5);

        let artifacts = scan(tmp.path(), "csv").expect("scan");
        let names: Vec<&str> = artifacts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["prices.csv", "stores.CSV"]);
        assert_eq!(artifacts[0].size_bytes, 10);
    }

    #[test]
    fn scan_skips_matching_directories() {
        let tmp = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(tmp.path().join("archive.csv")).expect("mkdir");
        touch(tmp.path(), "promos.csv", 1);

        let artifacts = scan(tmp.path(), "csv").expect("scan");
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].name, "promos.csv");
    }

    #[test]
    fn scan_missing_dir_is_io_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let err = scan(&tmp.path().join("nope"), "csv").unwrap_err();
        assert!(matches!(err, PriceStageError::Io { .. }));
    }

    #[test]
    fn verify_empty_dir_is_no_artifacts() {
        let tmp = tempfile::tempdir().expect("tempdir");
        touch(tmp.path(), "raw_dump.xml", 30);

        let err = verify(tmp.path(), "csv").unwrap_err();
        assert!(matches!(err, PriceStageError::NoArtifacts { .. }));
    }

    #[test]
    fn size_formatting() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024 + 512 * 1024), "3.5 MB");
    }
}
