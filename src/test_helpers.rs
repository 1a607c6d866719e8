//! Shared test utilities.
//!
//! Builds throwaway media trees in a temp directory and provides lookup
//! helpers that panic with a readable message on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = media_tree(&["eagle/IMG_3205.jpg", "nature/fish/trout.jpg"]);
//! let results = classify_tree(tmp.path());
//! let eagle = find_result(&results, "IMG_3205.jpg");
//! assert_eq!(eagle.detected_project.as_deref(), Some("eagle"));
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::classify::{ClassificationResult, Classifier};
use crate::config::RulesConfig;
use crate::scan::scan;
use crate::types::{MediaFile, MediaKind};

// =========================================================================
// Fixture setup
// =========================================================================

/// Create a temp directory containing one small file per relative path.
///
/// File contents are the path itself, so every file has a distinct hash.
pub fn media_tree(paths: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_files(tmp.path(), paths);
    tmp
}

/// Write one small file per relative path under `root`.
pub fn write_files(root: &Path, paths: &[&str]) {
    for rel in paths {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, rel.as_bytes()).unwrap();
    }
}

/// Relative paths of every regular file under `root`, sorted.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}

/// An in-memory `MediaFile` for classifier tests that don't need a disk.
pub fn media_file(relative: &str) -> MediaFile {
    let file_name = relative.rsplit('/').next().unwrap().to_string();
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, e)| e.to_lowercase())
        .unwrap_or_default();
    let kind = if ["mp4", "mov"].contains(&extension.as_str()) {
        MediaKind::Video
    } else {
        MediaKind::Image
    };
    MediaFile {
        absolute_path: Path::new("/media").join(relative),
        relative_path: relative.to_string(),
        file_name,
        extension,
        size_bytes: 0,
        modified: None,
        kind,
    }
}

/// Scan and classify a tree with the stock rules.
pub fn classify_tree(root: &Path) -> Vec<ClassificationResult> {
    let rules = RulesConfig::default();
    let classifier = Classifier::new(&rules).unwrap();
    let files = scan(root, &rules.scan).unwrap();
    classifier.classify_all(&files)
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find a classification by file name. Panics if not found.
pub fn find_result<'a>(
    results: &'a [ClassificationResult],
    file_name: &str,
) -> &'a ClassificationResult {
    results
        .iter()
        .find(|r| r.file.file_name == file_name)
        .unwrap_or_else(|| {
            let names: Vec<&str> = results.iter().map(|r| r.file.file_name.as_str()).collect();
            panic!("result '{file_name}' not found. Available: {names:?}")
        })
}

/// Assert two confidences are equal to within rounding.
pub fn assert_confidence(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "confidence {actual} != expected {expected}"
    );
}
