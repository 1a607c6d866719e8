//! Filesystem scanning.
//!
//! Stage 1 of the pipeline. Walks the media root and yields a [`MediaFile`]
//! for every file whose extension is on the allowlist.
//!
//! ## What Gets Skipped
//!
//! ```text
//! public/media/
//! ├── .DS_Store                 # hidden: skipped
//! ├── media-rules.toml          # extension not allowed: skipped
//! ├── projects/
//! │   └── eagle/
//! │       ├── IMG_3205.jpg      # yielded
//! │       └── notes.txt         # extension not allowed: skipped
//! └── archive-2023/             # name contains "archive": never entered
//!     └── IMG_0001.jpg
//! ```
//!
//! The walk is lazy and holds no cursor state: calling [`Scanner::files`]
//! again starts a fresh walk. Entries are visited in file-name order so the
//! output, and everything derived from it, is deterministic.
//!
//! ## Failures
//!
//! An unreadable directory is logged and its subtree skipped; a file whose
//! metadata cannot be read is logged and skipped. Only a missing root is an
//! error.

use crate::config::ScanConfig;
use crate::types::{MediaFile, MediaKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Media root is not a directory: {0}")]
    MissingRoot(PathBuf),
}

/// Lazy, restartable walk over a media root.
pub struct Scanner<'a> {
    root: PathBuf,
    config: &'a ScanConfig,
}

impl<'a> Scanner<'a> {
    pub fn new(root: &Path, config: &'a ScanConfig) -> Result<Self, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::MissingRoot(root.to_path_buf()));
        }
        Ok(Self {
            root: root.to_path_buf(),
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree from the start, yielding media files in path order.
    pub fn files(&self) -> impl Iterator<Item = MediaFile> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_skipped(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    let path = err
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default();
                    warn!(path = %path, error = %err, "skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| self.media_file(&entry))
    }

    fn is_skipped(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') {
            return true;
        }
        if entry.file_type().is_dir() && self.config.excludes_dir(&name) {
            debug!(path = %entry.path().display(), "excluded directory");
            return true;
        }
        false
    }

    fn media_file(&self, entry: &DirEntry) -> Option<MediaFile> {
        let path = entry.path();
        let extension = path.extension()?.to_string_lossy().to_lowercase();
        if !self.config.allows_extension(&extension) {
            return None;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping file with unreadable metadata");
                return None;
            }
        };

        let relative_path = path
            .strip_prefix(&self.root)
            .ok()?
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let kind = if self.config.is_video_extension(&extension) {
            MediaKind::Video
        } else {
            MediaKind::Image
        };

        Some(MediaFile {
            absolute_path: path.to_path_buf(),
            relative_path,
            file_name: entry.file_name().to_string_lossy().to_string(),
            extension,
            size_bytes: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            kind,
        })
    }
}

/// Scan a media root into a list of files.
pub fn scan(root: &Path, config: &ScanConfig) -> Result<Vec<MediaFile>, ScanError> {
    let scanner = Scanner::new(root, config)?;
    Ok(scanner.files().collect())
}

/// Inventory written by the `scan` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    pub root: String,
    pub images: usize,
    pub videos: usize,
    pub total_bytes: u64,
    /// Relative paths of files sharing a file name (case-insensitive), one
    /// group per name, in name order.
    #[serde(default)]
    pub duplicates: Vec<Vec<String>>,
    pub files: Vec<MediaFile>,
}

impl Inventory {
    pub fn new(root: &Path, files: Vec<MediaFile>) -> Self {
        let images = files.iter().filter(|f| f.kind == MediaKind::Image).count();
        Self {
            root: root.display().to_string(),
            images,
            videos: files.len() - images,
            total_bytes: files.iter().map(|f| f.size_bytes).sum(),
            duplicates: duplicate_names(&files),
            files,
        }
    }

    /// Number of files that share their name with at least one other file.
    pub fn duplicate_files(&self) -> usize {
        self.duplicates.iter().map(Vec::len).sum()
    }
}

fn duplicate_names(files: &[MediaFile]) -> Vec<Vec<String>> {
    let mut by_name: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for file in files {
        by_name
            .entry(file.file_name.to_lowercase())
            .or_default()
            .push(file.relative_path.clone());
    }
    by_name.into_values().filter(|paths| paths.len() > 1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn relative_paths(files: &[MediaFile]) -> Vec<&str> {
        files.iter().map(|f| f.relative_path.as_str()).collect()
    }

    #[test]
    fn finds_media_in_nested_folders() {
        let tmp = media_tree(&[
            "eagle/IMG_3205.jpg",
            "nessie/process/IMG_1500.JPG",
            "bass/clip.mov",
        ]);
        let files = scan(tmp.path(), &ScanConfig::default()).unwrap();
        assert_eq!(
            relative_paths(&files),
            vec!["bass/clip.mov", "eagle/IMG_3205.jpg", "nessie/process/IMG_1500.JPG"]
        );
    }

    #[test]
    fn never_emits_extension_outside_allowlist() {
        let tmp = media_tree(&[
            "eagle/IMG_1.jpg",
            "eagle/notes.txt",
            "eagle/raw.CR2",
            "eagle/README",
            "media-rules.toml",
        ]);
        let config = ScanConfig::default();
        let files = scan(tmp.path(), &config).unwrap();
        assert_eq!(relative_paths(&files), vec!["eagle/IMG_1.jpg"]);
        assert!(files.iter().all(|f| config.allows_extension(&f.extension)));
    }

    #[test]
    fn never_descends_into_excluded_folders() {
        let tmp = media_tree(&[
            "eagle/IMG_1.jpg",
            "archive/IMG_2.jpg",
            "eagle/archive/IMG_3.jpg",
            "Backup-2023/IMG_4.jpg",
        ]);
        let files = scan(tmp.path(), &ScanConfig::default()).unwrap();
        assert_eq!(relative_paths(&files), vec!["eagle/IMG_1.jpg"]);
    }

    #[test]
    fn excluded_name_on_a_file_is_still_scanned() {
        let tmp = media_tree(&["eagle/archive-shot.jpg"]);
        let files = scan(tmp.path(), &ScanConfig::default()).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn hidden_entries_skipped() {
        let tmp = media_tree(&[".cache/IMG_1.jpg", "eagle/.IMG_2.jpg", "eagle/IMG_3.jpg"]);
        let files = scan(tmp.path(), &ScanConfig::default()).unwrap();
        assert_eq!(relative_paths(&files), vec!["eagle/IMG_3.jpg"]);
    }

    #[test]
    fn root_named_like_excluded_folder_is_still_scanned() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("archive");
        write_files(&root, &["eagle/IMG_1.jpg"]);
        let files = scan(&root, &ScanConfig::default()).unwrap();
        assert_eq!(relative_paths(&files), vec!["eagle/IMG_1.jpg"]);
    }

    #[test]
    fn media_file_fields_populated() {
        let tmp = media_tree(&["eagle/IMG_3205.JPG", "eagle/clip.MOV"]);
        let files = scan(tmp.path(), &ScanConfig::default()).unwrap();

        let image = files.iter().find(|f| f.file_name == "IMG_3205.JPG").unwrap();
        assert_eq!(image.extension, "jpg");
        assert_eq!(image.kind, MediaKind::Image);
        assert_eq!(image.size_bytes, "eagle/IMG_3205.JPG".len() as u64);
        assert!(image.modified.is_some());
        assert_eq!(image.absolute_path, tmp.path().join("eagle/IMG_3205.JPG"));

        let video = files.iter().find(|f| f.file_name == "clip.MOV").unwrap();
        assert_eq!(video.kind, MediaKind::Video);
    }

    #[test]
    fn scanner_is_restartable() {
        let tmp = media_tree(&["eagle/IMG_1.jpg", "nessie/IMG_2.jpg"]);
        let config = ScanConfig::default();
        let scanner = Scanner::new(tmp.path(), &config).unwrap();
        let first: Vec<MediaFile> = scanner.files().collect();
        let second: Vec<MediaFile> = scanner.files().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn scanner_is_lazy() {
        let tmp = media_tree(&["a/IMG_1.jpg", "b/IMG_2.jpg", "c/IMG_3.jpg"]);
        let config = ScanConfig::default();
        let scanner = Scanner::new(tmp.path(), &config).unwrap();
        let first = scanner.files().next().unwrap();
        assert_eq!(first.relative_path, "a/IMG_1.jpg");
    }

    #[test]
    fn missing_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = scan(&tmp.path().join("nope"), &ScanConfig::default());
        assert!(matches!(result, Err(ScanError::MissingRoot(_))));
    }

    #[test]
    fn inventory_counts_kinds_and_bytes() {
        let tmp = media_tree(&["a/IMG_1.jpg", "a/clip.mp4"]);
        let files = scan(tmp.path(), &ScanConfig::default()).unwrap();
        let inventory = Inventory::new(tmp.path(), files);
        assert_eq!(inventory.images, 1);
        assert_eq!(inventory.videos, 1);
        assert_eq!(
            inventory.total_bytes,
            ("a/IMG_1.jpg".len() + "a/clip.mp4".len()) as u64
        );
    }

    #[test]
    fn inventory_groups_duplicate_names() {
        let tmp = media_tree(&[
            "eagle/IMG_3205.jpg",
            "nessie/img_3205.JPG",
            "misc/IMG_3205.jpg",
            "eagle/IMG_1.jpg",
            "a/clip.mp4",
            "b/clip.mp4",
        ]);
        let files = scan(tmp.path(), &ScanConfig::default()).unwrap();
        let inventory = Inventory::new(tmp.path(), files);
        assert_eq!(
            inventory.duplicates,
            vec![
                vec!["a/clip.mp4".to_string(), "b/clip.mp4".to_string()],
                vec![
                    "eagle/IMG_3205.jpg".to_string(),
                    "misc/IMG_3205.jpg".to_string(),
                    "nessie/img_3205.JPG".to_string(),
                ],
            ]
        );
        assert_eq!(inventory.duplicate_files(), 5);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_folder_skipped_and_siblings_kept() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let tmp = media_tree(&["eagle/IMG_1.jpg", "locked/IMG_2.jpg", "nessie/IMG_3.jpg"]);
        let locked = tmp.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // Permission bits do not bind root.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let files = scan(tmp.path(), &ScanConfig::default()).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(relative_paths(&files), vec!["eagle/IMG_1.jpg", "nessie/IMG_3.jpg"]);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_entry_in_folder_does_not_stop_the_walk() {
        let tmp = media_tree(&["eagle/IMG_1.jpg"]);
        std::os::unix::fs::symlink(
            tmp.path().join("gone.jpg"),
            tmp.path().join("eagle/IMG_0.jpg"),
        )
        .unwrap();
        let files = scan(tmp.path(), &ScanConfig::default()).unwrap();
        assert_eq!(relative_paths(&files), vec!["eagle/IMG_1.jpg"]);
    }
}
