//! Move manifests.
//!
//! Reorganizing the library is expressed as data first: a [`MoveManifest`]
//! lists `source → destination` pairs (paths relative to the media root)
//! computed from classification results. Nothing touches the filesystem until
//! the manifest is handed to [`crate::mover::apply`].
//!
//! Before applying, a manifest is diffed against the live tree:
//!
//! | Outcome          | Condition                                              |
//! |------------------|--------------------------------------------------------|
//! | ready            | source exists, destination free                        |
//! | in place         | source equals destination, or already moved            |
//! | source missing   | neither source nor destination exists                  |
//! | target exists    | destination is occupied by another file                |
//! | duplicate target | an earlier entry already claims the destination        |
//! | invalid path     | absolute path or `..` component                        |
//!
//! Inverting a manifest swaps every pair and reverses the order, which is how
//! a batch is rolled back.

use crate::classify::{Action, ClassificationResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Component, Path};
use thiserror::Error;

pub const PLAN_FILENAME: &str = "move-plan.json";

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveEntry {
    pub source: String,
    pub destination: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveManifest {
    pub entries: Vec<MoveEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conflict {
    SourceMissing,
    TargetExists,
    DuplicateTarget,
    InvalidPath,
    /// The file at the destination no longer matches the journal.
    ContentChanged,
}

impl Conflict {
    pub fn describe(&self) -> &'static str {
        match self {
            Conflict::SourceMissing => "source missing",
            Conflict::TargetExists => "target exists",
            Conflict::DuplicateTarget => "duplicate target",
            Conflict::InvalidPath => "invalid path",
            Conflict::ContentChanged => "content changed since move",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictEntry {
    pub entry: MoveEntry,
    pub conflict: Conflict,
}

/// A manifest compared against the current tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestDiff {
    pub ready: Vec<MoveEntry>,
    pub in_place: Vec<MoveEntry>,
    pub conflicts: Vec<ConflictEntry>,
}

/// Relative, normal components only.
pub(crate) fn is_safe_relative(path: &str) -> bool {
    let path = Path::new(path);
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

impl MoveManifest {
    /// Collect every `move` recommendation, in result order.
    pub fn from_results(results: &[ClassificationResult]) -> Self {
        let entries = results
            .iter()
            .filter(|r| r.recommendation.action == Action::Move)
            .filter(|r| r.suggested_path != r.file.relative_path)
            .map(|r| MoveEntry {
                source: r.file.relative_path.clone(),
                destination: r.suggested_path.clone(),
                reason: r.recommendation.reason.clone(),
            })
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Swap every pair and reverse the order.
    pub fn inverse(&self) -> Self {
        let entries = self
            .entries
            .iter()
            .rev()
            .map(|e| MoveEntry {
                source: e.destination.clone(),
                destination: e.source.clone(),
                reason: format!("rollback: {}", e.reason),
            })
            .collect();
        Self { entries }
    }

    /// SHA-256 over the source/destination pairs, in order. Reasons are not
    /// part of the fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for e in &self.entries {
            hasher.update(e.source.as_bytes());
            hasher.update(b"\0");
            hasher.update(e.destination.as_bytes());
            hasher.update(b"\n");
        }
        format!("{:x}", hasher.finalize())
    }

    /// Compare each entry against the tree under `root`.
    pub fn diff(&self, root: &Path) -> ManifestDiff {
        let mut diff = ManifestDiff::default();
        let mut claimed: HashSet<&str> = HashSet::new();

        for entry in &self.entries {
            let conflict = |conflict| ConflictEntry {
                entry: entry.clone(),
                conflict,
            };

            if !is_safe_relative(&entry.source) || !is_safe_relative(&entry.destination) {
                diff.conflicts.push(conflict(Conflict::InvalidPath));
                continue;
            }
            if entry.source == entry.destination {
                diff.in_place.push(entry.clone());
                continue;
            }
            if claimed.contains(entry.destination.as_str()) {
                diff.conflicts.push(conflict(Conflict::DuplicateTarget));
                continue;
            }

            let source = root.join(&entry.source);
            let destination = root.join(&entry.destination);
            if !source.is_file() {
                if destination.is_file() {
                    diff.in_place.push(entry.clone());
                } else {
                    diff.conflicts.push(conflict(Conflict::SourceMissing));
                }
                continue;
            }
            if destination.exists() {
                diff.conflicts.push(conflict(Conflict::TargetExists));
                continue;
            }

            claimed.insert(entry.destination.as_str());
            diff.ready.push(entry.clone());
        }
        diff
    }

    pub fn load(path: &Path) -> Result<Self, PlanError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), PlanError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)? + "\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn entry(source: &str, destination: &str) -> MoveEntry {
        MoveEntry {
            source: source.to_string(),
            destination: destination.to_string(),
            reason: "test".to_string(),
        }
    }

    fn manifest(pairs: &[(&str, &str)]) -> MoveManifest {
        MoveManifest {
            entries: pairs.iter().map(|(s, d)| entry(s, d)).collect(),
        }
    }

    // =========================================================================
    // Building from classification
    // =========================================================================

    #[test]
    fn from_results_takes_only_moves() {
        let tmp = media_tree(&[
            "eagle/IMG_3205.jpg",
            "misc/DSC_0001.jpg",
            "projects/stcollen/log.jpg",
        ]);
        let results = classify_tree(tmp.path());
        let plan = MoveManifest::from_results(&results);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.entries[0].source, "eagle/IMG_3205.jpg");
        assert_eq!(
            plan.entries[0].destination,
            "projects/eagle/images/final/eagle_final_img-3205.jpg"
        );
    }

    #[test]
    fn inverse_swaps_and_reverses() {
        let plan = manifest(&[("a.jpg", "x/a.jpg"), ("b.jpg", "x/b.jpg")]);
        let inv = plan.inverse();
        assert_eq!(inv.entries[0].source, "x/b.jpg");
        assert_eq!(inv.entries[0].destination, "b.jpg");
        assert_eq!(inv.entries[1].destination, "a.jpg");
        assert_eq!(inv.inverse().entries[0].source, "a.jpg");
    }

    #[test]
    fn fingerprint_tracks_pairs_not_reasons() {
        let a = manifest(&[("a.jpg", "x/a.jpg")]);
        let mut b = a.clone();
        b.entries[0].reason = "different".into();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);

        let c = manifest(&[("a.jpg", "y/a.jpg")]);
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    // =========================================================================
    // Diffing against the tree
    // =========================================================================

    #[test]
    fn diff_ready_when_source_present_and_target_free() {
        let tmp = media_tree(&["a.jpg"]);
        let diff = manifest(&[("a.jpg", "x/a.jpg")]).diff(tmp.path());
        assert_eq!(diff.ready.len(), 1);
        assert!(diff.conflicts.is_empty());
    }

    #[test]
    fn diff_target_exists() {
        let tmp = media_tree(&["a.jpg", "x/a.jpg"]);
        let diff = manifest(&[("a.jpg", "x/a.jpg")]).diff(tmp.path());
        assert_eq!(diff.conflicts[0].conflict, Conflict::TargetExists);
        assert!(diff.ready.is_empty());
    }

    #[test]
    fn diff_source_missing() {
        let tmp = media_tree(&[]);
        let diff = manifest(&[("a.jpg", "x/a.jpg")]).diff(tmp.path());
        assert_eq!(diff.conflicts[0].conflict, Conflict::SourceMissing);
    }

    #[test]
    fn diff_already_moved_is_in_place() {
        let tmp = media_tree(&["x/a.jpg"]);
        let diff = manifest(&[("a.jpg", "x/a.jpg")]).diff(tmp.path());
        assert_eq!(diff.in_place.len(), 1);
        assert!(diff.conflicts.is_empty());
    }

    #[test]
    fn diff_duplicate_target() {
        let tmp = media_tree(&["a.jpg", "b.jpg"]);
        let diff = manifest(&[("a.jpg", "x/same.jpg"), ("b.jpg", "x/same.jpg")]).diff(tmp.path());
        assert_eq!(diff.ready.len(), 1);
        assert_eq!(diff.ready[0].source, "a.jpg");
        assert_eq!(diff.conflicts[0].conflict, Conflict::DuplicateTarget);
    }

    #[test]
    fn diff_rejects_escaping_paths() {
        let tmp = media_tree(&["a.jpg"]);
        let diff = manifest(&[("a.jpg", "../a.jpg"), ("/etc/passwd", "b.jpg")]).diff(tmp.path());
        assert_eq!(diff.conflicts.len(), 2);
        assert!(diff.conflicts.iter().all(|c| c.conflict == Conflict::InvalidPath));
    }

    #[test]
    fn save_and_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state").join(PLAN_FILENAME);
        let plan = manifest(&[("a.jpg", "x/a.jpg")]);
        plan.save(&path).unwrap();
        assert_eq!(MoveManifest::load(&path).unwrap(), plan);
    }

    #[test]
    fn load_missing_plan_is_io_error() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            MoveManifest::load(&tmp.path().join(PLAN_FILENAME)),
            Err(PlanError::Io(_))
        ));
    }
}
