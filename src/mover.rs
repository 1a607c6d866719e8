//! Applying move manifests.
//!
//! The only part of the crate that mutates the media tree. A manifest is
//! applied as one batch:
//!
//! 1. **Preflight**: the manifest is diffed against the tree. Conflicting
//!    entries are logged and skipped; they never block the rest of the batch.
//! 2. **Dry run** stops here and reports the moves a live run would make.
//! 3. **Live run** hashes each source, creates the target directory and
//!    links the file into place before unlinking the source. An existing
//!    target is never overwritten, even one that appears after preflight.
//! 4. If a move fails mid-batch, every move already made is undone in
//!    reverse order, directories the batch created are removed again, and
//!    the error is returned.
//! 5. A completed batch yields a [`MoveJournal`] recording each move with the
//!    content hash of the moved file.
//!
//! [`rollback`] replays a journal backwards, skipping any file whose content
//! no longer matches the recorded hash.

use crate::plan::{Conflict, ConflictEntry, MoveEntry, MoveManifest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub const JOURNAL_FILENAME: &str = "move-journal.json";
pub const ROLLED_BACK_JOURNAL_FILENAME: &str = "move-journal.rolled-back.json";

#[derive(Error, Debug)]
pub enum MoveError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to move {from} to {to}: {cause} ({rolled_back} earlier moves rolled back)")]
    Batch {
        from: String,
        to: String,
        cause: io::Error,
        rolled_back: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    DryRun,
    Live,
}

/// One completed move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalMove {
    pub source: String,
    pub destination: String,
    /// SHA-256 of the file contents at move time.
    pub content_hash: String,
}

/// Record of a live batch, sufficient to undo it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveJournal {
    pub plan_fingerprint: String,
    pub applied_at: DateTime<Utc>,
    pub moves: Vec<JournalMove>,
}

impl MoveJournal {
    pub fn load(path: &Path) -> Result<Self, MoveError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), MoveError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)? + "\n")?;
        Ok(())
    }

    /// `move-journal.<fingerprint prefix>.json`, the name an older batch's
    /// journal is kept under once a newer batch is applied.
    pub fn archive_filename(&self) -> String {
        let short = self
            .plan_fingerprint
            .get(..12)
            .unwrap_or(&self.plan_fingerprint);
        format!("move-journal.{short}.json")
    }
}

/// Move the journal at `path` aside under its archive name so a new batch
/// can take its place. Returns the archived path, if there was a journal.
pub fn archive_journal(path: &Path) -> Result<Option<PathBuf>, MoveError> {
    if !path.is_file() {
        return Ok(None);
    }
    let previous = MoveJournal::load(path)?;
    let archived = path.with_file_name(previous.archive_filename());
    fs::rename(path, &archived)?;
    Ok(Some(archived))
}

/// Retire the journal after a live rollback.
///
/// A rollback that skipped entries leaves the journal in place so it can be
/// retried once the tree is fixed. Returns the retired path.
pub fn retire_journal(path: &Path, outcome: &ApplyOutcome) -> io::Result<Option<PathBuf>> {
    if !outcome.skipped.is_empty() {
        return Ok(None);
    }
    let retired = path.with_file_name(ROLLED_BACK_JOURNAL_FILENAME);
    fs::rename(path, &retired)?;
    Ok(Some(retired))
}

/// Result of applying (or dry-running) a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub mode: Mode,
    /// Moves made, or for a dry run the moves that would be made.
    pub applied: Vec<MoveEntry>,
    pub in_place: Vec<MoveEntry>,
    pub skipped: Vec<ConflictEntry>,
    /// Present after a live run.
    pub journal: Option<MoveJournal>,
}

/// SHA-256 of a file's contents, hex-encoded.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

/// Apply a manifest to the tree under `root`.
pub fn apply(manifest: &MoveManifest, root: &Path, mode: Mode) -> Result<ApplyOutcome, MoveError> {
    let diff = manifest.diff(root);
    for c in &diff.conflicts {
        warn!(
            from = %c.entry.source,
            to = %c.entry.destination,
            conflict = c.conflict.describe(),
            "skipping move"
        );
    }

    if mode == Mode::DryRun {
        for entry in &diff.ready {
            info!(from = %entry.source, to = %entry.destination, "would move");
        }
        return Ok(ApplyOutcome {
            mode,
            applied: diff.ready,
            in_place: diff.in_place,
            skipped: diff.conflicts,
            journal: None,
        });
    }

    let mut done: Vec<JournalMove> = Vec::with_capacity(diff.ready.len());
    let mut created: Vec<Option<PathBuf>> = Vec::with_capacity(diff.ready.len());
    for entry in &diff.ready {
        match move_file(root, &entry.source, &entry.destination) {
            Ok((content_hash, new_dir)) => {
                info!(from = %entry.source, to = %entry.destination, "moved");
                done.push(JournalMove {
                    source: entry.source.clone(),
                    destination: entry.destination.clone(),
                    content_hash,
                });
                created.push(new_dir);
            }
            Err(cause) => {
                error!(from = %entry.source, to = %entry.destination, error = %cause, "move failed, rolling back batch");
                let rolled_back = undo(root, &done, &created);
                return Err(MoveError::Batch {
                    from: entry.source.clone(),
                    to: entry.destination.clone(),
                    cause,
                    rolled_back,
                });
            }
        }
    }

    Ok(ApplyOutcome {
        mode,
        applied: diff.ready,
        in_place: diff.in_place,
        skipped: diff.conflicts,
        journal: Some(MoveJournal {
            plan_fingerprint: manifest.fingerprint(),
            applied_at: Utc::now(),
            moves: done,
        }),
    })
}

/// Move one file, returning its content hash and the topmost directory
/// created for it, if any. Refuses to overwrite.
fn move_file(root: &Path, source: &str, destination: &str) -> io::Result<(String, Option<PathBuf>)> {
    let from = root.join(source);
    let to = root.join(destination);
    let content_hash = hash_file(&from)?;
    let mut new_dir = None;
    if let Some(parent) = to.parent() {
        new_dir = parent
            .ancestors()
            .take_while(|dir| !dir.exists())
            .last()
            .map(Path::to_path_buf);
        fs::create_dir_all(parent)?;
    }
    if let Err(err) = rename_no_clobber(&from, &to) {
        if let Some(dir) = &new_dir {
            prune_empty_dirs(to.parent(), dir);
        }
        return Err(err);
    }
    Ok((content_hash, new_dir))
}

fn target_exists(to: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("target exists: {}", to.display()),
    )
}

/// Rename `from` to `to`, failing if `to` exists.
///
/// `fs::rename` replaces an existing target on Unix, so the file is hard
/// linked first (which fails atomically on an existing name) and the source
/// unlinked after. Filesystems without hard links get a checked rename.
fn rename_no_clobber(from: &Path, to: &Path) -> io::Result<()> {
    match fs::hard_link(from, to) {
        Ok(()) => {
            if let Err(err) = fs::remove_file(from) {
                let _ = fs::remove_file(to);
                return Err(err);
            }
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Err(target_exists(to)),
        Err(err) => {
            debug!(error = %err, "hard link unavailable, using rename");
            if to.exists() {
                return Err(target_exists(to));
            }
            fs::rename(from, to)
        }
    }
}

/// Remove empty directories from `start` upwards, stopping after `top`.
fn prune_empty_dirs(start: Option<&Path>, top: &Path) {
    let Some(start) = start else { return };
    for dir in start.ancestors() {
        if fs::remove_dir(dir).is_err() {
            return;
        }
        debug!(path = %dir.display(), "removed empty directory");
        if dir == top {
            return;
        }
    }
}

/// Reverse completed moves, newest first. Returns how many were undone.
///
/// `created[i]` is the topmost directory made for `done[i]`; it and any
/// directories below it on the way to the moved file are removed once empty.
fn undo(root: &Path, done: &[JournalMove], created: &[Option<PathBuf>]) -> usize {
    let mut undone = 0;
    for (m, new_dir) in done.iter().zip(created).rev() {
        let from = root.join(&m.destination);
        let to = root.join(&m.source);
        match rename_no_clobber(&from, &to) {
            Ok(()) => {
                debug!(from = %m.destination, to = %m.source, "rolled back");
                undone += 1;
                if let Some(dir) = new_dir {
                    prune_empty_dirs(from.parent(), dir);
                }
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                error!(path = %m.source, "cannot roll back, original path is occupied");
            }
            Err(err) => error!(from = %m.destination, to = %m.source, error = %err, "roll back failed"),
        }
    }
    undone
}

/// Undo a journaled batch by applying its inverse.
///
/// Each destination is hashed first; files that changed or vanished since the
/// batch ran are skipped, files already back at their source count as in
/// place.
pub fn rollback(journal: &MoveJournal, root: &Path, mode: Mode) -> Result<ApplyOutcome, MoveError> {
    let mut verified = Vec::new();
    let mut in_place = Vec::new();
    let mut skipped = Vec::new();

    for m in journal.moves.iter().rev() {
        let entry = MoveEntry {
            source: m.destination.clone(),
            destination: m.source.clone(),
            reason: "rollback".to_string(),
        };
        match hash_file(&root.join(&m.destination)) {
            Ok(hash) if hash == m.content_hash => verified.push(entry),
            Ok(_) => {
                warn!(path = %m.destination, "content changed since move, not rolling back");
                skipped.push(ConflictEntry {
                    entry,
                    conflict: Conflict::ContentChanged,
                });
            }
            Err(_) if root.join(&m.source).is_file() => in_place.push(entry),
            Err(_) => {
                warn!(path = %m.destination, "moved file is gone, not rolling back");
                skipped.push(ConflictEntry {
                    entry,
                    conflict: Conflict::SourceMissing,
                });
            }
        }
    }

    let mut outcome = apply(&MoveManifest { entries: verified }, root, mode)?;
    in_place.append(&mut outcome.in_place);
    skipped.append(&mut outcome.skipped);
    outcome.in_place = in_place;
    outcome.skipped = skipped;
    Ok(outcome)
}
