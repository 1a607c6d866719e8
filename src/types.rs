//! Shared types used across the pipeline.
//!
//! [`MediaFile`] is the scan-time snapshot every later stage works from. It is
//! serialized into the inventory and classification result files, so the
//! field names here are part of the on-disk JSON format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Image or video, decided by extension at scan time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

/// A media file found under the scan root.
///
/// Paths are captured once and never refreshed: a `MediaFile` describes the
/// file as it was when the scanner visited it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFile {
    pub absolute_path: PathBuf,
    /// Path relative to the scan root, always `/`-separated.
    pub relative_path: String,
    pub file_name: String,
    /// Lowercase extension without the leading dot.
    pub extension: String,
    pub size_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    pub kind: MediaKind,
}

impl MediaFile {
    /// Directory segments between the scan root and the file.
    ///
    /// `eagle/raw/IMG_1.jpg` → `["eagle", "raw"]`; a file directly in the
    /// root has no segments.
    pub fn parent_segments(&self) -> Vec<&str> {
        let mut segments: Vec<&str> = self
            .relative_path
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        segments.pop();
        segments
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        match self.file_name.rfind('.') {
            Some(pos) if pos > 0 => &self.file_name[..pos],
            _ => &self.file_name,
        }
    }
}

/// Gallery grouping for a project on the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    Wildlife,
    Mythical,
    Religious,
    Commissioned,
    Workshop,
    Nature,
}

impl ProjectCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectCategory::Wildlife => "wildlife",
            ProjectCategory::Mythical => "mythical",
            ProjectCategory::Religious => "religious",
            ProjectCategory::Commissioned => "commissioned",
            ProjectCategory::Workshop => "workshop",
            ProjectCategory::Nature => "nature",
        }
    }

    /// Best guess from a project id when the rules don't name a category.
    pub fn guess(project_id: &str) -> Self {
        let id = project_id.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| id.contains(w));
        if has(&["eagle"]) {
            ProjectCategory::Wildlife
        } else if has(&["nessie", "loch", "monster"]) {
            ProjectCategory::Mythical
        } else if has(&["st-collen", "stcollen", "collen"]) {
            ProjectCategory::Religious
        } else if has(&["bass", "fish"]) {
            ProjectCategory::Commissioned
        } else if has(&["workshop"]) {
            ProjectCategory::Workshop
        } else {
            ProjectCategory::Nature
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
}
