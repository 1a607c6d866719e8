//! Rule configuration.
//!
//! Every table the classifier consults (project aliases, numeric camera
//! ranges, keyword lists, scoring weights) lives here instead of in the
//! classification code, so the heuristics can be tuned or replaced without
//! touching control flow.
//!
//! ## Rules File Location
//!
//! The CLI reads `media-rules.toml` from the media root, or the file given
//! with `--config`:
//!
//! ```text
//! public/media/
//! ├── media-rules.toml         # Optional; overrides stock defaults
//! ├── projects/
//! │   └── eagle/...
//! └── nature/...
//! ```
//!
//! ## Partial Configuration
//!
//! Rules files are sparse. Tables merge key by key on top of the stock
//! defaults; arrays (including `[[projects]]` and `[[overrides]]`) replace the
//! stock array wholesale:
//!
//! ```toml
//! [thresholds]
//! move_confidence = 0.6
//!
//! [woods]
//! cherry = ["cherry"]      # added alongside the stock woods
//! ```
//!
//! Unknown keys are rejected to catch typos early. Run
//! `carving-media gen-config` for the fully documented stock file.

use crate::types::{Difficulty, ProjectCategory};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the rules file looked up in the media root.
pub const RULES_FILENAME: &str = "media-rules.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// All classification, layout and site-generation rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    /// Regex extracting the camera sequence number (first capture group)
    /// from a file name.
    pub sequence_pattern: String,
    pub scan: ScanConfig,
    /// Known projects, in rule order. Earlier projects win ties.
    pub projects: Vec<ProjectRule>,
    pub stages: StagesConfig,
    /// Wood type → filename keywords.
    pub woods: BTreeMap<String, Vec<String>>,
    /// Content flag → filename keywords. Flags never change placement; they
    /// surface suspicious content in reports.
    pub flags: BTreeMap<String, Vec<String>>,
    pub overrides: Vec<KeepOverride>,
    pub scoring: ScoringConfig,
    pub thresholds: ThresholdsConfig,
    pub layout: LayoutConfig,
    pub site: SiteConfig,
}

fn default_sequence_pattern() -> String {
    r"(?i)img[_-]?(\d+)".to_string()
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            sequence_pattern: default_sequence_pattern(),
            scan: ScanConfig::default(),
            projects: default_projects(),
            stages: StagesConfig::default(),
            woods: default_woods(),
            flags: default_flags(),
            overrides: vec![KeepOverride {
                pattern: "stcollen".to_string(),
                project: "stcollen".to_string(),
                stage: "logs".to_string(),
                reason: "stcollen logs - always correctly placed".to_string(),
            }],
            scoring: ScoringConfig::default(),
            thresholds: ThresholdsConfig::default(),
            layout: LayoutConfig::default(),
            site: SiteConfig::default(),
        }
    }
}

impl RulesConfig {
    /// Validate values the classifier relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Err(e) = Regex::new(&self.sequence_pattern) {
            return Err(ConfigError::Validation(format!(
                "sequence_pattern is not a valid regex: {e}"
            )));
        }
        if self.scan.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "scan.extensions must not be empty".into(),
            ));
        }

        let mut ids = HashSet::new();
        for project in &self.projects {
            if project.id.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "projects[].id must not be empty".into(),
                ));
            }
            if !ids.insert(project.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate project id '{}'",
                    project.id
                )));
            }
            for rule in &project.numeric {
                if let Some(max) = rule.max
                    && max < rule.min
                {
                    return Err(ConfigError::Validation(format!(
                        "projects.{}.numeric: max {} is below min {}",
                        project.id, max, rule.min
                    )));
                }
            }
        }

        for o in &self.overrides {
            if o.pattern.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "overrides[].pattern must not be empty".into(),
                ));
            }
        }

        let t = &self.thresholds;
        for (name, value) in [
            ("thresholds.move_confidence", t.move_confidence),
            ("thresholds.high_confidence", t.high_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!("{name} must be 0.0-1.0")));
            }
        }
        if self.scoring.weights().iter().any(|(_, w)| *w < 0.0) {
            return Err(ConfigError::Validation(
                "scoring weights must not be negative".into(),
            ));
        }
        if self.layout.default_stage.trim().is_empty() {
            return Err(ConfigError::Validation(
                "layout.default_stage must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Look up a project rule by id.
    pub fn project(&self, id: &str) -> Option<&ProjectRule> {
        self.projects.iter().find(|p| p.id == id)
    }
}

/// File scanner settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Extension allowlist (case-insensitive, leading dot optional).
    pub extensions: Vec<String>,
    /// Extensions reported as video; everything else allowed is an image.
    pub video_extensions: Vec<String>,
    /// Directories whose lowercase name contains any of these are skipped.
    pub exclude_dirs: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: ["jpg", "jpeg", "png", "webp", "gif", "mp4", "mov"]
                .map(String::from)
                .to_vec(),
            video_extensions: ["mp4", "mov", "avi", "mkv", "webm"]
                .map(String::from)
                .to_vec(),
            exclude_dirs: ["archive", "backup", "original-files"]
                .map(String::from)
                .to_vec(),
        }
    }
}

fn extension_matches(list: &[String], ext: &str) -> bool {
    list.iter()
        .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

impl ScanConfig {
    pub fn allows_extension(&self, ext: &str) -> bool {
        extension_matches(&self.extensions, ext)
    }

    pub fn is_video_extension(&self, ext: &str) -> bool {
        extension_matches(&self.video_extensions, ext)
    }

    /// Whether a directory with this name is skipped entirely.
    pub fn excludes_dir(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.exclude_dirs
            .iter()
            .any(|x| !x.is_empty() && lower.contains(&x.to_lowercase()))
    }
}

/// A known woodcarving project and the evidence that points at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectRule {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ProjectCategory>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Substrings matched against parent directory names.
    #[serde(default)]
    pub directory_aliases: Vec<String>,
    /// Substrings matched against the file name.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Camera sequence ranges, checked in order.
    #[serde(default)]
    pub numeric: Vec<NumericRule>,
}

/// An inclusive camera-number range that implies a stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumericRule {
    pub stage: String,
    pub min: u32,
    /// Open-ended when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
    /// Optional sub-stage used in suggested file names (e.g. `roughing`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl NumericRule {
    pub fn contains(&self, n: u32) -> bool {
        n >= self.min && self.max.is_none_or(|max| n <= max)
    }
}

fn numeric(stage: &str, min: u32, max: u32, label: Option<&str>) -> NumericRule {
    NumericRule {
        stage: stage.to_string(),
        min,
        max: Some(max),
        label: label.map(String::from),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_projects() -> Vec<ProjectRule> {
    vec![
        ProjectRule {
            id: "eagle".to_string(),
            title: Some("Golden Eagle".to_string()),
            description: Some("A life-size golden eagle carved in lime".to_string()),
            category: Some(ProjectCategory::Wildlife),
            featured: true,
            difficulty: Some(Difficulty::Expert),
            materials: strings(&["lime"]),
            tags: strings(&["bird", "wildlife"]),
            directory_aliases: strings(&["eagle"]),
            keywords: strings(&["eagle", "raptor", "talon"]),
            numeric: vec![
                numeric("process", 2000, 2199, Some("roughing")),
                numeric("process", 2200, 2799, Some("carving")),
                numeric("process", 2800, 3099, Some("detailing")),
                numeric("process", 3100, 3199, Some("finishing")),
                numeric("final", 3200, 3299, None),
            ],
        },
        ProjectRule {
            id: "nessie".to_string(),
            title: Some("Loch Ness Monster".to_string()),
            description: Some("Nessie rising from the loch".to_string()),
            category: Some(ProjectCategory::Mythical),
            featured: true,
            difficulty: None,
            materials: Vec::new(),
            tags: strings(&["mythical"]),
            directory_aliases: strings(&["nessie", "loch"]),
            keywords: strings(&["nessie", "loch", "monster", "serpent"]),
            numeric: vec![
                numeric("process", 1450, 1549, None),
                numeric("final", 1550, 1559, None),
            ],
        },
        ProjectRule {
            id: "bass".to_string(),
            title: Some("Richard Peacock Bass".to_string()),
            description: Some("A commissioned peacock bass".to_string()),
            category: Some(ProjectCategory::Commissioned),
            featured: false,
            difficulty: None,
            materials: Vec::new(),
            tags: strings(&["fish", "commission"]),
            directory_aliases: strings(&["bass"]),
            keywords: strings(&["peacock", "bass"]),
            numeric: Vec::new(),
        },
        ProjectRule {
            id: "stcollen".to_string(),
            title: Some("St. Collen Statue".to_string()),
            description: Some("A statue of St. Collen carved from a single log".to_string()),
            category: Some(ProjectCategory::Religious),
            featured: false,
            difficulty: None,
            materials: Vec::new(),
            tags: strings(&["statue"]),
            directory_aliases: strings(&["stcollen", "collen"]),
            keywords: strings(&["stcollen", "st_collen", "st-collen", "saint_collen"]),
            numeric: Vec::new(),
        },
    ]
}

fn default_woods() -> BTreeMap<String, Vec<String>> {
    BTreeMap::from([
        ("basswood".to_string(), strings(&["basswood", "bass wood"])),
        ("cedar".to_string(), strings(&["cedar"])),
        ("lime".to_string(), strings(&["limewood", "lime"])),
        ("maple".to_string(), strings(&["maple"])),
        ("oak".to_string(), strings(&["oak"])),
        ("pine".to_string(), strings(&["pine"])),
        ("walnut".to_string(), strings(&["walnut"])),
    ])
}

fn default_flags() -> BTreeMap<String, Vec<String>> {
    BTreeMap::from([
        (
            "fish".to_string(),
            strings(&["fish", "aquatic", "trout", "salmon"]),
        ),
        (
            "religious".to_string(),
            strings(&["statue", "church", "saint", "religious"]),
        ),
        (
            "tools".to_string(),
            strings(&["tool", "chisel", "gouge", "mallet"]),
        ),
    ])
}

/// Stage evidence: directory names and filename keywords per stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StagesConfig {
    /// Stage → directory names (exact, case-insensitive).
    pub directories: BTreeMap<String, Vec<String>>,
    /// Stage → filename keywords (substring, case-insensitive).
    pub keywords: BTreeMap<String, Vec<String>>,
}

impl Default for StagesConfig {
    fn default() -> Self {
        Self {
            directories: BTreeMap::from([
                ("final".to_string(), strings(&["final", "finished", "showcase"])),
                ("process".to_string(), strings(&["process", "wip", "in-progress"])),
            ]),
            keywords: BTreeMap::from([
                (
                    "final".to_string(),
                    strings(&["final", "finish", "complete", "done", "polished"]),
                ),
                (
                    "process".to_string(),
                    strings(&["wip", "progress", "step", "rough", "before"]),
                ),
            ]),
        }
    }
}

/// Files whose path contains `pattern` are always kept in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeepOverride {
    pub pattern: String,
    pub project: String,
    pub stage: String,
    pub reason: String,
}

/// Weight added to the confidence score when a signal fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    pub directory_project: f64,
    pub numeric_range: f64,
    pub filename_keyword: f64,
    pub directory_stage: f64,
    pub filename_stage: f64,
    pub wood: f64,
    pub sequence: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            directory_project: 0.5,
            numeric_range: 0.4,
            filename_keyword: 0.3,
            directory_stage: 0.2,
            filename_stage: 0.1,
            wood: 0.1,
            sequence: 0.05,
        }
    }
}

impl ScoringConfig {
    fn weights(&self) -> [(&'static str, f64); 7] {
        [
            ("directory_project", self.directory_project),
            ("numeric_range", self.numeric_range),
            ("filename_keyword", self.filename_keyword),
            ("directory_stage", self.directory_stage),
            ("filename_stage", self.filename_stage),
            ("wood", self.wood),
            ("sequence", self.sequence),
        ]
    }
}

/// Confidence cut-offs for recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdsConfig {
    /// Minimum confidence for a `move` recommendation; below it, `review`.
    pub move_confidence: f64,
    /// Confidence above which files in protected areas may be moved.
    pub high_confidence: f64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            move_confidence: 0.5,
            high_confidence: 0.7,
        }
    }
}

/// Canonical folder layout for suggested paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub projects_dir: String,
    pub images_dir: String,
    pub videos_dir: String,
    /// Stage used when no evidence points at one.
    pub default_stage: String,
    /// Top-level collections whose files only move on high confidence.
    pub protected_areas: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            projects_dir: "projects".to_string(),
            images_dir: "images".to_string(),
            videos_dir: "videos".to_string(),
            default_stage: "process".to_string(),
            protected_areas: strings(&["nature", "workshop"]),
        }
    }
}

/// Site data generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// URL prefix under which the media root is served.
    pub url_prefix: String,
    /// Number of leading items per project marked as featured.
    pub featured_items: usize,
    pub manifest_path: String,
    pub typescript_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url_prefix: "/media".to_string(),
            featured_items: 3,
            manifest_path: "public/curated-manifest.json".to_string(),
            typescript_path: "src/lib/media-organized.ts".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default rules as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(RulesConfig::default()).expect("default rules must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a rules file as a raw TOML value. `Ok(None)` if it doesn't exist.
pub fn load_raw_rules(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_rules(overlay: Option<toml::Value>) -> Result<RulesConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: RulesConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load rules from an explicit file, or from `media-rules.toml` in the media
/// root when no file is given. Missing files fall back to stock defaults; an
/// explicitly named file that is missing is an error.
pub fn load_rules(media_root: &Path, explicit: Option<&Path>) -> Result<RulesConfig, ConfigError> {
    let overlay = match explicit {
        Some(path) => {
            let raw = load_raw_rules(path)?;
            if raw.is_none() {
                return Err(ConfigError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("rules file not found: {}", path.display()),
                )));
            }
            raw
        }
        None => load_raw_rules(&media_root.join(RULES_FILENAME))?,
    };
    resolve_rules(overlay)
}

/// Returns a fully-commented stock `media-rules.toml`.
///
/// Used by the `gen-config` CLI command. Must stay in sync with
/// [`RulesConfig::default`].
pub fn stock_config_toml() -> &'static str {
    r##"# carving-media rules
# ===================
# All settings are optional. Values shown below are the defaults.
# Tables merge key by key on top of these defaults; arrays ([[projects]],
# [[overrides]], keyword lists) replace the default array entirely.
# Unknown keys will cause an error.

# Regex extracting the camera sequence number from a file name.
# The first capture group must be the number.
sequence_pattern = '(?i)img[_-]?(\d+)'

# ---------------------------------------------------------------------------
# Scanner
# ---------------------------------------------------------------------------
[scan]
# Only these extensions are inventoried (case-insensitive).
extensions = ["jpg", "jpeg", "png", "webp", "gif", "mp4", "mov"]
# Extensions reported as video.
video_extensions = ["mp4", "mov", "avi", "mkv", "webm"]
# Directories whose name contains any of these are never entered.
exclude_dirs = ["archive", "backup", "original-files"]

# ---------------------------------------------------------------------------
# Stage evidence
# ---------------------------------------------------------------------------
[stages.directories]
final = ["final", "finished", "showcase"]
process = ["process", "wip", "in-progress"]

[stages.keywords]
final = ["final", "finish", "complete", "done", "polished"]
process = ["wip", "progress", "step", "rough", "before"]

# ---------------------------------------------------------------------------
# Wood types detected from file names
# ---------------------------------------------------------------------------
[woods]
basswood = ["basswood", "bass wood"]
cedar = ["cedar"]
lime = ["limewood", "lime"]
maple = ["maple"]
oak = ["oak"]
pine = ["pine"]
walnut = ["walnut"]

# ---------------------------------------------------------------------------
# Content flags (reported, never used for placement)
# ---------------------------------------------------------------------------
[flags]
fish = ["fish", "aquatic", "trout", "salmon"]
religious = ["statue", "church", "saint", "religious"]
tools = ["tool", "chisel", "gouge", "mallet"]

# ---------------------------------------------------------------------------
# Confidence scoring: weight added per signal, summed and clamped to 0-1
# ---------------------------------------------------------------------------
[scoring]
directory_project = 0.5
numeric_range = 0.4
filename_keyword = 0.3
directory_stage = 0.2
filename_stage = 0.1
wood = 0.1
sequence = 0.05

[thresholds]
# Below this a misplaced file is only flagged for review.
move_confidence = 0.5
# Files under protected areas move only above this.
high_confidence = 0.7

# ---------------------------------------------------------------------------
# Canonical layout: projects/<id>/images/<stage>/ and projects/<id>/videos/
# ---------------------------------------------------------------------------
[layout]
projects_dir = "projects"
images_dir = "images"
videos_dir = "videos"
default_stage = "process"
protected_areas = ["nature", "workshop"]

# ---------------------------------------------------------------------------
# Site data generation
# ---------------------------------------------------------------------------
[site]
url_prefix = "/media"
featured_items = 3
manifest_path = "public/curated-manifest.json"
typescript_path = "src/lib/media-organized.ts"

# ---------------------------------------------------------------------------
# Keep overrides: paths containing `pattern` are always correctly placed
# ---------------------------------------------------------------------------
[[overrides]]
pattern = "stcollen"
project = "stcollen"
stage = "logs"
reason = "stcollen logs - always correctly placed"

# ---------------------------------------------------------------------------
# Projects, in rule order (earlier wins ties)
# ---------------------------------------------------------------------------
[[projects]]
id = "eagle"
title = "Golden Eagle"
description = "A life-size golden eagle carved in lime"
category = "wildlife"
featured = true
difficulty = "expert"
materials = ["lime"]
tags = ["bird", "wildlife"]
directory_aliases = ["eagle"]
keywords = ["eagle", "raptor", "talon"]

[[projects.numeric]]
stage = "process"
min = 2000
max = 2199
label = "roughing"

[[projects.numeric]]
stage = "process"
min = 2200
max = 2799
label = "carving"

[[projects.numeric]]
stage = "process"
min = 2800
max = 3099
label = "detailing"

[[projects.numeric]]
stage = "process"
min = 3100
max = 3199
label = "finishing"

[[projects.numeric]]
stage = "final"
min = 3200
max = 3299

[[projects]]
id = "nessie"
title = "Loch Ness Monster"
description = "Nessie rising from the loch"
category = "mythical"
featured = true
tags = ["mythical"]
directory_aliases = ["nessie", "loch"]
keywords = ["nessie", "loch", "monster", "serpent"]

[[projects.numeric]]
stage = "process"
min = 1450
max = 1549

[[projects.numeric]]
stage = "final"
min = 1550
max = 1559

[[projects]]
id = "bass"
title = "Richard Peacock Bass"
description = "A commissioned peacock bass"
category = "commissioned"
tags = ["fish", "commission"]
directory_aliases = ["bass"]
keywords = ["peacock", "bass"]

[[projects]]
id = "stcollen"
title = "St. Collen Statue"
description = "A statue of St. Collen carved from a single log"
category = "religious"
tags = ["statue"]
directory_aliases = ["stcollen", "collen"]
keywords = ["stcollen", "st_collen", "st-collen", "saint_collen"]
"##
}
