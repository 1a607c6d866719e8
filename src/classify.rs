//! Heuristic media classification.
//!
//! Stage 2 of the pipeline. Each [`MediaFile`] is matched against the rule
//! tables in [`RulesConfig`] to guess its project, stage and wood type, and to
//! decide whether it already sits where the canonical layout wants it.
//!
//! ## Rule Order
//!
//! Rules are evaluated in a fixed order and the first match wins per field:
//!
//! 1. **Directory project**: a parent directory containing a project alias
//!    (`eagle`, `nessie`/`loch`, `bass`, `stcollen`/`collen`).
//! 2. **Directory stage**: a parent directory named after a stage
//!    (`final`, `process`, ...).
//! 3. **Camera number**: `IMG_3205` checked against the numeric ranges of the
//!    directory project only, or of every project when no directory matched.
//!    Sets the stage when the directory didn't.
//! 4. **Keywords**: project, stage, wood and content-flag keyword lists scored
//!    by substring hits in the file name. Highest count wins, ties go to the
//!    earlier entry.
//!
//! A keyword or number that agrees with an already-chosen project or stage
//! still counts as a signal; one that disagrees is ignored.
//!
//! ## Confidence
//!
//! Every signal that fired adds its weight from `[scoring]`; the sum is
//! clamped to `[0, 1]` and rounded to two decimals. With the stock weights a
//! directory match plus an agreeing camera number scores `0.9`, a lone
//! keyword `0.3`.
//!
//! ## Keep Overrides
//!
//! Paths containing an override pattern (`stcollen` by default) are always
//! reported as correctly placed, whatever the other signals say.
//!
//! Classification is a pure function of the file snapshot and the rules.

use crate::config::{ProjectRule, RulesConfig, ScoringConfig};
use crate::naming::{camera_sequence, canonical_file_name};
use crate::types::{MediaFile, MediaKind};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("Invalid sequence pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A piece of evidence that contributed to a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    DirectoryProject,
    NumericRange,
    FilenameKeyword,
    DirectoryStage,
    FilenameStage,
    Wood,
    /// A camera number was present but fell in no configured range.
    Sequence,
}

impl Signal {
    pub fn weight(self, scoring: &ScoringConfig) -> f64 {
        match self {
            Signal::DirectoryProject => scoring.directory_project,
            Signal::NumericRange => scoring.numeric_range,
            Signal::FilenameKeyword => scoring.filename_keyword,
            Signal::DirectoryStage => scoring.directory_stage,
            Signal::FilenameStage => scoring.filename_stage,
            Signal::Wood => scoring.wood,
            Signal::Sequence => scoring.sequence,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Keep,
    Move,
    Review,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Keep => "keep",
            Action::Move => "move",
            Action::Review => "review",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: Action,
    pub reason: String,
}

impl Recommendation {
    fn new(action: Action, reason: impl Into<String>) -> Self {
        Self {
            action,
            reason: reason.into(),
        }
    }
}

/// Outcome of classifying one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub file: MediaFile,
    pub detected_project: Option<String>,
    pub detected_stage: Option<String>,
    pub detected_wood: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    pub signals: Vec<Signal>,
    pub confidence: f64,
    /// Full suggested path relative to the media root, file name included.
    /// Equals the current path when there is nothing to suggest.
    pub suggested_path: String,
    pub suggested_name: String,
    pub recommendation: Recommendation,
}

impl ClassificationResult {
    pub fn is_issue(&self) -> bool {
        self.recommendation.action != Action::Keep
    }
}

/// Evidence accumulated while walking the rule list.
#[derive(Default)]
struct Evidence {
    project: Option<String>,
    stage: Option<String>,
    label: Option<String>,
    wood: Option<String>,
    flags: Vec<String>,
    signals: BTreeSet<Signal>,
}

/// Applies [`RulesConfig`] to media files.
pub struct Classifier {
    rules: RulesConfig,
    sequence: Regex,
}

impl Classifier {
    pub fn new(rules: &RulesConfig) -> Result<Self, ClassifyError> {
        Ok(Self {
            sequence: Regex::new(&rules.sequence_pattern)?,
            rules: rules.clone(),
        })
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    pub fn classify_all(&self, files: &[MediaFile]) -> Vec<ClassificationResult> {
        files.iter().map(|f| self.classify(f)).collect()
    }

    pub fn classify(&self, file: &MediaFile) -> ClassificationResult {
        let segments: Vec<String> = file
            .parent_segments()
            .iter()
            .map(|s| s.to_lowercase())
            .collect();
        let lower_name = file.file_name.to_lowercase();

        let evidence = self.gather_evidence(file, &segments, &lower_name);
        let confidence = self.score(&evidence.signals);

        if let Some(o) = self.matching_override(file) {
            return ClassificationResult {
                file: file.clone(),
                detected_project: Some(o.project.clone()),
                detected_stage: Some(o.stage.clone()),
                detected_wood: evidence.wood,
                flags: evidence.flags,
                signals: evidence.signals.into_iter().collect(),
                confidence,
                suggested_path: file.relative_path.clone(),
                suggested_name: file.file_name.clone(),
                recommendation: Recommendation::new(Action::Keep, o.reason.clone()),
            };
        }

        let (suggested_path, suggested_name) = self.suggest_location(file, &evidence);
        let recommendation = self.recommend(
            file,
            &segments,
            &evidence,
            confidence,
            &suggested_path,
            &suggested_name,
        );

        ClassificationResult {
            file: file.clone(),
            detected_project: evidence.project,
            detected_stage: evidence.stage,
            detected_wood: evidence.wood,
            flags: evidence.flags,
            signals: evidence.signals.into_iter().collect(),
            confidence,
            suggested_path,
            suggested_name,
            recommendation,
        }
    }

    fn gather_evidence(&self, file: &MediaFile, segments: &[String], lower_name: &str) -> Evidence {
        let mut ev = Evidence::default();

        let dir_project = self.rules.projects.iter().find(|p| {
            p.directory_aliases.iter().any(|alias| {
                let alias = alias.to_lowercase();
                !alias.is_empty() && segments.iter().any(|s| s.contains(&alias))
            })
        });
        if let Some(p) = dir_project {
            ev.project = Some(p.id.clone());
            ev.signals.insert(Signal::DirectoryProject);
        }

        let dir_stage = self.rules.stages.directories.iter().find(|(_, names)| {
            names
                .iter()
                .any(|n| segments.iter().any(|s| s.eq_ignore_ascii_case(n)))
        });
        if let Some((stage, _)) = dir_stage {
            ev.stage = Some(stage.clone());
            ev.signals.insert(Signal::DirectoryStage);
        }

        if let Some(number) = camera_sequence(&self.sequence, &file.file_name) {
            self.apply_numeric(number, dir_project, &mut ev);
        }

        let projects = self
            .rules
            .projects
            .iter()
            .map(|p| (p.id.as_str(), p.keywords.as_slice()));
        if let Some(id) = best_keyword_match(projects, lower_name) {
            match &ev.project {
                None => {
                    ev.project = Some(id.to_string());
                    ev.signals.insert(Signal::FilenameKeyword);
                }
                Some(current) if current == id => {
                    ev.signals.insert(Signal::FilenameKeyword);
                }
                Some(_) => {}
            }
        }

        let stages = self
            .rules
            .stages
            .keywords
            .iter()
            .map(|(stage, kws)| (stage.as_str(), kws.as_slice()));
        if let Some(stage) = best_keyword_match(stages, lower_name) {
            match &ev.stage {
                None => {
                    ev.stage = Some(stage.to_string());
                    ev.signals.insert(Signal::FilenameStage);
                }
                Some(current) if current == stage => {
                    ev.signals.insert(Signal::FilenameStage);
                }
                Some(_) => {}
            }
        }

        let woods = self
            .rules
            .woods
            .iter()
            .map(|(wood, kws)| (wood.as_str(), kws.as_slice()));
        if let Some(wood) = best_keyword_match(woods, lower_name) {
            ev.wood = Some(wood.to_string());
            ev.signals.insert(Signal::Wood);
        }

        for (flag, keywords) in &self.rules.flags {
            if keyword_hits(keywords, lower_name) > 0 {
                ev.flags.push(flag.clone());
            }
        }

        ev
    }

    /// Directory precedence: with a directory project only its ranges count.
    fn apply_numeric(&self, number: u32, dir_project: Option<&ProjectRule>, ev: &mut Evidence) {
        let candidates: Vec<&ProjectRule> = match dir_project {
            Some(p) => vec![p],
            None => self.rules.projects.iter().collect(),
        };
        let hit = candidates.iter().find_map(|p| {
            p.numeric
                .iter()
                .find(|rule| rule.contains(number))
                .map(|rule| (*p, rule))
        });

        let Some((project, rule)) = hit else {
            ev.signals.insert(Signal::Sequence);
            return;
        };

        ev.signals.insert(Signal::NumericRange);
        if ev.project.is_none() {
            ev.project = Some(project.id.clone());
        }
        match &ev.stage {
            None => {
                ev.stage = Some(rule.stage.clone());
                ev.label = rule.label.clone();
            }
            Some(stage) if *stage == rule.stage => {
                ev.label = rule.label.clone();
            }
            Some(_) => ev.flags.push("stage_conflict".to_string()),
        }
    }

    fn score(&self, signals: &BTreeSet<Signal>) -> f64 {
        let sum: f64 = signals
            .iter()
            .map(|s| s.weight(&self.rules.scoring))
            .sum();
        (sum.clamp(0.0, 1.0) * 100.0).round() / 100.0
    }

    fn matching_override(&self, file: &MediaFile) -> Option<&crate::config::KeepOverride> {
        let lower_path = file.relative_path.to_lowercase();
        self.rules
            .overrides
            .iter()
            .find(|o| lower_path.contains(&o.pattern.to_lowercase()))
    }

    /// Canonical location: `projects/<id>/images/<stage>/` or
    /// `projects/<id>/videos/`.
    fn suggest_location(&self, file: &MediaFile, ev: &Evidence) -> (String, String) {
        let Some(project) = &ev.project else {
            return (file.relative_path.clone(), file.file_name.clone());
        };
        let layout = &self.rules.layout;
        let stage = ev.stage.as_deref().unwrap_or(&layout.default_stage);
        let dir = match file.kind {
            MediaKind::Image => format!(
                "{}/{}/{}/{}",
                layout.projects_dir, project, layout.images_dir, stage
            ),
            MediaKind::Video => format!("{}/{}/{}", layout.projects_dir, project, layout.videos_dir),
        };
        let name = canonical_file_name(&file.file_name, project, stage, ev.label.as_deref());
        (format!("{}/{}", dir, name), name)
    }

    fn recommend(
        &self,
        file: &MediaFile,
        segments: &[String],
        ev: &Evidence,
        confidence: f64,
        suggested_path: &str,
        suggested_name: &str,
    ) -> Recommendation {
        let thresholds = &self.rules.thresholds;
        let from_directory = ev.signals.contains(&Signal::DirectoryProject);

        let protected = segments.iter().find(|s| {
            self.rules
                .layout
                .protected_areas
                .iter()
                .any(|a| a.eq_ignore_ascii_case(s))
        });
        if let Some(area) = protected {
            return match &ev.project {
                Some(project) if !from_directory && confidence > thresholds.high_confidence => {
                    Recommendation::new(
                        Action::Move,
                        format!(
                            "high confidence project detection ({}) but placed in {}",
                            project, area
                        ),
                    )
                }
                _ => Recommendation::new(Action::Keep, format!("inside protected area '{}'", area)),
            };
        }

        let Some(project) = &ev.project else {
            return Recommendation::new(Action::Review, "unable to determine project");
        };

        if file.relative_path == suggested_path {
            return Recommendation::new(Action::Keep, "correctly placed");
        }

        let mut reasons = Vec::new();
        let current_dir = parent_of(&file.relative_path);
        let suggested_dir = parent_of(suggested_path);
        if !from_directory {
            reasons.push(format!(
                "project {} detected from file name but file is outside its folder",
                project
            ));
        } else if current_dir != suggested_dir {
            reasons.push(format!("expected folder {}/", suggested_dir));
        }
        if file.file_name != suggested_name {
            reasons.push(format!("rename to {}", suggested_name));
        }
        let reason = reasons.join("; ");

        if confidence >= thresholds.move_confidence {
            Recommendation::new(Action::Move, reason)
        } else {
            Recommendation::new(Action::Review, format!("low confidence: {}", reason))
        }
    }
}

fn parent_of(relative: &str) -> &str {
    relative.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Number of keywords found as substrings of `haystack`.
fn keyword_hits(keywords: &[String], haystack: &str) -> usize {
    keywords
        .iter()
        .filter(|k| !k.is_empty() && haystack.contains(&k.to_lowercase()))
        .count()
}

/// Key with the most keyword hits; ties go to the earliest key.
fn best_keyword_match<'a>(
    tables: impl Iterator<Item = (&'a str, &'a [String])>,
    haystack: &str,
) -> Option<&'a str> {
    let mut best: Option<(&'a str, usize)> = None;
    for (key, keywords) in tables {
        let hits = keyword_hits(keywords, haystack);
        if hits > 0 && best.is_none_or(|(_, n)| hits > n) {
            best = Some((key, hits));
        }
    }
    best.map(|(key, _)| key)
}
