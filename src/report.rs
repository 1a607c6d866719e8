//! Classification reports.
//!
//! Aggregates a run's [`ClassificationResult`]s into a [`Report`]: per-field
//! counts, a confidence histogram, and the list of files that need action.
//! Reports carry no timestamps, so two runs over the same tree produce
//! byte-identical files.
//!
//! ## Output Files
//!
//! ```text
//! <output>/
//! ├── classification-results.json   # every ClassificationResult
//! ├── classification-report.json    # Report
//! └── classification-report.md      # Report rendered for humans
//! ```
//!
//! Write failures are logged and never abort the command that produced the
//! report.

use crate::classify::{Action, ClassificationResult};
use crate::config::RulesConfig;
use crate::types::{MediaKind, ProjectCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

pub const RESULTS_FILENAME: &str = "classification-results.json";
pub const REPORT_JSON_FILENAME: &str = "classification-report.json";
pub const REPORT_MARKDOWN_FILENAME: &str = "classification-report.md";

/// Bucket for results with no detected project.
pub const UNASSIGNED: &str = "unassigned";
/// Bucket for results with no detected stage or wood.
pub const UNKNOWN: &str = "unknown";

const HISTOGRAM_LABELS: [&str; 5] = ["0.0-0.2", "0.2-0.4", "0.4-0.6", "0.6-0.8", "0.8-1.0"];

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub images: usize,
    pub videos: usize,
    pub keep: usize,
    #[serde(rename = "move")]
    pub move_count: usize,
    pub review: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBucket {
    pub range: String,
    pub count: usize,
}

/// A file whose recommendation is not `keep`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub path: String,
    pub action: Action,
    pub reason: String,
    pub suggested_path: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub summary: Summary,
    pub by_project: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
    pub by_stage: BTreeMap<String, usize>,
    pub by_wood: BTreeMap<String, usize>,
    pub by_flag: BTreeMap<String, usize>,
    pub confidence_histogram: Vec<ConfidenceBucket>,
    pub issues: Vec<Issue>,
    /// Issues at or above the rules' high-confidence threshold.
    pub high_confidence_issues: usize,
}

fn bump(map: &mut BTreeMap<String, usize>, key: &str) {
    *map.entry(key.to_string()).or_default() += 1;
}

fn histogram_bucket(confidence: f64) -> usize {
    ((confidence.clamp(0.0, 1.0) * 5.0).floor() as usize).min(HISTOGRAM_LABELS.len() - 1)
}

impl Report {
    pub fn build(results: &[ClassificationResult], rules: &RulesConfig) -> Self {
        let mut summary = Summary::default();
        let mut by_project = BTreeMap::new();
        let mut by_category = BTreeMap::new();
        let mut by_stage = BTreeMap::new();
        let mut by_wood = BTreeMap::new();
        let mut by_flag = BTreeMap::new();
        let mut histogram = [0usize; HISTOGRAM_LABELS.len()];
        let mut issues = Vec::new();

        for r in results {
            summary.total += 1;
            match r.file.kind {
                MediaKind::Image => summary.images += 1,
                MediaKind::Video => summary.videos += 1,
            }
            match r.recommendation.action {
                Action::Keep => summary.keep += 1,
                Action::Move => summary.move_count += 1,
                Action::Review => summary.review += 1,
            }

            match &r.detected_project {
                Some(project) => {
                    bump(&mut by_project, project);
                    let category = rules
                        .project(project)
                        .and_then(|p| p.category)
                        .unwrap_or_else(|| ProjectCategory::guess(project));
                    bump(&mut by_category, category.as_str());
                }
                None => {
                    bump(&mut by_project, UNASSIGNED);
                    bump(&mut by_category, UNASSIGNED);
                }
            }
            bump(&mut by_stage, r.detected_stage.as_deref().unwrap_or(UNKNOWN));
            bump(&mut by_wood, r.detected_wood.as_deref().unwrap_or(UNKNOWN));
            for flag in &r.flags {
                bump(&mut by_flag, flag);
            }
            histogram[histogram_bucket(r.confidence)] += 1;

            if r.is_issue() {
                issues.push(Issue {
                    path: r.file.relative_path.clone(),
                    action: r.recommendation.action,
                    reason: r.recommendation.reason.clone(),
                    suggested_path: r.suggested_path.clone(),
                    confidence: r.confidence,
                    project: r.detected_project.clone(),
                });
            }
        }

        let high_confidence_issues = issues
            .iter()
            .filter(|i| i.confidence >= rules.thresholds.high_confidence)
            .count();

        Self {
            summary,
            by_project,
            by_category,
            by_stage,
            by_wood,
            by_flag,
            confidence_histogram: HISTOGRAM_LABELS
                .iter()
                .zip(histogram)
                .map(|(range, count)| ConfidenceBucket {
                    range: range.to_string(),
                    count,
                })
                .collect(),
            issues,
            high_confidence_issues,
        }
    }
}

fn markdown_counts(md: &mut String, heading: &str, counts: &BTreeMap<String, usize>) {
    let _ = writeln!(md, "## {heading}\n");
    if counts.is_empty() {
        let _ = writeln!(md, "_none_\n");
        return;
    }
    let _ = writeln!(md, "| Name | Files |");
    let _ = writeln!(md, "|------|------:|");
    for (name, count) in counts {
        let _ = writeln!(md, "| {name} | {count} |");
    }
    md.push('\n');
}

/// Render a report as a Markdown summary.
pub fn render_markdown(report: &Report) -> String {
    let s = &report.summary;
    let mut md = String::new();
    let _ = writeln!(md, "# Media Classification Report\n");
    let _ = writeln!(md, "## Summary\n");
    let _ = writeln!(md, "- **Total files:** {} ({} images, {} videos)", s.total, s.images, s.videos);
    let _ = writeln!(md, "- **Correctly placed:** {}", s.keep);
    let _ = writeln!(md, "- **To move:** {}", s.move_count);
    let _ = writeln!(md, "- **Needs review:** {}", s.review);
    let _ = writeln!(md, "- **High-confidence issues:** {}\n", report.high_confidence_issues);

    markdown_counts(&mut md, "By Project", &report.by_project);
    markdown_counts(&mut md, "By Category", &report.by_category);
    markdown_counts(&mut md, "By Stage", &report.by_stage);
    markdown_counts(&mut md, "By Wood", &report.by_wood);
    markdown_counts(&mut md, "Content Flags", &report.by_flag);

    let _ = writeln!(md, "## Confidence\n");
    let _ = writeln!(md, "| Range | Files |");
    let _ = writeln!(md, "|-------|------:|");
    for bucket in &report.confidence_histogram {
        let _ = writeln!(md, "| {} | {} |", bucket.range, bucket.count);
    }
    md.push('\n');

    let _ = writeln!(md, "## Issues\n");
    if report.issues.is_empty() {
        let _ = writeln!(md, "All files are correctly placed.");
        return md;
    }
    let _ = writeln!(md, "| File | Action | Confidence | Suggested | Reason |");
    let _ = writeln!(md, "|------|--------|-----------:|-----------|--------|");
    for issue in &report.issues {
        let _ = writeln!(
            md,
            "| `{}` | {} | {:.2} | `{}` | {} |",
            issue.path,
            issue.action.as_str(),
            issue.confidence,
            issue.suggested_path,
            issue.reason.replace('|', "\\|")
        );
    }
    md
}

/// Write a value as pretty JSON, creating parent directories.
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ReportError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json + "\n")?;
    Ok(())
}

pub fn load_results(path: &Path) -> Result<Vec<ClassificationResult>, ReportError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write results, report JSON and report Markdown to `output_dir`.
///
/// Returns the paths that were written; failures are logged and skipped.
pub fn write_reports(
    output_dir: &Path,
    results: &[ClassificationResult],
    report: &Report,
) -> Vec<PathBuf> {
    let mut written = Vec::new();
    let mut record = |path: PathBuf, outcome: Result<(), ReportError>| match outcome {
        Ok(()) => {
            info!(path = %path.display(), "wrote report");
            written.push(path);
        }
        Err(err) => error!(path = %path.display(), error = %err, "failed to write report"),
    };

    let path = output_dir.join(RESULTS_FILENAME);
    let outcome = save_json(&path, results);
    record(path, outcome);

    let path = output_dir.join(REPORT_JSON_FILENAME);
    let outcome = save_json(&path, report);
    record(path, outcome);

    let path = output_dir.join(REPORT_MARKDOWN_FILENAME);
    let outcome = fs::create_dir_all(output_dir)
        .and_then(|()| fs::write(&path, render_markdown(report)))
        .map_err(ReportError::from);
    record(path, outcome);

    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn results_for(paths: &[&str]) -> Vec<ClassificationResult> {
        let classifier = Classifier::new(&RulesConfig::default()).unwrap();
        let files: Vec<_> = paths.iter().map(|p| media_file(p)).collect();
        classifier.classify_all(&files)
    }

    fn sample() -> Vec<ClassificationResult> {
        results_for(&[
            "eagle/IMG_3205.jpg",
            "projects/eagle/images/final/eagle_final_img-3206.jpg",
            "misc/DSC_0001.jpg",
            "unsorted/IMG_1500.mov",
            "projects/stcollen/trout_statue.jpg",
        ])
    }

    #[test]
    fn summary_counts_actions_and_kinds() {
        let report = Report::build(&sample(), &RulesConfig::default());
        assert_eq!(
            report.summary,
            Summary {
                total: 5,
                images: 4,
                videos: 1,
                keep: 2,
                move_count: 1,
                review: 2,
            }
        );
    }

    #[test]
    fn groups_use_unassigned_and_unknown_buckets() {
        let report = Report::build(&sample(), &RulesConfig::default());
        assert_eq!(report.by_project["eagle"], 2);
        assert_eq!(report.by_project[UNASSIGNED], 1);
        assert_eq!(report.by_category["wildlife"], 2);
        assert_eq!(report.by_category["religious"], 1);
        assert_eq!(report.by_stage[UNKNOWN], 1);
        assert_eq!(report.by_wood[UNKNOWN], 5);
        assert_eq!(report.by_flag["fish"], 1);
    }

    #[test]
    fn issues_list_every_non_keep_result() {
        let report = Report::build(&sample(), &RulesConfig::default());
        let paths: Vec<&str> = report.issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["eagle/IMG_3205.jpg", "misc/DSC_0001.jpg", "unsorted/IMG_1500.mov"]
        );
        assert_eq!(report.high_confidence_issues, 1);
    }

    #[test]
    fn histogram_has_five_buckets_summing_to_total() {
        let report = Report::build(&sample(), &RulesConfig::default());
        assert_eq!(report.confidence_histogram.len(), 5);
        let sum: usize = report.confidence_histogram.iter().map(|b| b.count).sum();
        assert_eq!(sum, report.summary.total);
    }

    #[test]
    fn histogram_bucket_edges() {
        assert_eq!(histogram_bucket(0.0), 0);
        assert_eq!(histogram_bucket(0.19), 0);
        assert_eq!(histogram_bucket(0.2), 1);
        assert_eq!(histogram_bucket(0.9), 4);
        assert_eq!(histogram_bucket(1.0), 4);
    }

    #[test]
    fn report_is_deterministic() {
        let rules = RulesConfig::default();
        let a = serde_json::to_string(&Report::build(&sample(), &rules)).unwrap();
        let b = serde_json::to_string(&Report::build(&sample(), &rules)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn summary_serializes_move_key() {
        let json = serde_json::to_value(Summary::default()).unwrap();
        assert!(json.get("move").is_some());
    }

    #[test]
    fn markdown_contains_sections_and_issue_rows() {
        let report = Report::build(&sample(), &RulesConfig::default());
        let md = render_markdown(&report);
        assert!(md.starts_with("# Media Classification Report"));
        assert!(md.contains("## By Project"));
        assert!(md.contains("| eagle | 2 |"));
        assert!(md.contains("| `eagle/IMG_3205.jpg` | move | 0.90 |"));
    }

    #[test]
    fn markdown_for_clean_tree() {
        let results = results_for(&["projects/eagle/images/final/eagle_final_img-3206.jpg"]);
        let md = render_markdown(&Report::build(&results, &RulesConfig::default()));
        assert!(md.contains("All files are correctly placed."));
    }

    #[test]
    fn write_reports_creates_all_files() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("reports");
        let results = sample();
        let report = Report::build(&results, &RulesConfig::default());
        let written = write_reports(&out, &results, &report);
        assert_eq!(written.len(), 3);
        assert!(out.join(REPORT_MARKDOWN_FILENAME).exists());

        let loaded = load_results(&out.join(RESULTS_FILENAME)).unwrap();
        assert_eq!(loaded, results);
    }

    #[test]
    fn write_failure_is_not_fatal() {
        let tmp = TempDir::new().unwrap();
        // A regular file where the output directory should be.
        let blocked = tmp.path().join("blocked");
        fs::write(&blocked, "x").unwrap();
        let results = sample();
        let report = Report::build(&results, &RulesConfig::default());
        let written = write_reports(&blocked, &results, &report);
        assert!(written.is_empty());
    }

    #[test]
    fn load_results_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            load_results(&tmp.path().join("nope.json")),
            Err(ReportError::Io(_))
        ));
    }
}
