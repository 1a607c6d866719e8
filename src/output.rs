//! CLI output formatting for every pipeline command.
//!
//! # Information-First Display
//!
//! Each entity (folder, file, move, project) leads with a positional index
//! and its identity; details sit on indented context lines underneath. The
//! same helpers format every command so a file looks the same whether it is
//! being inventoried, classified or moved.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! 001 eagle (2 files)
//!     001 IMG_3205.jpg (image, 2.1 MB)
//!     002 clip.mov (video, 48.0 MB)
//!
//! Found 1 image, 1 video (50.1 MB)
//! ```
//!
//! ## Classify
//!
//! ```text
//! 001 eagle/IMG_3205.jpg
//!     Project: eagle, stage: final, confidence 0.90
//!     Move → projects/eagle/images/final/eagle_final_img-3205.jpg
//!
//! Classified 12 files: 9 keep, 2 move, 1 review
//! ```
//!
//! ## Plan / Apply / Rollback
//!
//! ```text
//! 001 eagle/IMG_3205.jpg
//!     → projects/eagle/images/final/eagle_final_img-3205.jpg
//! Skipped
//! 001 nessie/IMG_1555.jpg (target exists)
//!
//! Would move 1 file, 0 in place, 1 skipped
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::classify::{Action, ClassificationResult};
use crate::mover::{ApplyOutcome, Mode};
use crate::plan::{ConflictEntry, ManifestDiff, MoveEntry};
use crate::report::Report;
use crate::scan::Inventory;
use crate::site::{SiteData, Violation};
use crate::types::MediaKind;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable byte count: `512 B`, `1.5 KB`, `2.1 MB`, `1.0 GB`.
fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// `1 file`, `3 files`.
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Format a move: source header, destination as context.
///
/// ```text
/// 001 eagle/IMG_3205.jpg
///     → projects/eagle/images/final/eagle_final_img-3205.jpg
/// ```
fn move_lines(index: usize, entry: &MoveEntry) -> [String; 2] {
    [
        format!("{} {}", format_index(index), entry.source),
        format!("{}\u{2192} {}", indent(1), entry.destination),
    ]
}

fn conflict_line(index: usize, c: &ConflictEntry) -> String {
    format!(
        "{} {} ({})",
        format_index(index),
        c.entry.source,
        c.conflict.describe()
    )
}

// ============================================================================
// Scan
// ============================================================================

/// Format the inventory grouped by top-level folder.
pub fn format_scan_output(inventory: &Inventory) -> Vec<String> {
    let mut lines = Vec::new();
    let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();

    for (i, file) in inventory.files.iter().enumerate() {
        let top = file
            .relative_path
            .split_once('/')
            .map(|(top, _)| top)
            .unwrap_or(".");
        match groups.iter_mut().find(|(name, _)| *name == top) {
            Some((_, members)) => members.push(i),
            None => groups.push((top, vec![i])),
        }
    }

    for (g, (name, members)) in groups.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(g + 1),
            name,
            plural(members.len(), "file")
        ));
        for (n, &i) in members.iter().enumerate() {
            let file = &inventory.files[i];
            let shown = match *name {
                "." => file.relative_path.as_str(),
                _ => &file.relative_path[name.len() + 1..],
            };
            lines.push(format!(
                "{}{} {} ({}, {})",
                indent(1),
                format_index(n + 1),
                shown,
                file.kind.as_str(),
                format_size(file.size_bytes)
            ));
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Found {}, {} ({})",
        plural(inventory.images, "image"),
        plural(inventory.videos, "video"),
        format_size(inventory.total_bytes)
    ));
    if !inventory.duplicates.is_empty() {
        lines.push(format!(
            "{} shared by {}",
            plural(inventory.duplicates.len(), "duplicate name"),
            plural(inventory.duplicate_files(), "file")
        ));
        for (g, paths) in inventory.duplicates.iter().enumerate() {
            lines.push(format!("{}{} {}", indent(1), format_index(g + 1), paths.join(", ")));
        }
    }
    lines
}

pub fn print_scan_output(inventory: &Inventory) {
    for line in format_scan_output(inventory) {
        println!("{}", line);
    }
}

// ============================================================================
// Classify
// ============================================================================

/// Format classification results. Only files that need action are listed;
/// correctly placed files are counted in the footer.
pub fn format_classify_output(results: &[ClassificationResult]) -> Vec<String> {
    let mut lines = Vec::new();
    let (mut keep, mut moves, mut review) = (0, 0, 0);

    for r in results {
        match r.recommendation.action {
            Action::Keep => {
                keep += 1;
                continue;
            }
            Action::Move => moves += 1,
            Action::Review => review += 1,
        }
        lines.push(format!(
            "{} {}",
            format_index(moves + review),
            r.file.relative_path
        ));
        lines.push(format!(
            "{}Project: {}, stage: {}, confidence {:.2}",
            indent(1),
            r.detected_project.as_deref().unwrap_or("?"),
            r.detected_stage.as_deref().unwrap_or("?"),
            r.confidence
        ));
        match r.recommendation.action {
            Action::Move => lines.push(format!("{}Move \u{2192} {}", indent(1), r.suggested_path)),
            _ => lines.push(format!("{}Review: {}", indent(1), r.recommendation.reason)),
        }
        if !r.flags.is_empty() {
            lines.push(format!("{}Flags: {}", indent(1), r.flags.join(", ")));
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Classified {}: {} keep, {} move, {} review",
        plural(results.len(), "file"),
        keep,
        moves,
        review
    ));
    lines
}

pub fn print_classify_output(results: &[ClassificationResult]) {
    for line in format_classify_output(results) {
        println!("{}", line);
    }
}

/// Format the per-project counts of a report.
pub fn format_report_summary(report: &Report) -> Vec<String> {
    let s = &report.summary;
    let mut lines = vec![format!(
        "{} ({} images, {} videos)",
        plural(s.total, "file"),
        s.images,
        s.videos
    )];
    for (i, (project, count)) in report.by_project.iter().enumerate() {
        lines.push(format!("{}{} {} ({})", indent(1), format_index(i + 1), project, count));
    }
    lines.push(format!(
        "Keep {}, move {}, review {} ({} high confidence)",
        s.keep, s.move_count, s.review, report.high_confidence_issues
    ));
    lines
}

pub fn print_report_summary(report: &Report) {
    for line in format_report_summary(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Plan, apply and rollback
// ============================================================================

pub fn format_plan_output(diff: &ManifestDiff) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, entry) in diff.ready.iter().enumerate() {
        lines.extend(move_lines(i + 1, entry));
    }
    if !diff.conflicts.is_empty() {
        lines.push("Conflicts".to_string());
        for (i, c) in diff.conflicts.iter().enumerate() {
            lines.push(conflict_line(i + 1, c));
        }
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Planned {}: {} ready, {} in place, {} conflicting",
        plural(diff.ready.len() + diff.in_place.len() + diff.conflicts.len(), "move"),
        diff.ready.len(),
        diff.in_place.len(),
        diff.conflicts.len()
    ));
    lines
}

pub fn print_plan_output(diff: &ManifestDiff) {
    for line in format_plan_output(diff) {
        println!("{}", line);
    }
}

pub fn format_apply_output(outcome: &ApplyOutcome) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, entry) in outcome.applied.iter().enumerate() {
        lines.extend(move_lines(i + 1, entry));
    }
    if !outcome.skipped.is_empty() {
        lines.push("Skipped".to_string());
        for (i, c) in outcome.skipped.iter().enumerate() {
            lines.push(conflict_line(i + 1, c));
        }
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }
    let verb = match outcome.mode {
        Mode::DryRun => "Would move",
        Mode::Live => "Moved",
    };
    lines.push(format!(
        "{} {}, {} in place, {} skipped",
        verb,
        plural(outcome.applied.len(), "file"),
        outcome.in_place.len(),
        outcome.skipped.len()
    ));
    lines
}

pub fn print_apply_output(outcome: &ApplyOutcome) {
    for line in format_apply_output(outcome) {
        println!("{}", line);
    }
}

// ============================================================================
// Site data
// ============================================================================

pub fn format_site_output(data: &SiteData, manifest: &Path, typescript: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, p) in data.projects.iter().enumerate() {
        let featured = if p.featured { ", featured" } else { "" };
        lines.push(format!(
            "{} {} ({}, {}{})",
            format_index(i + 1),
            p.title,
            plural(p.media_count.images, "image"),
            plural(p.media_count.videos, "video"),
            featured
        ));
        lines.push(format!("{}Category: {}", indent(1), p.category.as_str()));
        if !p.cover_image.is_empty() {
            lines.push(format!("{}Cover: {}", indent(1), p.cover_image));
        }
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }
    let videos = data
        .items
        .iter()
        .filter(|i| i.kind == MediaKind::Video)
        .count();
    lines.push(format!(
        "Generated {}, {} ({} videos)",
        plural(data.projects.len(), "project"),
        plural(data.items.len(), "media item"),
        videos
    ));
    lines.push(format!("{}{}", indent(1), manifest.display()));
    lines.push(format!("{}{}", indent(1), typescript.display()));
    lines
}

pub fn print_site_output(data: &SiteData, manifest: &Path, typescript: &Path) {
    for line in format_site_output(data, manifest, typescript) {
        println!("{}", line);
    }
}

pub fn format_check_output(data: &SiteData, violations: &[Violation]) -> Vec<String> {
    let mut lines: Vec<String> = violations
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{} {}", format_index(i + 1), v))
        .collect();
    if !lines.is_empty() {
        lines.push(String::new());
    }
    if violations.is_empty() {
        lines.push(format!(
            "Site data OK: {}, {}",
            plural(data.projects.len(), "project"),
            plural(data.items.len(), "media item")
        ));
    } else {
        lines.push(format!("Found {}", plural(violations.len(), "problem")));
    }
    lines
}

pub fn print_check_output(data: &SiteData, violations: &[Violation]) {
    for line in format_check_output(data, violations) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
