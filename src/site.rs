//! Site gallery data.
//!
//! Rebuilds the portfolio site's `Project` and `MediaItem` arrays from the
//! organized tree and writes them as a curated JSON manifest and a TypeScript
//! module. Only the canonical layout is read:
//!
//! ```text
//! public/media/projects/
//! └── eagle/
//!     ├── images/
//!     │   ├── eagle_showcase.jpg          # root image: final (name says so)
//!     │   ├── process/eagle_process_*.jpg # process
//!     │   ├── final/eagle_final_*.jpg     # final
//!     │   └── archive/                    # not a stage folder: ignored
//!     └── videos/eagle_timelapse.mp4      # timelapse
//! ```
//!
//! Subfolders of `images/` count only when they are stage folders
//! (`stages.directories`) and not excluded by `scan.exclude_dirs`.
//!
//! Items are ordered process, final, videos. Within a stage they follow the
//! shooting timeline: the project's camera-number ranges are listed in
//! shooting order, so an item sorts by the range its number (or its range
//! label, such as `roughing`) falls in, then by camera number, then by name.
//! Ids are `<project>-<type>-<NNN>`
//! with a counter per media type, so they are unique within a project. The
//! first `site.featured_items` items of each project are featured.
//!
//! Both outputs are free of timestamps; regenerating from an unchanged tree
//! produces identical files.

use crate::config::{ProjectRule, RulesConfig};
use crate::naming::{camera_sequence, slugify, title_case};
use crate::plan::is_safe_relative;
use crate::types::{Difficulty, MediaKind, ProjectCategory};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Root-level image names containing any of these are final shots.
const FINAL_NAME_HINTS: [&str; 4] = ["final", "finished", "showcase", "complete"];

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid sequence pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Process,
    Final,
    Timelapse,
}

impl ItemCategory {
    fn describe(&self) -> &'static str {
        match self {
            ItemCategory::Process => "carving process",
            ItemCategory::Final => "finished piece",
            ItemCategory::Timelapse => "time-lapse video",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaCount {
    pub images: usize,
    pub videos: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: ProjectCategory,
    pub cover_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_video: Option<String>,
    pub media_folder: String,
    pub media_count: MediaCount,
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub src: String,
    pub alt: String,
    pub category: ItemCategory,
    pub project: String,
    pub filename: String,
    pub order: usize,
    #[serde(default)]
    pub featured: bool,
}

/// The curated manifest: every project and every media item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteData {
    pub projects: Vec<Project>,
    pub items: Vec<MediaItem>,
}

impl SiteData {
    pub fn load(path: &Path) -> Result<Self, SiteError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// A file found in a project folder, before ids are assigned.
struct Found {
    relative_path: String,
    file_name: String,
    kind: MediaKind,
    category: ItemCategory,
}

/// Non-hidden entries of `dir` in name order. A missing directory is empty.
fn read_sorted(dir: &Path) -> io::Result<Vec<(String, bool)>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err),
    };
    let mut out = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        out.push((name, entry.file_type()?.is_dir()));
    }
    out.sort();
    Ok(out)
}

fn extension_of(name: &str) -> String {
    crate::naming::split_extension(name)
        .1
        .unwrap_or_default()
        .to_lowercase()
}

fn root_image_category(name: &str) -> ItemCategory {
    let lower = name.to_lowercase();
    if FINAL_NAME_HINTS.iter().any(|h| lower.contains(h)) {
        ItemCategory::Final
    } else {
        ItemCategory::Process
    }
}

/// Build gallery data from the organized tree under `media_root`.
pub fn build_site_data(media_root: &Path, rules: &RulesConfig) -> Result<SiteData, SiteError> {
    let layout = &rules.layout;
    let projects_root = media_root.join(&layout.projects_dir);
    if !projects_root.is_dir() {
        warn!(path = %projects_root.display(), "no projects folder, site data will be empty");
        return Ok(SiteData::default());
    }

    let sequence = Regex::new(&rules.sequence_pattern)?;
    let mut data = SiteData::default();
    for (id, is_dir) in read_sorted(&projects_root)? {
        if !is_dir {
            continue;
        }
        if rules.scan.excludes_dir(&id) {
            debug!(project = %id, "excluded project folder");
            continue;
        }
        let found = collect_project_files(&projects_root.join(&id), &id, rules, &sequence)?;
        debug!(project = %id, files = found.len(), "collected project media");
        let (project, items) = assemble_project(&id, found, rules);
        data.projects.push(project);
        data.items.extend(items);
    }
    Ok(data)
}

/// Where a file falls in the project's shooting timeline.
fn timeline_key(name: &str, rule: Option<&ProjectRule>, sequence: &Regex) -> (usize, u32, String) {
    let number = camera_sequence(sequence, name);
    let lower = name.to_lowercase();
    let position = rule.and_then(|r| {
        number
            .and_then(|n| r.numeric.iter().position(|range| range.contains(n)))
            .or_else(|| {
                r.numeric.iter().position(|range| {
                    range
                        .label
                        .as_deref()
                        .is_some_and(|label| lower.contains(&label.to_lowercase()))
                })
            })
    });
    (
        position.unwrap_or(usize::MAX),
        number.unwrap_or(u32::MAX),
        name.to_string(),
    )
}

fn collect_project_files(
    dir: &Path,
    id: &str,
    rules: &RulesConfig,
    sequence: &Regex,
) -> Result<Vec<Found>, SiteError> {
    let layout = &rules.layout;
    let scan = &rules.scan;
    let is_image = |name: &str| {
        let ext = extension_of(name);
        scan.allows_extension(&ext) && !scan.is_video_extension(&ext)
    };
    let is_video = |name: &str| {
        let ext = extension_of(name);
        scan.allows_extension(&ext) && scan.is_video_extension(&ext)
    };
    let stage_of_dir = |name: &str| {
        rules
            .stages
            .directories
            .iter()
            .find(|(_, names)| names.iter().any(|n| n.eq_ignore_ascii_case(name)))
            .map(|(stage, _)| stage.as_str())
    };

    let images_rel = format!("{}/{}/{}", layout.projects_dir, id, layout.images_dir);
    let mut process = Vec::new();
    let mut finals = Vec::new();

    for (name, is_dir) in read_sorted(&dir.join(&layout.images_dir))? {
        if is_dir {
            let stage = match stage_of_dir(&name) {
                Some(stage) if !scan.excludes_dir(&name) => stage,
                _ => {
                    debug!(project = %id, folder = %name, "not a stage folder, skipped");
                    continue;
                }
            };
            let category = if stage == "final" {
                ItemCategory::Final
            } else {
                ItemCategory::Process
            };
            let sub = dir.join(&layout.images_dir).join(&name);
            for (file, file_is_dir) in read_sorted(&sub)? {
                if file_is_dir || !is_image(&file) {
                    continue;
                }
                let target = match category {
                    ItemCategory::Final => &mut finals,
                    _ => &mut process,
                };
                target.push(Found {
                    relative_path: format!("{}/{}/{}", images_rel, name, file),
                    file_name: file,
                    kind: MediaKind::Image,
                    category,
                });
            }
        } else if is_image(&name) {
            let category = root_image_category(&name);
            let target = match category {
                ItemCategory::Final => &mut finals,
                _ => &mut process,
            };
            target.push(Found {
                relative_path: format!("{}/{}", images_rel, name),
                file_name: name,
                kind: MediaKind::Image,
                category,
            });
        }
    }

    let videos_rel = format!("{}/{}/{}", layout.projects_dir, id, layout.videos_dir);
    let mut videos = Vec::new();
    for (name, is_dir) in read_sorted(&dir.join(&layout.videos_dir))? {
        if is_dir || !is_video(&name) {
            continue;
        }
        videos.push(Found {
            relative_path: format!("{}/{}", videos_rel, name),
            file_name: name,
            kind: MediaKind::Video,
            category: ItemCategory::Timelapse,
        });
    }

    let rule = rules.project(id);
    for group in [&mut process, &mut finals] {
        group.sort_by_cached_key(|f| timeline_key(&f.file_name, rule, sequence));
    }

    let mut all = process;
    all.append(&mut finals);
    all.append(&mut videos);
    Ok(all)
}

fn assemble_project(id: &str, found: Vec<Found>, rules: &RulesConfig) -> (Project, Vec<MediaItem>) {
    let rule = rules.project(id);
    let prefix = rules.site.url_prefix.trim_end_matches('/');
    let title = rule
        .and_then(|r| r.title.clone())
        .unwrap_or_else(|| title_case(id));

    let mut images = 0;
    let mut videos = 0;
    let items: Vec<MediaItem> = found
        .into_iter()
        .enumerate()
        .map(|(idx, f)| {
            let counter = match f.kind {
                MediaKind::Image => {
                    images += 1;
                    images
                }
                MediaKind::Video => {
                    videos += 1;
                    videos
                }
            };
            let order = idx + 1;
            MediaItem {
                id: format!("{}-{}-{:03}", id, f.kind.as_str(), counter),
                kind: f.kind,
                src: format!("{}/{}", prefix, f.relative_path),
                alt: format!("{} - {}", title, f.category.describe()),
                category: f.category,
                project: id.to_string(),
                filename: f.file_name,
                order,
                featured: order <= rules.site.featured_items,
            }
        })
        .collect();

    let cover_image = items
        .iter()
        .find(|i| i.category == ItemCategory::Final)
        .or_else(|| items.iter().find(|i| i.kind == MediaKind::Image))
        .map(|i| i.src.clone())
        .unwrap_or_default();
    let cover_video = items
        .iter()
        .find(|i| i.kind == MediaKind::Video)
        .map(|i| i.src.clone());

    let project = Project {
        id: id.to_string(),
        slug: slugify(&title),
        description: rule
            .and_then(|r| r.description.clone())
            .unwrap_or_else(|| format!("{} woodcarving project", title)),
        category: rule
            .and_then(|r| r.category)
            .unwrap_or_else(|| ProjectCategory::guess(id)),
        cover_image,
        cover_video,
        media_folder: format!("{}/{}/{}", prefix, rules.layout.projects_dir, id),
        media_count: MediaCount { images, videos },
        featured: rule.is_some_and(|r| r.featured),
        difficulty: rule.and_then(|r| r.difficulty),
        materials: rule.map(|r| r.materials.clone()).unwrap_or_default(),
        tags: rule.map(|r| r.tags.clone()).unwrap_or_default(),
        title,
    };
    (project, items)
}

// ============================================================================
// Outputs
// ============================================================================

const TYPESCRIPT_HEADER: &str = "\
// Generated by carving-media from the organized media tree. Do not edit.

export interface MediaItem {
  id: string;
  type: 'image' | 'video';
  src: string;
  alt: string;
  category: 'process' | 'final' | 'timelapse';
  project: string;
  filename: string;
  order: number;
  featured: boolean;
}

export interface Project {
  id: string;
  title: string;
  slug: string;
  description: string;
  category: 'wildlife' | 'mythical' | 'religious' | 'commissioned' | 'workshop' | 'nature';
  coverImage: string;
  coverVideo?: string;
  mediaFolder: string;
  mediaCount: {
    images: number;
    videos: number;
  };
  featured: boolean;
  difficulty?: 'beginner' | 'intermediate' | 'expert';
  materials?: string[];
  tags?: string[];
}
";

const TYPESCRIPT_HELPERS: &str = "
export function getMediaItemsForProject(projectId: string): MediaItem[] {
  const project = projects.find((p) => p.id === projectId || p.slug === projectId);
  if (!project) return [];
  return mediaItems
    .filter((item) => item.project === project.id)
    .sort((a, b) => a.order - b.order);
}

export function getFeaturedProjects(): Project[] {
  return projects.filter((project) => project.featured);
}

export function getProjectBySlug(slug: string): Project | undefined {
  return projects.find((project) => project.slug === slug);
}
";

/// Render the TypeScript module consumed by the site.
pub fn render_typescript(data: &SiteData) -> Result<String, SiteError> {
    let projects = serde_json::to_string_pretty(&data.projects)?;
    let items = serde_json::to_string_pretty(&data.items)?;
    Ok(format!(
        "{TYPESCRIPT_HEADER}\nexport const projects: Project[] = {projects};\n\n\
         export const mediaItems: MediaItem[] = {items};\n{TYPESCRIPT_HELPERS}"
    ))
}

fn write_with_parents(path: &Path, content: String) -> Result<(), SiteError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

pub fn write_manifest(data: &SiteData, path: &Path) -> Result<(), SiteError> {
    write_with_parents(path, serde_json::to_string_pretty(data)? + "\n")
}

pub fn write_typescript(data: &SiteData, path: &Path) -> Result<(), SiteError> {
    write_with_parents(path, render_typescript(data)?)
}

// ============================================================================
// Validation
// ============================================================================

/// A broken site-data invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    DuplicateProjectId(String),
    DuplicateItemId(String),
    UnknownProject { item: String, project: String },
    /// `src` is not under the configured URL prefix, or climbs out of it.
    ForeignSource { item: String, src: String },
    MissingSource { item: String, path: PathBuf },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::DuplicateProjectId(id) => write!(f, "duplicate project id '{}'", id),
            Violation::DuplicateItemId(id) => write!(f, "duplicate media item id '{}'", id),
            Violation::UnknownProject { item, project } => {
                write!(f, "{}: unknown project '{}'", item, project)
            }
            Violation::ForeignSource { item, src } => {
                write!(f, "{}: src '{}' is outside the media root", item, src)
            }
            Violation::MissingSource { item, path } => {
                write!(f, "{}: file not found at {}", item, path.display())
            }
        }
    }
}

/// Check that ids are unique, every item names a known project, and every
/// `src` resolves to a file under `media_root`. A `src` that climbs out with
/// `..` is foreign even when the file it names exists.
pub fn validate(data: &SiteData, media_root: &Path, url_prefix: &str) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut project_ids = HashSet::new();
    for p in &data.projects {
        if !project_ids.insert(p.id.as_str()) {
            violations.push(Violation::DuplicateProjectId(p.id.clone()));
        }
    }

    let prefix = format!("{}/", url_prefix.trim_end_matches('/'));
    let mut item_ids = HashSet::new();
    for item in &data.items {
        if !item_ids.insert(item.id.as_str()) {
            violations.push(Violation::DuplicateItemId(item.id.clone()));
        }
        if !project_ids.contains(item.project.as_str()) {
            violations.push(Violation::UnknownProject {
                item: item.id.clone(),
                project: item.project.clone(),
            });
        }
        match item.src.strip_prefix(&prefix) {
            Some(relative) if !is_safe_relative(relative) => {
                violations.push(Violation::ForeignSource {
                    item: item.id.clone(),
                    src: item.src.clone(),
                })
            }
            Some(relative) => {
                let path = media_root.join(relative);
                if !path.is_file() {
                    violations.push(Violation::MissingSource {
                        item: item.id.clone(),
                        path,
                    });
                }
            }
            None => violations.push(Violation::ForeignSource {
                item: item.id.clone(),
                src: item.src.clone(),
            }),
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn site(paths: &[&str]) -> (TempDir, SiteData) {
        let tmp = media_tree(paths);
        let data = build_site_data(tmp.path(), &RulesConfig::default()).unwrap();
        (tmp, data)
    }

    fn item<'a>(data: &'a SiteData, filename: &str) -> &'a MediaItem {
        data.items
            .iter()
            .find(|i| i.filename == filename)
            .unwrap_or_else(|| panic!("item '{filename}' not found"))
    }

    // =========================================================================
    // Building
    // =========================================================================

    #[test]
    fn items_ordered_process_final_videos() {
        let (_tmp, data) = site(&[
            "projects/eagle/images/final/eagle_final_a.jpg",
            "projects/eagle/images/process/eagle_process_b.jpg",
            "projects/eagle/videos/eagle_timelapse.mp4",
        ]);
        let names: Vec<&str> = data.items.iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(
            names,
            vec!["eagle_process_b.jpg", "eagle_final_a.jpg", "eagle_timelapse.mp4"]
        );
        assert_eq!(data.items[2].category, ItemCategory::Timelapse);
        assert_eq!(data.items[2].order, 3);
    }

    #[test]
    fn process_items_follow_shooting_timeline() {
        let (_tmp, data) = site(&[
            "projects/eagle/images/process/eagle_process_carving_img-2300.jpg",
            "projects/eagle/images/process/eagle_process_finishing_img-3150.jpg",
            "projects/eagle/images/process/eagle_process_roughing_img-2150.jpg",
            "projects/eagle/images/process/eagle_process_roughing_img-2100.jpg",
        ]);
        let order: Vec<(usize, &str)> = data
            .items
            .iter()
            .map(|i| (i.order, i.filename.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (1, "eagle_process_roughing_img-2100.jpg"),
                (2, "eagle_process_roughing_img-2150.jpg"),
                (3, "eagle_process_carving_img-2300.jpg"),
                (4, "eagle_process_finishing_img-3150.jpg"),
            ]
        );
    }

    #[test]
    fn range_label_orders_files_without_a_camera_number() {
        let (_tmp, data) = site(&[
            "projects/eagle/images/process/eagle_detailing_feathers.jpg",
            "projects/eagle/images/process/eagle_roughing_block.jpg",
            "projects/eagle/images/process/eagle_misc.jpg",
        ]);
        let names: Vec<&str> = data.items.iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(
            names,
            vec!["eagle_roughing_block.jpg", "eagle_detailing_feathers.jpg", "eagle_misc.jpg"]
        );
    }

    #[test]
    fn only_stage_folders_are_published() {
        let (_tmp, data) = site(&[
            "projects/eagle/images/archive/old.jpg",
            "projects/eagle/images/scratch/test.jpg",
            "projects/eagle/images/wip/a.jpg",
            "projects/eagle/images/final/b.jpg",
            "projects/backup/images/final/c.jpg",
        ]);
        let srcs: Vec<&str> = data.items.iter().map(|i| i.src.as_str()).collect();
        assert_eq!(
            srcs,
            vec![
                "/media/projects/eagle/images/wip/a.jpg",
                "/media/projects/eagle/images/final/b.jpg",
            ]
        );
        assert_eq!(data.projects.len(), 1);
    }

    #[test]
    fn excluded_name_wins_over_stage_folder() {
        let mut rules = RulesConfig::default();
        rules
            .stages
            .directories
            .get_mut("final")
            .unwrap()
            .push("final-backup".into());
        let tmp = media_tree(&[
            "projects/eagle/images/final-backup/old.jpg",
            "projects/eagle/images/final/b.jpg",
        ]);
        let data = build_site_data(tmp.path(), &rules).unwrap();
        assert_eq!(data.items.len(), 1);
        assert_eq!(data.items[0].filename, "b.jpg");
    }

    #[test]
    fn ids_count_per_media_type() {
        let (_tmp, data) = site(&[
            "projects/eagle/images/process/a.jpg",
            "projects/eagle/images/final/b.jpg",
            "projects/eagle/videos/c.mp4",
        ]);
        let ids: Vec<&str> = data.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["eagle-image-001", "eagle-image-002", "eagle-video-001"]);
    }

    #[test]
    fn root_images_categorized_by_name() {
        let (_tmp, data) = site(&[
            "projects/bass/images/bass_showcase.jpg",
            "projects/bass/images/bass_blank.jpg",
        ]);
        assert_eq!(item(&data, "bass_showcase.jpg").category, ItemCategory::Final);
        assert_eq!(item(&data, "bass_blank.jpg").category, ItemCategory::Process);
    }

    #[test]
    fn src_and_alt_text() {
        let (_tmp, data) = site(&["projects/eagle/images/final/eagle_final_a.jpg"]);
        let i = item(&data, "eagle_final_a.jpg");
        assert_eq!(i.src, "/media/projects/eagle/images/final/eagle_final_a.jpg");
        assert_eq!(i.alt, "Golden Eagle - finished piece");
    }

    #[test]
    fn first_items_featured() {
        let (_tmp, data) = site(&[
            "projects/nessie/images/process/1.jpg",
            "projects/nessie/images/process/2.jpg",
            "projects/nessie/images/process/3.jpg",
            "projects/nessie/images/process/4.jpg",
        ]);
        let featured: Vec<bool> = data.items.iter().map(|i| i.featured).collect();
        assert_eq!(featured, vec![true, true, true, false]);
    }

    #[test]
    fn project_metadata_from_rules() {
        let (_tmp, data) = site(&[
            "projects/eagle/images/process/a.jpg",
            "projects/eagle/images/final/b.jpg",
            "projects/eagle/videos/c.mp4",
        ]);
        let eagle = &data.projects[0];
        assert_eq!(eagle.title, "Golden Eagle");
        assert_eq!(eagle.slug, "golden-eagle");
        assert_eq!(eagle.category, ProjectCategory::Wildlife);
        assert!(eagle.featured);
        assert_eq!(eagle.cover_image, "/media/projects/eagle/images/final/b.jpg");
        assert_eq!(eagle.cover_video.as_deref(), Some("/media/projects/eagle/videos/c.mp4"));
        assert_eq!(eagle.media_count, MediaCount { images: 2, videos: 1 });
        assert_eq!(eagle.media_folder, "/media/projects/eagle");
    }

    #[test]
    fn unknown_project_gets_guessed_metadata() {
        let (_tmp, data) = site(&["projects/trout-pond/images/x.jpg"]);
        let p = &data.projects[0];
        assert_eq!(p.title, "Trout Pond");
        assert_eq!(p.category, ProjectCategory::Nature);
        assert!(!p.featured);
        assert_eq!(p.cover_image, "/media/projects/trout-pond/images/x.jpg");
    }

    #[test]
    fn ignores_non_media_and_hidden_files() {
        let (_tmp, data) = site(&[
            "projects/eagle/images/notes.txt",
            "projects/eagle/images/.DS_Store",
            "projects/eagle/videos/still.jpg",
            "projects/eagle/images/final/a.jpg",
        ]);
        assert_eq!(data.items.len(), 1);
    }

    #[test]
    fn missing_projects_folder_is_empty() {
        let (_tmp, data) = site(&["nature/fish/trout.jpg"]);
        assert_eq!(data, SiteData::default());
    }

    #[test]
    fn camel_case_json() {
        let (_tmp, data) = site(&["projects/eagle/images/final/a.jpg"]);
        let json = serde_json::to_value(&data).unwrap();
        assert!(json["projects"][0].get("coverImage").is_some());
        assert!(json["projects"][0].get("mediaCount").is_some());
        assert_eq!(json["items"][0]["type"], "image");
    }

    // =========================================================================
    // Outputs
    // =========================================================================

    #[test]
    fn typescript_exports_arrays_and_helper() {
        let (_tmp, data) = site(&["projects/eagle/images/final/a.jpg"]);
        let ts = render_typescript(&data).unwrap();
        assert!(ts.contains("export interface MediaItem"));
        assert!(ts.contains("export const projects: Project[] = ["));
        assert!(ts.contains("export const mediaItems: MediaItem[] = ["));
        assert!(ts.contains("export function getMediaItemsForProject"));
        assert!(ts.contains("\"eagle-image-001\""));
    }

    #[test]
    fn manifest_round_trips_through_disk() {
        let (tmp, data) = site(&["projects/eagle/images/final/a.jpg"]);
        let path = tmp.path().join("out/curated-manifest.json");
        write_manifest(&data, &path).unwrap();
        assert_eq!(SiteData::load(&path).unwrap(), data);
    }

    #[test]
    fn regeneration_is_byte_identical() {
        let (tmp, data) = site(&["projects/eagle/images/final/a.jpg"]);
        let again = build_site_data(tmp.path(), &RulesConfig::default()).unwrap();
        assert_eq!(
            render_typescript(&data).unwrap(),
            render_typescript(&again).unwrap()
        );
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn generated_data_is_valid() {
        let (tmp, data) = site(&[
            "projects/eagle/images/final/a.jpg",
            "projects/bass/videos/b.mp4",
        ]);
        assert!(validate(&data, tmp.path(), "/media").is_empty());
    }

    #[test]
    fn reports_item_with_unknown_project() {
        let (tmp, mut data) = site(&["projects/eagle/images/final/a.jpg"]);
        data.items[0].project = "owl".into();
        let violations = validate(&data, tmp.path(), "/media");
        assert_eq!(
            violations,
            vec![Violation::UnknownProject {
                item: "eagle-image-001".into(),
                project: "owl".into(),
            }]
        );
    }

    #[test]
    fn reports_missing_file_and_foreign_src() {
        let (tmp, mut data) = site(&[
            "projects/eagle/images/final/a.jpg",
            "projects/eagle/images/final/b.jpg",
        ]);
        fs::remove_file(tmp.path().join("projects/eagle/images/final/a.jpg")).unwrap();
        data.items[1].src = "/portfolio/b.jpg".into();
        let violations = validate(&data, tmp.path(), "/media");
        assert_eq!(violations.len(), 2);
        assert!(matches!(violations[0], Violation::MissingSource { .. }));
        assert!(matches!(violations[1], Violation::ForeignSource { .. }));
    }

    #[test]
    fn src_climbing_out_of_media_root_is_foreign() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("media");
        write_files(&root, &["projects/eagle/images/final/a.jpg"]);
        fs::write(tmp.path().join("secret.jpg"), "outside").unwrap();

        let mut data = build_site_data(&root, &RulesConfig::default()).unwrap();
        data.items[0].src = "/media/../secret.jpg".into();
        let violations = validate(&data, &root, "/media");
        assert_eq!(
            violations,
            vec![Violation::ForeignSource {
                item: "eagle-image-001".into(),
                src: "/media/../secret.jpg".into(),
            }]
        );
    }

    #[test]
    fn reports_duplicate_ids() {
        let (tmp, mut data) = site(&["projects/eagle/images/final/a.jpg"]);
        data.items.push(data.items[0].clone());
        data.projects.push(data.projects[0].clone());
        let violations = validate(&data, tmp.path(), "/media");
        assert!(violations.contains(&Violation::DuplicateProjectId("eagle".into())));
        assert!(violations.contains(&Violation::DuplicateItemId("eagle-image-001".into())));
    }
}
