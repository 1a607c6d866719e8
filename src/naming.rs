//! Filename conventions shared by the classifier and the site generator.
//!
//! Organized files follow `<project>_<stage>[_<label>]_<slug>.<ext>`:
//!
//! - `IMG_3205.JPG` in the eagle project, final stage → `eagle_final_img-3205.jpg`
//! - `IMG_2100.jpg`, eagle, process, label `roughing` → `eagle_process_roughing_img-2100.jpg`
//!
//! A name that already starts with `<project>_` is considered organized and is
//! never renamed again, so classification of an organized tree is stable.

use regex::Regex;

/// Lowercase a string and collapse every run of non-alphanumerics to `-`.
///
/// - `"IMG_3205"` → `"img-3205"`
/// - `"St Collen statue"` → `"st-collen-statue"`
/// - `"--Final--"` → `"final"`
pub fn slugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_dash = false;
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Title-case an identifier: separators become spaces, words are capitalized.
///
/// `"golden-eagle"` → `"Golden Eagle"`, `"st_collen"` → `"St Collen"`.
pub fn title_case(s: &str) -> String {
    s.split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract the camera sequence number using the first capture group of `re`.
pub fn camera_sequence(re: &Regex, file_name: &str) -> Option<u32> {
    re.captures(file_name)?.get(1)?.as_str().parse().ok()
}

/// Build the canonical file name for an organized file.
///
/// Returns `original` unchanged when its stem already carries the project
/// prefix. Extensions are lowercased.
pub fn canonical_file_name(
    original: &str,
    project: &str,
    stage: &str,
    label: Option<&str>,
) -> String {
    let (stem, ext) = split_extension(original);
    if stem
        .to_lowercase()
        .starts_with(&format!("{}_", project.to_lowercase()))
    {
        return original.to_string();
    }

    let mut name = format!("{}_{}", project, stage);
    if let Some(label) = label.filter(|l| !l.is_empty()) {
        name.push('_');
        name.push_str(label);
    }
    let slug = slugify(stem);
    if !slug.is_empty() {
        name.push('_');
        name.push_str(&slug);
    }
    match ext {
        Some(ext) => format!("{}.{}", name, ext.to_lowercase()),
        None => name,
    }
}

/// Split `name.ext` into `("name", Some("ext"))`. Dotfiles have no extension.
pub fn split_extension(file_name: &str) -> (&str, Option<&str>) {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 => (&file_name[..pos], Some(&file_name[pos + 1..])),
        _ => (file_name, None),
    }
}
