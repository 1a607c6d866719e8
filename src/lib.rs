//! # Carving Media
//!
//! Keeps the media library of a woodcarving portfolio site in order. Photos
//! and videos arrive in ad-hoc folders straight off a camera (`eagle/`,
//! `Loch Ness/IMG_1555.jpg`, `workshop/`); this crate works out which
//! project and stage each file belongs to, moves it into the canonical
//! layout, and regenerates the gallery data the site is built from.
//!
//! # Architecture: Pipeline Over Data Files
//!
//! Every step reads the tree or the previous step's JSON file and writes its
//! own, so any intermediate state can be inspected before anything moves:
//!
//! ```text
//! 1. Scan       public/media/  →  inventory.json
//! 2. Classify   public/media/  →  classification-results.json + report
//! 3. Plan       results        →  move-plan.json     (nothing moved yet)
//! 4. Apply      move-plan      →  files moved, move-journal.json
//!    Rollback   move-journal   →  files moved back
//! 5. Site       public/media/  →  curated-manifest.json + media-organized.ts
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the media root, yields [`types::MediaFile`] snapshots |
//! | [`classify`] | Rule-driven project/stage/wood detection with confidence scores |
//! | [`report`] | Aggregate counts, histograms and issue lists; JSON + Markdown |
//! | [`plan`] | Move manifests: build from results, diff against the tree, invert |
//! | [`mover`] | Applies a manifest as one batch; journal and rollback |
//! | [`site`] | Project/MediaItem gallery data, TypeScript output, validation |
//! | [`config`] | `media-rules.toml` loading, merging over stock rules, validation |
//! | [`naming`] | Canonical file names, slugs and camera sequence numbers |
//! | [`types`] | Shared types (`MediaFile`, categories) |
//! | [`output`] | CLI output formatting for every command |
//!
//! # Design Decisions
//!
//! ## Rules Are Data
//!
//! Project aliases, camera-number ranges, keyword lists and scoring weights
//! all live in [`config::RulesConfig`]. The classifier holds no constants of
//! its own, so a new project or a retuned weight is a config change and the
//! scoring policy doubles as a test fixture.
//!
//! ## Manifest Before Mutation
//!
//! Files are never renamed as a side effect of classification. A
//! [`plan::MoveManifest`] is computed first, diffed against the tree, and
//! applied as a single batch that either completes or is undone. Every live
//! batch leaves a journal with content hashes so it can be replayed
//! backwards later.
//!
//! ## Deterministic Output
//!
//! Walks are sorted, maps are ordered and reports carry no timestamps. A dry
//! run and a live run plan exactly the same moves, and regenerating site
//! data from an unchanged tree produces byte-identical files.

pub mod classify;
pub mod config;
pub mod mover;
pub mod naming;
pub mod output;
pub mod plan;
pub mod report;
pub mod scan;
pub mod site;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
