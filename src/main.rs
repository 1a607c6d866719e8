use carving_media::{classify, config, mover, output, plan, report, scan, site};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const INVENTORY_FILENAME: &str = "inventory.json";

/// Safety flags for commands that move files. Exactly one is required.
#[derive(clap::Args, Clone)]
struct SafetyArgs {
    /// Show what would move without touching any file
    #[arg(long)]
    dry_run: bool,

    /// Move files for real
    #[arg(long)]
    force: bool,
}

impl SafetyArgs {
    fn mode(&self) -> Option<mover::Mode> {
        match (self.dry_run, self.force) {
            (true, false) => Some(mover::Mode::DryRun),
            (false, true) => Some(mover::Mode::Live),
            _ => None,
        }
    }
}

fn version_string() -> &'static str {
    let on_tag = env!("CARVING_MEDIA_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("CARVING_MEDIA_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "carving-media")]
#[command(about = "Classify and reorganize a woodcarving portfolio's media library")]
#[command(long_about = "\
Classify and reorganize a woodcarving portfolio's media library

Files are matched to projects by folder name, camera number (IMG_3205) and
file name keywords, then moved into the canonical layout:

  public/media/
  ├── media-rules.toml                 # Optional rules (see gen-config)
  ├── projects/
  │   └── eagle/
  │       ├── images/
  │       │   ├── process/             # eagle_process_roughing_img-2100.jpg
  │       │   └── final/               # eagle_final_img-3205.jpg
  │       └── videos/                  # eagle_process_img-3301.mov
  ├── nature/                          # Protected: moved only on strong evidence
  └── workshop/                        # Protected

Typical run:

  carving-media classify               # write reports, change nothing
  carving-media plan                   # compute the move plan
  carving-media apply --dry-run        # preview
  carving-media apply --force          # move, journaled
  carving-media rollback --force       # undo the last batch
  carving-media site                   # regenerate gallery data

Set RUST_LOG=carving_media=debug for detailed logs.")]
#[command(version = version_string())]
struct Cli {
    /// Media root directory
    #[arg(long, default_value = "public/media", global = true)]
    source: PathBuf,

    /// Directory for reports and site data
    #[arg(long, default_value = ".", global = true)]
    output: PathBuf,

    /// Directory for the move plan and journal
    #[arg(long, default_value = ".carving-media", global = true)]
    state_dir: PathBuf,

    /// Rules file (default: <source>/media-rules.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inventory media files under the source directory
    Scan,
    /// Classify every file and write JSON and Markdown reports
    Classify,
    /// Compute the move plan for misplaced files
    Plan,
    /// Apply the move plan
    Apply(SafetyArgs),
    /// Undo the most recently applied batch
    ///
    /// Only the latest journal (move-journal.json) is replayed. Journals of
    /// earlier batches are kept as move-journal.<fingerprint>.json; rename one
    /// back to move-journal.json to undo that batch.
    Rollback(SafetyArgs),
    /// Regenerate the curated manifest and TypeScript gallery data
    Site,
    /// Validate site data: project references, file paths, unique ids
    Check {
        /// Manifest to validate (default: the configured manifest path)
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
    /// Summarize a saved classification results file
    Report {
        /// Results file (default: <output>/classification-results.json)
        #[arg(long)]
        results: Option<PathBuf>,
    },
    /// Print a stock media-rules.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carving_media=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let rules = config::load_rules(&cli.source, cli.config.as_deref())?;

    match &cli.command {
        Command::Scan => {
            let files = scan::scan(&cli.source, &rules.scan)?;
            let inventory = scan::Inventory::new(&cli.source, files);
            let path = cli.output.join(INVENTORY_FILENAME);
            if let Err(err) = report::save_json(&path, &inventory) {
                error!(path = %path.display(), error = %err, "failed to write inventory");
            }
            output::print_scan_output(&inventory);
        }
        Command::Classify => {
            let results = classify_source(&cli.source, &rules)?;
            let summary = report::Report::build(&results, &rules);
            report::write_reports(&cli.output, &results, &summary);
            output::print_classify_output(&results);
        }
        Command::Plan => {
            let results = classify_source(&cli.source, &rules)?;
            let manifest = plan::MoveManifest::from_results(&results);
            let path = cli.state_dir.join(plan::PLAN_FILENAME);
            manifest.save(&path)?;
            info!(path = %path.display(), moves = manifest.len(), "wrote move plan");
            output::print_plan_output(&manifest.diff(&cli.source));
        }
        Command::Apply(safety) => {
            let mode = require_mode(safety, "apply");
            let path = cli.state_dir.join(plan::PLAN_FILENAME);
            let manifest = match plan::MoveManifest::load(&path) {
                Ok(m) => m,
                Err(err) => fatal(&format!(
                    "cannot read move plan {} ({err}); run 'carving-media plan' first",
                    path.display()
                )),
            };
            let outcome = mover::apply(&manifest, &cli.source, mode)?;
            if let Some(journal) = &outcome.journal
                && !journal.moves.is_empty()
            {
                let journal_path = cli.state_dir.join(mover::JOURNAL_FILENAME);
                if let Some(archived) = mover::archive_journal(&journal_path)? {
                    info!(path = %archived.display(), "kept previous journal");
                }
                journal.save(&journal_path)?;
                info!(path = %journal_path.display(), "wrote move journal");
            }
            output::print_apply_output(&outcome);
        }
        Command::Rollback(safety) => {
            let mode = require_mode(safety, "rollback");
            let path = cli.state_dir.join(mover::JOURNAL_FILENAME);
            let journal = match mover::MoveJournal::load(&path) {
                Ok(j) => j,
                Err(err) => fatal(&format!(
                    "cannot read move journal {} ({err}); nothing to roll back",
                    path.display()
                )),
            };
            let outcome = mover::rollback(&journal, &cli.source, mode)?;
            if mode == mover::Mode::Live {
                match mover::retire_journal(&path, &outcome)? {
                    Some(retired) => info!(path = %retired.display(), "journal retired"),
                    None => warn!(
                        path = %path.display(),
                        skipped = outcome.skipped.len(),
                        "rollback incomplete, journal kept for a retry"
                    ),
                }
            }
            output::print_apply_output(&outcome);
        }
        Command::Site => {
            let data = site::build_site_data(&cli.source, &rules)?;
            let manifest_path = cli.output.join(&rules.site.manifest_path);
            let typescript_path = cli.output.join(&rules.site.typescript_path);
            site::write_manifest(&data, &manifest_path)?;
            site::write_typescript(&data, &typescript_path)?;
            output::print_site_output(&data, &manifest_path, &typescript_path);
        }
        Command::Check { manifest } => {
            let path = manifest
                .clone()
                .unwrap_or_else(|| cli.output.join(&rules.site.manifest_path));
            let data = if path.is_file() {
                info!(path = %path.display(), "validating manifest");
                site::SiteData::load(&path)?
            } else {
                info!("no manifest on disk, validating data built from the media root");
                site::build_site_data(&cli.source, &rules)?
            };
            let violations = site::validate(&data, &cli.source, &rules.site.url_prefix);
            output::print_check_output(&data, &violations);
            if !violations.is_empty() {
                std::process::exit(1);
            }
        }
        Command::Report { results } => {
            let path = results
                .clone()
                .unwrap_or_else(|| cli.output.join(report::RESULTS_FILENAME));
            if !path.is_file() {
                warn!(path = %path.display(), "no results file to summarize; run 'carving-media classify' first");
                return Ok(());
            }
            let results = report::load_results(&path)?;
            let summary = report::Report::build(&results, &rules);
            summarize(&cli.output, &summary);
        }
        // Printed before rules are loaded.
        Command::GenConfig => {}
    }

    Ok(())
}

fn classify_source(
    source: &Path,
    rules: &config::RulesConfig,
) -> Result<Vec<classify::ClassificationResult>, Box<dyn std::error::Error>> {
    let classifier = classify::Classifier::new(rules)?;
    let scanner = scan::Scanner::new(source, &rules.scan)?;
    let results: Vec<_> = scanner.files().map(|f| classifier.classify(&f)).collect();
    info!(root = %scanner.root().display(), files = results.len(), "classified");
    Ok(results)
}

/// Write the Markdown summary next to the results and print the counts.
fn summarize(output_dir: &Path, summary: &report::Report) {
    let path = output_dir.join(report::REPORT_MARKDOWN_FILENAME);
    match std::fs::write(&path, report::render_markdown(summary)) {
        Ok(()) => info!(path = %path.display(), "wrote summary"),
        Err(err) => error!(path = %path.display(), error = %err, "failed to write summary"),
    }
    output::print_report_summary(summary);
}

fn require_mode(safety: &SafetyArgs, command: &str) -> mover::Mode {
    match safety.mode() {
        Some(mode) => mode,
        None => fatal(&format!(
            "'{command}' moves files: pass exactly one of --dry-run or --force"
        )),
    }
}

fn fatal(message: &str) -> ! {
    error!("{message}");
    std::process::exit(1);
}
