//! The release pipeline: metadata → version → artifacts → archive → manifest
//!
//! Stages run strictly in sequence; data flows downward and no component
//! depends on the pipeline. Only the metadata gate is fatal — it aborts
//! before any file is touched. Every later stage degrades: failed artifact
//! targets are recorded, a failed dependency refresh or metadata write-back
//! is logged and skipped, and a finished run always leaves an archive and a
//! manifest behind.

use crate::core::changelog;
use crate::core::error::{PackResult, ResultExt};
use crate::core::manifest::{self, RepoContext, UpdateManifest};
use crate::core::metadata::{self, ModuleMetadata};
use crate::core::version;
use crate::release::archive;
use crate::release::builder::{ArtifactBuilder, ArtifactTarget, BuildReport, BIN_DIR, DEFAULT_BUNDLER};
use crate::release::notes;
use crate::utils::run_command;
use chrono::Utc;
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default dependency-refresh command (overridable with `--deps-cmd`)
pub const DEFAULT_DEPS_CMD: &str = "modpack-deps sync";

/// Well-known files included in the archive when present
const FIXED_FILES: [&str; 5] = ["module.toml", "config.toml", "README.md", "LICENSE", "CHANGELOG.md"];

/// Glob patterns swept into the archive
const PATTERNS: [&str; 1] = ["src/**/*"];

/// Directory subtrees included whole (binaries, CLI assets)
const DIRECTORIES: [&str; 2] = [BIN_DIR, "cli"];

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
  Init,
  MetadataLoaded,
  VersionComputed,
  DependenciesRefreshed,
  ArtifactsBuilt,
  Archived,
  Hashed,
  ManifestWritten,
  ChangelogUpdated,
  Done,
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Stage::Init => "init",
      Stage::MetadataLoaded => "metadata loaded",
      Stage::VersionComputed => "version computed",
      Stage::DependenciesRefreshed => "dependencies refreshed",
      Stage::ArtifactsBuilt => "artifacts built",
      Stage::Archived => "archived",
      Stage::Hashed => "hashed",
      Stage::ManifestWritten => "manifest written",
      Stage::ChangelogUpdated => "changelog updated",
      Stage::Done => "done",
    };
    write!(f, "{}", name)
  }
}

/// Options for one packaging run
#[derive(Debug, Clone)]
pub struct PackOptions {
  /// Semantic version of the release (already validated by the CLI)
  pub version: String,
  /// Changelog body override; falls back to document extraction
  pub changelog: Option<String>,
  pub skip_executables: bool,
  pub skip_dependencies: bool,
  /// External single-file bundler command
  pub bundler: String,
  /// External dependency-refresh command line
  pub deps_command: String,
  /// Owner/repo for canonical URLs
  pub repo: RepoContext,
}

impl PackOptions {
  pub fn new(version: impl Into<String>) -> Self {
    Self {
      version: version.into(),
      changelog: None,
      skip_executables: false,
      skip_dependencies: false,
      bundler: DEFAULT_BUNDLER.to_string(),
      deps_command: DEFAULT_DEPS_CMD.to_string(),
      repo: RepoContext::from_env(),
    }
  }
}

/// Everything a completed run produced.
///
/// This value object is the pipeline's only output channel; the CLI layer
/// translates it into whatever a calling orchestrator expects.
#[derive(Debug, Clone)]
pub struct ReleaseResult {
  pub module_id: String,
  pub version: String,
  pub version_code: u64,
  /// Resolved changelog body for this release
  pub changelog: String,
  pub sha256: String,
  pub size_kb: f64,
  pub zip_url: String,
  pub archive_path: PathBuf,
  pub targets_built: usize,
  pub targets_failed: usize,
}

/// Sequential release pipeline over one module directory
pub struct ReleasePipeline {
  root: PathBuf,
  options: PackOptions,
}

impl ReleasePipeline {
  pub fn new(root: impl Into<PathBuf>, options: PackOptions) -> Self {
    Self {
      root: root.into(),
      options,
    }
  }

  /// Run the pipeline to completion.
  ///
  /// Fatal only when the metadata document is unreadable or lacks an id;
  /// every other failure degrades per its component contract.
  pub fn run(&self) -> PackResult<ReleaseResult> {
    self.log(Stage::Init, &self.root.display().to_string());

    // MetadataLoaded: the single fatal gate, before any mutation
    let meta = ModuleMetadata::load(&self.root)?;
    self.log(Stage::MetadataLoaded, &meta.id);

    // VersionComputed
    let today = Utc::now().date_naive();
    let version_code = version::compute(today, meta.version_code)
      .with_context(|| format!("Cannot derive a version code for {}", meta.id))?;
    self.log(Stage::VersionComputed, &format!("{} -> {}", self.options.version, version_code));

    // DependenciesRefreshed (optional, degraded)
    if self.options.skip_dependencies {
      println!("   Skipped dependency refresh");
    } else {
      match run_command(&self.options.deps_command, &self.root) {
        Ok(_) => self.log(Stage::DependenciesRefreshed, &self.options.deps_command),
        Err(e) => eprintln!("⚠️  Dependency refresh degraded: {}", e),
      }
    }

    // ArtifactsBuilt (optional, best-effort)
    let report = if self.options.skip_executables {
      println!("   Skipped executable builds");
      BuildReport::skipped()
    } else {
      let builder = ArtifactBuilder::new(&self.options.bundler, self.root.join(BIN_DIR));
      let report = builder.build_all(&meta.id, &self.root, &ArtifactTarget::catalog());
      self.log(
        Stage::ArtifactsBuilt,
        &format!("{}/{} targets", report.built(), report.outcomes.len()),
      );
      for path in report.built_paths() {
        println!("   Built {}", path.display());
      }
      for (target, outcome) in &report.outcomes {
        if let crate::release::builder::BuildOutcome::Failed { reason } = outcome {
          eprintln!("⚠️  Target {} failed: {}", target, reason);
        }
      }
      report
    };

    // Archived + Hashed
    let archive_path = self.root.join(format!("{}.zip", meta.id));
    let summary = archive::assemble(&self.root, &archive_path, &FIXED_FILES, &PATTERNS, &DIRECTORIES)?;
    self.log(Stage::Archived, &archive_path.display().to_string());
    self.log(Stage::Hashed, &summary.sha256);

    let size_kb = manifest::size_in_kb(summary.bytes);

    // ManifestWritten: fully regenerated, never merged
    let update = UpdateManifest::new(
      &meta.id,
      &self.options.version,
      version_code,
      &summary.sha256,
      size_kb,
      &self.options.repo,
    );
    update.write(&self.root)?;
    self.log(Stage::ManifestWritten, manifest::MANIFEST_FILE);

    // ChangelogUpdated (degraded on failure)
    let changelog_text = self.update_changelog(&meta);

    // Metadata write-back is degraded too: the archive and manifest above
    // are already on disk and stay valid without it.
    if let Err(e) = metadata::update_version_fields(&self.root, &self.options.version, version_code) {
      eprintln!("⚠️  Metadata update degraded: {}", e);
    }

    let result = ReleaseResult {
      module_id: meta.id,
      version: self.options.version.clone(),
      version_code,
      changelog: changelog_text,
      sha256: summary.sha256,
      size_kb,
      zip_url: update.zip_url.clone(),
      archive_path,
      targets_built: report.built(),
      targets_failed: report.failed(),
    };

    // Release notes are derived output; failing to write them never undoes
    // the release.
    let notes_path = self.root.join(notes::NOTES_FILE);
    if let Err(e) = fs::write(&notes_path, notes::render(&result, Utc::now())) {
      eprintln!("⚠️  Release notes degraded: {}", e);
    }

    self.log(Stage::Done, &result.module_id);
    Ok(result)
  }

  /// Resolve the changelog body and prepend the release entry.
  ///
  /// Resolution order: explicit override, then the document's latest entry,
  /// then a generated default. The prepend is skipped when the latest entry
  /// already names this version, so re-running a release is idempotent.
  fn update_changelog(&self, meta: &ModuleMetadata) -> String {
    let path = self.root.join("CHANGELOG.md");
    let today = Utc::now().date_naive();
    let document = fs::read_to_string(&path).unwrap_or_default();

    let body = self
      .options
      .changelog
      .clone()
      .or_else(|| changelog::extract_latest(&document))
      .unwrap_or_else(|| format!("Release {} for {}.", self.options.version, meta.id));

    let already_current = changelog::latest_version(&document).as_deref() == Some(self.options.version.as_str());

    let updated = if already_current {
      document
    } else if document.trim().is_empty() {
      changelog::bootstrap(&self.options.version, today, &body)
    } else {
      changelog::prepend_entry(&document, &self.options.version, today, &body)
    };

    match fs::write(&path, &updated) {
      Ok(()) => self.log(Stage::ChangelogUpdated, "CHANGELOG.md"),
      Err(e) => eprintln!("⚠️  Changelog update degraded: {}", e),
    }

    body
  }

  fn log(&self, stage: Stage, detail: &str) {
    println!("   [{}] {}", stage, detail);
  }
}
