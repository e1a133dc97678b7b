//! Best-effort multi-target artifact building
//!
//! A fixed catalog of nine (platform, arch) targets is attempted on every
//! release. Each target invokes the external single-file bundler in
//! isolation and yields a tagged outcome — a built binary path or a
//! recorded failure reason. Failures never cross the component boundary as
//! errors and never abort the remaining targets; a release with zero built
//! binaries is still valid.

use crate::ui::progress::MultiProgress;
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Default external bundler command (overridable with `--bundler`)
pub const DEFAULT_BUNDLER: &str = "modpack-bundle";

/// Directory (relative to the module root) where binaries are written
pub const BIN_DIR: &str = "bin";

/// Named architectures attempted in addition to each platform's default
const ARCHES: [&str; 2] = ["x64", "arm64"];

/// Target operating system for a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Platform {
  Windows,
  Linux,
  Darwin,
}

impl Platform {
  pub fn as_str(self) -> &'static str {
    match self {
      Platform::Windows => "windows",
      Platform::Linux => "linux",
      Platform::Darwin => "darwin",
    }
  }

  fn all() -> [Platform; 3] {
    [Platform::Windows, Platform::Linux, Platform::Darwin]
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// A (platform, architecture) pair for which a binary may be built
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ArtifactTarget {
  pub platform: Platform,
  /// `None` means the platform's default architecture
  pub arch: Option<&'static str>,
}

impl ArtifactTarget {
  /// The fixed nine-entry catalog: 3 platforms × {default, x64, arm64}
  pub fn catalog() -> Vec<ArtifactTarget> {
    let mut targets = Vec::with_capacity(9);
    for platform in Platform::all() {
      targets.push(ArtifactTarget { platform, arch: None });
      for arch in ARCHES {
        targets.push(ArtifactTarget {
          platform,
          arch: Some(arch),
        });
      }
    }
    targets
  }

  /// Output file name for this target.
  ///
  /// Every catalog entry maps to a unique name so parallel builds never
  /// collide: windows binaries carry `.exe`, non-windows defaults carry a
  /// platform suffix.
  pub fn binary_name(&self, module_id: &str) -> String {
    match (self.platform, self.arch) {
      (Platform::Windows, None) => format!("{}.exe", module_id),
      (Platform::Windows, Some(arch)) => format!("{}-{}.exe", module_id, arch),
      (platform, None) => format!("{}-{}", module_id, platform),
      (platform, Some(arch)) => format!("{}-{}-{}", module_id, platform, arch),
    }
  }
}

impl fmt::Display for ArtifactTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.arch {
      Some(arch) => write!(f, "{}/{}", self.platform, arch),
      None => write!(f, "{}/default", self.platform),
    }
  }
}

/// Tagged result of one target build
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
  /// The bundler produced a binary at `path`
  Built { path: PathBuf },
  /// The bundler failed or could not be spawned
  Failed { reason: String },
}

impl BuildOutcome {
  pub fn is_built(&self) -> bool {
    matches!(self, BuildOutcome::Built { .. })
  }
}

/// Results of a full catalog run, in catalog order
#[derive(Debug)]
pub struct BuildReport {
  pub outcomes: Vec<(ArtifactTarget, BuildOutcome)>,
}

impl BuildReport {
  /// Number of targets that produced a binary
  pub fn built(&self) -> usize {
    self.outcomes.iter().filter(|(_, o)| o.is_built()).count()
  }

  /// Number of recorded failures
  pub fn failed(&self) -> usize {
    self.outcomes.len() - self.built()
  }

  /// Paths of the successfully built binaries
  pub fn built_paths(&self) -> Vec<&Path> {
    self
      .outcomes
      .iter()
      .filter_map(|(_, o)| match o {
        BuildOutcome::Built { path } => Some(path.as_path()),
        BuildOutcome::Failed { .. } => None,
      })
      .collect()
  }

  /// An empty report for runs with `--skip-executables`
  pub fn skipped() -> Self {
    Self { outcomes: Vec::new() }
  }
}

/// Orchestrates the external bundler across the target catalog
pub struct ArtifactBuilder {
  command: String,
  out_dir: PathBuf,
}

impl ArtifactBuilder {
  pub fn new(command: impl Into<String>, out_dir: impl Into<PathBuf>) -> Self {
    Self {
      command: command.into(),
      out_dir: out_dir.into(),
    }
  }

  /// Build every target, in parallel, isolating failures per target.
  ///
  /// Targets are independent: each writes a uniquely named file under the
  /// output directory and spawns its own bundler process, so rayon's pool
  /// bounds the concurrency with no shared mutable state.
  pub fn build_all(&self, module_id: &str, source: &Path, targets: &[ArtifactTarget]) -> BuildReport {
    if let Err(e) = std::fs::create_dir_all(&self.out_dir) {
      // Without an output directory every target fails the same way;
      // still report per-target so the partial-failure contract holds.
      let reason = format!("cannot create {}: {}", self.out_dir.display(), e);
      return BuildReport {
        outcomes: targets
          .iter()
          .map(|t| (t.clone(), BuildOutcome::Failed { reason: reason.clone() }))
          .collect(),
      };
    }

    let progress = MultiProgress::new();
    let bar = progress.add_bar(targets.len(), format!("building {} artifacts", module_id));

    let outcomes = targets
      .par_iter()
      .map(|target| {
        let outcome = self.build_one(module_id, source, target);
        progress.inc(&bar);
        (target.clone(), outcome)
      })
      .collect();

    BuildReport { outcomes }
  }

  /// Invoke the bundler for a single target
  fn build_one(&self, module_id: &str, source: &Path, target: &ArtifactTarget) -> BuildOutcome {
    let out_path = self.out_dir.join(target.binary_name(module_id));

    let mut cmd = Command::new(&self.command);
    cmd.arg("--platform").arg(target.platform.as_str());
    if let Some(arch) = target.arch {
      cmd.arg("--arch").arg(arch);
    }
    cmd.arg("--output").arg(&out_path).arg(source);

    match cmd.output() {
      Ok(output) if output.status.success() => BuildOutcome::Built { path: out_path },
      Ok(output) => BuildOutcome::Failed {
        reason: format!(
          "{} exited with {}: {}",
          self.command,
          output.status,
          String::from_utf8_lossy(&output.stderr).trim()
        ),
      },
      Err(e) => BuildOutcome::Failed {
        reason: format!("failed to spawn {}: {}", self.command, e),
      },
    }
  }
}
