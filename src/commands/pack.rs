//! Pack command implementation
//!
//! Validates the CLI arguments, runs the release pipeline against one module
//! directory, prints a summary, and publishes the result for an outer
//! orchestrator (CI job steps) to consume.

use crate::core::error::{PackResult, ResultExt};
use crate::core::manifest::RepoContext;
use crate::release::pipeline::{PackOptions, ReleasePipeline, ReleaseResult};
use semver::Version;
use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// File the CI runner designates for step outputs (GitHub Actions convention)
const OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// Run the pack command
#[allow(clippy::too_many_arguments)]
pub fn run_pack(
  version: String,
  dir: Option<PathBuf>,
  changelog: Option<String>,
  skip_executables: bool,
  skip_dependencies: bool,
  bundler: Option<String>,
  deps_cmd: Option<String>,
) -> PackResult<()> {
  // Reject malformed versions before the pipeline touches anything
  Version::parse(&version).with_context(|| format!("`{}` is not a valid semantic version", version))?;

  let root = match dir {
    Some(dir) => dir,
    None => env::current_dir()?,
  };

  let mut options = PackOptions::new(version);
  options.changelog = changelog;
  options.skip_executables = skip_executables;
  options.skip_dependencies = skip_dependencies;
  if let Some(bundler) = bundler {
    options.bundler = bundler;
  }
  if let Some(deps_cmd) = deps_cmd {
    options.deps_command = deps_cmd;
  }
  options.repo = RepoContext::from_env();

  println!("📦 Packing module in {}", root.display());

  let result = ReleasePipeline::new(&root, options).run()?;

  print_summary(&result);
  publish_outputs(&result)?;

  Ok(())
}

fn print_summary(result: &ReleaseResult) {
  println!();
  println!("✅ Packed {} v{} (code {})", result.module_id, result.version, result.version_code);
  println!("   Archive: {} ({} KB)", result.archive_path.display(), result.size_kb);
  println!("   SHA-256: {}", result.sha256);
  if result.targets_failed > 0 {
    println!(
      "⚠️  Artifacts: {} built, {} failed",
      result.targets_built, result.targets_failed
    );
  } else if result.targets_built > 0 {
    println!("   Artifacts: {} built", result.targets_built);
  }
}

/// Publish the result as `key=value` step outputs.
///
/// Appends to the file named by `GITHUB_OUTPUT` when the runner provides
/// one; otherwise prints the same lines to stdout so a local run shows what
/// CI would receive. The pipeline itself never mutates the environment.
fn publish_outputs(result: &ReleaseResult) -> PackResult<()> {
  let lines = output_lines(result);

  match env::var(OUTPUT_ENV) {
    Ok(path) if !path.is_empty() => {
      let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open step-output file {}", path))?;
      for line in &lines {
        writeln!(file, "{}", line)?;
      }
    }
    _ => {
      println!();
      for line in &lines {
        println!("{}", line);
      }
    }
  }

  Ok(())
}

fn output_lines(result: &ReleaseResult) -> Vec<String> {
  // Changelog bodies span lines; step outputs are line-oriented
  let changelog = result.changelog.replace('\n', " ").trim().to_string();

  vec![
    format!("module_id={}", result.module_id),
    format!("version={}", result.version),
    format!("version_code={}", result.version_code),
    format!("changelog={}", changelog),
    format!("sha256={}", result.sha256),
    format!("size_kb={}", result.size_kb),
    format!("zip_url={}", result.zip_url),
  ]
}
