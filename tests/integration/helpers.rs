//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A scratch module directory with a metadata document
pub struct TestModule {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestModule {
  /// Create a module directory with `module.toml` and some sources
  pub fn new(id: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    std::fs::write(
      path.join("module.toml"),
      format!(
        r#"id = "{}"
name = "Test Module"
description = "A module under test"
author = "tester"
version = "0.1.0"
"#,
        id
      ),
    )?;

    std::fs::create_dir_all(path.join("src"))?;
    std::fs::write(path.join("src/main.py"), "print('hello')\n")?;

    Ok(Self { _root: root, path })
  }

  /// An empty directory with no metadata at all
  pub fn empty() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    Ok(Self { _root: root, path })
  }

  pub fn write_file(&self, rel: &str, content: &str) -> Result<()> {
    let path = self.path.join(rel);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
  }

  pub fn file_exists(&self, rel: &str) -> bool {
    self.path.join(rel).exists()
  }

  pub fn read_file(&self, rel: &str) -> Result<String> {
    std::fs::read_to_string(self.path.join(rel)).with_context(|| format!("Failed to read {}", rel))
  }

  /// Install a fake bundler script that touches its `--output` path,
  /// failing when asked for the given architecture.
  #[cfg(unix)]
  pub fn install_fake_bundler(&self, fail_arch: Option<&str>) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let fail = fail_arch.unwrap_or("never-matches");
    let script = self.path.join("fake-bundle");
    std::fs::write(
      &script,
      format!(
        "#!/bin/sh\nout=\"\"\nwhile [ $# -gt 0 ]; do\n  case \"$1\" in\n    --arch) [ \"$2\" = {} ] && exit 1; shift ;;\n    --output) out=\"$2\"; shift ;;\n  esac\n  shift\ndone\n: > \"$out\"\n",
        fail
      ),
    )?;
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))?;
    Ok(script)
  }
}

/// Run the modpack CLI, requiring success
pub fn run_modpack(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = modpack_output(cwd, args, &[])?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "modpack command failed: modpack {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run the modpack CLI and return the raw output, success or not
pub fn modpack_output(cwd: &Path, args: &[&str], env: &[(&str, &str)]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_modpack");

  let mut cmd = Command::new(bin);
  cmd.current_dir(cwd).args(args);
  // Keep the host's CI variables from leaking into assertions
  cmd.env_remove("GITHUB_REPOSITORY").env_remove("GITHUB_OUTPUT");
  for (key, value) in env {
    cmd.env(key, value);
  }

  cmd.output().context("Failed to run modpack")
}
