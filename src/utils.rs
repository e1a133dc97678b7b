//! Utility functions for archive paths and external commands

use crate::core::error::{PackError, PackResult, ResultExt};
use std::path::Path;
use std::process::Output;

/// Convert a relative path to an archive entry name (always forward slashes)
///
/// Zip entry names use forward slashes regardless of the host platform, so
/// directory-sourced entries extract consistently everywhere.
pub fn path_to_entry_name(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}

/// Run a whitespace-split command line in a working directory.
///
/// Errors when the command cannot be spawned or exits non-zero; stderr is
/// folded into the error message so callers can log it.
pub fn run_command(command_line: &str, cwd: &Path) -> PackResult<Output> {
  let mut parts = command_line.split_whitespace();
  let program = parts
    .next()
    .ok_or_else(|| PackError::message("Empty command line"))?;

  let output = std::process::Command::new(program)
    .args(parts)
    .current_dir(cwd)
    .output()
    .with_context(|| format!("Failed to run `{}`", command_line))?;

  if !output.status.success() {
    return Err(PackError::message(format!(
      "`{}` failed: {}",
      command_line,
      String::from_utf8_lossy(&output.stderr).trim()
    )));
  }

  Ok(output)
}
