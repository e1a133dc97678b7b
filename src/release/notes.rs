//! Human-readable release notes
//!
//! Regenerated whole on every run from the pipeline's result; never merged
//! with a previous file.

use crate::release::pipeline::ReleaseResult;
use chrono::{DateTime, Utc};

/// Well-known release-notes file name inside a module directory
pub const NOTES_FILE: &str = "release_notes.md";

/// Render the release notes document
pub fn render(result: &ReleaseResult, built_at: DateTime<Utc>) -> String {
  let mut out = String::new();

  out.push_str(&format!("# {} v{}\n\n", result.module_id, result.version));
  out.push_str(&format!("Version code: `{}`\n\n", result.version_code));
  out.push_str("## Changes\n\n");
  out.push_str(result.changelog.trim());
  out.push_str("\n\n## Download\n\n");
  out.push_str(&format!("- [{}.zip]({})\n", result.module_id, result.zip_url));
  out.push_str(&format!("- Size: {} KB\n", result.size_kb));
  out.push_str(&format!("- SHA-256: `{}`\n", result.sha256));
  out.push_str(&format!("\nBuilt {}\n", built_at.format("%Y-%m-%d %H:%M:%S UTC")));

  out
}
