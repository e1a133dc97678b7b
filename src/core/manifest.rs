//! Update manifest (`update.json`) — the wire contract for auto-update clients
//!
//! The field set and names are the compatibility contract: clients compare
//! `versionCode` to decide whether to fetch `zipUrl` and verify the download
//! against `sha256` before applying it. The manifest is regenerated whole on
//! every release, never merged with prior state.

use crate::core::error::{PackResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Well-known manifest file name inside a module directory
pub const MANIFEST_FILE: &str = "update.json";

/// Environment variable carrying the `owner/repo` slug (CI convention)
pub const REPO_ENV: &str = "GITHUB_REPOSITORY";

const PLACEHOLDER_OWNER: &str = "OWNER";
const PLACEHOLDER_REPO: &str = "REPO";

/// Owner/repo pair used to build canonical release URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoContext {
  pub owner: String,
  pub repo: String,
}

impl RepoContext {
  pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
    Self {
      owner: owner.into(),
      repo: repo.into(),
    }
  }

  /// Read the repository slug from the environment.
  ///
  /// Falls back to placeholder owner/repo strings when the variable is
  /// absent or not `owner/repo`-shaped, so a local run still produces a
  /// structurally complete manifest.
  pub fn from_env() -> Self {
    match env::var(REPO_ENV) {
      Ok(slug) => Self::from_slug(&slug).unwrap_or_else(Self::placeholder),
      Err(_) => Self::placeholder(),
    }
  }

  /// Parse an `owner/repo` slug
  pub fn from_slug(slug: &str) -> Option<Self> {
    let (owner, repo) = slug.split_once('/')?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
      return None;
    }
    Some(Self::new(owner, repo))
  }

  fn placeholder() -> Self {
    Self::new(PLACEHOLDER_OWNER, PLACEHOLDER_REPO)
  }

  /// Canonical download URL for a released module archive
  pub fn zip_url(&self, version: &str, module_id: &str) -> String {
    format!(
      "https://github.com/{}/{}/releases/download/v{}/{}.zip",
      self.owner, self.repo, version, module_id
    )
  }

  /// Raw URL where the auto-update client polls for `update.json`
  pub fn update_json_url(&self, module_id: &str) -> String {
    format!(
      "https://raw.githubusercontent.com/{}/{}/main/{}/{}",
      self.owner, self.repo, module_id, MANIFEST_FILE
    )
  }

  /// Raw changelog URL pinned to the release tag
  pub fn changelog_url(&self, version: &str) -> String {
    format!(
      "https://raw.githubusercontent.com/{}/{}/v{}/CHANGELOG.md",
      self.owner, self.repo, version
    )
  }
}

/// The update manifest consumed by the auto-update client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateManifest {
  pub version: String,
  pub version_code: u64,
  pub zip_url: String,
  pub changelog: String,
  pub sha256: String,
  /// Archive size in KB, rounded to 2 decimals
  pub size: f64,
}

impl UpdateManifest {
  /// Build a manifest for a finished release
  pub fn new(
    module_id: &str,
    version: &str,
    version_code: u64,
    sha256: &str,
    size_kb: f64,
    repo: &RepoContext,
  ) -> Self {
    Self {
      version: version.to_string(),
      version_code,
      zip_url: repo.zip_url(version, module_id),
      changelog: repo.changelog_url(version),
      sha256: sha256.to_string(),
      size: size_kb,
    }
  }

  /// Overwrite `<module_dir>/update.json` in full
  pub fn write(&self, module_dir: &Path) -> PackResult<()> {
    let path = module_dir.join(MANIFEST_FILE);
    let mut content = serde_json::to_string_pretty(self)?;
    content.push('\n');
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
  }
}

/// Archive size in KB, rounded to 2 decimals
pub fn size_in_kb(bytes: u64) -> f64 {
  (bytes as f64 / 1024.0 * 100.0).round() / 100.0
}
