//! Module metadata (`module.toml`) parsing and surgical updates
//!
//! The metadata document is the single source of truth for a module's
//! identity. Loading goes through serde for the typed view; the version
//! fields are written back with `toml_edit::DocumentMut` so hand-edited
//! formatting and comments survive a release.

use crate::core::error::{MetadataError, PackError, PackResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Well-known metadata file name inside a module directory
pub const METADATA_FILE: &str = "module.toml";

/// Typed view of a module's metadata document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleMetadata {
  /// Stable module identifier; immutable once published
  pub id: String,

  /// Human-readable display name
  #[serde(default)]
  pub name: String,

  #[serde(default)]
  pub description: String,

  #[serde(default)]
  pub author: String,

  /// Semantic version of the last (or pending) release
  #[serde(default)]
  pub version: String,

  /// Monotonic `YYMMDDNN` code of the last release
  #[serde(default)]
  pub version_code: Option<u64>,

  #[serde(default)]
  pub license: String,

  /// URL where the auto-update client polls for `update.json`
  #[serde(default)]
  pub update_json: String,

  /// Ordered member list for multi-module bundles
  #[serde(default)]
  pub modules: Vec<String>,

  #[serde(default)]
  pub start_mode: String,

  /// `module` (single) or `modules` (bundle)
  #[serde(rename = "type", default)]
  pub module_type: ModuleType,
}

/// Whether the directory holds a single module or a bundle of modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
  #[default]
  Module,
  Modules,
}

impl ModuleType {
  pub fn as_str(self) -> &'static str {
    match self {
      ModuleType::Module => "module",
      ModuleType::Modules => "modules",
    }
  }
}

impl ModuleMetadata {
  /// Load metadata from `<module_dir>/module.toml`.
  ///
  /// This is the fatal gate of a packaging run: a missing or unparseable
  /// document, or one without an `id`, aborts before any mutation.
  pub fn load(module_dir: &Path) -> PackResult<Self> {
    let path = module_dir.join(METADATA_FILE);

    if !path.exists() {
      return Err(PackError::Metadata(MetadataError::NotFound { path }));
    }

    let content = fs::read_to_string(&path).map_err(|e| {
      PackError::Metadata(MetadataError::Malformed {
        path: path.clone(),
        reason: e.to_string(),
      })
    })?;

    let meta: ModuleMetadata = toml_edit::de::from_str(&content).map_err(|e| {
      PackError::Metadata(MetadataError::Malformed {
        path: path.clone(),
        reason: e.to_string(),
      })
    })?;

    if meta.id.trim().is_empty() {
      return Err(PackError::Metadata(MetadataError::MissingId { path }));
    }

    Ok(meta)
  }

  /// Serialize and write a fresh metadata document (used by `init`)
  pub fn write(&self, module_dir: &Path) -> PackResult<PathBuf> {
    let path = module_dir.join(METADATA_FILE);
    let content = toml_edit::ser::to_string_pretty(self).context("Failed to serialize module metadata")?;
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
  }
}

/// Update the `version` and `versionCode` fields in place.
///
/// Edits the document surgically so unrelated formatting is preserved.
/// Callers treat a failure here as degraded, not fatal: the release archive
/// and manifest have already been produced by the time this runs.
pub fn update_version_fields(module_dir: &Path, version: &str, version_code: u64) -> PackResult<()> {
  let path = module_dir.join(METADATA_FILE);

  let content = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
  let mut doc: toml_edit::DocumentMut = content
    .parse()
    .with_context(|| format!("Failed to parse {}", path.display()))?;

  doc["version"] = toml_edit::value(version);
  doc["versionCode"] = toml_edit::value(version_code as i64);

  fs::write(&path, doc.to_string()).with_context(|| format!("Failed to write {}", path.display()))?;
  Ok(())
}
