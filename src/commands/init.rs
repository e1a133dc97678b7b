//! Init command implementation
//!
//! Scaffolds a new module directory: metadata document, bootstrapped
//! changelog, and a README stub. Refuses to touch an existing directory.

use crate::core::changelog;
use crate::core::error::{PackError, PackResult, ResultExt};
use crate::core::manifest::RepoContext;
use crate::core::metadata::{ModuleMetadata, ModuleType};
use crate::core::version;
use chrono::Utc;
use std::env;
use std::fs;

const INITIAL_VERSION: &str = "0.1.0";

/// Run the init command
pub fn run_init(
  id: String,
  name: Option<String>,
  description: String,
  author: String,
  module_type: Option<String>,
) -> PackResult<()> {
  if id.trim().is_empty() {
    return Err(PackError::message("Module id must not be empty"));
  }

  let module_type = match module_type.as_deref() {
    None | Some("module") => ModuleType::Module,
    Some("modules") => ModuleType::Modules,
    Some(other) => {
      return Err(PackError::with_help(
        format!("Unknown module type `{}`", other),
        "Use `module` for a single module or `modules` for a bundle.",
      ));
    }
  };

  let dir = env::current_dir()?.join(&id);
  if dir.exists() {
    return Err(PackError::with_help(
      format!("Directory `{}` already exists", dir.display()),
      "Pick a different module id or remove the existing directory.",
    ));
  }

  fs::create_dir_all(dir.join("src")).with_context(|| format!("Failed to create {}", dir.display()))?;

  let today = Utc::now().date_naive();
  let meta = ModuleMetadata {
    name: name.unwrap_or_else(|| id.clone()),
    description,
    author,
    version: INITIAL_VERSION.to_string(),
    version_code: Some(version::compute(today, None)?),
    license: String::new(),
    update_json: RepoContext::from_env().update_json_url(&id),
    modules: Vec::new(),
    start_mode: String::new(),
    module_type,
    id,
  };
  meta.write(&dir)?;

  fs::write(
    dir.join("CHANGELOG.md"),
    changelog::bootstrap(INITIAL_VERSION, today, "Initial release."),
  )?;

  fs::write(dir.join("README.md"), format!("# {}\n\n{}\n", meta.name, meta.description))?;

  println!(
    "✅ Initialized {} `{}` at {}",
    meta.module_type.as_str(),
    meta.id,
    dir.display()
  );
  println!("   Edit {}/module.toml, then run `modpack pack --version {}`", meta.id, INITIAL_VERSION);

  Ok(())
}
