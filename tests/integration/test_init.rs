//! Tests for the `init` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_init_scaffolds_module_directory() -> Result<()> {
  let parent = TestModule::empty()?;

  let output = run_modpack(
    &parent.path,
    &["init", "--new-id", "widget", "--author", "tester", "--description", "A widget"],
  )?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Initialized module `widget`"));

  assert!(parent.file_exists("widget/module.toml"));
  assert!(parent.file_exists("widget/CHANGELOG.md"));
  assert!(parent.file_exists("widget/README.md"));
  assert!(parent.file_exists("widget/src"));

  let meta = parent.read_file("widget/module.toml")?;
  assert!(meta.contains("id = \"widget\""));
  assert!(meta.contains("author = \"tester\""));
  assert!(meta.contains("description = \"A widget\""));
  assert!(meta.contains("version = \"0.1.0\""));
  assert!(meta.contains("versionCode = "));

  let changelog = parent.read_file("widget/CHANGELOG.md")?;
  assert!(changelog.starts_with("# Changelog"));
  assert!(changelog.contains("## [0.1.0]"));

  Ok(())
}

#[test]
fn test_init_requires_description_and_author() -> Result<()> {
  let parent = TestModule::empty()?;

  let output = modpack_output(&parent.path, &["init", "--new-id", "widget"], &[])?;
  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("--description"));
  assert!(stderr.contains("--author"));
  assert!(!parent.file_exists("widget"));

  Ok(())
}

#[test]
fn test_init_refuses_existing_directory() -> Result<()> {
  let parent = TestModule::empty()?;
  std::fs::create_dir(parent.path.join("widget"))?;

  let output = modpack_output(
    &parent.path,
    &["init", "--new-id", "widget", "--author", "tester", "--description", "A widget"],
    &[],
  )?;
  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(1));
  assert!(!parent.file_exists("widget/module.toml"));

  Ok(())
}

#[test]
fn test_init_rejects_unknown_module_type() -> Result<()> {
  let parent = TestModule::empty()?;

  let output = modpack_output(
    &parent.path,
    &[
      "init",
      "--new-id",
      "widget",
      "--author",
      "tester",
      "--description",
      "A widget",
      "--type",
      "bundle",
    ],
    &[],
  )?;
  assert!(!output.status.success());

  Ok(())
}

#[test]
fn test_init_then_pack_round_trip() -> Result<()> {
  let parent = TestModule::empty()?;
  run_modpack(
    &parent.path,
    &["init", "--new-id", "widget", "--author", "tester", "--description", "A widget"],
  )?;

  let module_dir = parent.path.join("widget");
  run_modpack(
    &module_dir,
    &["pack", "--version", "0.1.0", "--skip-executables", "--skip-dependencies"],
  )?;

  assert!(parent.file_exists("widget/widget.zip"));
  assert!(parent.file_exists("widget/update.json"));

  // Packing the version init bootstrapped must not duplicate the entry
  let changelog = parent.read_file("widget/CHANGELOG.md")?;
  assert_eq!(changelog.matches("## [0.1.0]").count(), 1);

  Ok(())
}
