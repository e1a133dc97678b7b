//! Tests for the `pack` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_pack_parses_alongside_top_level_version_flag() -> Result<()> {
  let module = TestModule::new("demo")?;

  // `pack` declares its own --version value argument; the binary's -V flag
  // must stay confined to the top level so the two never collide.
  let help = modpack_output(&module.path, &["pack", "--help"], &[])?;
  assert!(help.status.success());
  let help_text = String::from_utf8_lossy(&help.stdout);
  assert!(help_text.contains("--version <VERSION>"));

  let version = modpack_output(&module.path, &["--version"], &[])?;
  assert!(version.status.success());
  let version_text = String::from_utf8_lossy(&version.stdout);
  assert!(version_text.contains("modpack"));

  Ok(())
}

#[test]
fn test_pack_produces_release_artifacts() -> Result<()> {
  let module = TestModule::new("demo")?;
  module.write_file("README.md", "# demo\n")?;

  run_modpack(
    &module.path,
    &[
      "pack",
      "--version",
      "1.0.0",
      "--changelog",
      "First release.",
      "--skip-executables",
      "--skip-dependencies",
    ],
  )?;

  assert!(module.file_exists("demo.zip"));
  assert!(module.file_exists("update.json"));
  assert!(module.file_exists("CHANGELOG.md"));
  assert!(module.file_exists("release_notes.md"));

  let manifest: serde_json::Value = serde_json::from_str(&module.read_file("update.json")?)?;
  assert_eq!(manifest["version"], "1.0.0");
  assert!(manifest["versionCode"].as_u64().unwrap() > 25_00_00_00);
  assert_eq!(manifest["sha256"].as_str().unwrap().len(), 64);
  // No GITHUB_REPOSITORY in the environment: placeholder URLs
  assert!(manifest["zipUrl"].as_str().unwrap().contains("OWNER/REPO"));

  let changelog = module.read_file("CHANGELOG.md")?;
  assert!(changelog.contains("## [1.0.0]"));
  assert!(changelog.contains("First release."));

  // Version fields written back into module.toml
  let meta = module.read_file("module.toml")?;
  assert!(meta.contains("version = \"1.0.0\""));
  assert!(meta.contains("versionCode = "));

  Ok(())
}

#[test]
fn test_pack_uses_repository_slug_from_environment() -> Result<()> {
  let module = TestModule::new("demo")?;

  let output = modpack_output(
    &module.path,
    &[
      "pack",
      "--version",
      "2.0.0",
      "--skip-executables",
      "--skip-dependencies",
    ],
    &[("GITHUB_REPOSITORY", "acme/mods")],
  )?;
  assert!(output.status.success());

  let manifest: serde_json::Value = serde_json::from_str(&module.read_file("update.json")?)?;
  assert_eq!(
    manifest["zipUrl"],
    "https://github.com/acme/mods/releases/download/v2.0.0/demo.zip"
  );
  assert!(
    manifest["changelog"]
      .as_str()
      .unwrap()
      .starts_with("https://raw.githubusercontent.com/acme/mods/v2.0.0/")
  );

  Ok(())
}

#[test]
fn test_pack_writes_step_outputs_file() -> Result<()> {
  let module = TestModule::new("demo")?;
  let outputs = module.path.join("step_outputs.txt");

  let output = modpack_output(
    &module.path,
    &[
      "pack",
      "--version",
      "1.2.3",
      "--changelog",
      "Things changed.",
      "--skip-executables",
      "--skip-dependencies",
    ],
    &[("GITHUB_OUTPUT", outputs.to_str().unwrap())],
  )?;
  assert!(output.status.success());

  let content = std::fs::read_to_string(&outputs)?;
  assert!(content.contains("module_id=demo"));
  assert!(content.contains("version=1.2.3"));
  assert!(content.contains("changelog=Things changed."));
  assert!(content.lines().all(|l| l.contains('=')));

  Ok(())
}

#[test]
fn test_pack_without_metadata_fails() -> Result<()> {
  let module = TestModule::empty()?;

  let output = modpack_output(
    &module.path,
    &["pack", "--version", "1.0.0", "--skip-executables", "--skip-dependencies"],
    &[],
  )?;

  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("metadata not found"));
  assert!(!module.file_exists("update.json"));

  Ok(())
}

#[test]
fn test_pack_without_module_id_fails() -> Result<()> {
  let module = TestModule::empty()?;
  module.write_file("module.toml", "name = \"anonymous\"\n")?;

  let output = modpack_output(
    &module.path,
    &["pack", "--version", "1.0.0", "--skip-executables", "--skip-dependencies"],
    &[],
  )?;

  assert!(!output.status.success());
  assert!(!module.file_exists("update.json"));

  Ok(())
}

#[test]
fn test_pack_rejects_invalid_version() -> Result<()> {
  let module = TestModule::new("demo")?;

  let output = modpack_output(
    &module.path,
    &["pack", "--version", "not-a-version", "--skip-executables", "--skip-dependencies"],
    &[],
  )?;

  assert!(!output.status.success());
  assert!(!module.file_exists("demo.zip"));

  Ok(())
}

#[test]
fn test_repeated_packs_advance_version_code() -> Result<()> {
  let module = TestModule::new("demo")?;

  run_modpack(
    &module.path,
    &["pack", "--version", "1.0.0", "--skip-executables", "--skip-dependencies"],
  )?;
  let first: serde_json::Value = serde_json::from_str(&module.read_file("update.json")?)?;

  run_modpack(
    &module.path,
    &["pack", "--version", "1.0.1", "--skip-executables", "--skip-dependencies"],
  )?;
  let second: serde_json::Value = serde_json::from_str(&module.read_file("update.json")?)?;

  let a = first["versionCode"].as_u64().unwrap();
  let b = second["versionCode"].as_u64().unwrap();
  assert!(b > a);
  assert_eq!(b % 100, a % 100 + 1);

  // Both releases recorded in the changelog, newest first
  let changelog = module.read_file("CHANGELOG.md")?;
  let pos_101 = changelog.find("## [1.0.1]").unwrap();
  let pos_100 = changelog.find("## [1.0.0]").unwrap();
  assert!(pos_101 < pos_100);

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_pack_survives_partial_artifact_failure() -> Result<()> {
  let module = TestModule::new("demo")?;
  let bundler = module.install_fake_bundler(Some("arm64"))?;

  let output = modpack_output(
    &module.path,
    &[
      "pack",
      "--version",
      "1.0.0",
      "--skip-dependencies",
      "--bundler",
      bundler.to_str().unwrap(),
    ],
    &[],
  )?;
  assert!(output.status.success());

  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("6 built"));
  // Each built binary is listed as it lands in bin/
  assert!(stdout.contains("demo-linux"));

  // Built binaries land under bin/ and get swept into the archive
  assert!(module.file_exists("bin/demo.exe"));
  assert!(module.file_exists("bin/demo-linux"));
  assert!(!module.file_exists("bin/demo-arm64.exe"));

  let file = std::fs::File::open(module.path.join("demo.zip"))?;
  let archive = zip::ZipArchive::new(file)?;
  let names: Vec<&str> = archive.file_names().collect();
  assert!(names.contains(&"bin/demo-linux"));
  assert!(names.contains(&"module.toml"));

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_pack_with_missing_bundler_still_releases() -> Result<()> {
  let module = TestModule::new("demo")?;

  let output = modpack_output(
    &module.path,
    &[
      "pack",
      "--version",
      "1.0.0",
      "--skip-dependencies",
      "--bundler",
      "modpack-test-no-such-bundler",
    ],
    &[],
  )?;

  // All nine targets fail; the release itself still completes
  assert!(output.status.success());
  assert!(module.file_exists("demo.zip"));
  assert!(module.file_exists("update.json"));

  Ok(())
}
