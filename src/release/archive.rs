//! Deterministic release-archive assembly with content hashing
//!
//! The file set is the union of fixed well-known files that exist on disk,
//! glob-pattern matches, and recursive directory subtrees. Entries are
//! deduplicated by archive name and written in sorted order with a pinned
//! modification timestamp, so identical inputs produce byte-identical
//! archives. The finished zip is stream-hashed in fixed-size chunks.

use crate::core::error::{PackResult, ResultExt};
use crate::utils::path_to_entry_name;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Chunk size for streaming the archive through the hasher
const HASH_CHUNK: usize = 64 * 1024;

/// Byte size and content digest of a finished archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
  pub bytes: u64,
  pub sha256: String,
}

/// Assemble `output` from files under `root`.
///
/// - `fixed_files`: well-known names included when they exist on disk
/// - `patterns`: glob patterns, relative to `root`
/// - `directories`: subtrees walked recursively; leaf files keep their
///   relative path under `root` so the archive extracts self-consistently
///
/// Entry names are deduplicated before writing; the output file itself is
/// never swept into the archive even when a pattern matches it.
pub fn assemble(
  root: &Path,
  output: &Path,
  fixed_files: &[&str],
  patterns: &[&str],
  directories: &[&str],
) -> PackResult<ArchiveSummary> {
  let entries = collect_entries(root, output, fixed_files, patterns, directories)?;
  write_archive(output, &entries)?;

  let bytes = output.metadata()?.len();
  let sha256 = hash_file(output)?;

  Ok(ArchiveSummary { bytes, sha256 })
}

/// Compute the definitive entry set: archive name → source path.
///
/// A BTreeMap both deduplicates names across sources and fixes the write
/// order, which the determinism guarantee relies on.
fn collect_entries(
  root: &Path,
  output: &Path,
  fixed_files: &[&str],
  patterns: &[&str],
  directories: &[&str],
) -> PackResult<BTreeMap<String, PathBuf>> {
  let mut entries = BTreeMap::new();

  for name in fixed_files {
    let path = root.join(name);
    if path.is_file() {
      entries.insert(path_to_entry_name(Path::new(name)), path);
    }
  }

  for pattern in patterns {
    let full = root.join(pattern);
    for matched in glob::glob(&full.to_string_lossy())? {
      let path = matched?;
      if path.is_file() {
        let rel = path.strip_prefix(root)?.to_path_buf();
        entries.insert(path_to_entry_name(&rel), path);
      }
    }
  }

  for dir in directories {
    let dir_path = root.join(dir);
    if !dir_path.is_dir() {
      continue;
    }
    for entry in WalkDir::new(&dir_path) {
      let entry = entry?;
      if entry.file_type().is_file() {
        let rel = entry.path().strip_prefix(root)?.to_path_buf();
        entries.insert(path_to_entry_name(&rel), entry.path().to_path_buf());
      }
    }
  }

  entries.remove(&path_to_entry_name(output.strip_prefix(root).unwrap_or(output)));

  Ok(entries)
}

/// Write the deduplicated entry set as a deflate-compressed zip.
///
/// Every entry gets the zip epoch as its modification time; real mtimes
/// would leak the build environment into the bytes and break
/// reproducibility.
fn write_archive(output: &Path, entries: &BTreeMap<String, PathBuf>) -> PackResult<()> {
  let file = File::create(output).with_context(|| format!("Failed to create {}", output.display()))?;
  let mut writer = ZipWriter::new(file);

  let options = SimpleFileOptions::default()
    .compression_method(CompressionMethod::Deflated)
    .last_modified_time(zip::DateTime::default());

  for (name, path) in entries {
    writer.start_file(name.as_str(), options)?;
    let mut source = File::open(path).with_context(|| format!("Failed to read {}", path.display()))?;
    io::copy(&mut source, &mut writer)?;
  }

  writer.finish()?;
  Ok(())
}

/// Stream-hash a file with SHA-256 in fixed-size chunks
pub fn hash_file(path: &Path) -> PackResult<String> {
  let mut file = File::open(path).with_context(|| format!("Failed to open {} for hashing", path.display()))?;
  let mut hasher = Sha256::new();
  let mut buf = vec![0u8; HASH_CHUNK];

  loop {
    let read = file.read(&mut buf)?;
    if read == 0 {
      break;
    }
    hasher.update(&buf[..read]);
  }

  Ok(format!("{:x}", hasher.finalize()))
}
