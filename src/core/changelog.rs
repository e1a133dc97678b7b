//! Changelog document parsing and entry management
//!
//! The document is Markdown with one heading per release:
//!
//! ```text
//! ## [<version>] - <YYYY-MM-DD>
//! ```
//!
//! followed by a free-text body. Entries are ordered newest-first; the
//! "latest" entry is the first heading found scanning from the top. The
//! heading grammar is parsed line by line — a heading line starts with two
//! hashes, a version in brackets, a separator, and a date that must parse.
//! Malformed documents never raise: no parseable heading simply means
//! "no latest entry".

use chrono::NaiveDate;

/// A single parsed changelog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
  /// Version string from the heading brackets
  pub version: String,
  /// Release date from the heading
  pub date: NaiveDate,
  /// Free-text body between this heading and the next (trimmed)
  pub body: String,
}

/// A parsed heading line
#[derive(Debug, Clone, PartialEq, Eq)]
struct Heading {
  version: String,
  date: NaiveDate,
}

/// Parse one line as a `## [version] - date` heading
fn parse_heading(line: &str) -> Option<Heading> {
  let rest = line.strip_prefix("## [")?;
  let (version, rest) = rest.split_once(']')?;
  let date_str = rest.strip_prefix(" - ")?.trim();
  if version.is_empty() {
    return None;
  }
  let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()?;
  Some(Heading {
    version: version.to_string(),
    date,
  })
}

/// Byte offset of the first heading line in the document, if any
fn first_heading_offset(document: &str) -> Option<usize> {
  let mut offset = 0;
  for line in document.split_inclusive('\n') {
    if parse_heading(line.trim_end_matches(['\n', '\r'])).is_some() {
      return Some(offset);
    }
    offset += line.len();
  }
  // A final line without a trailing newline is covered by split_inclusive,
  // but an empty document yields no lines at all.
  None
}

/// Extract the body of the latest (topmost) entry.
///
/// Returns the trimmed text strictly between the first heading and the next
/// heading (or end of document). `None` when no heading parses; the caller
/// falls back to a generic message.
pub fn extract_latest(document: &str) -> Option<String> {
  let entries = parse(document);
  entries.into_iter().next().map(|e| e.body)
}

/// The version named by the latest (topmost) entry, if any
pub fn latest_version(document: &str) -> Option<String> {
  let mut lines = document.lines().filter_map(parse_heading);
  lines.next().map(|h| h.version)
}

/// Parse the whole document into entries, newest-first
pub fn parse(document: &str) -> Vec<ChangelogEntry> {
  let mut entries: Vec<ChangelogEntry> = Vec::new();
  let mut current: Option<(Heading, Vec<&str>)> = None;

  for line in document.lines() {
    if let Some(heading) = parse_heading(line) {
      if let Some((h, body)) = current.take() {
        entries.push(finish_entry(h, &body));
      }
      current = Some((heading, Vec::new()));
    } else if let Some((_, body)) = current.as_mut() {
      body.push(line);
    }
  }

  if let Some((h, body)) = current.take() {
    entries.push(finish_entry(h, &body));
  }

  entries
}

fn finish_entry(heading: Heading, body_lines: &[&str]) -> ChangelogEntry {
  ChangelogEntry {
    version: heading.version,
    date: heading.date,
    body: body_lines.join("\n").trim().to_string(),
  }
}

/// Prepend a new entry, keeping newest-first ordering.
///
/// The new block is spliced immediately before the first existing heading;
/// when no heading exists the block is appended after a blank-line
/// separator (or becomes the whole document when it was empty).
pub fn prepend_entry(document: &str, version: &str, date: NaiveDate, body: &str) -> String {
  let block = format!("## [{}] - {}\n\n{}\n", version, date.format("%Y-%m-%d"), body.trim());

  match first_heading_offset(document) {
    Some(offset) => format!("{}{}\n{}", &document[..offset], block, &document[offset..]),
    None if document.trim().is_empty() => block,
    None => format!("{}\n\n{}", document.trim_end(), block),
  }
}

/// Synthesize a fresh changelog document with exactly one entry
pub fn bootstrap(version: &str, date: NaiveDate, body: &str) -> String {
  let header = "# Changelog\n\nAll notable changes to this module are documented in this file.";
  prepend_entry(header, version, date, body)
}
