//! Error types for modpack with contextual messages and exit codes
//!
//! Only the fatal class (unreadable metadata, missing module id) aborts a
//! packaging run. Everything else is caught at its component boundary,
//! logged, and the pipeline continues with partial state.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for modpack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (metadata, invalid args, missing files)
  User = 1,
  /// System error (I/O, external process)
  System = 2,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for modpack
#[derive(Debug)]
pub enum PackError {
  /// Metadata document errors (the fatal class)
  Metadata(MetadataError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl PackError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    PackError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    PackError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      PackError::Message { message, context, help } => PackError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      PackError::Metadata(_) => ExitCode::User,
      PackError::Io(_) => ExitCode::System,
      PackError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      PackError::Metadata(e) => e.help_message(),
      PackError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for PackError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PackError::Metadata(e) => write!(f, "{}", e),
      PackError::Io(e) => write!(f, "I/O error: {}", e),
      PackError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for PackError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      PackError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for PackError {
  fn from(err: io::Error) -> Self {
    PackError::Io(err)
  }
}

impl From<String> for PackError {
  fn from(msg: String) -> Self {
    PackError::message(msg)
  }
}

impl From<&str> for PackError {
  fn from(msg: &str) -> Self {
    PackError::message(msg)
  }
}

impl From<toml_edit::TomlError> for PackError {
  fn from(err: toml_edit::TomlError) -> Self {
    PackError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for PackError {
  fn from(err: toml_edit::de::Error) -> Self {
    PackError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<toml_edit::ser::Error> for PackError {
  fn from(err: toml_edit::ser::Error) -> Self {
    PackError::message(format!("TOML serialization error: {}", err))
  }
}

impl From<serde_json::Error> for PackError {
  fn from(err: serde_json::Error) -> Self {
    PackError::message(format!("JSON error: {}", err))
  }
}

impl From<semver::Error> for PackError {
  fn from(err: semver::Error) -> Self {
    PackError::message(format!("Invalid semantic version: {}", err))
  }
}

impl From<zip::result::ZipError> for PackError {
  fn from(err: zip::result::ZipError) -> Self {
    PackError::message(format!("Archive error: {}", err))
  }
}

impl From<glob::PatternError> for PackError {
  fn from(err: glob::PatternError) -> Self {
    PackError::message(format!("Glob pattern error: {}", err))
  }
}

impl From<glob::GlobError> for PackError {
  fn from(err: glob::GlobError) -> Self {
    PackError::message(format!("Glob walk error: {}", err))
  }
}

impl From<walkdir::Error> for PackError {
  fn from(err: walkdir::Error) -> Self {
    PackError::message(format!("Directory walk error: {}", err))
  }
}

impl From<std::path::StripPrefixError> for PackError {
  fn from(err: std::path::StripPrefixError) -> Self {
    PackError::message(format!("Path strip prefix error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for PackError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    PackError::message(format!("UTF-8 conversion error: {}", err))
  }
}

/// Metadata document errors — the only fatal class in a packaging run
#[derive(Debug)]
pub enum MetadataError {
  /// module.toml not found
  NotFound { path: PathBuf },

  /// module.toml exists but could not be parsed
  Malformed { path: PathBuf, reason: String },

  /// module.toml parsed but carries no usable module id
  MissingId { path: PathBuf },
}

impl MetadataError {
  fn help_message(&self) -> Option<String> {
    match self {
      MetadataError::NotFound { .. } => {
        Some("Run `modpack init` to scaffold a module, or pass --dir to point at one.".to_string())
      }
      MetadataError::MissingId { .. } => {
        Some("Add an `id = \"...\"` field to module.toml; the id is the stable identity of the module.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for MetadataError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MetadataError::NotFound { path } => {
        write!(f, "Module metadata not found at: {}", path.display())
      }
      MetadataError::Malformed { path, reason } => {
        write!(f, "Module metadata at {} is malformed: {}", path.display(), reason)
      }
      MetadataError::MissingId { path } => {
        write!(f, "Module metadata at {} has no module id", path.display())
      }
    }
  }
}

/// Result type alias for modpack
pub type PackResult<T> = Result<T, PackError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> PackResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> PackResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<PackError>,
{
  fn context(self, ctx: impl Into<String>) -> PackResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> PackResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &PackError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

/// Convert anyhow::Error to PackError (for helpers that bubble through anyhow)
impl From<anyhow::Error> for PackError {
  fn from(err: anyhow::Error) -> Self {
    PackError::message(err.to_string())
  }
}
