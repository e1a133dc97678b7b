//! Core building blocks of the packaging pipeline
//!
//! - **changelog**: heading-delimited changelog parsing and entry prepending
//! - **error**: error types with contextual help messages and exit codes
//! - **manifest**: the `update.json` wire contract and release URLs
//! - **metadata**: `module.toml` parsing and surgical version updates
//! - **version**: `YYMMDDNN` version-code derivation

pub mod changelog;
pub mod error;
pub mod manifest;
pub mod metadata;
pub mod version;
