//! Error types for source adapters.
//!
//! Responsibilities:
//! - Describe why one source could not produce a tree.
//!
//! Does NOT handle:
//! - Binding failures (see `crate::error::ConfigError`).
//!
//! Invariants:
//! - Variants carry a path and a reason, never the raw content of the source.
//!   Dotenv failures in particular only report a byte index, so a malformed
//!   secret line cannot leak into logs.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while a source loads its data.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to read {}: {kind}", path.display())]
    Io { path: PathBuf, kind: ErrorKind },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// SAFETY: only the byte index of the failure is kept, not the line.
    #[error("failed to parse dotenv file {} at position {error_index}", path.display())]
    DotenvParse { path: PathBuf, error_index: usize },

    /// Unknown dotenv error (future variants from the dotenvy crate).
    #[error("failed to load dotenv file {}", path.display())]
    DotenvUnknown { path: PathBuf },

    #[error("{} must contain a mapping at its root, found {found}", path.display())]
    UnsupportedRoot { path: PathBuf, found: &'static str },
}

impl SourceError {
    /// True when the underlying file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::Io { kind, .. } if *kind == ErrorKind::NotFound)
    }
}
