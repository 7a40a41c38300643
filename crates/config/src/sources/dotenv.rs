//! `.env` file source.
//!
//! Responsibilities:
//! - Parse `KEY=VALUE` lines with `dotenvy` (comments, `export`, quoting,
//!   escapes) without touching the process environment.
//! - Map keys to tree paths with the same normalizer as the env source.
//!
//! Does NOT handle:
//! - Reading process environment variables (see `env`).
//!
//! Invariants:
//! - Errors NEVER include raw `.env` line contents to prevent secret leakage.
//! - A missing file is an error unless the source is optional.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Source, SourceError};
use crate::tree::{KeyNormalizer, Tree};

/// Reads a `.env` file into a tree.
#[derive(Debug, Clone)]
pub struct DotenvSource {
    path: PathBuf,
    normalizer: KeyNormalizer,
    optional: bool,
}

impl DotenvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            normalizer: KeyNormalizer::default(),
            optional: false,
        }
    }

    /// Only keep keys starting with `prefix` (stripped before mapping).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.normalizer = KeyNormalizer::new(prefix);
        self
    }

    /// Yield an empty tree instead of failing when the file does not exist.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn map_error(&self, error: dotenvy::Error) -> SourceError {
        let path = self.path.clone();
        match error {
            dotenvy::Error::LineParse(_, error_index) => {
                SourceError::DotenvParse { path, error_index }
            }
            dotenvy::Error::Io(io_err) => SourceError::Io {
                path,
                kind: io_err.kind(),
            },
            _ => SourceError::DotenvUnknown { path },
        }
    }
}

impl Source for DotenvSource {
    fn name(&self) -> String {
        format!("dotenv({})", self.path.display())
    }

    fn load(&self) -> Result<Tree, SourceError> {
        let iter = match dotenvy::from_path_iter(&self.path) {
            Ok(iter) => iter,
            Err(dotenvy::Error::Io(io_err))
                if self.optional && io_err.kind() == ErrorKind::NotFound =>
            {
                tracing::debug!(path = %self.path.display(), "optional dotenv file not found");
                return Ok(Tree::new());
            }
            Err(e) => return Err(self.map_error(e)),
        };

        let mut pairs = Vec::new();
        for item in iter {
            pairs.push(item.map_err(|e| self.map_error(e))?);
        }
        Ok(self.normalizer.build(pairs))
    }
}
