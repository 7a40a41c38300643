//! Builder for layered configuration loading.
//!
//! Responsibilities:
//! - Collect sources through chainable `with_*` methods.
//! - Run the load → merge → bind pipeline.
//!
//! Does NOT handle:
//! - Redacted output (see `sanitize`).
//!
//! Invariants / Assumptions:
//! - Only keys are ever logged, never values.

use std::fmt;
use std::path::PathBuf;

use crate::bind::bind;
use crate::error::{ConfigError, Result};
use crate::schema::Schema;
use crate::sources::{DotenvSource, EnvSource, FileSource, Source};
use crate::tree::{Tree, merge_all};

/// Configuration loader that merges sources in the order they were added.
///
/// ```no_run
/// use strata_config::{ConfigLoader, Schema};
///
/// #[derive(Schema, Default)]
/// struct AppConfig {
///     #[config(path = "port", required)]
///     port: u16,
/// }
///
/// let config: AppConfig = ConfigLoader::new()
///     .with_optional_file("config.yaml")
///     .with_optional_dotenv(".env")
///     .with_env("APP_")
///     .load()?;
/// # Ok::<(), strata_config::ConfigError>(())
/// ```
#[derive(Default)]
pub struct ConfigLoader {
    sources: Vec<Box<dyn Source>>,
}

impl ConfigLoader {
    /// Create a loader with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append any source.
    pub fn with_source(mut self, source: impl Source + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Append fixed values, usually as the first (lowest precedence) layer.
    pub fn with_defaults(self, defaults: Tree) -> Self {
        self.with_source(defaults)
    }

    /// Append the process environment, filtered by `prefix`.
    pub fn with_env(self, prefix: impl Into<String>) -> Self {
        self.with_source(EnvSource::new(prefix))
    }

    /// Append a YAML file that must exist.
    pub fn with_file(self, path: impl Into<PathBuf>) -> Self {
        self.with_source(FileSource::new(path))
    }

    /// Append a YAML file that is skipped when missing.
    pub fn with_optional_file(self, path: impl Into<PathBuf>) -> Self {
        self.with_source(FileSource::new(path).optional())
    }

    /// Append a `.env` file that must exist.
    pub fn with_dotenv(self, path: impl Into<PathBuf>) -> Self {
        self.with_source(DotenvSource::new(path))
    }

    /// Append a `.env` file that is skipped when missing.
    pub fn with_optional_dotenv(self, path: impl Into<PathBuf>) -> Self {
        self.with_source(DotenvSource::new(path).optional())
    }

    /// Names of the configured sources, in precedence order (lowest first).
    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    /// Load every source and merge the results.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SourceLoad`] for the first source that fails.
    pub fn load_tree(&self) -> Result<Tree> {
        let mut trees = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let name = source.name();
            let tree = source.load().map_err(|cause| ConfigError::SourceLoad {
                source_name: name.clone(),
                cause,
            })?;
            tracing::debug!(source = %name, keys = tree.len(), "loaded configuration source");
            trees.push(tree);
        }

        let merged = merge_all(trees);
        tracing::trace!(keys = ?merged.leaf_paths(), "merged configuration");
        Ok(merged)
    }

    /// Load, merge and bind onto an existing value.
    ///
    /// Fields whose paths are not found keep their current values, so
    /// `target` can carry defaults.
    pub fn bind<T: Schema>(&self, target: &mut T) -> Result<()> {
        let tree = self.load_tree()?;
        bind(&tree, target)
    }

    /// Load, merge and bind onto `T::default()`.
    pub fn load<T: Schema + Default>(&self) -> Result<T> {
        let mut target = T::default();
        self.bind(&mut target)?;
        Ok(target)
    }
}

impl fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("sources", &self.source_names())
            .finish()
    }
}
