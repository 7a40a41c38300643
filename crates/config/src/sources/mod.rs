//! Source adapters: producers of one [`Tree`] each.
//!
//! Responsibilities:
//! - Define the [`Source`] contract used by the loader.
//! - Provide the environment, dotenv and YAML file adapters.
//!
//! Does NOT handle:
//! - Merging trees or binding them (see `tree::merge`, `bind`).
//!
//! Invariants:
//! - Every adapter builds its tree through `Tree::insert_path`, so keys are
//!   lowercase and scalar/sub-tree collisions resolve the same way everywhere.
//! - Loading has no side effects on the process environment.

mod dotenv;
mod env;
mod error;
mod file;

pub use dotenv::DotenvSource;
pub use env::EnvSource;
pub use error::SourceError;
pub use file::FileSource;

use crate::tree::Tree;

/// Something that can produce a configuration tree.
pub trait Source {
    /// Identity used in error messages, e.g. `env(APP_)` or `file(config.yaml)`.
    fn name(&self) -> String;

    /// Produce this source's tree.
    fn load(&self) -> Result<Tree, SourceError>;
}

/// A fixed in-memory tree, typically used for defaults.
impl Source for Tree {
    fn name(&self) -> String {
        "tree".to_string()
    }

    fn load(&self) -> Result<Tree, SourceError> {
        Ok(self.clone())
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn load(&self) -> Result<Tree, SourceError> {
        (**self).load()
    }
}
