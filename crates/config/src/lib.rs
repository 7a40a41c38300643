//! Layered configuration binding.
//!
//! This crate merges configuration from ordered sources (environment
//! variables, `.env` files, YAML files, in-memory defaults) into one nested
//! [`Tree`], binds it onto typed structs described by `#[derive(Schema)]`,
//! and renders a redacted view of a bound struct for safe logging.
//!
//! ```no_run
//! use strata_config::{ConfigLoader, Schema, masked_json};
//!
//! #[derive(Schema, Default)]
//! struct Database {
//!     #[config(path = "host", required)]
//!     host: String,
//!     #[config(path = "pass", secret)]
//!     pass: String,
//! }
//!
//! #[derive(Schema, Default)]
//! struct AppConfig {
//!     #[config(path = "db", nested)]
//!     db: Database,
//!     #[config(path = "port")]
//!     port: u16,
//! }
//!
//! let config: AppConfig = ConfigLoader::new()
//!     .with_optional_file("config.yaml")
//!     .with_env("APP_")
//!     .load()?;
//! println!("{}", masked_json(&config)?);
//! # Ok::<(), strata_config::ConfigError>(())
//! ```

// Lets `#[derive(Schema)]` output (which names `::strata_config`) compile here too.
extern crate self as strata_config;

pub mod bind;
pub mod constants;
mod error;
mod loader;
pub mod sanitize;
pub mod schema;
pub mod sources;
pub mod tree;

pub use bind::{bind, bind_dyn};
pub use error::{ConfigError, Result};
pub use loader::ConfigLoader;
pub use sanitize::{masked_json, masked_json_pretty, sanitize, sanitize_dyn};
pub use schema::{FieldKind, FieldMut, FieldRef, FieldSpec, Leaf, LeafKind, LeafType, Schema};
pub use sources::{DotenvSource, EnvSource, FileSource, Source, SourceError};
pub use strata_derive::Schema;
pub use tree::{KeyNormalizer, Node, Tree, Value, merge, merge_all};
