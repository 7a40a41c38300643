//! Tests for the configuration loader.
//!
//! Responsibilities:
//! - Test each `with_*` source end to end through `ConfigLoader`.
//! - Test precedence between layers and failure propagation.
//!
//! Does NOT handle:
//! - Adapter parsing details (tested next to each adapter in `sources`).
//! - Coercion rules (tested in `schema::coerce`).
//!
//! Invariants:
//! - Tests that touch the process environment are `#[serial]` and use
//!   `temp_env` so variables are restored afterwards.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::Schema;

pub mod dotenv_tests;

#[derive(Debug, Default, Schema)]
pub struct Database {
    #[config(path = "host", required)]
    pub host: String,
    #[config(path = "port")]
    pub port: u16,
    #[config(path = "pass", secret)]
    pub pass: String,
}

#[derive(Debug, Default, Schema)]
pub struct AppConfig {
    #[config(path = "db", nested)]
    pub db: Database,
    #[config(path = "port")]
    pub port: i64,
    #[config(path = "debug")]
    pub debug: bool,
    #[config(path = "name")]
    pub name: Option<String>,
}

/// Write `contents` to `name` inside `dir` and return the full path.
pub fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}
