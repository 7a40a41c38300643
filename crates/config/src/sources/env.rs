//! Environment variable source.
//!
//! Responsibilities:
//! - Snapshot the process environment (or an explicit list) at load time.
//! - Keep variables that carry the prefix and map them to tree paths.
//!
//! Does NOT handle:
//! - `.env` files (see `dotenv`).
//!
//! Invariants:
//! - Every value is a string; coercion happens at bind time.
//! - Variables whose name or value is not valid UTF-8 are skipped.
//! - Never fails.

use std::ffi::OsString;

use super::{Source, SourceError};
use crate::tree::{KeyNormalizer, Tree};

/// Reads `PREFIX_SECTION_KEY=value` variables into `section.key`.
#[derive(Debug, Clone)]
pub struct EnvSource {
    normalizer: KeyNormalizer,
    vars: Option<Vec<(String, String)>>,
}

impl EnvSource {
    /// Read from the process environment when loaded.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            normalizer: KeyNormalizer::new(prefix),
            vars: None,
        }
    }

    /// Read from a fixed list instead of the process environment.
    pub fn from_vars<I, K, V>(prefix: impl Into<String>, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            normalizer: KeyNormalizer::new(prefix),
            vars: Some(
                vars.into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }

    pub fn prefix(&self) -> &str {
        self.normalizer.prefix()
    }
}

fn process_vars() -> Vec<(String, String)> {
    std::env::vars_os()
        .filter_map(|(key, value): (OsString, OsString)| {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                (Ok(key), Err(_)) => {
                    tracing::debug!(key = %key, "skipping environment variable with non-UTF-8 value");
                    None
                }
                (Err(_), _) => {
                    tracing::debug!("skipping environment variable with non-UTF-8 name");
                    None
                }
            }
        })
        .collect()
}

impl Source for EnvSource {
    fn name(&self) -> String {
        format!("env({})", self.normalizer.prefix())
    }

    fn load(&self) -> Result<Tree, SourceError> {
        let tree = match &self.vars {
            Some(vars) => self
                .normalizer
                .build(vars.iter().map(|(key, value)| (key, value.as_str()))),
            None => self.normalizer.build(process_vars()),
        };
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Node;
    use serial_test::serial;

    #[test]
    fn test_from_vars_filters_by_prefix() {
        let source = EnvSource::from_vars(
            "APP_",
            [
                ("APP_DB_HOST", "localhost"),
                ("APP_PORT", "8080"),
                ("OTHER_PORT", "1"),
            ],
        );

        let tree = source.load().unwrap();

        assert_eq!(tree.get_path("db.host"), Some(&Node::from("localhost")));
        assert_eq!(tree.get_path("port"), Some(&Node::from("8080")));
        assert_eq!(tree.len(), 2);
        assert_eq!(source.name(), "env(APP_)");
    }

    #[test]
    #[serial]
    fn test_reads_process_environment_at_load() {
        temp_env::with_vars(
            [
                ("STRATA_ENV_TEST_LEVEL", Some("debug")),
                ("STRATA_ENV_TEST_DB_PORT", Some("5432")),
            ],
            || {
                let tree = EnvSource::new("STRATA_ENV_TEST_").load().unwrap();
                assert_eq!(tree.get_path("level"), Some(&Node::from("debug")));
                assert_eq!(tree.get_path("db.port"), Some(&Node::from("5432")));
            },
        );
    }

    #[test]
    #[serial]
    fn test_prefix_is_case_sensitive() {
        temp_env::with_vars([("strata_lower_key", Some("x"))], || {
            let tree = EnvSource::new("STRATA_LOWER_").load().unwrap();
            assert!(tree.is_empty());
        });
    }
}
