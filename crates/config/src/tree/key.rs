//! Key normalization for flat, environment-style sources.
//!
//! Responsibilities:
//! - Turn flat keys such as `APP_DB_HOST` into tree paths (`["db", "host"]`).
//! - Build a [`Tree`] from a list of flat key/value pairs.
//!
//! Does NOT handle:
//! - Reading the process environment or dotenv files (see `sources`).
//!
//! Invariants:
//! - Prefix matching is exact and case-sensitive.
//! - `_` and `.` both separate segments; segments are lowercased.
//! - Empty segments are dropped, so `APP` and `APP_` behave the same and
//!   `APP__DB` maps to `db`.
//! - Keys that do not carry the prefix, or that leave no segments, are skipped.

use super::{Node, Tree, Value};
use crate::constants::{ENV_SEPARATOR, PATH_SEPARATOR};

/// Split a dotted path (`"db.host"`) into its segments, skipping empty ones.
pub fn split_path(dotted: &str) -> impl Iterator<Item = &str> {
    dotted.split(PATH_SEPARATOR).filter(|s| !s.is_empty())
}

/// Append `path` to a dotted `prefix`; an empty prefix yields `path` itself.
pub(crate) fn join_path(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        path.to_string()
    } else {
        format!("{prefix}{PATH_SEPARATOR}{path}")
    }
}

/// Maps prefixed flat keys to lowercase tree paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyNormalizer {
    prefix: String,
}

impl KeyNormalizer {
    /// Create a normalizer that accepts only keys starting with `prefix`.
    ///
    /// An empty prefix accepts every key.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Normalize one raw key into a path, or `None` if the key is not ours.
    pub fn normalize(&self, raw: &str) -> Option<Vec<String>> {
        let rest = raw.strip_prefix(self.prefix.as_str())?;
        let path: Vec<String> = rest
            .split([ENV_SEPARATOR, PATH_SEPARATOR])
            .filter(|segment| !segment.is_empty())
            .map(str::to_lowercase)
            .collect();
        (!path.is_empty()).then_some(path)
    }

    /// Build a fresh tree from flat key/value pairs.
    ///
    /// Pairs are inserted in iteration order through [`Tree::insert_path`], so
    /// a later key whose path passes through an earlier scalar replaces it.
    pub fn build<I, K, V>(&self, pairs: I) -> Tree
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut tree = Tree::new();
        for (key, value) in pairs {
            match self.normalize(key.as_ref()) {
                Some(path) => tree.insert_path(path, Node::Value(value.into())),
                None => tracing::trace!(prefix = %self.prefix, "skipping key without prefix"),
            }
        }
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_prefix_and_splits() {
        let normalizer = KeyNormalizer::new("APP_");
        assert_eq!(
            normalizer.normalize("APP_DB_HOST"),
            Some(vec!["db".to_string(), "host".to_string()])
        );
        assert_eq!(normalizer.normalize("APP_PORT"), Some(vec!["port".to_string()]));
    }

    #[test]
    fn test_normalize_prefix_is_case_sensitive() {
        let normalizer = KeyNormalizer::new("APP_");
        assert_eq!(normalizer.normalize("app_port"), None);
        assert_eq!(normalizer.normalize("OTHER_PORT"), None);
    }

    #[test]
    fn test_normalize_prefix_without_trailing_separator() {
        let normalizer = KeyNormalizer::new("APP");
        assert_eq!(
            normalizer.normalize("APP_DB_HOST"),
            Some(vec!["db".to_string(), "host".to_string()])
        );
    }

    #[test]
    fn test_normalize_drops_empty_segments() {
        let normalizer = KeyNormalizer::new("APP_");
        assert_eq!(
            normalizer.normalize("APP_DB__HOST_"),
            Some(vec!["db".to_string(), "host".to_string()])
        );
        assert_eq!(normalizer.normalize("APP_"), None);
        assert_eq!(normalizer.normalize("APP___"), None);
    }

    #[test]
    fn test_normalize_treats_dots_as_separators() {
        let normalizer = KeyNormalizer::default();
        assert_eq!(
            normalizer.normalize("Db.Host"),
            Some(vec!["db".to_string(), "host".to_string()])
        );
    }

    #[test]
    fn test_build_nests_values_and_skips_foreign_keys() {
        let tree = KeyNormalizer::new("APP_").build([
            ("APP_DB_HOST", "localhost"),
            ("APP_DB_PORT", "5432"),
            ("HOME", "/root"),
        ]);

        assert_eq!(tree.get_path("db.host"), Some(&Node::from("localhost")));
        assert_eq!(tree.get_path("db.port"), Some(&Node::from("5432")));
        assert_eq!(tree.get("home"), None);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_build_scalar_then_subtree_last_write_wins() {
        let tree = KeyNormalizer::new("APP_").build([("APP_DB", "flat"), ("APP_DB_HOST", "h")]);
        assert_eq!(tree.get_path("db.host"), Some(&Node::from("h")));

        let tree = KeyNormalizer::new("APP_").build([("APP_DB_HOST", "h"), ("APP_DB", "flat")]);
        assert_eq!(tree.get_path("db"), Some(&Node::from("flat")));
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "db"), "db");
        assert_eq!(join_path("app.db", "host"), "app.db.host");
    }
}
