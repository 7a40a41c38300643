//! YAML (and JSON) file source.
//!
//! Responsibilities:
//! - Read a document with `serde_yaml` and convert it into a [`Tree`].
//!
//! Does NOT handle:
//! - Flat `KEY=VALUE` formats (see `dotenv`).
//!
//! Invariants:
//! - The document root must be a mapping; an empty document is an empty tree.
//! - Integers that fit `i64` stay integers; larger unsigned integers become
//!   their decimal text so no digits are lost.
//! - Sequences and non-scalar keys have no tree representation and are
//!   skipped with a warning. Tagged values are read as their inner value.

use serde_yaml::{Mapping, Number, Value as Yaml};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Source, SourceError};
use crate::tree::{Node, Tree, Value, join_path};

/// Reads a YAML document into a tree.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    optional: bool,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            optional: false,
        }
    }

    /// Yield an empty tree instead of failing when the file does not exist.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Convert YAML text into a tree; `path` is only used in errors.
    pub fn parse(path: &Path, text: &str) -> Result<Tree, SourceError> {
        let document: Yaml = serde_yaml::from_str(text).map_err(|e| SourceError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        match untag(&document) {
            Yaml::Null => Ok(Tree::new()),
            Yaml::Mapping(mapping) => Ok(convert_mapping(mapping, "")),
            other => Err(SourceError::UnsupportedRoot {
                path: path.to_path_buf(),
                found: yaml_kind(other),
            }),
        }
    }
}

impl Source for FileSource {
    fn name(&self) -> String {
        format!("file({})", self.path.display())
    }

    fn load(&self) -> Result<Tree, SourceError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if self.optional && e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "optional config file not found");
                return Ok(Tree::new());
            }
            Err(e) => {
                return Err(SourceError::Io {
                    path: self.path.clone(),
                    kind: e.kind(),
                });
            }
        };
        Self::parse(&self.path, &text)
    }
}

fn untag(value: &Yaml) -> &Yaml {
    match value {
        Yaml::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

fn yaml_kind(value: &Yaml) -> &'static str {
    match value {
        Yaml::Null => "null",
        Yaml::Bool(_) => "boolean",
        Yaml::Number(_) => "number",
        Yaml::String(_) => "string",
        Yaml::Sequence(_) => "sequence",
        Yaml::Mapping(_) => "mapping",
        Yaml::Tagged(_) => "tagged value",
    }
}

fn convert_mapping(mapping: &Mapping, prefix: &str) -> Tree {
    let mut tree = Tree::new();
    for (key, value) in mapping {
        let Some(key) = key_segment(key) else {
            tracing::warn!(
                section = prefix,
                found = yaml_kind(key),
                "skipping YAML entry with a non-scalar key"
            );
            continue;
        };
        let path = join_path(prefix, &key);
        match convert_value(value, &path) {
            Some(node) => tree.insert_path([key], node),
            None => tracing::warn!(path = %path, "skipping YAML sequence"),
        }
    }
    tree
}

fn convert_value(value: &Yaml, path: &str) -> Option<Node> {
    let node = match value {
        Yaml::Null => Node::Value(Value::Nil),
        Yaml::Bool(b) => Node::Value(Value::Bool(*b)),
        Yaml::Number(n) => Node::Value(convert_number(n)),
        Yaml::String(s) => Node::Value(Value::String(s.clone())),
        Yaml::Mapping(mapping) => Node::Tree(convert_mapping(mapping, path)),
        Yaml::Tagged(tagged) => return convert_value(&tagged.value, path),
        Yaml::Sequence(_) => return None,
    };
    Some(node)
}

fn convert_number(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Integer(i)
    } else if let Some(u) = n.as_u64() {
        Value::String(u.to_string())
    } else {
        n.as_f64().map_or(Value::Nil, Value::Float)
    }
}

fn key_segment(key: &Yaml) -> Option<String> {
    match key {
        Yaml::String(s) => Some(s.clone()),
        Yaml::Number(n) => Some(n.to_string()),
        Yaml::Bool(b) => Some(b.to_string()),
        Yaml::Tagged(tagged) => key_segment(&tagged.value),
        Yaml::Null | Yaml::Sequence(_) | Yaml::Mapping(_) => None,
    }
}
