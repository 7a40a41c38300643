//! The nested key/value tree shared by every source, the merger and the binder.
//!
//! Responsibilities:
//! - Store configuration data as a recursive map of scalars and sub-trees.
//! - Normalize keys to lowercase on every insertion.
//! - Provide the single path-insertion builder used by all source adapters.
//! - Provide path lookup for the binder.
//!
//! Does NOT handle:
//! - Reading data from the environment or files (see `sources`).
//! - Mapping trees onto typed structs (see `bind`).
//!
//! Invariants:
//! - Keys are lowercase, so they are case-insensitively unique within a level.
//! - A key holds either a scalar or a sub-tree, never both.
//! - `insert_path` replaces a scalar found at an intermediate segment with a
//!   fresh empty tree (last write wins inside one build).
//! - Iteration order is the sorted key order; it carries no meaning.

mod key;
mod merge;
mod value;

pub use key::{KeyNormalizer, split_path};
pub(crate) use key::join_path;
pub use merge::{merge, merge_all};
pub use value::Value;

use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::constants::PATH_SEPARATOR;

/// A recursive mapping from lowercase key segments to scalars or sub-trees.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Tree {
    entries: BTreeMap<String, Node>,
}

/// An entry of a [`Tree`]: either a scalar leaf or a nested tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Value(Value),
    Tree(Tree),
}

impl Node {
    /// Short name of the node's shape, used in type mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Value(value) => value.kind_name(),
            Node::Tree(_) => "table",
        }
    }

    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Node::Tree(tree) => Some(tree),
            Node::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Node::Value(value) => Some(value),
            Node::Tree(_) => None,
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Node::Value(value)
    }
}

impl From<Tree> for Node {
    fn from(tree: Tree) -> Self {
        Node::Tree(tree)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Value(value.into())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Value(value.into())
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Value(value.into())
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Value(value.into())
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Value(value.into())
    }
}

/// Lowercase a key segment, borrowing when it is already lowercase.
pub(crate) fn normalize_segment(segment: &str) -> Cow<'_, str> {
    if segment.chars().any(char::is_uppercase) {
        Cow::Owned(segment.to_lowercase())
    } else {
        Cow::Borrowed(segment)
    }
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of keys at this level (not counting nested keys).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the node stored under `key` at this level.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(normalize_segment(key).as_ref())
    }

    /// Insert a node under `key` at this level, returning the replaced node.
    pub fn insert(&mut self, key: impl AsRef<str>, node: impl Into<Node>) -> Option<Node> {
        let key = normalize_segment(key.as_ref()).into_owned();
        self.entries.insert(key, node.into())
    }

    /// Remove and return the node stored under `key` at this level.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.entries.remove(normalize_segment(key).as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Walk `path` one segment at a time.
    ///
    /// Every segment except the last must resolve to a sub-tree. A missing
    /// segment, or a scalar where more segments remain, yields `None`; this is
    /// "not found", never an error. An empty path yields `None`.
    pub fn lookup<I, S>(&self, path: I) -> Option<&Node>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut segments = path.into_iter().peekable();
        let mut current = self;
        while let Some(segment) = segments.next() {
            let node = current.get(segment.as_ref())?;
            if segments.peek().is_none() {
                return Some(node);
            }
            current = node.as_tree()?;
        }
        None
    }

    /// Look up a dot-separated path such as `"db.host"`.
    pub fn get_path(&self, dotted: &str) -> Option<&Node> {
        self.lookup(split_path(dotted))
    }

    /// Insert `node` at `path`, creating intermediate trees as needed.
    ///
    /// An intermediate segment that currently holds a scalar is replaced by a
    /// new empty tree. An empty path is ignored.
    pub fn insert_path<I, S>(&mut self, path: I, node: impl Into<Node>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments: Vec<S> = path.into_iter().collect();
        self.insert_segments(&segments, node.into());
    }

    fn insert_segments<S: AsRef<str>>(&mut self, segments: &[S], node: Node) {
        match segments {
            [] => {}
            [last] => {
                self.insert(last.as_ref(), node);
            }
            [first, rest @ ..] => {
                let key = normalize_segment(first.as_ref()).into_owned();
                let mut child = match self.entries.remove(&key) {
                    Some(Node::Tree(tree)) => tree,
                    _ => Tree::new(),
                };
                child.insert_segments(rest, node);
                self.entries.insert(key, Node::Tree(child));
            }
        }
    }

    /// Chainable form of [`Tree::insert_path`] taking a dotted path.
    ///
    /// ```
    /// use strata_config::Tree;
    ///
    /// let tree = Tree::new().with_path("db.host", "localhost").with_path("port", 3000i64);
    /// assert!(tree.get_path("db.host").is_some());
    /// ```
    pub fn with_path(mut self, dotted: &str, node: impl Into<Node>) -> Self {
        self.insert_path(split_path(dotted), node);
        self
    }

    /// Dotted paths of every leaf, in sorted order.
    ///
    /// Used for diagnostics that must not reveal values.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_leaf_paths(String::new(), &mut out);
        out
    }

    fn collect_leaf_paths(&self, prefix: String, out: &mut Vec<String>) {
        for (key, node) in &self.entries {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}{PATH_SEPARATOR}{key}")
            };
            match node {
                Node::Tree(tree) if !tree.is_empty() => tree.collect_leaf_paths(path, out),
                _ => out.push(path),
            }
        }
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = (&'a String, &'a Node);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Tree {
    type Item = (String, Node);
    type IntoIter = std::collections::btree_map::IntoIter<String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
