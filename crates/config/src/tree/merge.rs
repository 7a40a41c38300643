//! Deep merge of trees produced by independent sources.
//!
//! Invariants:
//! - The incoming tree wins at every colliding leaf path.
//! - When one side holds a sub-tree and the other a scalar, the incoming
//!   shape replaces the existing one outright.
//! - Keys present on only one side survive unchanged.
//! - Merging never fails.

use super::{Node, Tree};

/// Fold `incoming` onto `accumulator`, recursively, and return the result.
pub fn merge(mut accumulator: Tree, incoming: Tree) -> Tree {
    accumulator.merge_from(incoming);
    accumulator
}

/// Left-fold `trees` onto an empty tree: later trees take precedence.
pub fn merge_all<I>(trees: I) -> Tree
where
    I: IntoIterator<Item = Tree>,
{
    trees.into_iter().fold(Tree::new(), merge)
}

impl Tree {
    /// In-place form of [`merge`]: `incoming` overrides `self`.
    pub fn merge_from(&mut self, incoming: Tree) {
        for (key, node) in incoming {
            let merged = match (self.entries.remove(&key), node) {
                (Some(Node::Tree(existing)), Node::Tree(overlay)) => {
                    Node::Tree(merge(existing, overlay))
                }
                (_, node) => node,
            };
            self.entries.insert(key, merged);
        }
    }
}
