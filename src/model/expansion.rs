//! Expansion State: the set of category ids currently toggled open.
//!
//! Visibility is never stored here; the layout engine derives it
//! (root, or parent expanded).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::CategoryTree;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpansionState {
    expanded: HashSet<String>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expanded<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            expanded: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn expand(&mut self, id: &str) {
        self.expanded.insert(id.to_string());
    }

    pub fn collapse(&mut self, id: &str) {
        self.expanded.remove(id);
    }

    /// Flip `id`; returns the new expanded flag.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        }
    }

    /// Collapse `id` and every descendant, so re-expanding `id` later shows
    /// one level only.
    pub fn collapse_subtree(&mut self, tree: &CategoryTree, id: &str) {
        let mut stack = vec![id.to_string()];
        let mut seen = HashSet::new();
        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            self.expanded.remove(&current);
            stack.extend(tree.children_of(&current).iter().cloned());
        }
    }

    /// Expand every ancestor of `id` so that `id` becomes visible.
    pub fn expand_path(&mut self, tree: &CategoryTree, id: &str) {
        let mut seen = HashSet::new();
        let mut cursor = tree.parent_of(id);
        while let Some(parent) = cursor {
            if !seen.insert(parent.to_string()) {
                break;
            }
            self.expanded.insert(parent.to_string());
            cursor = tree.parent_of(parent);
        }
    }

    /// Expand every node that has children.
    pub fn expand_all(&mut self, tree: &CategoryTree) {
        for node in tree.nodes() {
            if !node.children.is_empty() {
                self.expanded.insert(node.id.clone());
            }
        }
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(String::as_str)
    }
}
