//! Radial mind-map layout for the category hierarchy.
//!
//! The root sits at the origin. Every laid-out node divides its angular
//! span evenly among its children; a child is placed at the midpoint of its
//! sub-span, `depth × level_distance` out from the origin and
//! `depth × level_height` up.
//!
//! Presence vs visibility:
//!   - visible: root, or parent is expanded
//!   - present: root, or parent is present *and* visible
//!
//! So the visible frontier plus one hidden layer under it is always laid
//! out. Spans never depend on the expansion set, which means expanding a
//! node only flips the visibility of children that already have coordinates.
//!
//! Traversal is an explicit work stack with a depth limit and a revisit
//! guard, so a cyclic table terminates.
use std::collections::btree_map;
use std::collections::{BTreeMap, HashSet};
use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::config::TreeConfig;
use crate::fast_math::{polar_to_cartesian, Point3};
use crate::model::{CategoryTree, Connection, ExpansionState, PositionedNode};

/// Half-open angular range `[start, end)` in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngularSpan {
    pub start: f32,
    pub end: f32,
}

impl AngularSpan {
    pub const FULL: AngularSpan = AngularSpan { start: 0.0, end: TAU };

    pub fn width(&self) -> f32 {
        self.end - self.start
    }

    pub fn midpoint(&self) -> f32 {
        self.start + self.width() * 0.5
    }

    pub fn contains(&self, angle: f32) -> bool {
        angle >= self.start && angle < self.end
    }

    /// Sub-span `i` of `n` equal parts.
    pub fn slice(&self, i: usize, n: usize) -> AngularSpan {
        let step = self.width() / n.max(1) as f32;
        AngularSpan {
            start: self.start + i as f32 * step,
            end: self.start + (i + 1) as f32 * step,
        }
    }
}

/// Output of [`layout_tree`]: id → positioned node, ordered by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeLayout {
    nodes: BTreeMap<String, PositionedNode>,
    spans: BTreeMap<String, AngularSpan>,
    parents: BTreeMap<String, String>,
}

impl TreeLayout {
    pub fn get(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.get(id)
    }

    /// Angular span assigned to `id` (the root owns the full circle).
    pub fn span(&self, id: &str) -> Option<AngularSpan> {
        self.spans.get(id).copied()
    }

    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.parents.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn iter(&self) -> btree_map::Values<'_, String, PositionedNode> {
        self.nodes.values()
    }

    pub fn visible(&self) -> impl Iterator<Item = &PositionedNode> {
        self.nodes.values().filter(|n| n.visible)
    }

    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }

    /// Parent → child edges for every visible non-root node.
    pub fn connectors(&self, strength: f32) -> Vec<Connection> {
        self.visible()
            .filter_map(|node| {
                let parent_id = self.parents.get(&node.id)?;
                let from = node.parent_position?;
                Some(Connection {
                    from_id: parent_id.clone(),
                    to_id: node.id.clone(),
                    from,
                    to: node.position,
                    strength,
                })
            })
            .collect()
    }

    pub fn into_nodes(self) -> Vec<PositionedNode> {
        self.nodes.into_values().collect()
    }
}

struct Frame<'a> {
    id: &'a str,
    depth: u32,
    span: AngularSpan,
    position: Point3,
    visible: bool,
}

/// Lay out the hierarchy under `root_id`.
///
/// An unknown `root_id` yields an empty layout.
pub fn layout_tree(
    tree: &CategoryTree,
    expansion: &ExpansionState,
    root_id: &str,
    config: &TreeConfig,
) -> TreeLayout {
    let mut out = TreeLayout::default();
    let Some(root) = tree.get(root_id) else {
        log::debug!("tree layout: root '{}' not found", root_id);
        return out;
    };

    let origin = [0.0, 0.0, 0.0];
    out.nodes.insert(
        root.id.clone(),
        PositionedNode {
            id: root.id.clone(),
            position: origin,
            parent_position: None,
            depth: 0,
            visible: true,
        },
    );
    out.spans.insert(root.id.clone(), AngularSpan::FULL);

    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(root.id.as_str());
    let mut stack = vec![Frame {
        id: root.id.as_str(),
        depth: 0,
        span: AngularSpan::FULL,
        position: origin,
        visible: true,
    }];
    let mut guard_tripped = false;

    while let Some(frame) = stack.pop() {
        // Children of hidden nodes are never laid out.
        if !frame.visible {
            continue;
        }
        let children: Vec<&str> = tree
            .children_of(frame.id)
            .iter()
            .map(String::as_str)
            .filter(|c| tree.contains(c))
            .collect();
        if children.is_empty() {
            continue;
        }
        let child_depth = frame.depth + 1;
        if child_depth > config.max_depth {
            if !guard_tripped {
                log::warn!(
                    "tree layout: depth limit {} reached under '{}', hierarchy may be cyclic",
                    config.max_depth,
                    frame.id
                );
                guard_tripped = true;
            }
            continue;
        }

        let children_visible = expansion.is_expanded(frame.id);
        let n = children.len();
        let radius = child_depth as f32 * config.level_distance;
        let height = child_depth as f32 * config.level_height;

        for (i, child) in children.into_iter().enumerate().rev() {
            if !seen.insert(child) {
                log::warn!(
                    "tree layout: '{}' reached twice (via '{}'), skipping",
                    child,
                    frame.id
                );
                continue;
            }
            let span = frame.span.slice(i, n);
            let position = polar_to_cartesian(radius, span.midpoint(), height);
            out.nodes.insert(
                child.to_string(),
                PositionedNode {
                    id: child.to_string(),
                    position,
                    parent_position: Some(frame.position),
                    depth: child_depth,
                    visible: children_visible,
                },
            );
            out.spans.insert(child.to_string(), span);
            out.parents.insert(child.to_string(), frame.id.to_string());
            stack.push(Frame {
                id: child,
                depth: child_depth,
                span,
                position,
                visible: children_visible,
            });
        }
    }

    log::debug!(
        "tree layout: {} nodes, {} visible",
        out.len(),
        out.visible_count()
    );
    out
}
