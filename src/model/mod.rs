pub mod dataset;
pub mod expansion;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::fast_math::Point3;

pub use dataset::AtlasData;
pub use expansion::ExpansionState;

/// One entry in the fixed topic hierarchy. Read-only input to the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    pub id: String,
    /// `None` only for the single root
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Ordered child ids; the order drives angular placement
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default)]
    pub depth: u32,
    /// Opaque display payload
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl CategoryNode {
    pub fn new(id: impl Into<String>, parent_id: Option<&str>, depth: u32) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            parent_id: parent_id.map(str::to_string),
            children: Vec::new(),
            depth,
            color: None,
        }
    }

    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }
}

/// Problems with a category table, reported by [`CategoryTree::validate`].
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    NoRoot,
    MultipleRoots(Vec<String>),
    DanglingChild { parent: String, child: String },
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::NoRoot => write!(f, "category table has no root"),
            DataError::MultipleRoots(ids) => {
                write!(f, "category table has several roots: {}", ids.join(", "))
            }
            DataError::DanglingChild { parent, child } => {
                write!(f, "category '{}' lists unknown child '{}'", parent, child)
            }
        }
    }
}

impl std::error::Error for DataError {}

/// The category table indexed by id.
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    nodes: HashMap<String, CategoryNode>,
}

impl CategoryTree {
    pub fn from_nodes(nodes: impl IntoIterator<Item = CategoryNode>) -> Self {
        Self {
            nodes: nodes.into_iter().map(|n| (n.id.clone(), n)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&CategoryNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &CategoryNode> {
        self.nodes.values()
    }

    /// Child ids of `id` in declared order (empty for unknown ids).
    pub fn children_of(&self, id: &str) -> &[String] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.nodes.get(id).and_then(|n| n.parent_id.as_deref())
    }

    /// The unique parentless node, if exactly one exists.
    pub fn root_id(&self) -> Option<&str> {
        let mut roots = self.nodes.values().filter(|n| n.parent_id.is_none());
        match (roots.next(), roots.next()) {
            (Some(root), None) => Some(root.id.as_str()),
            _ => None,
        }
    }

    /// Check the single-root and child-reference invariants.
    pub fn validate(&self) -> Result<(), DataError> {
        let mut roots: Vec<String> = self
            .nodes
            .values()
            .filter(|n| n.parent_id.is_none())
            .map(|n| n.id.clone())
            .collect();
        match roots.len() {
            0 => return Err(DataError::NoRoot),
            1 => {}
            _ => {
                roots.sort();
                return Err(DataError::MultipleRoots(roots));
            }
        }

        let mut ids: Vec<&String> = self.nodes.keys().collect();
        ids.sort();
        for id in ids {
            for child in self.children_of(id) {
                if !self.nodes.contains_key(child) {
                    return Err(DataError::DanglingChild {
                        parent: id.clone(),
                        child: child.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// An entity with no inherent hierarchy (e.g. an article).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatItem {
    pub id: String,
    /// Sentiment axis, roughly −1..1
    #[serde(default)]
    pub polarity: Option<f32>,
    /// Categorical bucket (e.g. recency)
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub related_ids: Vec<String>,
    #[serde(default)]
    pub title: String,
}

impl FlatItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_polarity(mut self, polarity: f32) -> Self {
        self.polarity = Some(polarity);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_related<I, S>(mut self, related: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.related_ids = related.into_iter().map(Into::into).collect();
        self
    }
}

/// A category paired with its computed coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedNode {
    pub id: String,
    pub position: Point3,
    /// Where the connector to the parent starts; `None` for the root
    pub parent_position: Option<Point3>,
    pub depth: u32,
    pub visible: bool,
}

/// Undirected edge between two positioned items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub from_id: String,
    pub to_id: String,
    pub from: Point3,
    pub to: Point3,
    /// 0..1
    pub strength: f32,
}
