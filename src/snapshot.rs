//! One serializable frame of engine output for external renderers.

use serde::{Deserialize, Serialize};

use crate::camera::OrbitConfig;
use crate::config::ConfigError;
use crate::layout::{ItemLayout, TreeLayout};
use crate::model::{Connection, PositionedNode};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtlasSnapshot {
    pub nodes: Vec<PositionedNode>,
    pub connections: Vec<Connection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<OrbitConfig>,
}

impl AtlasSnapshot {
    /// Mind-map frame: every laid-out node plus connectors for the visible ones.
    pub fn from_tree(layout: &TreeLayout, connector_strength: f32) -> Self {
        Self {
            nodes: layout.iter().cloned().collect(),
            connections: layout.connectors(connector_strength),
            camera: None,
        }
    }

    /// Item frame: items are flat, so every node is a visible depth-0 point.
    pub fn from_items(layout: &ItemLayout, connections: Vec<Connection>) -> Self {
        Self {
            nodes: layout
                .iter()
                .map(|p| PositionedNode {
                    id: p.id.clone(),
                    position: p.position,
                    parent_position: None,
                    depth: 0,
                    visible: true,
                })
                .collect(),
            connections,
            camera: None,
        }
    }

    pub fn with_camera(mut self, camera: Option<OrbitConfig>) -> Self {
        self.camera = camera;
        self
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError {
            message: format!("Failed to serialize snapshot: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PatternConfig, TreeConfig};
    use crate::layout::{arrange, build_connections, layout_tree, LayoutPattern};
    use crate::model::{AtlasData, ExpansionState};

    #[test]
    fn tree_snapshot_round_trips_through_json() {
        let data = AtlasData::demo();
        let tree = data.tree();
        let layout = layout_tree(
            &tree,
            &ExpansionState::with_expanded(["root"]),
            "root",
            &TreeConfig::default(),
        );
        let snap = AtlasSnapshot::from_tree(&layout, 0.5)
            .with_camera(Some(OrbitConfig::new(0.0, 1.0, 30.0)));
        assert_eq!(snap.nodes.len(), layout.len());
        assert_eq!(snap.connections.len(), layout.visible_count() - 1);

        let json = snap.to_json().unwrap();
        assert!(json.contains("parentPosition"));
        let back: AtlasSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn item_snapshot_carries_connections() {
        let data = AtlasData::demo();
        let layout = arrange(&data.items, LayoutPattern::Helix, 10.0, &PatternConfig::default());
        let edges = build_connections(&data.items, &layout, 0.5);
        let n_edges = edges.len();
        let snap = AtlasSnapshot::from_items(&layout, edges);
        assert_eq!(snap.nodes.len(), data.items.len());
        assert_eq!(snap.connections.len(), n_edges);
        assert!(snap.nodes.iter().all(|n| n.visible));
        assert!(!snap.to_json().unwrap().contains("camera"));
    }
}
