use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

use super::{CategoryNode, CategoryTree, FlatItem};

/// Input bundle supplied by the content/category providers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtlasData {
    #[serde(default)]
    pub categories: Vec<CategoryNode>,
    #[serde(default)]
    pub items: Vec<FlatItem>,
}

impl AtlasData {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError {
            message: format!("Invalid atlas data: {}", e),
        })
    }

    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError {
            message: format!("Failed to read {}: {}", path, e),
        })?;
        let data = Self::from_json_str(&text)?;
        log::debug!(
            "loaded {} categories, {} items from {}",
            data.categories.len(),
            data.items.len(),
            path
        );
        Ok(data)
    }

    pub fn tree(&self) -> CategoryTree {
        CategoryTree::from_nodes(self.categories.iter().cloned())
    }

    /// Built-in topic map and article set used when no data file is given.
    pub fn demo() -> Self {
        const TOPICS: &[(&str, &[&str])] = &[
            ("systems", &["kernels", "storage", "networking"]),
            ("languages", &["rust", "compilers", "type-systems"]),
            ("graphics", &["rendering", "geometry"]),
            ("ml", &["training", "inference", "evaluation"]),
            ("craft", &["writing", "tooling"]),
        ];
        const COLORS: &[&str] = &["#00d9ff", "#ff00a6", "#fff200", "#00ff80", "#8c00ff"];

        let mut categories = vec![CategoryNode::new("root", None, 0)
            .with_children(TOPICS.iter().map(|(t, _)| *t))];
        for (ti, (topic, subs)) in TOPICS.iter().enumerate() {
            let mut node = CategoryNode::new(*topic, Some("root"), 1).with_children(subs.iter().copied());
            node.color = Some(COLORS[ti % COLORS.len()].to_string());
            categories.push(node);
            for sub in subs.iter() {
                let mut leaf = CategoryNode::new(*sub, Some(*topic), 2);
                leaf.color = node_color(ti);
                categories.push(leaf);
            }
        }

        const TAGS: &[&str] = &["this-week", "this-month", "archive"];
        let count = 24usize;
        let items = (0..count)
            .map(|i| {
                let polarity = ((i as f32 * 0.73).sin() * 0.9 * 100.0).round() / 100.0;
                let mut related = vec![format!("article-{}", (i + 1) % count)];
                if i % 4 == 0 {
                    related.push(format!("article-{}", (i + 7) % count));
                }
                let mut item = FlatItem::new(format!("article-{}", i))
                    .with_polarity(polarity)
                    .with_tag(TAGS[i % TAGS.len()])
                    .with_related(related);
                item.title = format!("Article {}", i + 1);
                item
            })
            .collect();

        Self { categories, items }
    }
}

fn node_color(topic_index: usize) -> Option<String> {
    const PASTEL: &[&str] = &["#99f0ff", "#ff99db", "#fffa99", "#99ffcc", "#d199ff"];
    Some(PASTEL[topic_index % PASTEL.len()].to_string())
}
