//! Relation edges between positioned items.
//!
//! Unresolvable targets are skipped. Duplicates are detected on the
//! unordered pair of endpoint *positions*, so A→B and B→A collapse into one
//! edge. The pair is normalized into a hash key instead of scanning the
//! accumulated list.

use std::collections::HashSet;

use crate::fast_math::Point3;
use crate::model::{Connection, FlatItem};

use super::pattern::ItemLayout;

type PointKey = [u32; 3];

fn point_key(p: Point3) -> PointKey {
    // +0.0 folds -0.0 into 0.0 so both hash the same.
    [
        (p[0] + 0.0).to_bits(),
        (p[1] + 0.0).to_bits(),
        (p[2] + 0.0).to_bits(),
    ]
}

fn pair_key(a: Point3, b: Point3) -> (PointKey, PointKey) {
    let (ka, kb) = (point_key(a), point_key(b));
    if ka <= kb {
        (ka, kb)
    } else {
        (kb, ka)
    }
}

/// Anything that can resolve an item id to a position.
pub trait PositionLookup {
    fn lookup(&self, id: &str) -> Option<Point3>;
}

impl PositionLookup for ItemLayout {
    fn lookup(&self, id: &str) -> Option<Point3> {
        self.position(id)
    }
}

impl PositionLookup for std::collections::HashMap<String, Point3> {
    fn lookup(&self, id: &str) -> Option<Point3> {
        self.get(id).copied()
    }
}

/// Build the deduplicated edge list for `items`' relations.
pub fn build_connections<P: PositionLookup + ?Sized>(
    items: &[FlatItem],
    positions: &P,
    strength: f32,
) -> Vec<Connection> {
    let mut seen: HashSet<(PointKey, PointKey)> = HashSet::new();
    let mut edges = Vec::new();
    let mut unresolved = 0usize;

    for item in items {
        let Some(from) = positions.lookup(&item.id) else {
            unresolved += item.related_ids.len();
            continue;
        };
        for related in &item.related_ids {
            if *related == item.id {
                continue;
            }
            let Some(to) = positions.lookup(related) else {
                log::trace!("relation {} -> {} not in view, skipped", item.id, related);
                unresolved += 1;
                continue;
            };
            if !seen.insert(pair_key(from, to)) {
                continue;
            }
            edges.push(Connection {
                from_id: item.id.clone(),
                to_id: related.clone(),
                from,
                to,
                strength,
            });
        }
    }

    log::debug!(
        "built {} connections ({} relations unresolved)",
        edges.len(),
        unresolved
    );
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn map(entries: &[(&str, Point3)]) -> HashMap<String, Point3> {
        entries.iter().map(|(id, p)| (id.to_string(), *p)).collect()
    }

    #[test]
    fn mutual_relation_yields_one_edge() {
        let items = vec![
            FlatItem::new("a").with_related(["b"]),
            FlatItem::new("b").with_related(["a"]),
        ];
        let positions = map(&[("a", [0.0, 0.0, 0.0]), ("b", [1.0, 2.0, 3.0])]);
        let edges = build_connections(&items, &positions, 0.5);
        assert_eq!(edges.len(), 1, "A↔B should collapse into one edge");
        assert_eq!(edges[0].from_id, "a");
        assert_eq!(edges[0].to_id, "b");
        assert!((edges[0].strength - 0.5).abs() < 1e-6);
    }

    #[test]
    fn missing_targets_are_skipped() {
        let items = vec![
            FlatItem::new("a").with_related(["ghost", "b"]),
            FlatItem::new("filtered").with_related(["a"]),
            FlatItem::new("b"),
        ];
        let positions = map(&[("a", [0.0, 0.0, 0.0]), ("b", [1.0, 0.0, 0.0])]);
        let edges = build_connections(&items, &positions, 1.0);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].to_id, "b");
    }

    #[test]
    fn repeated_relation_is_deduplicated() {
        let items = vec![FlatItem::new("a").with_related(["b", "b"])];
        let positions = map(&[("a", [0.0, 0.0, 0.0]), ("b", [1.0, 0.0, 0.0])]);
        assert_eq!(build_connections(&items, &positions, 1.0).len(), 1);
    }

    #[test]
    fn dedup_is_by_position_value() {
        // b and c share coordinates, so a→b and c→a are the same segment.
        let items = vec![
            FlatItem::new("a").with_related(["b"]),
            FlatItem::new("c").with_related(["a"]),
        ];
        let positions = map(&[
            ("a", [0.0, 0.0, 0.0]),
            ("b", [5.0, 5.0, 5.0]),
            ("c", [5.0, 5.0, 5.0]),
        ]);
        assert_eq!(build_connections(&items, &positions, 1.0).len(), 1);
    }

    #[test]
    fn negative_zero_matches_zero() {
        let items = vec![
            FlatItem::new("a").with_related(["b"]),
            FlatItem::new("b").with_related(["a"]),
        ];
        let positions = map(&[("a", [-0.0, 1.0, 0.0]), ("b", [0.0, -1.0, 0.0])]);
        let mut shifted = positions.clone();
        shifted.insert("a".into(), [0.0, 1.0, -0.0]);
        assert_eq!(build_connections(&items, &shifted, 1.0).len(), 1);
        assert_eq!(pair_key([-0.0, 0.0, 0.0], [1.0; 3]), pair_key([1.0; 3], [0.0; 3]));
    }

    #[test]
    fn self_relation_is_ignored() {
        let items = vec![FlatItem::new("a").with_related(["a"])];
        let positions = map(&[("a", [0.0, 0.0, 0.0])]);
        assert!(build_connections(&items, &positions, 1.0).is_empty());
    }

    #[test]
    fn works_with_item_layout() {
        use crate::config::PatternConfig;
        use crate::layout::pattern::{arrange, LayoutPattern};

        let items: Vec<FlatItem> = (0..6)
            .map(|i| {
                FlatItem::new(format!("n{}", i))
                    .with_related([format!("n{}", (i + 1) % 6), format!("n{}", (i + 5) % 6)])
            })
            .collect();
        let layout = arrange(&items, LayoutPattern::Sphere, 4.0, &PatternConfig::default());
        let edges = build_connections(&items, &layout, 0.5);
        assert_eq!(edges.len(), 6, "ring of six has six undirected edges");
    }
}
