//! Point-distribution patterns for flat item collections.
//!
//! Every pattern maps `(items, radius)` to exactly one position per item,
//! in input order. `constellation`, `galaxy`, `timeline` and `clusters`
//! add jitter drawn from the caller's RNG; `sphere` and `helix` are fully
//! deterministic.

use std::collections::HashMap;
use std::f32::consts::{PI, TAU};
use std::str::FromStr;

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::PatternConfig;
use crate::fast_math::{distance_squared, polar_to_cartesian, Point3, GOLDEN_ANGLE};
use crate::model::FlatItem;

/// Item count above which the sphere pattern is computed in parallel.
const PAR_THRESHOLD: usize = 1024;

/// Group key for items without a tag.
pub const UNTAGGED: &str = "untagged";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutPattern {
    Constellation,
    Galaxy,
    Timeline,
    Clusters,
    Sphere,
    Helix,
}

impl LayoutPattern {
    pub const ALL: [LayoutPattern; 6] = [
        LayoutPattern::Constellation,
        LayoutPattern::Galaxy,
        LayoutPattern::Timeline,
        LayoutPattern::Clusters,
        LayoutPattern::Sphere,
        LayoutPattern::Helix,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LayoutPattern::Constellation => "constellation",
            LayoutPattern::Galaxy => "galaxy",
            LayoutPattern::Timeline => "timeline",
            LayoutPattern::Clusters => "clusters",
            LayoutPattern::Sphere => "sphere",
            LayoutPattern::Helix => "helix",
        }
    }

    /// Whether the pattern draws from the RNG.
    pub fn is_jittered(&self) -> bool {
        !matches!(self, LayoutPattern::Sphere | LayoutPattern::Helix)
    }
}

impl std::fmt::Display for LayoutPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Rejected pattern name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    Unknown(String),
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternError::Unknown(name) => write!(
                f,
                "unknown layout pattern '{}' (expected one of: constellation, galaxy, timeline, clusters, sphere, helix)",
                name
            ),
        }
    }
}

impl std::error::Error for PatternError {}

impl FromStr for LayoutPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        LayoutPattern::ALL
            .into_iter()
            .find(|p| p.name() == lowered)
            .ok_or_else(|| PatternError::Unknown(s.to_string()))
    }
}

/// One item's placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub id: String,
    pub position: Point3,
}

/// Placements in input order, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct ItemLayout {
    placed: Vec<PlacedItem>,
    index: HashMap<String, usize>,
}

impl ItemLayout {
    fn from_positions(items: &[FlatItem], positions: Vec<Point3>) -> Self {
        let mut index = HashMap::with_capacity(items.len());
        let placed = items
            .iter()
            .zip(positions)
            .enumerate()
            .map(|(i, (item, position))| {
                index.entry(item.id.clone()).or_insert(i);
                PlacedItem {
                    id: item.id.clone(),
                    position,
                }
            })
            .collect();
        Self { placed, index }
    }

    pub fn position(&self, id: &str) -> Option<Point3> {
        self.index.get(id).map(|&i| self.placed[i].position)
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlacedItem> {
        self.placed.iter()
    }

    pub fn positions(&self) -> Vec<Point3> {
        self.placed.iter().map(|p| p.position).collect()
    }

    pub fn to_map(&self) -> HashMap<String, Point3> {
        self.index
            .iter()
            .map(|(id, &i)| (id.clone(), self.placed[i].position))
            .collect()
    }
}

/// Arrange with the thread-local RNG.
pub fn arrange(
    items: &[FlatItem],
    pattern: LayoutPattern,
    radius: f32,
    config: &PatternConfig,
) -> ItemLayout {
    arrange_with_rng(items, pattern, radius, config, &mut rand::thread_rng())
}

/// Arrange with a caller-supplied RNG (seed it for reproducible output).
pub fn arrange_with_rng<R: Rng + ?Sized>(
    items: &[FlatItem],
    pattern: LayoutPattern,
    radius: f32,
    config: &PatternConfig,
    rng: &mut R,
) -> ItemLayout {
    log::debug!("arranging {} items as {}", items.len(), pattern);
    let positions = match pattern {
        LayoutPattern::Constellation => constellation(items.len(), radius, config, rng),
        LayoutPattern::Galaxy => galaxy(items.len(), radius, config, rng),
        LayoutPattern::Timeline => timeline(items, radius, config, rng),
        LayoutPattern::Clusters => clusters(items, radius, config, rng),
        LayoutPattern::Sphere => sphere(items.len(), radius),
        LayoutPattern::Helix => helix(items, radius, config),
    };
    ItemLayout::from_positions(items, positions)
}

#[inline]
fn jitter<R: Rng + ?Sized>(rng: &mut R, amplitude: f32) -> f32 {
    if amplitude <= 0.0 {
        return 0.0;
    }
    rng.gen_range(-amplitude..=amplitude)
}

// ── constellation ──

fn constellation<R: Rng + ?Sized>(
    n: usize,
    radius: f32,
    config: &PatternConfig,
    rng: &mut R,
) -> Vec<Point3> {
    let nf = n.max(1) as f32;
    let twist = (nf * PI).sqrt();
    let amp = radius * config.constellation_jitter;
    (0..n)
        .map(|i| {
            let phi = (-1.0 + 2.0 * i as f32 / nf).clamp(-1.0, 1.0).acos();
            let theta = twist * phi;
            [
                radius * theta.cos() * phi.sin() + jitter(rng, amp),
                radius * theta.sin() * phi.sin() + jitter(rng, amp),
                radius * phi.cos() + jitter(rng, amp),
            ]
        })
        .collect()
}

// ── galaxy ──

/// Arm an item lands on (round-robin by index).
pub fn galaxy_arm(index: usize, arms: usize) -> usize {
    index % arms.max(1)
}

/// Base angle of `arm`: `arm / arms × 2π`.
pub fn arm_base_angle(arm: usize, arms: usize) -> f32 {
    arm as f32 / arms.max(1) as f32 * TAU
}

fn galaxy<R: Rng + ?Sized>(
    n: usize,
    radius: f32,
    config: &PatternConfig,
    rng: &mut R,
) -> Vec<Point3> {
    let arms = config.galaxy_arms.max(1);
    let per_arm = n.div_ceil(arms).max(1) as f32;
    (0..n)
        .map(|i| {
            let arm = galaxy_arm(i, arms);
            let along = (i / arms) as f32;
            let distance = along / per_arm * radius;
            let angle = arm_base_angle(arm, arms) + distance * config.spiral_tightness;
            polar_to_cartesian(distance, angle, jitter(rng, config.galaxy_jitter))
        })
        .collect()
}

// ── timeline ──

fn timeline<R: Rng + ?Sized>(
    items: &[FlatItem],
    radius: f32,
    config: &PatternConfig,
    rng: &mut R,
) -> Vec<Point3> {
    let nf = items.len().max(1) as f32;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let x = (i as f32 / nf - 0.5) * 2.0 * radius;
            let y = item.polarity.unwrap_or(0.0) * config.timeline_polarity_scale;
            [x, y, jitter(rng, config.timeline_jitter)]
        })
        .collect()
}

// ── clusters ──

fn clusters<R: Rng + ?Sized>(
    items: &[FlatItem],
    radius: f32,
    config: &PatternConfig,
    rng: &mut R,
) -> Vec<Point3> {
    // Groups in first-appearance order
    let mut group_of: HashMap<&str, usize> = HashMap::new();
    let keys: Vec<usize> = items
        .iter()
        .map(|item| {
            let key = item.tag.as_deref().unwrap_or(UNTAGGED);
            let next = group_of.len();
            *group_of.entry(key).or_insert(next)
        })
        .collect();

    let groups = group_of.len().max(1) as f32;
    let ring = radius * config.cluster_ring;
    let mut filled = vec![0usize; group_of.len()];

    keys.into_iter()
        .map(|g| {
            let center = polar_to_cartesian(ring, g as f32 / groups * TAU, 0.0);
            let j = filled[g];
            filled[g] += 1;
            let offset = (j as f32).sqrt() * config.cluster_spacing;
            let angle = j as f32 * GOLDEN_ANGLE;
            [
                center[0] + offset * angle.cos(),
                jitter(rng, config.cluster_jitter),
                center[2] + offset * angle.sin(),
            ]
        })
        .collect()
}

// ── sphere ──

fn fibonacci_point(i: usize, n: usize, radius: f32) -> Point3 {
    let y = 1.0 - 2.0 * (i as f32 + 0.5) / n as f32;
    let ring = (1.0 - y * y).max(0.0).sqrt();
    let theta = i as f32 * GOLDEN_ANGLE;
    [
        radius * ring * theta.cos(),
        radius * y,
        radius * ring * theta.sin(),
    ]
}

fn sphere(n: usize, radius: f32) -> Vec<Point3> {
    if n >= PAR_THRESHOLD {
        (0..n)
            .into_par_iter()
            .map(|i| fibonacci_point(i, n, radius))
            .collect()
    } else {
        (0..n).map(|i| fibonacci_point(i, n, radius)).collect()
    }
}

// ── helix ──

/// Strand 0 for non-negative (or missing) polarity, strand 1 otherwise.
pub fn helix_strand(item: &FlatItem) -> usize {
    match item.polarity {
        Some(p) if p < 0.0 => 1,
        _ => 0,
    }
}

fn helix(items: &[FlatItem], radius: f32, config: &PatternConfig) -> Vec<Point3> {
    let nf = items.len().max(1) as f32;
    let sweep = config.helix_turns * TAU;
    let height = config.helix_height * radius;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let t = i as f32 / nf;
            let angle = t * sweep + helix_strand(item) as f32 * PI;
            polar_to_cartesian(config.helix_radius, angle, (t - 0.5) * height)
        })
        .collect()
}

// ── diagnostics ──

/// Distance from each point to its nearest neighbour.
pub fn nearest_neighbor_distances(points: &[Point3]) -> Vec<f32> {
    points
        .par_iter()
        .enumerate()
        .map(|(i, &p)| {
            points
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, &q)| distance_squared(p, q))
                .fold(f32::INFINITY, f32::min)
                .sqrt()
        })
        .collect()
}

/// Smallest pairwise distance; infinity for fewer than two points.
pub fn min_pairwise_distance(points: &[Point3]) -> f32 {
    nearest_neighbor_distances(points)
        .into_iter()
        .fold(f32::INFINITY, f32::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fast_math::length;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn items(n: usize) -> Vec<FlatItem> {
        (0..n)
            .map(|i| {
                FlatItem::new(format!("item-{}", i))
                    .with_polarity(if i % 3 == 0 { -0.5 } else { 0.4 })
                    .with_tag(["recent", "older", "archive"][i % 3])
            })
            .collect()
    }

    #[test]
    fn every_pattern_places_every_item() {
        let cfg = PatternConfig::default();
        let list = items(17);
        let mut rng = StdRng::seed_from_u64(7);
        for pattern in LayoutPattern::ALL {
            let layout = arrange_with_rng(&list, pattern, 10.0, &cfg, &mut rng);
            assert_eq!(layout.len(), list.len(), "{} dropped items", pattern);
            for item in &list {
                let p = layout.position(&item.id).expect("missing placement");
                assert!(p.iter().all(|c| c.is_finite()), "{} produced {:?}", pattern, p);
            }
        }
    }

    #[test]
    fn empty_input_is_empty_output() {
        let cfg = PatternConfig::default();
        for pattern in LayoutPattern::ALL {
            assert!(arrange(&[], pattern, 10.0, &cfg).is_empty());
        }
    }

    #[test]
    fn parses_pattern_names() {
        assert_eq!("galaxy".parse::<LayoutPattern>(), Ok(LayoutPattern::Galaxy));
        assert_eq!(" Helix ".parse::<LayoutPattern>(), Ok(LayoutPattern::Helix));
        let err = "spiral".parse::<LayoutPattern>().unwrap_err();
        assert_eq!(err, PatternError::Unknown("spiral".into()));
        assert!(err.to_string().contains("spiral"));
        for p in LayoutPattern::ALL {
            assert_eq!(p.name().parse::<LayoutPattern>(), Ok(p));
        }
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let cfg = PatternConfig::default();
        let list = items(12);
        for pattern in LayoutPattern::ALL {
            let a = arrange_with_rng(&list, pattern, 8.0, &cfg, &mut StdRng::seed_from_u64(42));
            let b = arrange_with_rng(&list, pattern, 8.0, &cfg, &mut StdRng::seed_from_u64(42));
            assert_eq!(a.positions(), b.positions(), "{} not reproducible", pattern);
        }
    }

    #[test]
    fn deterministic_patterns_ignore_rng() {
        let cfg = PatternConfig::default();
        let list = items(20);
        for pattern in [LayoutPattern::Sphere, LayoutPattern::Helix] {
            assert!(!pattern.is_jittered());
            let a = arrange_with_rng(&list, pattern, 8.0, &cfg, &mut StdRng::seed_from_u64(1));
            let b = arrange_with_rng(&list, pattern, 8.0, &cfg, &mut StdRng::seed_from_u64(2));
            assert_eq!(a.positions(), b.positions());
        }
    }

    #[test]
    fn galaxy_three_arms_twelve_items() {
        let cfg = PatternConfig::default();
        let list = items(12);
        let layout = arrange_with_rng(
            &list,
            LayoutPattern::Galaxy,
            10.0,
            &cfg,
            &mut StdRng::seed_from_u64(3),
        );
        for i in [0usize, 3, 6, 9] {
            assert_eq!(galaxy_arm(i, 3), 0, "item {} should be on arm 0", i);
        }
        assert!((arm_base_angle(0, 3) - 0.0).abs() < 1e-6);
        assert!((arm_base_angle(1, 3) - TAU / 3.0).abs() < 1e-6);

        // Item 0 sits at the core; later arm-0 items follow angle = distance × tightness.
        let p0 = layout.position("item-0").unwrap();
        assert!(p0[0].abs() < 1e-6 && p0[2].abs() < 1e-6);
        for (k, i) in [3usize, 6, 9].iter().enumerate() {
            let p = layout.position(&format!("item-{}", i)).unwrap();
            let distance = (k as f32 + 1.0) / 4.0 * 10.0;
            let horizontal = (p[0] * p[0] + p[2] * p[2]).sqrt();
            assert!((horizontal - distance).abs() < 1e-4);
            let angle = p[2].atan2(p[0]);
            let expected = crate::fast_math::wrap_angle(distance * cfg.spiral_tightness);
            assert!((angle - expected).abs() < 1e-4, "item {}: {} vs {}", i, angle, expected);
            assert!(p[1].abs() <= cfg.galaxy_jitter + 1e-6);
        }
    }

    #[test]
    fn timeline_follows_order_and_polarity() {
        let cfg = PatternConfig::default();
        let list = items(10);
        let layout = arrange_with_rng(
            &list,
            LayoutPattern::Timeline,
            10.0,
            &cfg,
            &mut StdRng::seed_from_u64(9),
        );
        let xs: Vec<f32> = layout.iter().map(|p| p.position[0]).collect();
        for w in xs.windows(2) {
            assert!(w[0] < w[1]);
        }
        for (placed, item) in layout.iter().zip(&list) {
            let expected = item.polarity.unwrap() * cfg.timeline_polarity_scale;
            assert!((placed.position[1] - expected).abs() < 1e-6);
            assert!(placed.position[2].abs() <= cfg.timeline_jitter + 1e-6);
        }
    }

    #[test]
    fn clusters_group_by_tag() {
        let cfg = PatternConfig::default();
        let list = items(30);
        let radius = 20.0;
        let layout = arrange_with_rng(
            &list,
            LayoutPattern::Clusters,
            radius,
            &cfg,
            &mut StdRng::seed_from_u64(11),
        );
        // First member of each group sits exactly on its center.
        for (g, first) in ["item-0", "item-1", "item-2"].iter().enumerate() {
            let p = layout.position(first).unwrap();
            let center = polar_to_cartesian(radius * cfg.cluster_ring, g as f32 / 3.0 * TAU, 0.0);
            assert!((p[0] - center[0]).abs() < 1e-4 && (p[2] - center[2]).abs() < 1e-4);
        }
        // j-th member sits sqrt(j) × spacing from its center.
        let p = layout.position("item-12").unwrap(); // group 0, j = 4
        let center = polar_to_cartesian(radius * cfg.cluster_ring, 0.0, 0.0);
        let d = ((p[0] - center[0]).powi(2) + (p[2] - center[2]).powi(2)).sqrt();
        assert!((d - 2.0 * cfg.cluster_spacing).abs() < 1e-4);
    }

    #[test]
    fn untagged_items_share_a_cluster() {
        let cfg = PatternConfig::default();
        let list = vec![FlatItem::new("a"), FlatItem::new("b")];
        let layout = arrange_with_rng(
            &list,
            LayoutPattern::Clusters,
            10.0,
            &cfg,
            &mut StdRng::seed_from_u64(0),
        );
        let a = layout.position("a").unwrap();
        let b = layout.position("b").unwrap();
        let d = ((a[0] - b[0]).powi(2) + (a[2] - b[2]).powi(2)).sqrt();
        assert!((d - cfg.cluster_spacing).abs() < 1e-4);
    }

    #[test]
    fn constellation_stays_near_sphere() {
        let cfg = PatternConfig::default();
        let layout = arrange_with_rng(
            &items(50),
            LayoutPattern::Constellation,
            10.0,
            &cfg,
            &mut StdRng::seed_from_u64(5),
        );
        let max_drift = (3.0f32).sqrt() * 10.0 * cfg.constellation_jitter;
        for p in layout.iter() {
            let r = length(p.position);
            assert!(r <= 10.0 + max_drift + 1e-3, "radius {} too large", r);
        }
    }

    #[test]
    fn sphere_points_lie_on_surface() {
        let layout = arrange(&items(64), LayoutPattern::Sphere, 5.0, &PatternConfig::default());
        for p in layout.iter() {
            assert!((length(p.position) - 5.0).abs() < 1e-3);
        }
    }

    #[test]
    fn sphere_nearest_neighbor_does_not_collapse() {
        let radius = 10.0;
        for n in [10usize, 100, 1000] {
            let points = sphere(n, radius);
            let nn = nearest_neighbor_distances(&points);
            let min = nn.iter().cloned().fold(f32::INFINITY, f32::min);
            let mean = nn.iter().sum::<f32>() / n as f32;
            // Ideal spacing on a sphere scales like sqrt(4π/N) × r.
            let ideal = (4.0 * PI / n as f32).sqrt() * radius;
            assert!(min > 0.4 * ideal, "n={}: min {} vs ideal {}", n, min, ideal);
            assert!(mean > 0.7 * ideal, "n={}: mean {} vs ideal {}", n, mean, ideal);
        }
    }

    #[test]
    fn sphere_parallel_matches_serial() {
        let n = PAR_THRESHOLD + 5;
        let parallel = sphere(n, 3.0);
        let serial: Vec<Point3> = (0..n).map(|i| fibonacci_point(i, n, 3.0)).collect();
        assert_eq!(parallel, serial);
    }

    #[test]
    fn helix_strands_are_opposite() {
        let cfg = PatternConfig::default();
        let list = vec![
            FlatItem::new("pos").with_polarity(0.5),
            FlatItem::new("neg").with_polarity(-0.5),
        ];
        let layout = arrange(&list, LayoutPattern::Helix, 10.0, &cfg);
        let pos = layout.position("pos").unwrap();
        let neg = layout.position("neg").unwrap();
        assert!((pos[0] - cfg.helix_radius).abs() < 1e-4, "strand 0 starts at angle 0");
        assert_eq!(helix_strand(&list[1]), 1);
        for p in [pos, neg] {
            let r = (p[0] * p[0] + p[2] * p[2]).sqrt();
            assert!((r - cfg.helix_radius).abs() < 1e-4);
        }
        assert!(neg[1] > pos[1], "height grows with list position");
    }

    #[test]
    fn duplicate_ids_still_get_placements() {
        let list = vec![FlatItem::new("dup"), FlatItem::new("dup")];
        let layout = arrange(&list, LayoutPattern::Sphere, 1.0, &PatternConfig::default());
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.position("dup"), Some(layout.positions()[0]));
    }

    #[test]
    fn min_pairwise_distance_small_inputs() {
        assert!(min_pairwise_distance(&[]).is_infinite());
        assert!(min_pairwise_distance(&[[0.0; 3]]).is_infinite());
        assert!((min_pairwise_distance(&[[0.0; 3], [0.0, 2.0, 0.0]]) - 2.0).abs() < 1e-6);
    }
}
