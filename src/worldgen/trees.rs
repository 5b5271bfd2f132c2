use super::buildings::Building;
use crate::config::TreeSettings;
use crate::geometry::{Point2, Polygon, Segment};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A scattered tree instance. Rebuilt wholesale on every generation pass;
/// position and size feed an external instanced renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub position: Point2,
    pub radius: f32,
    pub height: f32,
}

/// Scatter trees by rejection sampling over the generated layout's
/// bounding rectangle.
///
/// Candidates are rejected when they fall inside or too close to any
/// illegal polygon (building footprints and road envelopes) or crowd an
/// already-placed tree. Sampling stops at the target count or after a run
/// of consecutive rejections, so a densely packed scene simply yields
/// fewer trees instead of looping forever.
pub(crate) fn scatter_trees(
    road_borders: &[Segment],
    buildings: &[Building],
    road_envelopes: &[Polygon],
    settings: &TreeSettings,
    rng: &mut StdRng,
) -> Vec<Tree> {
    let Some((min, max)) = layout_bounds(road_borders, buildings) else {
        return Vec::new();
    };

    let illegal: Vec<&Polygon> = buildings
        .iter()
        .map(|b| &b.footprint)
        .chain(road_envelopes.iter())
        .collect();

    let mut trees: Vec<Tree> = Vec::new();
    let mut rejections = 0u32;
    while trees.len() < settings.count && rejections < settings.max_placement_attempts {
        let candidate = Point2::new(
            min.x + rng.gen::<f32>() * (max.x - min.x),
            min.y + rng.gen::<f32>() * (max.y - min.y),
        );
        if is_clear(&candidate, &illegal, &trees, settings.radius) {
            trees.push(Tree {
                position: candidate,
                radius: settings.radius,
                height: settings.height,
            });
            rejections = 0;
        } else {
            rejections += 1;
        }
    }

    if trees.len() < settings.count {
        debug!(
            placed = trees.len(),
            target = settings.count,
            "tree scatter stalled before reaching target"
        );
    }
    trees
}

/// Bounding rectangle of the road border endpoints and building vertices.
fn layout_bounds(road_borders: &[Segment], buildings: &[Building]) -> Option<(Point2, Point2)> {
    let mut min = Point2::new(f32::MAX, f32::MAX);
    let mut max = Point2::new(f32::MIN, f32::MIN);
    let mut any = false;

    let border_points = road_borders.iter().flat_map(|seg| [seg.a, seg.b]);
    let building_points = buildings
        .iter()
        .flat_map(|b| b.footprint.points().iter().copied());
    for p in border_points.chain(building_points) {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
        any = true;
    }

    any.then_some((min, max))
}

fn is_clear(candidate: &Point2, illegal: &[&Polygon], placed: &[Tree], radius: f32) -> bool {
    for poly in illegal {
        // Clearance covers the trunk radius plus an extra margin away from
        // road and footprint boundaries
        if poly.contains_point(candidate) || poly.distance_to_point(candidate) < radius * 4.0 {
            return false;
        }
    }
    for tree in placed {
        if tree.position.distance(candidate) < radius * 2.0 {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn far_border() -> Vec<Segment> {
        // A wide empty area with a small illegal square in one corner
        vec![
            Segment::new(Point2::new(0.0, 0.0), Point2::new(4000.0, 0.0)),
            Segment::new(Point2::new(0.0, 4000.0), Point2::new(4000.0, 4000.0)),
        ]
    }

    fn settings() -> TreeSettings {
        TreeSettings {
            radius: 40.0,
            height: 200.0,
            scale: 1.0,
            count: 16,
            max_placement_attempts: 200,
        }
    }

    #[test]
    fn test_trees_respect_pairwise_spacing() {
        let settings = settings();
        let mut rng = StdRng::seed_from_u64(7);
        let trees = scatter_trees(&far_border(), &[], &[], &settings, &mut rng);

        assert!(!trees.is_empty());
        for (i, a) in trees.iter().enumerate() {
            for b in trees.iter().skip(i + 1) {
                assert!(a.position.distance(&b.position) >= settings.radius * 2.0);
            }
        }
    }

    #[test]
    fn test_trees_keep_clear_of_illegal_polygons() {
        let settings = settings();
        let obstacle = Polygon::new(vec![
            Point2::new(1000.0, 1000.0),
            Point2::new(3000.0, 1000.0),
            Point2::new(3000.0, 3000.0),
            Point2::new(1000.0, 3000.0),
        ]);
        let mut rng = StdRng::seed_from_u64(11);
        let trees = scatter_trees(&far_border(), &[], &[obstacle.clone()], &settings, &mut rng);

        for tree in &trees {
            assert!(!obstacle.contains_point(&tree.position));
            assert!(obstacle.distance_to_point(&tree.position) >= settings.radius * 4.0);
        }
    }

    #[test]
    fn test_scatter_is_deterministic_for_a_seed() {
        let settings = settings();
        let mut rng1 = StdRng::seed_from_u64(99);
        let mut rng2 = StdRng::seed_from_u64(99);

        let first = scatter_trees(&far_border(), &[], &[], &settings, &mut rng1);
        let second = scatter_trees(&far_border(), &[], &[], &settings, &mut rng2);

        assert_eq!(first, second);
    }

    #[test]
    fn test_scatter_stalls_instead_of_looping() {
        let mut settings = settings();
        // Unreachable target in a tiny area: the attempt cap must end it
        settings.count = 10_000;
        settings.radius = 2000.0;
        let mut rng = StdRng::seed_from_u64(3);

        let trees = scatter_trees(&far_border(), &[], &[], &settings, &mut rng);

        assert!(trees.len() < settings.count);
    }

    #[test]
    fn test_empty_layout_places_nothing() {
        let settings = settings();
        let mut rng = StdRng::seed_from_u64(5);

        assert!(scatter_trees(&[], &[], &[], &settings, &mut rng).is_empty());
    }
}
