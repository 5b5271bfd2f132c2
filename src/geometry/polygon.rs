use super::point::Point2;
use super::segment::{segment_intersection, Segment};
use serde::{Deserialize, Serialize};

/// Fixed ray origin for even-odd containment tests, far outside any
/// plausible scene bounds in both axes. Deliberately off the x=y diagonal
/// so rays to axis-aligned fixtures do not graze polygon corners.
const FAR_POINT: Point2 = Point2 {
    x: -19_000.0,
    y: -27_000.0,
};

/// A closed loop of vertices; the first vertex implicitly connects back to
/// the last. The boundary segment list is derived once at construction.
///
/// Vertices must describe a simple (non-self-intersecting) loop for
/// containment and union results to be meaningful; this is not validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Point2>", into = "Vec<Point2>")]
pub struct Polygon {
    points: Vec<Point2>,
    segments: Vec<Segment>,
}

impl From<Vec<Point2>> for Polygon {
    fn from(points: Vec<Point2>) -> Self {
        Polygon::new(points)
    }
}

impl From<Polygon> for Vec<Point2> {
    fn from(polygon: Polygon) -> Self {
        polygon.points
    }
}

impl Polygon {
    pub fn new(points: Vec<Point2>) -> Self {
        let mut segments = Vec::with_capacity(points.len());
        for i in 1..=points.len() {
            segments.push(Segment::new(points[i - 1], points[i % points.len()]));
        }
        Self { points, segments }
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Even-odd containment: count boundary crossings of a ray from a fixed
    /// far point to `p`.
    ///
    /// Known limitation: a ray passing exactly through a vertex can be
    /// counted once per adjacent segment, flipping the result. This
    /// floating-point fragility is accepted rather than special-cased.
    pub fn contains_point(&self, p: &Point2) -> bool {
        let ray = Segment::new(FAR_POINT, *p);
        let crossings = self
            .segments
            .iter()
            .filter(|seg| segment_intersection(&ray, seg).is_some())
            .count();
        crossings % 2 == 1
    }

    /// Midpoint containment heuristic. Deliberately approximate: a segment
    /// crossing the boundary twice can have an inside midpoint while partly
    /// outside. Union filtering depends on exactly this behavior.
    pub fn contains_segment(&self, segment: &Segment) -> bool {
        self.contains_point(&segment.midpoint())
    }

    /// True when any pair of boundary segments crosses.
    pub fn intersects_polygon(&self, other: &Polygon) -> bool {
        self.segments.iter().any(|s1| {
            other
                .segments
                .iter()
                .any(|s2| segment_intersection(s1, s2).is_some())
        })
    }

    /// Minimum distance from `p` to the boundary.
    pub fn distance_to_point(&self, p: &Point2) -> f32 {
        self.segments
            .iter()
            .map(|seg| seg.distance_to_point(p))
            .fold(f32::INFINITY, f32::min)
    }

    /// Minimum vertex-to-boundary distance between the two polygons,
    /// evaluated in both directions.
    pub fn distance_to_polygon(&self, other: &Polygon) -> f32 {
        let here = self
            .points
            .iter()
            .map(|p| other.distance_to_point(p))
            .fold(f32::INFINITY, f32::min);
        let there = other
            .points
            .iter()
            .map(|p| self.distance_to_point(p))
            .fold(f32::INFINITY, f32::min);
        here.min(there)
    }

    /// Mean of the vertices.
    pub fn centroid(&self) -> Point2 {
        if self.points.is_empty() {
            return Point2::new(0.0, 0.0);
        }
        let sum = self
            .points
            .iter()
            .fold(Point2::new(0.0, 0.0), |acc, p| acc.add(p));
        sum.scale(1.0 / self.points.len() as f32)
    }

    /// Uniformly scaled copy about the vertex centroid.
    pub fn scaled(&self, factor: f32) -> Polygon {
        let c = self.centroid();
        Polygon::new(
            self.points
                .iter()
                .map(|p| c.add(&p.sub(&c).scale(factor)))
                .collect(),
        )
    }

    /// Boolean union of a set of polygons, returned as an unordered bag of
    /// boundary segments rather than a reassembled loop.
    ///
    /// Two phases: every polygon pair's boundary lists are refined by
    /// splitting at crossings strictly interior to both segments, then a
    /// refined segment is kept only if no other polygon claims it via the
    /// midpoint containment heuristic.
    pub fn union(polygons: &[Polygon]) -> Vec<Segment> {
        let mut refined: Vec<Vec<Segment>> = polygons.iter().map(|p| p.segments.clone()).collect();

        for i in 0..refined.len() {
            for j in (i + 1)..refined.len() {
                let (first, second) = break_pair(&refined[i], &refined[j]);
                refined[i] = first;
                refined[j] = second;
            }
        }

        let mut kept = Vec::new();
        for (i, segments) in refined.iter().enumerate() {
            for seg in segments {
                let swallowed = polygons
                    .iter()
                    .enumerate()
                    .any(|(j, other)| j != i && other.contains_segment(seg));
                if !swallowed {
                    kept.push(*seg);
                }
            }
        }
        kept
    }
}

/// Refine two boundary segment lists against each other, splitting both
/// members of every crossing pair at the intersection point. Returns new
/// lists; the inputs are untouched.
///
/// A crossing splits only when its offsets differ from exactly 0 and
/// exactly 1 on both segments, so shared endpoints never split.
fn break_pair(first: &[Segment], second: &[Segment]) -> (Vec<Segment>, Vec<Segment>) {
    let mut first = first.to_vec();
    let mut second = second.to_vec();

    let mut i = 0;
    while i < first.len() {
        let mut j = 0;
        while j < second.len() {
            if let Some(int) = segment_intersection(&first[i], &second[j]) {
                if int.t != 0.0 && int.t != 1.0 && int.u != 0.0 && int.u != 1.0 {
                    let tail = first[i].b;
                    first[i].b = int.point;
                    first.insert(i + 1, Segment::new(int.point, tail));

                    let tail = second[j].b;
                    second[j].b = int.point;
                    second.insert(j + 1, Segment::new(int.point, tail));
                }
            }
            j += 1;
        }
        i += 1;
    }
    (first, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f32, y: f32, size: f32) -> Polygon {
        Polygon::new(vec![
            Point2::new(x, y),
            Point2::new(x + size, y),
            Point2::new(x + size, y + size),
            Point2::new(x, y + size),
        ])
    }

    #[test]
    fn test_boundary_closes_loop() {
        let poly = square(0.0, 0.0, 1.0);

        assert_eq!(poly.segments().len(), 4);
        assert_eq!(poly.segments()[3].b, poly.points()[0]);
    }

    #[test]
    fn test_contains_point_unit_square() {
        let poly = square(0.0, 0.0, 1.0);

        assert!(poly.contains_point(&Point2::new(0.5, 0.5)));
        assert!(!poly.contains_point(&Point2::new(2.0, 2.0)));
    }

    #[test]
    fn test_contains_segment_uses_midpoint() {
        let poly = square(0.0, 0.0, 10.0);
        // Both endpoints outside but the midpoint inside: the heuristic
        // claims containment, which union filtering relies on.
        let through = Segment::new(Point2::new(-1.0, 5.0), Point2::new(11.0, 5.0));

        assert!(poly.contains_segment(&through));
    }

    #[test]
    fn test_union_disjoint_returns_all_segments() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(100.0, 100.0, 1.0);

        let soup = Polygon::union(&[a.clone(), b.clone()]);

        assert_eq!(soup.len(), 8);
        for seg in a.segments().iter().chain(b.segments()) {
            assert!(soup.contains(seg));
        }
    }

    #[test]
    fn test_union_identical_rectangles_drops_interior() {
        let a = square(0.0, 0.0, 2.0);
        let b = square(0.0, 0.0, 2.0);

        let soup = Polygon::union(&[a, b]);

        assert!(soup.len() < 8);
    }

    #[test]
    fn test_union_overlapping_squares_splits_at_crossings() {
        let a = square(0.0, 0.0, 2.0);
        let b = square(1.0, 1.0, 2.0);

        let soup = Polygon::union(&[a, b]);

        // Each square keeps two untouched sides and the outer half of each
        // side cut by the other square's boundary.
        assert_eq!(soup.len(), 8);
        // Interior halves around the overlap region are gone
        assert!(!soup.contains(&Segment::new(Point2::new(2.0, 1.0), Point2::new(2.0, 2.0))));
        assert!(!soup.contains(&Segment::new(Point2::new(1.0, 2.0), Point2::new(2.0, 2.0))));
    }

    #[test]
    fn test_scaled_about_centroid() {
        let poly = square(0.0, 0.0, 2.0);
        let grown = poly.scaled(1.5);

        assert_eq!(grown.centroid(), poly.centroid());
        assert_eq!(grown.points()[0], Point2::new(-0.5, -0.5));
    }

    #[test]
    fn test_distance_to_polygon_between_squares() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(3.0, 0.0, 1.0);

        assert!((a.distance_to_polygon(&b) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_intersects_polygon() {
        let a = square(0.0, 0.0, 2.0);
        let b = square(1.0, 1.0, 2.0);
        let c = square(10.0, 10.0, 1.0);

        assert!(a.intersects_polygon(&b));
        assert!(!a.intersects_polygon(&c));
    }
}
