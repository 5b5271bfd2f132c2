use super::point::Point2;
use super::polygon::Polygon;
use super::segment::Segment;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};

/// A stadium-shaped buffer polygon around a skeleton segment: two
/// semicircular caps joined by straight sides implicit in the loop closure.
///
/// Immutable after construction. Used for road surfaces, building guide
/// corridors, and lane-guide extraction at different widths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    skeleton: Segment,
    polygon: Polygon,
}

impl Envelope {
    /// Buffer `skeleton` by `width / 2` on each side. `roundness` is the
    /// number of angular steps per cap; the generated polygon always has
    /// exactly `2 * (roundness + 1)` vertices.
    pub fn new(skeleton: Segment, width: f32, roundness: u32) -> Self {
        let polygon = Self::generate_polygon(&skeleton, width, roundness);
        Self { skeleton, polygon }
    }

    fn generate_polygon(skeleton: &Segment, width: f32, roundness: u32) -> Polygon {
        let radius = width / 2.0;
        let alpha = skeleton.a.sub(&skeleton.b).angle();
        let alpha_cw = alpha + FRAC_PI_2;
        let alpha_ccw = alpha - FRAC_PI_2;

        let step = PI / roundness.max(1) as f32;
        // Half-step slack keeps the final arc vertex from being dropped to
        // floating-point accumulation in the sweep.
        let eps = step / 2.0;

        let mut points = Vec::with_capacity(2 * (roundness.max(1) as usize + 1));
        let mut angle = alpha_ccw;
        while angle <= alpha_cw + eps {
            points.push(skeleton.a.translate(angle, radius));
            angle += step;
        }
        let mut angle = alpha_ccw;
        while angle <= alpha_cw + eps {
            points.push(skeleton.b.translate(PI + angle, radius));
            angle += step;
        }

        Polygon::new(points)
    }

    pub fn skeleton(&self) -> &Segment {
        &self.skeleton
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn vertices(&self) -> &[Point2] {
        self.polygon.points()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_count_follows_roundness() {
        let skeleton = Segment::new(Point2::new(0.0, 0.0), Point2::new(100.0, 0.0));

        for roundness in [1, 3, 10, 16] {
            let envelope = Envelope::new(skeleton, 20.0, roundness);
            assert_eq!(
                envelope.vertices().len(),
                2 * (roundness as usize + 1),
                "roundness {}",
                roundness
            );
        }
    }

    #[test]
    fn test_roundness_one_is_a_rectangle() {
        let skeleton = Segment::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        let envelope = Envelope::new(skeleton, 4.0, 1);

        assert_eq!(envelope.vertices().len(), 4);
        // All vertices sit radius away from the nearest skeleton endpoint
        for v in envelope.vertices() {
            let d = skeleton.a.distance(v).min(skeleton.b.distance(v));
            assert!((d - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_stadium_extents() {
        let skeleton = Segment::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        let envelope = Envelope::new(skeleton, 6.0, 10);

        let min_x = envelope.vertices().iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
        let max_x = envelope
            .vertices()
            .iter()
            .map(|p| p.x)
            .fold(f32::NEG_INFINITY, f32::max);
        let max_y = envelope
            .vertices()
            .iter()
            .map(|p| p.y)
            .fold(f32::NEG_INFINITY, f32::max);

        assert!((min_x + 3.0).abs() < 1e-3);
        assert!((max_x - 13.0).abs() < 1e-3);
        assert!((max_y - 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_skeleton_midpoint_is_inside() {
        let skeleton = Segment::new(Point2::new(5.0, 5.0), Point2::new(40.0, 20.0));
        let envelope = Envelope::new(skeleton, 10.0, 6);

        assert!(envelope.polygon().contains_point(&skeleton.midpoint()));
    }
}
