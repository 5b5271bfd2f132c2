use super::point::Point2;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// An undirected line segment between two ground-plane points.
///
/// `Segment::new(a, b)` and `Segment::new(b, a)` compare and hash as equal,
/// so a collection keyed on segments cannot hold the same edge under both
/// orientations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Segment {
    pub a: Point2,
    pub b: Point2,
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }
}

// Endpoints come from editor input and derived geometry that never carries
// NaN coordinates; within that domain exact equality is total.
impl Eq for Segment {}

impl Hash for Segment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let ka = self.a.position_key();
        let kb = self.b.position_key();
        let (lo, hi) = if ka <= kb { (ka, kb) } else { (kb, ka) };
        lo.hash(state);
        hi.hash(state);
    }
}

impl Segment {
    pub fn new(a: Point2, b: Point2) -> Self {
        Self { a, b }
    }

    pub fn length(&self) -> f32 {
        self.a.distance(&self.b)
    }

    /// Unit direction from `a` to `b`. NaN components when the segment is
    /// degenerate (`a == b`); callers must avoid zero-length segments.
    pub fn direction(&self) -> Point2 {
        self.b.sub(&self.a).normalized()
    }

    pub fn midpoint(&self) -> Point2 {
        Point2::new((self.a.x + self.b.x) / 2.0, (self.a.y + self.b.y) / 2.0)
    }

    /// Perpendicular distance from `p` to the finite segment, clamped to the
    /// nearest endpoint beyond either end.
    pub fn distance_to_point(&self, p: &Point2) -> f32 {
        let d = self.b.sub(&self.a);
        let len_sq = d.x * d.x + d.y * d.y;
        if len_sq == 0.0 {
            return self.a.distance(p);
        }
        let t = ((p.x - self.a.x) * d.x + (p.y - self.a.y) * d.y) / len_sq;
        let t = t.clamp(0.0, 1.0);
        let nearest = Point2::new(self.a.x + t * d.x, self.a.y + t * d.y);
        nearest.distance(p)
    }

    /// Lazy sequence of non-overlapping sub-segments spaced along this
    /// segment, used for dashed lane-marking visuals.
    pub fn dashes(&self, dash_length: f32, gap_length: f32) -> impl Iterator<Item = Segment> {
        let total = self.length();
        let dir = self.direction();
        let start = self.a;
        let mut cursor = 0.0f32;
        std::iter::from_fn(move || {
            if dash_length <= 0.0 || cursor >= total {
                return None;
            }
            let end = (cursor + dash_length).min(total);
            let dash = Segment::new(start.add(&dir.scale(cursor)), start.add(&dir.scale(end)));
            cursor = end + gap_length;
            Some(dash)
        })
    }
}

/// Crossing of two finite segments, with the parametric offsets along each.
#[derive(Debug, Clone, Copy)]
pub struct Intersection {
    pub point: Point2,
    pub t: f32,
    pub u: f32,
}

/// Parametric segment-segment intersection via the cross-product formula.
///
/// A zero denominator (parallel or collinear segments) reports no
/// intersection; collinear overlap is not resolved. Offsets are accepted on
/// the closed range [0, 1].
pub fn segment_intersection(first: &Segment, second: &Segment) -> Option<Intersection> {
    let (p1, p2) = (first.a, first.b);
    let (p3, p4) = (second.a, second.b);

    let t_top = (p4.x - p3.x) * (p1.y - p3.y) - (p4.y - p3.y) * (p1.x - p3.x);
    let u_top = (p3.y - p1.y) * (p1.x - p2.x) - (p3.x - p1.x) * (p1.y - p2.y);
    let bottom = (p4.y - p3.y) * (p2.x - p1.x) - (p4.x - p3.x) * (p2.y - p1.y);

    if bottom == 0.0 {
        return None;
    }

    let t = t_top / bottom;
    let u = u_top / bottom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(Intersection {
            point: Point2::new(p1.x + (p2.x - p1.x) * t, p1.y + (p2.y - p1.y) * t),
            t,
            u,
        })
    } else {
        None
    }
}
