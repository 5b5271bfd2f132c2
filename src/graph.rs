use crate::geometry::{Point2, Segment};
use slotmap::{new_key_type, SlotMap};
use std::collections::HashMap;

new_key_type! {
    /// Stable handle to a point in the road graph arena. Handles survive
    /// unrelated insertions and removals, and `move_point` updates a point
    /// in place without invalidating segments that reference it.
    pub struct PointId;
}

/// The user-authored road skeleton: a set of unique points and the
/// undirected segments connecting them.
///
/// Points live in an arena keyed by [`PointId`]; segments are stored as
/// handle pairs. A position-keyed index preserves exact-value lookup for
/// editor hit-testing. Every successful structural mutation advances a
/// monotonic version counter, which is the only signal consumers use to
/// decide whether derived geometry needs regeneration.
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    points: SlotMap<PointId, Point2>,
    order: Vec<PointId>,
    segments: Vec<(PointId, PointId)>,
    by_position: HashMap<(u32, u32), PointId>,
    version: u64,
}

impl RoadGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a graph from the flat lists of a world file: points in
    /// order, segments as index pairs into that order. Duplicate points
    /// collapse onto the first occurrence; segment entries with
    /// out-of-range indices or identical endpoints are skipped.
    pub fn from_lists(points: &[Point2], segment_indices: &[(usize, usize)]) -> Self {
        let mut graph = Self::new();
        let ids: Vec<PointId> = points.iter().map(|p| graph.add_point(*p)).collect();
        for &(a, b) in segment_indices {
            if let (Some(&ia), Some(&ib)) = (ids.get(a), ids.get(b)) {
                graph.try_add_segment(ia, ib);
            }
        }
        graph
    }

    /// Flatten back to the world-file shape: points in insertion order,
    /// segments as index pairs into that list.
    pub fn to_lists(&self) -> (Vec<Point2>, Vec<(usize, usize)>) {
        let points: Vec<Point2> = self.points().map(|(_, p)| p).collect();
        let index_of: HashMap<PointId, usize> = self
            .order
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect();
        let segments = self
            .segments
            .iter()
            .filter_map(|(a, b)| Some((*index_of.get(a)?, *index_of.get(b)?)))
            .collect();
        (points, segments)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    fn bump(&mut self) {
        self.version += 1;
    }

    pub fn point_count(&self) -> usize {
        self.order.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty() && self.segments.is_empty()
    }

    /// Points in stable insertion order.
    pub fn points(&self) -> impl Iterator<Item = (PointId, Point2)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.points.get(*id).map(|p| (*id, *p)))
    }

    /// Segments resolved to their current endpoint positions.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.segments.iter().filter_map(move |(a, b)| {
            let pa = self.points.get(*a)?;
            let pb = self.points.get(*b)?;
            Some(Segment::new(*pa, *pb))
        })
    }

    pub fn segment_handles(&self) -> &[(PointId, PointId)] {
        &self.segments
    }

    pub fn point(&self, id: PointId) -> Option<Point2> {
        self.points.get(id).copied()
    }

    /// Exact-value membership test.
    pub fn contains_point(&self, p: &Point2) -> bool {
        self.by_position.contains_key(&p.position_key())
    }

    /// Exact-value lookup, the handle-based replacement for equality-keyed
    /// storage that the editor's hit-testing relies on.
    pub fn find_point(&self, p: &Point2) -> Option<PointId> {
        self.by_position.get(&p.position_key()).copied()
    }

    /// Insert a point unless one with the same position already exists.
    pub fn try_add_point(&mut self, p: Point2) -> Option<PointId> {
        if self.contains_point(&p) {
            None
        } else {
            Some(self.add_point(p))
        }
    }

    /// Insert a point, returning the existing handle when the position is
    /// already present. Never creates a duplicate position.
    pub fn add_point(&mut self, p: Point2) -> PointId {
        if let Some(existing) = self.find_point(&p) {
            return existing;
        }
        let id = self.points.insert(p);
        self.order.push(id);
        self.by_position.insert(p.position_key(), id);
        self.bump();
        id
    }

    /// Move a point in place. Segments referencing the handle follow
    /// automatically. Refuses to collapse onto another existing point.
    pub fn move_point(&mut self, id: PointId, to: Point2) -> bool {
        let Some(current) = self.points.get(id).copied() else {
            return false;
        };
        if current == to {
            return true;
        }
        if let Some(occupant) = self.find_point(&to) {
            if occupant != id {
                return false;
            }
        }
        self.by_position.remove(&current.position_key());
        self.points[id] = to;
        self.by_position.insert(to.position_key(), id);
        self.bump();
        true
    }

    /// Remove a point and, synchronously, every segment referencing it.
    /// Segments are never left dangling.
    pub fn remove_point(&mut self, id: PointId) -> bool {
        let Some(p) = self.points.remove(id) else {
            return false;
        };
        self.segments.retain(|(a, b)| *a != id && *b != id);
        self.order.retain(|other| *other != id);
        self.by_position.remove(&p.position_key());
        self.bump();
        true
    }

    /// Undirected membership test on segment handles.
    pub fn contains_segment(&self, a: PointId, b: PointId) -> bool {
        self.segments
            .iter()
            .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
    }

    /// Connect two existing points unless the edge is already present in
    /// either orientation.
    pub fn try_add_segment(&mut self, a: PointId, b: PointId) -> bool {
        if a == b
            || !self.points.contains_key(a)
            || !self.points.contains_key(b)
            || self.contains_segment(a, b)
        {
            return false;
        }
        self.segments.push((a, b));
        self.bump();
        true
    }

    pub fn add_segment(&mut self, a: PointId, b: PointId) {
        self.try_add_segment(a, b);
    }

    /// Remove the edge between two points, matching either orientation.
    pub fn remove_segment(&mut self, a: PointId, b: PointId) -> bool {
        let before = self.segments.len();
        self.segments
            .retain(|&(x, y)| !((x == a && y == b) || (x == b && y == a)));
        if self.segments.len() != before {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Closest existing point within `threshold` of `p`, if any.
    pub fn nearest_point(&self, p: &Point2, threshold: f32) -> Option<PointId> {
        let mut best: Option<(PointId, f32)> = None;
        for (id, candidate) in self.points() {
            let dist = candidate.distance(p);
            if dist < threshold && best.map_or(true, |(_, d)| dist < d) {
                best = Some((id, dist));
            }
        }
        best.map(|(id, _)| id)
    }

    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        self.points.clear();
        self.order.clear();
        self.segments.clear();
        self.by_position.clear();
        self.bump();
    }
}
