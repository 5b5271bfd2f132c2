use super::buildings::{self, Building};
use super::trees::{self, Tree};
use crate::config::WorldGenConfig;
use crate::geometry::{Envelope, Polygon, Segment};
use crate::graph::RoadGraph;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

/// Scale factor applied to road envelope polygons for the drawable
/// surface, leaving the unscaled union as the curb line.
const ROAD_SURFACE_OVERDRAW: f32 = 1.2;

/// The generated world layout: everything derived from a road graph by
/// one `generate` pass.
///
/// The graph is borrowed per call rather than owned; the world remembers
/// which graph version it last generated from, and
/// [`needs_regeneration`](World::needs_regeneration) is the pull-based
/// dirty check consumers run each tick. A separate version counter covers
/// the derived outputs so external caches can invalidate independently of
/// the graph's own counter.
#[derive(Debug, Clone)]
pub struct World {
    config: WorldGenConfig,
    seed: u64,
    version: u64,
    generated_from: Option<u64>,
    road_envelopes: Vec<Envelope>,
    road_surfaces: Vec<Polygon>,
    road_borders: Vec<Segment>,
    buildings: Vec<Building>,
    trees: Vec<Tree>,
    lane_guides: Vec<Segment>,
}

impl World {
    pub fn new(config: WorldGenConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            version: 0,
            generated_from: None,
            road_envelopes: Vec::new(),
            road_surfaces: Vec::new(),
            road_borders: Vec::new(),
            buildings: Vec::new(),
            trees: Vec::new(),
            lane_guides: Vec::new(),
        }
    }

    pub fn config(&self) -> &WorldGenConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Replace the seed; the next dirty check reports stale regardless of
    /// the graph version.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.generated_from = None;
    }

    /// Version counter for the derived outputs. Advances once per
    /// completed `generate` pass.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// True when the graph has mutated since the last `generate` pass.
    pub fn needs_regeneration(&self, graph: &RoadGraph) -> bool {
        self.generated_from != Some(graph.version())
    }

    /// Run the full pipeline against the graph's current segments.
    ///
    /// Deterministic for a given graph content and seed. Runs to
    /// completion synchronously; degenerate input (zero-length or
    /// self-intersecting user segments) degrades into degenerate geometry
    /// rather than an error.
    pub fn generate(&mut self, graph: &RoadGraph) {
        let segments: Vec<Segment> = graph.segments().collect();
        let roads = &self.config.roads;

        self.road_envelopes = segments
            .iter()
            .map(|seg| Envelope::new(*seg, roads.width, roads.roundness))
            .collect();
        self.road_surfaces = self
            .road_envelopes
            .iter()
            .map(|env| env.polygon().scaled(ROAD_SURFACE_OVERDRAW))
            .collect();

        let envelope_polys: Vec<Polygon> = self
            .road_envelopes
            .iter()
            .map(|env| env.polygon().clone())
            .collect();
        self.road_borders = Polygon::union(&envelope_polys);

        self.buildings = buildings::generate_buildings(&segments, &self.config);

        let mut rng = StdRng::seed_from_u64(self.seed);
        self.trees = trees::scatter_trees(
            &self.road_borders,
            &self.buildings,
            &envelope_polys,
            &self.config.trees,
            &mut rng,
        );

        let lane_polys: Vec<Polygon> = segments
            .iter()
            .map(|seg| {
                Envelope::new(*seg, roads.width / 2.0, roads.roundness)
                    .polygon()
                    .clone()
            })
            .collect();
        self.lane_guides = Polygon::union(&lane_polys);

        self.generated_from = Some(graph.version());
        self.version += 1;

        info!(
            roads = segments.len(),
            borders = self.road_borders.len(),
            buildings = self.buildings.len(),
            trees = self.trees.len(),
            lane_guides = self.lane_guides.len(),
            "world generated"
        );
    }

    /// One stadium envelope per road segment, at full road width.
    pub fn road_envelopes(&self) -> &[Envelope] {
        &self.road_envelopes
    }

    /// Drawable road surface polygons, slightly larger than the envelopes.
    pub fn road_surfaces(&self) -> &[Polygon] {
        &self.road_surfaces
    }

    /// Curb-line segment soup from the union of all road envelopes. Not a
    /// closed loop; consumers must tolerate unordered segments.
    pub fn road_borders(&self) -> &[Segment] {
        &self.road_borders
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// Centerline-adjacent guide segments at half road width, consumed by
    /// external traffic logic.
    pub fn lane_guides(&self) -> &[Segment] {
        &self.lane_guides
    }
}
