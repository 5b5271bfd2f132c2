//! Procedural 2D world layout generation for StreetSim.
//!
//! A user-editable road graph is turned into a complete renderable layout:
//! road surface polygons, curb border segments, building footprints, tree
//! placements, and lane guides for traffic logic. Generation is pull-based
//! (consumers regenerate when the graph's version token changes) and fully
//! deterministic for a given graph and seed.

pub mod config;
pub mod geometry;
pub mod graph;
pub mod world_loader;
pub mod world_mesh;
pub mod worldgen;

pub use config::WorldGenConfig;
pub use geometry::{Envelope, Point2, Polygon, Segment};
pub use graph::{PointId, RoadGraph};
pub use world_loader::{WorldFileFormat, WorldLoader};
pub use worldgen::{Building, Tree, World};
