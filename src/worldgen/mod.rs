/// World generation pipeline: road envelopes and borders, building
/// placement along guide corridors, tree scatter, and lane-guide
/// extraction, all derived from the road graph.
pub mod buildings;
pub mod trees;
pub mod world;

// Re-export main types for convenience
pub use buildings::Building;
pub use trees::Tree;
pub use world::World;
