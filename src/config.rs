use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Tunable scalars for the generation pipeline. Loadable from a TOML file
/// and embeddable in world files so a saved world carries its tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldGenConfig {
    pub roads: RoadSettings,
    pub buildings: BuildingSettings,
    pub trees: TreeSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadSettings {
    /// Road surface width in world units
    pub width: f32,
    /// Angular steps per envelope cap; higher is rounder
    pub roundness: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingSettings {
    /// Footprint depth perpendicular to the guide corridor
    pub width: f32,
    /// Shortest footprint side along the corridor
    pub min_length: f32,
    /// Required clearance between footprints and around corridors
    pub spacing: f32,
    /// Extrusion height handed to the renderer
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSettings {
    /// Trunk-to-canopy radius used for spacing and instance scale
    pub radius: f32,
    /// Instance height handed to the renderer
    pub height: f32,
    /// Instance scale multiplier handed to the renderer
    pub scale: f32,
    /// Target number of trees per generation
    pub count: usize,
    /// Consecutive rejected samples before the scatter gives up
    pub max_placement_attempts: u32,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            roads: RoadSettings {
                width: 100.0,
                roundness: 10,
            },
            buildings: BuildingSettings {
                width: 150.0,
                min_length: 150.0,
                spacing: 50.0,
                height: 200.0,
            },
            trees: TreeSettings {
                radius: 80.0,
                height: 200.0,
                scale: 1.0,
                count: 64,
                max_placement_attempts: 100,
            },
        }
    }
}

impl WorldGenConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: WorldGenConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}, using defaults", e);
            Self::default()
        })
    }
}
