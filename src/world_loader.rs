use crate::config::WorldGenConfig;
use crate::geometry::{Point2, Polygon, Segment};
use crate::graph::RoadGraph;
use crate::worldgen::{Building, Tree, World};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum WorldFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// On-disk shape of a saved world: the road graph as flat lists, the
/// generation scalars, and the seed. Derived geometry is never persisted;
/// it is reproduced by replaying generation against the graph and seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldFileFormat {
    pub name: String,
    pub points: Vec<PointRecord>,
    #[serde(default)]
    pub segments: Vec<SegmentRecord>,
    #[serde(default)]
    pub seed: u64,
    /// Generation tuning carried with the world; falls back to the tool
    /// config or defaults when absent
    #[serde(default)]
    pub settings: Option<WorldGenConfig>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PointRecord {
    pub x: f32,
    pub y: f32,
}

/// Segment endpoints as indices into the point list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub a: usize,
    pub b: usize,
}

pub struct WorldLoader;

impl WorldLoader {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<WorldFileFormat, WorldFileError> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        if ext == "msgpack" {
            let bytes = fs::read(path)?;
            let world: WorldFileFormat = rmp_serde::from_slice(&bytes)
                .map_err(|e| WorldFileError::Parse(format!("MessagePack parse error: {}", e)))?;
            Self::validate(&world)?;
            return Ok(world);
        }
        let content = fs::read_to_string(path)?;
        Self::load_from_string(&content)
    }

    pub fn load_from_string(content: &str) -> Result<WorldFileFormat, WorldFileError> {
        let world: WorldFileFormat = if content.trim_start().starts_with('{') {
            serde_json::from_str(content)
                .map_err(|e| WorldFileError::Parse(format!("JSON parse error: {}", e)))?
        } else {
            serde_yaml::from_str(content)
                .map_err(|e| WorldFileError::Parse(format!("YAML parse error: {}", e)))?
        };

        Self::validate(&world)?;
        Ok(world)
    }

    fn validate(world: &WorldFileFormat) -> Result<(), WorldFileError> {
        for (i, seg) in world.segments.iter().enumerate() {
            if seg.a >= world.points.len() || seg.b >= world.points.len() {
                return Err(WorldFileError::InvalidData(format!(
                    "Segment {} references out-of-range point: a={}, b={}, points={}",
                    i,
                    seg.a,
                    seg.b,
                    world.points.len()
                )));
            }
            if seg.a == seg.b {
                return Err(WorldFileError::InvalidData(format!(
                    "Segment {} is degenerate: both endpoints are point {}",
                    i, seg.a
                )));
            }
        }
        Ok(())
    }

    /// Write a world file; the format follows the extension (`yaml`/`yml`,
    /// `json`, or `msgpack`).
    pub fn save_to_file<P: AsRef<Path>>(
        world: &WorldFileFormat,
        path: P,
    ) -> Result<(), WorldFileError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("yaml")
            .to_lowercase();

        let bytes = match ext.as_str() {
            "json" => serde_json::to_vec_pretty(world)
                .map_err(|e| WorldFileError::Parse(format!("JSON encode error: {}", e)))?,
            "yaml" | "yml" => serde_yaml::to_string(world)
                .map_err(|e| WorldFileError::Parse(format!("YAML encode error: {}", e)))?
                .into_bytes(),
            "msgpack" => rmp_serde::to_vec(world)
                .map_err(|e| WorldFileError::Parse(format!("MessagePack encode error: {}", e)))?,
            other => {
                return Err(WorldFileError::InvalidData(format!(
                    "Unsupported output format: {}",
                    other
                )))
            }
        };

        fs::write(path, bytes)?;
        Ok(())
    }

    /// Build the runtime graph from a loaded file.
    pub fn build_graph(world: &WorldFileFormat) -> RoadGraph {
        let points: Vec<Point2> = world
            .points
            .iter()
            .map(|p| Point2::new(p.x, p.y))
            .collect();
        let segments: Vec<(usize, usize)> =
            world.segments.iter().map(|s| (s.a, s.b)).collect();
        RoadGraph::from_lists(&points, &segments)
    }

    /// Flatten a graph back into the file shape.
    pub fn to_file_format(
        name: &str,
        graph: &RoadGraph,
        seed: u64,
        settings: Option<WorldGenConfig>,
    ) -> WorldFileFormat {
        let (points, segments) = graph.to_lists();
        WorldFileFormat {
            name: name.to_string(),
            points: points
                .into_iter()
                .map(|p| PointRecord { x: p.x, y: p.y })
                .collect(),
            segments: segments
                .into_iter()
                .map(|(a, b)| SegmentRecord { a, b })
                .collect(),
            seed,
            settings,
        }
    }
}

/// Snapshot of a world's derived outputs, cached next to the world file so
/// consumers can skip a generation pass when nothing changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldLayout {
    pub seed: u64,
    pub road_surfaces: Vec<Polygon>,
    pub road_borders: Vec<Segment>,
    pub buildings: Vec<Building>,
    pub trees: Vec<Tree>,
    pub lane_guides: Vec<Segment>,
}

impl WorldLayout {
    pub fn from_world(world: &World) -> Self {
        Self {
            seed: world.seed(),
            road_surfaces: world.road_surfaces().to_vec(),
            road_borders: world.road_borders().to_vec(),
            buildings: world.buildings().to_vec(),
            trees: world.trees().to_vec(),
            lane_guides: world.lane_guides().to_vec(),
        }
    }
}

/// Cache file path for a world file: `<stem>.layout.msgpack` alongside it.
pub fn layout_cache_path(world_file: &Path) -> PathBuf {
    let mut cache_path = world_file.to_path_buf();
    let stem = cache_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "world".to_string());
    cache_path.set_file_name(format!("{}.layout.msgpack", stem));
    cache_path
}

pub fn save_layout_cache(world_file: &Path, layout: &WorldLayout) -> Result<(), WorldFileError> {
    let bytes = rmp_serde::to_vec(layout)
        .map_err(|e| WorldFileError::Parse(format!("Failed to serialize layout: {}", e)))?;
    fs::write(layout_cache_path(world_file), bytes)?;
    Ok(())
}

/// Load the layout cache for a world file, if present and readable.
pub fn load_layout_cache(world_file: &Path) -> Option<WorldLayout> {
    let cache_path = layout_cache_path(world_file);
    if !cache_path.exists() {
        return None;
    }

    let bytes = fs::read(&cache_path).ok()?;
    rmp_serde::from_slice(&bytes)
        .map_err(|e| {
            warn!(
                "Failed to parse layout cache {}: {}",
                cache_path.display(),
                e
            );
            e
        })
        .ok()
}
