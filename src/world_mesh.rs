use crate::geometry::Polygon;
use crate::worldgen::World;
use serde::{Deserialize, Serialize};

/// Flat triangle-list mesh of a generated world, for preview export and
/// external triangulation consumers. Road surfaces become ground-level
/// fans; buildings become extruded prisms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldMesh {
    pub vertices: Vec<Vertex3>,
    pub normals: Vec<Normal3>,
    pub indices: Vec<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vertex3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Normal3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

const UP: Normal3 = Normal3 {
    x: 0.0,
    y: 0.0,
    z: 1.0,
};

pub struct WorldMeshGenerator;

impl WorldMeshGenerator {
    pub fn generate_mesh(world: &World) -> WorldMesh {
        let mut mesh = WorldMesh {
            vertices: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        };

        for surface in world.road_surfaces() {
            Self::add_flat_polygon(&mut mesh, surface, 0.0);
        }
        for building in world.buildings() {
            Self::add_prism(&mut mesh, &building.footprint, building.height);
        }

        mesh
    }

    /// Fan-triangulate a polygon at height `z`. Stadium and rectangle
    /// footprints are convex, so a fan from the first vertex is valid.
    fn add_flat_polygon(mesh: &mut WorldMesh, polygon: &Polygon, z: f32) {
        let points = polygon.points();
        if points.len() < 3 {
            return;
        }

        let base = mesh.vertices.len() as u32;
        for p in points {
            mesh.vertices.push(Vertex3 {
                x: p.x,
                y: p.y,
                z,
            });
            mesh.normals.push(UP);
        }
        for i in 1..(points.len() as u32 - 1) {
            mesh.indices.push(base);
            mesh.indices.push(base + i);
            mesh.indices.push(base + i + 1);
        }
    }

    /// Extrude a footprint to `height`: a roof fan plus one quad per wall,
    /// each wall with its own outward flat normal.
    fn add_prism(mesh: &mut WorldMesh, footprint: &Polygon, height: f32) {
        Self::add_flat_polygon(mesh, footprint, height);

        for seg in footprint.segments() {
            let edge = seg.b.sub(&seg.a);
            let len = edge.magnitude();
            if len == 0.0 {
                continue;
            }
            let normal = Normal3 {
                x: edge.y / len,
                y: -edge.x / len,
                z: 0.0,
            };

            let base = mesh.vertices.len() as u32;
            let corners = [
                (seg.a, 0.0),
                (seg.b, 0.0),
                (seg.b, height),
                (seg.a, height),
            ];
            for (p, z) in corners {
                mesh.vertices.push(Vertex3 {
                    x: p.x,
                    y: p.y,
                    z,
                });
                mesh.normals.push(normal);
            }
            mesh.indices.extend([base, base + 1, base + 2]);
            mesh.indices.extend([base, base + 2, base + 3]);
        }
    }

    pub fn export_obj(mesh: &WorldMesh) -> String {
        let mut obj = String::new();

        obj.push_str("# StreetSim world layout\n\n");

        for v in &mesh.vertices {
            obj.push_str(&format!("v {} {} {}\n", v.x, v.y, v.z));
        }
        obj.push('\n');
        for n in &mesh.normals {
            obj.push_str(&format!("vn {} {} {}\n", n.x, n.y, n.z));
        }
        obj.push('\n');
        for triangle in mesh.indices.chunks_exact(3) {
            let (i0, i1, i2) = (triangle[0] + 1, triangle[1] + 1, triangle[2] + 1);
            obj.push_str(&format!(
                "f {}//{} {}//{} {}//{}\n",
                i0, i0, i1, i1, i2, i2
            ));
        }

        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldGenConfig;
    use crate::geometry::Point2;
    use crate::graph::RoadGraph;

    fn generated_world() -> World {
        let mut graph = RoadGraph::new();
        let a = graph.add_point(Point2::new(-500.0, 0.0));
        let b = graph.add_point(Point2::new(500.0, 0.0));
        graph.add_segment(a, b);

        let mut world = World::new(WorldGenConfig::default(), 42);
        world.generate(&graph);
        world
    }

    #[test]
    fn test_mesh_counts_are_consistent() {
        let world = generated_world();
        let mesh = WorldMeshGenerator::generate_mesh(&world);

        assert!(!mesh.vertices.is_empty());
        assert_eq!(mesh.vertices.len(), mesh.normals.len());
        assert_eq!(mesh.indices.len() % 3, 0);
        let max_index = mesh.indices.iter().copied().max().unwrap() as usize;
        assert!(max_index < mesh.vertices.len());
    }

    #[test]
    fn test_buildings_add_elevated_vertices() {
        let world = generated_world();
        assert!(!world.buildings().is_empty());

        let mesh = WorldMeshGenerator::generate_mesh(&world);
        let height = world.config().buildings.height;
        assert!(mesh.vertices.iter().any(|v| v.z == height));
    }

    #[test]
    fn test_export_obj_structure() {
        let world = generated_world();
        let mesh = WorldMeshGenerator::generate_mesh(&world);
        let obj = WorldMeshGenerator::export_obj(&mesh);

        assert!(obj.contains("v "));
        assert!(obj.contains("vn "));
        assert!(obj.contains("f "));
        assert_eq!(
            obj.matches("\nv ").count(),
            mesh.vertices.len(),
            "one v line per vertex"
        );
    }
}
