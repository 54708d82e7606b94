// src/level/mesh.rs
//! Occupancy grid -> flat floor mesh.
//!
//! One vertex per grid corner, two triangles per occupied cell. The buffers are
//! handed to a [`MeshSink`] once and never touched again.

use bevy::log::warn;
use bevy::render::mesh::{Indices, Mesh, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use super::meta_map::OccupancyGrid;

/// Same tangent frame for every vertex of the flat floor.
pub const FLOOR_TANGENT: [f32; 4] = [1.0, 0.0, 0.0, -1.0];

/// Receiver for finished floor buffers (renderer, collider, test double...).
pub trait MeshSink {
    fn set_vertices(&mut self, positions: Vec<[f32; 3]>);
    fn set_uvs(&mut self, uvs: Vec<[f32; 2]>);
    fn set_tangents(&mut self, tangents: Vec<[f32; 4]>);
    fn set_triangles(&mut self, indices: Vec<u32>);
    fn recalculate_normals(&mut self);
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LevelMesh {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub tangents: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
}

impl LevelMesh {
    /// Number of floor quads actually emitted.
    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }

    /// Hand all buffers to `sink`, then ask it for normals.
    pub fn apply_to<S: MeshSink + ?Sized>(self, sink: &mut S) {
        sink.set_vertices(self.positions);
        sink.set_uvs(self.uvs);
        sink.set_tangents(self.tangents);
        sink.set_triangles(self.indices);
        sink.recalculate_normals();
    }

    pub fn into_bevy_mesh(self) -> Mesh {
        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
        self.apply_to(&mut mesh);
        mesh
    }
}

/// Build the floor for `grid`. `quad_upper_bound` only presizes the index buffer;
/// the emitted index count is always 6 × occupied cells.
pub fn build_level_mesh(grid: &OccupancyGrid, quad_upper_bound: usize) -> LevelMesh {
    let (cells_x, cells_z) = (grid.width(), grid.depth());
    let verts_x = cells_x + 1;
    let verts_z = cells_z + 1;
    let vert_count = verts_x * verts_z;

    // 1) Corner lattice
    let mut positions = Vec::with_capacity(vert_count);
    let mut uvs = Vec::with_capacity(vert_count);
    for z in 0..verts_z {
        for x in 0..verts_x {
            positions.push([x as f32, 0.0, z as f32]);
            uvs.push([x as f32, z as f32]);
        }
    }
    let tangents = vec![FLOOR_TANGENT; vert_count];

    // 2) Two tris per occupied cell
    let capacity = quad_upper_bound * 6;
    let mut indices: Vec<u32> = Vec::with_capacity(capacity);
    let stride = verts_x as u32;
    for z in 0..cells_z {
        for x in 0..cells_x {
            if !grid.get(x, z) {
                continue;
            }
            let a = z as u32 * stride + x as u32;
            let c = a + stride;
            indices.extend_from_slice(&[a, c, a + 1, a + 1, c, c + 1]);
        }
    }

    if indices.len() > capacity {
        warn!(
            "Level: quad bound {} too small for {} occupied cells",
            quad_upper_bound,
            indices.len() / 6
        );
    }

    LevelMesh { positions, uvs, tangents, indices }
}

impl MeshSink for Mesh {
    fn set_vertices(&mut self, positions: Vec<[f32; 3]>) {
        self.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    }

    fn set_uvs(&mut self, uvs: Vec<[f32; 2]>) {
        self.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    }

    fn set_tangents(&mut self, tangents: Vec<[f32; 4]>) {
        self.insert_attribute(Mesh::ATTRIBUTE_TANGENT, tangents);
    }

    fn set_triangles(&mut self, indices: Vec<u32>) {
        self.insert_indices(Indices::U32(indices));
    }

    fn recalculate_normals(&mut self) {
        self.compute_normals();
    }
}
