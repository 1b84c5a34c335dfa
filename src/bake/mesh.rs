// src/bake/mesh.rs
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};

use crate::live::TransformHandle;

/// Merged output of a bake: one vertex/color pair per vertex, u32 triangle-list indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CombinedMesh {
    pub vertices: Vec<Vec3>,
    pub colors: Vec<Vec4>,
    pub indices: Vec<u32>,
}

impl CombinedMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    /// Axis-aligned (min, max) over all vertices.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), v| (lo.min(*v), hi.max(*v))))
    }

    /// Parallel color buffer, whole triangles, every index in range.
    pub fn is_well_formed(&self) -> bool {
        let n = self.vertices.len() as u64;
        self.colors.len() == self.vertices.len()
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| (i as u64) < n)
    }

    /// Render-ready Bevy mesh with positions, vertex colors and recomputed normals.
    pub fn to_bevy_mesh(&self) -> Mesh {
        let positions: Vec<[f32; 3]> = self.vertices.iter().map(|v| v.to_array()).collect();
        let colors: Vec<[f32; 4]> = self.colors.iter().map(|c| c.to_array()).collect();

        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, Default::default());
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
        mesh.insert_indices(Indices::U32(self.indices.clone()));
        if !self.indices.is_empty() {
            mesh.compute_normals();
        }
        mesh
    }
}

/// Receives finished output. Implemented by whatever owns the renderer.
pub trait RenderSink {
    fn present_mesh(&mut self, mesh: &CombinedMesh);
    fn present_transforms(&mut self, handles: &[TransformHandle]);
}
