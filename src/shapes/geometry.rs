// src/shapes/geometry.rs
//! Immutable triangle geometry and the sources it is built from.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, Mesh, VertexAttributeValues};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScatterError};

/// Stable identity of a source shape (mesh asset id, name hash, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeIdentity(pub u64);

impl ShapeIdentity {
    /// FNV-1a of the name; stable across runs and platforms.
    pub fn from_name(name: &str) -> Self {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        for b in name.bytes() {
            h ^= b as u64;
            h = h.wrapping_mul(0x0000_0100_0000_01b3);
        }
        Self(h)
    }
}

/// Vertex positions plus a triangle list. Every index is below the vertex count.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
}

impl Geometry {
    pub fn new(identity: ShapeIdentity, vertices: Vec<Vec3>, indices: Vec<u32>) -> Result<Self> {
        if indices.len() % 3 != 0 {
            return Err(ScatterError::NotTriangleList { identity, count: indices.len() });
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(ScatterError::IndexOutOfRange {
                identity,
                index,
                vertex_count: vertices.len(),
            });
        }
        Ok(Self { vertices, indices })
    }

    /// Copy positions and indices out of a Bevy mesh. Non-indexed meshes get a
    /// sequential index list.
    pub fn from_mesh(identity: ShapeIdentity, src: &Mesh) -> Result<Self> {
        let vertices: Vec<Vec3> = match src.attribute(Mesh::ATTRIBUTE_POSITION) {
            Some(VertexAttributeValues::Float32x3(v)) => v.iter().map(|&p| Vec3::from_array(p)).collect(),
            _ => return Err(ScatterError::MissingPositions { identity }),
        };

        let indices: Vec<u32> = match src.indices() {
            Some(Indices::U32(v)) => v.clone(),
            Some(Indices::U16(v)) => v.iter().map(|&x| x as u32).collect(),
            None => (0..vertices.len() as u32).collect(),
        };

        Self::new(identity, vertices, indices)
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

// ---------- Sources ----------

/// Stable-identity access to a shape's raw arrays.
pub trait GeometrySource {
    fn identity(&self) -> ShapeIdentity;
    fn build_geometry(&self) -> Result<Geometry>;
}

impl<T: GeometrySource + ?Sized> GeometrySource for &T {
    fn identity(&self) -> ShapeIdentity {
        (**self).identity()
    }
    fn build_geometry(&self) -> Result<Geometry> {
        (**self).build_geometry()
    }
}

/// Owned vertex/index arrays with an explicit identity.
#[derive(Clone, Debug)]
pub struct SourceShape {
    pub identity: ShapeIdentity,
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl SourceShape {
    pub fn new(identity: ShapeIdentity, vertices: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { identity, vertices, indices }
    }

    pub fn named(name: &str, vertices: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self::new(ShapeIdentity::from_name(name), vertices, indices)
    }
}

impl GeometrySource for SourceShape {
    fn identity(&self) -> ShapeIdentity {
        self.identity
    }
    fn build_geometry(&self) -> Result<Geometry> {
        Geometry::new(self.identity, self.vertices.clone(), self.indices.clone())
    }
}

/// Borrowed Bevy mesh with an identity chosen by the caller (typically its asset id).
pub struct MeshShape<'a> {
    pub identity: ShapeIdentity,
    pub mesh: &'a Mesh,
}

impl GeometrySource for MeshShape<'_> {
    fn identity(&self) -> ShapeIdentity {
        self.identity
    }
    fn build_geometry(&self) -> Result<Geometry> {
        Geometry::from_mesh(self.identity, self.mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::PrimitiveTopology;

    #[test]
    fn rejects_out_of_range_index() {
        let id = ShapeIdentity(7);
        let err = Geometry::new(id, vec![Vec3::ZERO; 3], vec![0, 1, 3]).unwrap_err();
        assert_eq!(err, ScatterError::IndexOutOfRange { identity: id, index: 3, vertex_count: 3 });
    }

    #[test]
    fn rejects_partial_triangles() {
        let err = Geometry::new(ShapeIdentity(1), vec![Vec3::ZERO; 3], vec![0, 1]).unwrap_err();
        assert!(err.is_invalid_geometry());
    }

    #[test]
    fn reads_bevy_mesh_with_u16_indices() {
        let positions: Vec<[f32; 3]> =
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]];
        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, Default::default());
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_indices(Indices::U16(vec![0, 1, 2, 2, 1, 3]));

        let g = MeshShape { identity: ShapeIdentity(3), mesh: &mesh }.build_geometry().unwrap();
        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.indices(), &[0, 1, 2, 2, 1, 3]);
    }

    #[test]
    fn mesh_without_positions_is_rejected() {
        let mesh = Mesh::new(PrimitiveTopology::TriangleList, Default::default());
        let err = Geometry::from_mesh(ShapeIdentity(4), &mesh).unwrap_err();
        assert_eq!(err, ScatterError::MissingPositions { identity: ShapeIdentity(4) });
    }

    #[test]
    fn name_identity_is_stable() {
        assert_eq!(ShapeIdentity::from_name("leaf"), ShapeIdentity::from_name("leaf"));
        assert_ne!(ShapeIdentity::from_name("leaf"), ShapeIdentity::from_name("petal"));
    }
}
