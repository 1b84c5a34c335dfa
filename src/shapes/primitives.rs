// src/shapes/primitives.rs
//! Small built-in shapes, centered on the origin with unit extent.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{Geometry, GeometrySource, ShapeIdentity};
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Primitive {
    Triangle,
    Quad,
    Tetrahedron,
    Cube,
}

impl Primitive {
    pub const ALL: [Primitive; 4] =
        [Primitive::Triangle, Primitive::Quad, Primitive::Tetrahedron, Primitive::Cube];

    fn arrays(self) -> (Vec<Vec3>, Vec<u32>) {
        match self {
            Primitive::Triangle => (
                vec![Vec3::new(-0.5, -0.5, 0.0), Vec3::new(0.5, -0.5, 0.0), Vec3::new(0.0, 0.5, 0.0)],
                vec![0, 1, 2],
            ),
            Primitive::Quad => (
                vec![
                    Vec3::new(-0.5, -0.5, 0.0),
                    Vec3::new(0.5, -0.5, 0.0),
                    Vec3::new(-0.5, 0.5, 0.0),
                    Vec3::new(0.5, 0.5, 0.0),
                ],
                vec![0, 1, 2, 2, 1, 3],
            ),
            Primitive::Tetrahedron => {
                let s = 0.5;
                (
                    vec![
                        Vec3::new(s, s, s),
                        Vec3::new(-s, -s, s),
                        Vec3::new(-s, s, -s),
                        Vec3::new(s, -s, -s),
                    ],
                    vec![0, 1, 2, 0, 3, 1, 0, 2, 3, 1, 3, 2],
                )
            }
            Primitive::Cube => {
                // 24 vertices so each face keeps its own normal after recompute.
                let faces = [
                    (Vec3::X, Vec3::Y, Vec3::Z),
                    (Vec3::NEG_X, Vec3::Y, Vec3::NEG_Z),
                    (Vec3::Y, Vec3::Z, Vec3::X),
                    (Vec3::NEG_Y, Vec3::NEG_Z, Vec3::X),
                    (Vec3::Z, Vec3::X, Vec3::Y),
                    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
                ];
                let mut vertices = Vec::with_capacity(24);
                let mut indices = Vec::with_capacity(36);
                for (n, u, v) in faces {
                    let base = vertices.len() as u32;
                    for (a, b) in [(-0.5f32, -0.5f32), (0.5, -0.5), (-0.5, 0.5), (0.5, 0.5)] {
                        vertices.push(n * 0.5 + u * a + v * b);
                    }
                    indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 1, base + 3]);
                }
                (vertices, indices)
            }
        }
    }
}

impl GeometrySource for Primitive {
    fn identity(&self) -> ShapeIdentity {
        ShapeIdentity::from_name(match self {
            Primitive::Triangle => "primitive:triangle",
            Primitive::Quad => "primitive:quad",
            Primitive::Tetrahedron => "primitive:tetrahedron",
            Primitive::Cube => "primitive:cube",
        })
    }

    fn build_geometry(&self) -> Result<Geometry> {
        let (vertices, indices) = self.arrays();
        Geometry::new(self.identity(), vertices, indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_are_valid_triangle_lists() {
        let expected = [(3, 3), (4, 6), (4, 12), (24, 36)];
        for (p, (v, i)) in Primitive::ALL.iter().zip(expected) {
            let g = p.build_geometry().unwrap();
            assert_eq!((g.vertex_count(), g.index_count()), (v, i), "{p:?}");
        }
    }

    #[test]
    fn cube_fits_unit_box() {
        let g = Primitive::Cube.build_geometry().unwrap();
        assert!(g.vertices().iter().all(|v| v.abs().max_element() <= 0.5 + 1e-6));
    }
}
