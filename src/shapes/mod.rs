// src/shapes/mod.rs
//! Shape geometry, sources and the identity-keyed registry.

mod geometry;
mod primitives;
mod registry;

pub use geometry::{Geometry, GeometrySource, MeshShape, ShapeIdentity, SourceShape};
pub use primitives::Primitive;
pub use registry::{ShapeRef, ShapeRegistry};
