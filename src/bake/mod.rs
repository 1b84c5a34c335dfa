// src/bake/mod.rs
//! Offline path: placed instances merged into one static mesh.

mod baker;
mod grass;
mod mesh;

pub use baker::bake;
pub use grass::{build_grass, GrassConfig};
pub use mesh::{CombinedMesh, RenderSink};
