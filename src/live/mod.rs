// src/live/mod.rs
//! Live-update path: placements written straight into persistent transform handles.

use bevy::prelude::*;

mod pool;

pub use pool::{LivePool, MAX_POOL_CAPACITY};

/// One renderer-side transform owned by the pool.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformHandle {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
    /// Slot in the current shape set.
    pub shape_index: usize,
}

impl Default for TransformHandle {
    fn default() -> Self {
        Self { position: Vec3::ZERO, rotation: Quat::IDENTITY, scale: 1.0, shape_index: 0 }
    }
}

impl TransformHandle {
    pub fn to_transform(&self) -> Transform {
        Transform {
            translation: self.position,
            rotation: self.rotation,
            scale: Vec3::splat(self.scale),
        }
    }
}
