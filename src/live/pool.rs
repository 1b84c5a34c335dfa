// src/live/pool.rs
use bevy::prelude::*;
use bevy::tasks::ParallelSliceMut;

use super::TransformHandle;
use crate::bake::RenderSink;
use crate::common::compute_pool;
use crate::error::{Result, ScatterError};
use crate::placement::{PlacementConfig, PlacementContext};
use crate::rng::shape_slot;
use crate::shapes::ShapeIdentity;

/// Upper bound on live handles.
pub const MAX_POOL_CAPACITY: usize = 0x20000;

/// Handles per parallel task.
const CHUNK: usize = 1024;

/// Resizable arena of transform handles, each bound to a shape slot by its index.
#[derive(Debug, Default)]
pub struct LivePool {
    handles: Vec<TransformHandle>,
    shapes: Vec<ShapeIdentity>,
    seed: u64,
}

impl LivePool {
    pub fn new(seed: u64) -> Self {
        Self { seed, ..Default::default() }
    }

    pub fn capacity(&self) -> usize {
        self.handles.len()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn shape_set(&self) -> &[ShapeIdentity] {
        &self.shapes
    }

    /// Grow or shrink at the end. Existing handles keep their shape assignment.
    pub fn set_capacity(&mut self, capacity: usize) {
        let capacity = if capacity > MAX_POOL_CAPACITY {
            warn!("LivePool: capacity {} clamped to {}", capacity, MAX_POOL_CAPACITY);
            MAX_POOL_CAPACITY
        } else {
            capacity
        };

        let current = self.handles.len();
        if capacity <= current {
            self.handles.truncate(capacity);
            return;
        }
        let shape_count = self.shapes.len();
        let seed = self.seed;
        self.handles.extend((current..capacity).map(|i| TransformHandle {
            shape_index: shape_slot(seed, i as u64, shape_count),
            ..Default::default()
        }));
    }

    /// Replace the shape set; re-draws every assignment only if the identity sequence changed.
    pub fn set_shape_set(&mut self, shapes: &[ShapeIdentity]) -> bool {
        if self.shapes == shapes {
            return false;
        }
        self.shapes = shapes.to_vec();
        self.reassign_shapes();
        true
    }

    /// A changed seed re-draws every assignment.
    pub fn set_seed(&mut self, seed: u64) -> bool {
        if self.seed == seed {
            return false;
        }
        self.seed = seed;
        self.reassign_shapes();
        true
    }

    fn reassign_shapes(&mut self) {
        let shape_count = self.shapes.len();
        let seed = self.seed;
        for (i, handle) in self.handles.iter_mut().enumerate() {
            handle.shape_index = shape_slot(seed, i as u64, shape_count);
        }
    }

    /// Evaluate `config` at `time` for every handle, in parallel.
    ///
    /// Seed and capacity follow the config first, so handle `i` is always instance `i`
    /// of `config.instance_count()` (clamped to [`MAX_POOL_CAPACITY`]).
    pub fn update_all(&mut self, time: f32, config: &PlacementConfig, ctx: &PlacementContext) -> Result<()> {
        config.validate(ctx)?;
        if self.shapes.is_empty() {
            return Err(ScatterError::EmptyShapeSet);
        }
        self.set_seed(config.seed());
        self.set_capacity(config.instance_count() as usize);

        self.handles.par_chunk_map_mut(compute_pool(), CHUNK, |chunk_index, chunk| {
            let base = chunk_index * CHUNK;
            for (k, handle) in chunk.iter_mut().enumerate() {
                let t = config.instance((base + k) as u32, time, ctx);
                handle.position = t.position;
                handle.rotation = t.rotation;
                handle.scale = t.scale;
            }
        });
        Ok(())
    }

    pub fn handles(&self) -> &[TransformHandle] {
        &self.handles
    }

    pub fn present(&self, sink: &mut impl RenderSink) {
        sink.present_transforms(&self.handles);
    }
}
