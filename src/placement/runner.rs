// src/placement/runner.rs
use bevy::prelude::*;
use bevy::tasks::ParallelSliceMut;

use super::{PlacementConfig, PlacementContext};
use crate::common::compute_pool;
use crate::error::{Result, ScatterError};
use crate::instance::{InstanceDescriptor, InstanceScratch};
use crate::rng::shape_slot;
use crate::shapes::ShapeRegistry;

/// Instances per parallel task.
const CHUNK: usize = 512;

/// Fill `scratch` with one descriptor per instance and return them in index order.
///
/// Fails fast on invalid configuration or an empty registry, before anything is written.
pub fn generate_instances<'s>(
    config: &PlacementConfig,
    color: Vec4,
    time: f32,
    ctx: &PlacementContext,
    registry: &ShapeRegistry,
    scratch: &'s mut InstanceScratch,
) -> Result<&'s [InstanceDescriptor]> {
    config.validate(ctx)?;
    if registry.is_empty() {
        return Err(ScatterError::EmptyShapeSet);
    }

    let count = config.instance_count() as usize;
    let seed = config.seed();
    let shape_count = registry.len();

    let mut out = scratch.prepare(count);
    out.par_chunk_map_mut(compute_pool(), CHUNK, |chunk_index, chunk| {
        let base = chunk_index * CHUNK;
        for (k, desc) in chunk.iter_mut().enumerate() {
            let index = (base + k) as u32;
            let slot = shape_slot(seed, index as u64, shape_count);
            *desc = InstanceDescriptor {
                transform: config.instance(index, time, ctx),
                color,
                shape: registry.lookup(slot).unwrap_or_default(),
            };
        }
    });

    debug!(
        "Placement {}: generated {} instances over {} shapes (t = {:.3})",
        config.kind_name(),
        count,
        shape_count,
        time
    );

    Ok(out)
}
