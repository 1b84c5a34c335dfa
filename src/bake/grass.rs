// src/bake/grass.rs
//! Procedural grass field: tapered, bending blade strips on a disk.

use bevy::prelude::*;
use bevy::tasks::ParallelSliceMut;
use serde::{Deserialize, Serialize};

use super::CombinedMesh;
use crate::common::compute_pool;
use crate::error::{ensure_non_negative, Result, ScatterError};
use crate::rng::RngStream;

/// Blades per parallel task.
const BLADES_PER_TASK: usize = 64;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrassConfig {
    pub instance_count: u32,
    pub spawn_radius: f32,
    pub blade_width: f32,
    pub blade_height: f32,
    /// Segments per blade.
    pub subdivision: u32,
    pub seed: u64,
}

impl Default for GrassConfig {
    fn default() -> Self {
        Self {
            instance_count: 100,
            spawn_radius: 10.0,
            blade_width: 0.01,
            blade_height: 0.5,
            subdivision: 10,
            seed: 1,
        }
    }
}

impl GrassConfig {
    pub fn vertex_count(&self) -> usize {
        self.instance_count as usize * (self.subdivision as usize + 1) * 2
    }

    pub fn index_count(&self) -> usize {
        self.instance_count as usize * self.subdivision as usize * 6
    }

    pub fn validate(&self) -> Result<()> {
        if self.instance_count == 0 {
            return Err(ScatterError::ZeroInstances);
        }
        if self.subdivision == 0 {
            return Err(ScatterError::InvalidParameter { name: "subdivision", reason: "must be at least 1" });
        }
        ensure_non_negative("spawn_radius", self.spawn_radius)?;
        ensure_non_negative("blade_width", self.blade_width)?;
        ensure_non_negative("blade_height", self.blade_height)?;
        if self.vertex_count() > u32::MAX as usize {
            return Err(ScatterError::VertexRangeOverflow { vertices: self.vertex_count() });
        }
        Ok(())
    }
}

/// Build the whole field in one mesh.
pub fn build_grass(config: &GrassConfig) -> Result<CombinedMesh> {
    config.validate()?;

    let rows = config.subdivision as usize + 1;
    let per_blade = rows * 2;
    let mut vertices = vec![Vec3::ZERO; config.vertex_count()];

    vertices.par_chunk_map_mut(compute_pool(), per_blade * BLADES_PER_TASK, |chunk_index, chunk| {
        for (k, blade) in chunk.chunks_exact_mut(per_blade).enumerate() {
            let index = (chunk_index * BLADES_PER_TASK + k) as u64;
            write_blade(config, index, blade);
        }
    });

    let mut indices = Vec::with_capacity(config.index_count());
    for blade in 0..config.instance_count {
        let first = blade * per_blade as u32;
        for segment in 0..config.subdivision {
            let i = first + segment * 2;
            indices.extend_from_slice(&[i, i + 1, i + 2, i + 2, i + 1, i + 3]);
        }
    }

    let colors = vec![Vec4::ONE; vertices.len()];
    debug!(
        "Grass: {} blades -> {} vertices, {} indices",
        config.instance_count,
        vertices.len(),
        indices.len()
    );
    Ok(CombinedMesh { vertices, colors, indices })
}

fn write_blade(config: &GrassConfig, index: u64, out: &mut [Vec3]) {
    let mut rng = RngStream::new(config.seed, index);
    let root = rng.next_point_on_disk() * config.spawn_radius;
    let bend = Mat2::from_angle(rng.next_float_in_range(0.03, 0.15));
    let mut segment = Vec2::new(
        config.blade_height / config.subdivision as f32 * rng.next_float_in_range(0.75, 1.4),
        0.0,
    );
    let yaw = rng.next_float_in_range(-0.2, 0.2);
    let placement = Mat4::from_rotation_translation(Quat::from_rotation_y(yaw), Vec3::new(root.x, 0.0, root.y));

    // (height, forward lean) of the current row.
    let mut stem = Vec2::ZERO;
    for (row, pair) in out.chunks_exact_mut(2).enumerate() {
        let p = row as f32 / config.subdivision as f32;
        let half = config.blade_width * 0.5 * (1.0 - 0.4 * p);
        pair[0] = placement.transform_point3(Vec3::new(-half, stem.x, stem.y));
        pair[1] = placement.transform_point3(Vec3::new(half, stem.x, stem.y));
        stem += segment;
        segment = bend * segment;
    }
}
