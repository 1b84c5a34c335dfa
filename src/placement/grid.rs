// src/placement/grid.rs
//! Fixed lattice of cells with sparse noise-driven peaks.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::PlacementContext;
use crate::common::{Placement, ScaleLaw};
use crate::error::{ensure_finite, ensure_non_negative, Result, ScatterError};
use crate::rng::RngStream;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cells along X and Z; the instance count is their product.
    pub cells: UVec2,
    pub cell_size: f32,
    pub scale: ScaleLaw,
    /// Base octave frequency and amplitude.
    pub frequency: f32,
    pub amplitude: f32,
    /// Second octave; cubed and multiplied in to carve out sparse peaks.
    pub peak_frequency: f32,
    pub peak_gain: f32,
    /// Base octave scroll along X per unit time.
    pub scroll_speed: f32,
    /// Fixed tilt about Z (radians).
    pub tilt: f32,
    pub seed: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cells: UVec2::splat(10),
            cell_size: 0.1,
            scale: ScaleLaw::fixed(0.1),
            frequency: 0.5,
            amplitude: 0.2,
            peak_frequency: 3.0,
            peak_gain: 300.0,
            scroll_speed: 0.1,
            tilt: 0.4,
            seed: 1,
        }
    }
}

impl GridConfig {
    pub fn instance_count(&self) -> u32 {
        self.cells.x.saturating_mul(self.cells.y)
    }

    /// (column, row) of a flattened index.
    #[inline]
    pub fn cell_of(&self, index: u32) -> UVec2 {
        let cx = self.cells.x.max(1);
        UVec2::new(index % cx, index / cx)
    }

    pub(super) fn validate_static(&self) -> Result<()> {
        if self.cells.x == 0 || self.cells.y == 0 {
            return Err(ScatterError::ZeroInstances);
        }
        if self.cells.x.checked_mul(self.cells.y).is_none() {
            return Err(ScatterError::InvalidParameter { name: "cells", reason: "cell count overflows u32" });
        }
        ensure_non_negative("cell_size", self.cell_size)?;
        ensure_finite(
            "noise",
            &[self.frequency, self.amplitude, self.peak_frequency, self.peak_gain, self.scroll_speed],
        )?;
        ensure_finite("tilt", &[self.tilt])?;
        self.scale.validate()
    }

    pub fn evaluate(&self, index: u32, time: f32, ctx: &PlacementContext) -> Placement {
        let cell = self.cell_of(index);
        let half = (self.cells.as_vec2() - Vec2::ONE) * 0.5;
        let x = (cell.x as f32 - half.x) * self.cell_size;
        let z = (cell.y as f32 - half.y) * self.cell_size;

        // Field is sampled on its own XY plane.
        let np = Vec3::new(x, z, 0.0);
        let scroll = Vec3::new(time * self.scroll_speed, 0.0, 0.0);
        let base = ctx.noise.sample(np * self.frequency + scroll) * self.amplitude;
        let mut height = (base * base * base).max(0.0);
        let peak = ctx.noise.sample(np * self.peak_frequency);
        height *= (peak * peak * peak).max(0.0) * self.peak_gain;

        let tilt = Quat::from_rotation_z(self.tilt);
        let local = Vec3::new(x, 0.0, z) + tilt * Vec3::new(0.0, height, 0.0);

        let mut rng = RngStream::new(self.seed, index as u64);
        Placement {
            position: ctx.root.point(local),
            rotation: ctx.root.rotation() * tilt,
            scale_base: ctx.root.scale(self.scale.base(rng.next_float())),
            fade: 1.0,
        }
    }
}
