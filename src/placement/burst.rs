// src/placement/burst.rs
//! Star burst: tumbling instances pushed out from the root origin, respawning each cycle.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::scatter::{validate_cycle, Cycle};
use super::PlacementContext;
use crate::common::{Placement, ScaleLaw};
use crate::error::{ensure_non_negative, ensure_ordered, Result, ScatterError};
use crate::rng::RngStream;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstConfig {
    pub instance_count: u32,
    pub lifetime: f32,
    pub fade: f32,
    /// Angular speed range (min, max).
    pub spin: Vec2,
    /// Max push from the origin along the rotated forward axis.
    pub displacement: f32,
    pub scale: ScaleLaw,
    pub seed: u64,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            instance_count: 16,
            lifetime: 3.0,
            fade: 0.5,
            spin: Vec2::splat(0.5),
            displacement: 0.1,
            scale: ScaleLaw::default(),
            seed: 1,
        }
    }
}

impl BurstConfig {
    pub(super) fn validate_static(&self) -> Result<()> {
        if self.instance_count == 0 {
            return Err(ScatterError::ZeroInstances);
        }
        validate_cycle(self.lifetime, self.fade)?;
        ensure_ordered("spin", self.spin.x, self.spin.y)?;
        ensure_non_negative("displacement", self.displacement)?;
        self.scale.validate()
    }

    pub fn evaluate(&self, index: u32, time: f32, ctx: &PlacementContext) -> Placement {
        let cycle = Cycle::new(index, self.instance_count, time, self.lifetime, self.fade);
        let mut rng = RngStream::new(self.seed, cycle.effective_index);

        let start = rng.next_quaternion_rotation();
        let axis = rng.next_unit_vector();
        let angular = rng.next_float_in_range(self.spin.x, self.spin.y) * cycle.period;
        let rotation = ctx.root.rotation() * start * Quat::from_axis_angle(axis, angular * cycle.t01);

        let push = Vec3::new(0.0, 0.0, rng.next_float_below(self.displacement));
        Placement {
            position: ctx.root.origin() + rotation * push,
            rotation,
            scale_base: ctx.root.scale(self.scale.base(rng.next_float())),
            fade: cycle.envelope,
        }
    }
}
