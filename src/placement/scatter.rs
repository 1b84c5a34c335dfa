// src/placement/scatter.rs
//! Respawning particles scattered through an oriented box, drifting and tumbling.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::PlacementContext;
use crate::common::{frac, smoothstep, Placement, ScaleLaw};
use crate::error::{ensure_finite, ensure_non_negative, ensure_ordered, Result, ScatterError};
use crate::rng::RngStream;

/// Where an instance is in its respawn cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cycle {
    pub period: f32,
    /// Normalized time in [0, 1).
    pub t01: f32,
    /// Index re-seeded per cycle so each respawn draws fresh values.
    pub effective_index: u64,
    pub envelope: f32,
}

impl Cycle {
    pub fn new(index: u32, count: u32, time: f32, lifetime: f32, fade: f32) -> Self {
        let period = lifetime + fade * 2.0;
        let count = count.max(1);
        let n = index as f32 / count as f32 + time / period;
        let t01 = frac(n);
        let wraps = n.floor() as i64;
        let effective_index = (index as i64).wrapping_add(wraps.wrapping_mul(count as i64)) as u64;

        let fade01 = fade / period;
        let envelope = smoothstep(0.0, fade01, t01) - smoothstep(1.0 - fade01, 1.0, t01);
        Self { period, t01, effective_index, envelope }
    }
}

pub(super) fn validate_cycle(lifetime: f32, fade: f32) -> Result<()> {
    ensure_non_negative("lifetime", lifetime)?;
    ensure_non_negative("fade", fade)?;
    if lifetime + fade * 2.0 <= 0.0 {
        return Err(ScatterError::InvalidParameter { name: "lifetime", reason: "cycle period must be positive" });
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    pub instance_count: u32,
    /// Size of the spawn box in root space.
    pub extent: Vec3,
    pub lifetime: f32,
    /// Fade-in and fade-out duration.
    pub fade: f32,
    /// Start from a random orientation instead of identity.
    pub random_rotation: bool,
    /// Angular speed range (min, max).
    pub spin: Vec2,
    pub scale: ScaleLaw,
    /// (min speed, max speed, direction spread).
    pub speed: Vec3,
    /// Turbulence (frequency, amount); amount 0 disables it.
    pub turbulence: Vec2,
    pub seed: u64,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            instance_count: 16,
            extent: Vec3::ONE,
            lifetime: 2.0,
            fade: 0.5,
            random_rotation: true,
            spin: Vec2::splat(0.5),
            scale: ScaleLaw::default(),
            speed: Vec3::new(0.1, 1.0, 0.1),
            turbulence: Vec2::new(0.1, 0.1),
            seed: 1,
        }
    }
}

impl ScatterConfig {
    pub(super) fn validate_static(&self) -> Result<()> {
        if self.instance_count == 0 {
            return Err(ScatterError::ZeroInstances);
        }
        ensure_finite("extent", &self.extent.to_array())?;
        validate_cycle(self.lifetime, self.fade)?;
        ensure_ordered("spin", self.spin.x, self.spin.y)?;
        ensure_ordered("speed", self.speed.x, self.speed.y)?;
        ensure_finite("speed.spread", &[self.speed.z])?;
        ensure_finite("turbulence", &self.turbulence.to_array())?;
        self.scale.validate()
    }

    pub fn evaluate(&self, index: u32, time: f32, ctx: &PlacementContext) -> Placement {
        let cycle = Cycle::new(index, self.instance_count, time, self.lifetime, self.fade);
        let mut rng = RngStream::new(self.seed, cycle.effective_index);

        // Rotation: random start, spun about a random axis.
        let start = if self.random_rotation { rng.next_quaternion_rotation() } else { Quat::IDENTITY };
        let axis = rng.next_unit_vector();
        let angular = rng.next_float_in_range(self.spin.x, self.spin.y) * cycle.period;
        let rotation = start * Quat::from_axis_angle(axis, angular * cycle.t01);

        // Drift mostly along +Z, spread toward a random direction.
        let heading = Vec3::Z.lerp(rng.next_unit_vector(), self.speed.z).normalize_or_zero();
        let velocity = heading * rng.next_float_in_range(self.speed.x, self.speed.y);

        let spawn = rng.next_vec3_in_range(Vec3::splat(-0.5), Vec3::splat(0.5)) * self.extent;
        let local = spawn + velocity * cycle.t01 * cycle.period;
        let mut position = ctx.root.point(local);

        if self.turbulence.y != 0.0 {
            let f = self.turbulence.x;
            let g1 = ctx.noise.gradient(position * f);
            let g2 = ctx.noise.gradient(Vec3::new(position.z, position.y, position.x) * -f);
            position += g1.cross(g2) * self.turbulence.y;
        }

        Placement {
            position,
            rotation: ctx.root.rotation() * rotation,
            scale_base: ctx.root.scale(self.scale.base(rng.next_float())),
            fade: cycle.envelope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::GradientNoise;

    #[test]
    fn cycle_wraps_and_reseeds() {
        // period = 2 + 2*0.5 = 3
        let a = Cycle::new(0, 4, 0.0, 2.0, 0.5);
        assert_eq!(a.period, 3.0);
        assert_eq!(a.t01, 0.0);
        assert_eq!(a.effective_index, 0);

        let b = Cycle::new(1, 4, 3.0, 2.0, 0.5);
        assert!((b.t01 - 0.25).abs() < 1e-6);
        assert_eq!(b.effective_index, 5);
    }

    #[test]
    fn envelope_is_zero_at_cycle_edges_and_one_mid_life() {
        let start = Cycle::new(0, 1, 0.0, 2.0, 0.5);
        assert_eq!(start.envelope, 0.0);
        let mid = Cycle::new(0, 1, 1.5, 2.0, 0.5);
        assert_eq!(mid.envelope, 1.0);
    }

    #[test]
    fn no_turbulence_keeps_instances_in_swept_box() {
        let cfg = ScatterConfig { turbulence: Vec2::ZERO, ..Default::default() };
        let ctx = PlacementContext::default();
        // Box half-extent 0.5 plus at most max_speed * period of drift.
        let reach = 0.5f32.hypot(0.5).hypot(0.5) + cfg.speed.y * 3.0;
        for i in 0..cfg.instance_count {
            for t in [0.0, 0.7, 2.2, 9.1] {
                let p = cfg.evaluate(i, t, &ctx);
                assert!(p.position.length() <= reach + 1e-4);
                assert!((0.0..=1.0).contains(&p.fade));
            }
        }
    }

    #[test]
    fn turbulence_moves_points() {
        let noise = GradientNoise::new(4);
        let calm = ScatterConfig { turbulence: Vec2::new(0.7, 0.0), ..Default::default() };
        let rough = ScatterConfig { turbulence: Vec2::new(0.7, 2.0), ..Default::default() };
        let ctx = PlacementContext::new(&noise);
        let moved = (0..16).any(|i| {
            calm.evaluate(i, 0.4, &ctx).position.distance(rough.evaluate(i, 0.4, &ctx).position) > 1e-4
        });
        assert!(moved);
    }

    #[test]
    fn zero_period_rejected() {
        assert!(validate_cycle(0.0, 0.0).is_err());
        assert!(validate_cycle(1.0, 0.0).is_ok());
    }
}
