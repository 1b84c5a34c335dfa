// src/placement/orbit.rs
//! Ring of instances circling the vertical axis at per-instance speeds.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::PlacementContext;
use crate::common::{Placement, ScaleLaw};
use crate::error::{ensure_finite, ensure_ordered, Result, ScatterError};
use crate::rng::RngStream;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub instance_count: u32,
    /// Height range (min, max).
    pub height: Vec2,
    /// Radius range (min, max).
    pub radius: Vec2,
    pub scale: ScaleLaw,
    /// Angular speed range (min, max), radians per unit time.
    pub speed: Vec2,
    /// Added to time so instances are already spread out at t = 0.
    pub phase_offset: f32,
    pub seed: u64,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            instance_count: 100,
            height: Vec2::new(1.0, 2.0),
            radius: Vec2::new(10.0, 11.0),
            scale: ScaleLaw { min: 1.0, max: 2.0, exponent: 1.0 },
            speed: Vec2::new(0.1, 0.2),
            phase_offset: 1000.0,
            seed: 1,
        }
    }
}

impl OrbitConfig {
    pub(super) fn validate_static(&self) -> Result<()> {
        if self.instance_count == 0 {
            return Err(ScatterError::ZeroInstances);
        }
        ensure_ordered("height", self.height.x, self.height.y)?;
        ensure_ordered("radius", self.radius.x, self.radius.y)?;
        ensure_ordered("speed", self.speed.x, self.speed.y)?;
        ensure_finite("phase_offset", &[self.phase_offset])?;
        self.scale.validate()
    }

    pub fn evaluate(&self, index: u32, time: f32, _ctx: &PlacementContext) -> Placement {
        let mut rng = RngStream::new(self.seed, index as u64);
        let height = rng.next_float_in_range(self.height.x, self.height.y);
        let radius = rng.next_float_in_range(self.radius.x, self.radius.y);
        let scale_base = self.scale.base(rng.next_float());
        let speed = rng.next_float_in_range(self.speed.x, self.speed.y);

        let rotation = Quat::from_rotation_y(speed * (time + self.phase_offset));
        Placement {
            position: rotation * Vec3::new(0.0, height, radius),
            rotation,
            scale_base,
            fade: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_on_its_ring_over_time() {
        let cfg = OrbitConfig::default();
        let ctx = PlacementContext::default();
        for i in 0..cfg.instance_count {
            let a = cfg.evaluate(i, 0.0, &ctx).position;
            let b = cfg.evaluate(i, 12.5, &ctx).position;
            assert!((a.y - b.y).abs() < 1e-4);
            assert!((1.0..2.0).contains(&a.y));
            let r = Vec2::new(a.x, a.z).length();
            assert!((r - Vec2::new(b.x, b.z).length()).abs() < 1e-3);
            assert!((10.0 - 1e-3..11.0 + 1e-3).contains(&r));
        }
    }

    #[test]
    fn moves_with_time() {
        let cfg = OrbitConfig { phase_offset: 0.0, ..Default::default() };
        let ctx = PlacementContext::default();
        let a = cfg.evaluate(3, 0.0, &ctx);
        let b = cfg.evaluate(3, 5.0, &ctx);
        assert_eq!(a.rotation, Quat::IDENTITY);
        assert!(a.position.distance(b.position) > 0.1);
    }
}
