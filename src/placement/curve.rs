// src/placement/curve.rs
//! Instances strung along an external curve, optionally animated head-to-tail.

use std::f32::consts::{FRAC_PI_2, TAU};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::PlacementContext;
use crate::common::{look_rotation, smoothstep, Placement, ScaleLaw};
use crate::error::{ensure_finite, ensure_non_negative, ensure_ordered, Result, ScatterError};
use crate::rng::RngStream;
use crate::sampling::{CurveSample, CurveSampler};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveFollowConfig {
    pub instance_count: u32,
    /// Max random push along the instance's forward axis.
    pub displacement: f32,
    /// Pitch range (min, max) in units of a quarter turn.
    pub bloom: Vec2,
    pub scale: ScaleLaw,
    pub animation: Option<CurveAnimation>,
    pub seed: u64,
}

/// Head-to-tail grow/shrink over a lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveAnimation {
    pub lifetime: f32,
    /// Delay between the curve head and tail.
    pub delay: f32,
    /// Fade duration range (min, max).
    pub fade: Vec2,
    /// Roll weights for (fade-in, local time, fade-out).
    pub spin: Vec3,
}

impl Default for CurveFollowConfig {
    fn default() -> Self {
        Self {
            instance_count: 100,
            displacement: 0.1,
            bloom: Vec2::new(0.1, 0.2),
            scale: ScaleLaw::default(),
            animation: None,
            seed: 1,
        }
    }
}

impl Default for CurveAnimation {
    fn default() -> Self {
        Self { lifetime: 5.0, delay: 1.0, fade: Vec2::new(0.5, 1.0), spin: Vec3::ONE }
    }
}

impl CurveFollowConfig {
    pub(super) fn validate_static(&self) -> Result<()> {
        if self.instance_count == 0 {
            return Err(ScatterError::ZeroInstances);
        }
        ensure_non_negative("displacement", self.displacement)?;
        ensure_ordered("bloom", self.bloom.x, self.bloom.y)?;
        self.scale.validate()?;
        if let Some(anim) = &self.animation {
            ensure_non_negative("animation.lifetime", anim.lifetime)?;
            ensure_finite("animation.delay", &[anim.delay])?;
            ensure_ordered("animation.fade", anim.fade.x, anim.fade.y)?;
            ensure_non_negative("animation.fade", anim.fade.x)?;
            ensure_finite("animation.spin", &anim.spin.to_array())?;
        }
        Ok(())
    }

    pub(super) fn validate_curve(curve: Option<&dyn CurveSampler>) -> Result<()> {
        let curve = curve.ok_or(ScatterError::MissingCurve)?;
        let length = curve.length();
        if !(length.is_finite() && length > 0.0) {
            return Err(ScatterError::DegenerateCurve { length });
        }
        Ok(())
    }

    pub fn evaluate(&self, index: u32, time: f32, ctx: &PlacementContext) -> Placement {
        let param = index as f32 / self.instance_count.max(1) as f32;
        let sample = match ctx.curve {
            Some(curve) => curve.evaluate(param),
            None => CurveSample { position: Vec3::ZERO, tangent: Vec3::Z, up: Vec3::Y },
        };

        let mut rng = RngStream::new(self.seed, index as u64);
        let mut roll = rng.next_float_below(TAU);
        let pitch = rng.next_float_in_range(self.bloom.x, self.bloom.y) * FRAC_PI_2;

        let fade = match &self.animation {
            Some(anim) => {
                let t = time - param * anim.delay;
                let dur = rng.next_float_in_range(anim.fade.x, anim.fade.y);
                let fade_in = smoothstep(0.0, dur, t);
                let fade_out = smoothstep(anim.lifetime - dur, anim.lifetime, t);
                roll += anim.spin.dot(Vec3::new(fade_in, t, fade_out));
                fade_in - fade_out
            }
            None => 1.0,
        };

        let rotation = look_rotation(sample.tangent, sample.up)
            * Quat::from_rotation_z(roll)
            * Quat::from_rotation_x(pitch);

        let scale_base = self.scale.base(rng.next_float());
        let push = rotation * Vec3::Z * rng.next_float_below(self.displacement);

        Placement { position: sample.position + push, rotation, scale_base, fade }
    }
}
