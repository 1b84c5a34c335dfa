// src/common.rs
//! Core types for deterministic instance placement.
//! Keep this file dependency-light; every placement variant and both consumers build on it.

use bevy::prelude::*; // Vec3, Quat, Mat3, Mat4
use bevy::tasks::{ComputeTaskPool, TaskPool};
use serde::{Deserialize, Serialize};

// ---------- Placement I/O ----------

/// Raw output of a placement variant, before scale/fade composition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub rotation: Quat,
    /// `lerp(min, max, pow(u, exp))`, already multiplied by the root scale where relevant.
    pub scale_base: f32,
    /// Fade envelope as computed by the variant (not yet clamped).
    pub fade: f32,
}

/// Composed rigid transform with uniform scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for InstanceTransform {
    fn default() -> Self {
        Self { position: Vec3::ZERO, rotation: Quat::IDENTITY, scale: 1.0 }
    }
}

impl InstanceTransform {
    /// Translation * rotation * uniform scale.
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.rotation, self.position)
    }
}

impl Placement {
    /// Apply the fade envelope to the base scale. Never negative.
    #[inline]
    pub fn compose(self) -> InstanceTransform {
        let fade = self.fade.clamp(0.0, 1.0);
        InstanceTransform {
            position: self.position,
            rotation: self.rotation,
            scale: (self.scale_base * fade).max(0.0),
        }
    }
}

// ---------- Scale law ----------

/// Shared scale law: `lerp(min, max, pow(u, exponent))`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleLaw {
    pub min: f32,
    pub max: f32,
    pub exponent: f32,
}

impl Default for ScaleLaw {
    fn default() -> Self {
        Self { min: 0.2, max: 1.0, exponent: 1.5 }
    }
}

impl ScaleLaw {
    pub const fn fixed(scale: f32) -> Self {
        Self { min: scale, max: scale, exponent: 1.0 }
    }

    #[inline]
    pub fn base(&self, uniform01: f32) -> f32 {
        lerp(self.min, self.max, uniform01.powf(self.exponent))
    }

    pub(crate) fn validate(&self) -> crate::error::Result<()> {
        crate::error::ensure_ordered("scale", self.min, self.max)?;
        crate::error::ensure_non_negative("scale.min", self.min)?;
        crate::error::ensure_non_negative("scale.exponent", self.exponent)
    }
}

// ---------- Scalar helpers ----------

/// Endpoint-exact linear interpolation (t = 0 gives `a`, t = 1 gives `b`).
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Hermite smoothstep. Equal edges degrade to a step at `edge1`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge1 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Fractional part in [0, 1), also for negative inputs.
#[inline]
pub fn frac(x: f32) -> f32 {
    x - x.floor()
}

/// Rotation whose +Z looks along `forward` with +Y as close to `up` as possible.
/// Falls back to a shortest-arc rotation when `forward` and `up` are parallel.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let z = forward.normalize_or_zero();
    if z == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let x = up.cross(z);
    if x.length_squared() <= f32::EPSILON {
        return Quat::from_rotation_arc(Vec3::Z, z);
    }
    let x = x.normalize();
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}

/// Shared compute pool; initialized on first use so the core also runs outside an `App`.
pub(crate) fn compute_pool() -> &'static ComputeTaskPool {
    ComputeTaskPool::get_or_init(TaskPool::default)
}

// ---------- Root space ----------

/// Parent space that root-aware variants express their output in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootSpace {
    pub matrix: Mat4,
    rotation: Quat,
    scale_length: f32,
}

impl Default for RootSpace {
    fn default() -> Self {
        Self::from_matrix(Mat4::IDENTITY)
    }
}

impl RootSpace {
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (_, rotation, _) = matrix.to_scale_rotation_translation();
        Self {
            matrix,
            rotation: rotation.normalize(),
            scale_length: matrix.x_axis.truncate().length(),
        }
    }

    pub fn from_transform(transform: &Transform) -> Self {
        Self::from_matrix(transform.compute_matrix())
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.matrix.w_axis.truncate()
    }

    #[inline]
    pub fn point(&self, local: Vec3) -> Vec3 {
        self.matrix.transform_point3(local)
    }

    #[inline]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Length of the root X basis; scales uniform instance sizes into root space.
    #[inline]
    pub fn scale(&self, s: f32) -> f32 {
        s * self.scale_length
    }
}
