// src/sampling/mod.rs
//! External sampler seams: curves and scalar noise fields.
//! Placement only reads through these traits; default implementations live in the submodules.

use bevy::prelude::*; // Vec3

mod curve;
mod noise;

pub use curve::PolylineCurve;
pub use noise::GradientNoise;

/// One evaluated point on a curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveSample {
    pub position: Vec3,
    /// Derivative direction; not required to be unit length.
    pub tangent: Vec3,
    pub up: Vec3,
}

/// Parametric curve over t in [0, 1).
pub trait CurveSampler: Send + Sync {
    fn evaluate(&self, t: f32) -> CurveSample;
    /// Arc length; zero marks a degenerate curve.
    fn length(&self) -> f32;
}

/// Scalar noise field.
pub trait NoiseField: Send + Sync {
    fn sample(&self, point: Vec3) -> f32;

    /// Spatial gradient. Default is central differences.
    fn gradient(&self, point: Vec3) -> Vec3 {
        const H: f32 = 1.0e-3;
        let dx = self.sample(point + Vec3::X * H) - self.sample(point - Vec3::X * H);
        let dy = self.sample(point + Vec3::Y * H) - self.sample(point - Vec3::Y * H);
        let dz = self.sample(point + Vec3::Z * H) - self.sample(point - Vec3::Z * H);
        Vec3::new(dx, dy, dz) / (2.0 * H)
    }
}

/// Noise field that is zero everywhere (disables relief and turbulence).
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatNoise;

impl NoiseField for FlatNoise {
    fn sample(&self, _point: Vec3) -> f32 {
        0.0
    }
    fn gradient(&self, _point: Vec3) -> Vec3 {
        Vec3::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plane;
    impl NoiseField for Plane {
        fn sample(&self, p: Vec3) -> f32 {
            2.0 * p.x - p.z
        }
    }

    #[test]
    fn default_gradient_of_linear_field() {
        let g = Plane.gradient(Vec3::new(0.3, 1.0, -2.0));
        assert!(g.abs_diff_eq(Vec3::new(2.0, 0.0, -1.0), 1e-2), "{g:?}");
    }

    #[test]
    fn flat_noise_is_zero() {
        assert_eq!(FlatNoise.sample(Vec3::ONE), 0.0);
        assert_eq!(FlatNoise.gradient(Vec3::ONE), Vec3::ZERO);
    }
}
