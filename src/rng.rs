// src/rng.rs
//! Index-addressable deterministic random streams.
//!
//! A stream is a pure function of `(seed, index)`: the seed keys a ChaCha8 generator and
//! the index selects one of its 2^64 independent streams. Nothing about stream `i` depends
//! on stream `j`, so placements can be evaluated in any order or in parallel.

use std::f32::consts::TAU;

use bevy::prelude::*; // Vec2, Vec3, Quat
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Mixed into every seed so seed 0 does not key the all-zero ChaCha state.
const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

pub struct RngStream {
    rng: ChaCha8Rng,
}

impl RngStream {
    pub fn new(seed: u64, index: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed ^ SEED_MIX);
        rng.set_stream(index);
        Self { rng }
    }

    /// Uniform in [0, 1).
    #[inline]
    pub fn next_float(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Uniform in [lo, hi). Inverted or empty ranges are fine.
    #[inline]
    pub fn next_float_in_range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_float()
    }

    /// Uniform in [0, max).
    #[inline]
    pub fn next_float_below(&mut self, max: f32) -> f32 {
        max * self.next_float()
    }

    /// Componentwise uniform in the box [lo, hi).
    pub fn next_vec3_in_range(&mut self, lo: Vec3, hi: Vec3) -> Vec3 {
        let x = self.next_float_in_range(lo.x, hi.x);
        let y = self.next_float_in_range(lo.y, hi.y);
        let z = self.next_float_in_range(lo.z, hi.z);
        Vec3::new(x, y, z)
    }

    /// Uniform direction on the unit sphere.
    pub fn next_unit_vector(&mut self) -> Vec3 {
        let z = self.next_float() * 2.0 - 1.0;
        let phi = self.next_float() * TAU;
        let r = (1.0 - z * z).max(0.0).sqrt();
        Vec3::new(r * phi.cos(), r * phi.sin(), z)
    }

    /// Uniform point on the unit disk.
    pub fn next_point_on_disk(&mut self) -> Vec2 {
        let r = self.next_float().sqrt();
        let phi = self.next_float() * TAU;
        Vec2::new(r * phi.cos(), r * phi.sin())
    }

    /// Uniformly distributed rotation (Shoemake).
    pub fn next_quaternion_rotation(&mut self) -> Quat {
        let u1 = self.next_float();
        let a = self.next_float() * TAU;
        let b = self.next_float() * TAU;
        let s1 = (1.0 - u1).sqrt();
        let s2 = u1.sqrt();
        Quat::from_xyzw(s1 * a.sin(), s1 * a.cos(), s2 * b.sin(), s2 * b.cos()).normalize()
    }

    /// Uniform in [0, n). `n == 0` yields 0.
    #[inline]
    pub fn next_index(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        self.rng.random_range(0..n)
    }
}

/// Shape slot for instance `index` out of `shape_count`; shared by baking and the live pool.
#[inline]
pub fn shape_slot(seed: u64, index: u64, shape_count: usize) -> usize {
    RngStream::new(seed, index).next_index(shape_count)
}
