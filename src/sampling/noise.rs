// src/sampling/noise.rs
//! Seeded 3D gradient (Perlin-style) noise, roughly in [-1, 1].

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::NoiseField;

#[derive(Clone)]
pub struct GradientNoise {
    perm: Box<[u8; 512]>,
}

impl std::fmt::Debug for GradientNoise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GradientNoise").finish_non_exhaustive()
    }
}

impl Default for GradientNoise {
    fn default() -> Self {
        Self::new(0)
    }
}

impl GradientNoise {
    pub fn new(seed: u64) -> Self {
        let mut table: Vec<u8> = (0..=255).collect();
        table.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));

        let mut perm = Box::new([0u8; 512]);
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }
        Self { perm }
    }

    #[inline]
    fn hash(&self, i: usize) -> usize {
        self.perm[i & 511] as usize
    }
}

#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn grad(hash: usize, x: f32, y: f32, z: f32) -> f32 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}

#[inline]
fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

impl NoiseField for GradientNoise {
    fn sample(&self, point: Vec3) -> f32 {
        let cell = point.floor();
        let (xi, yi, zi) = (
            (cell.x as i32 & 255) as usize,
            (cell.y as i32 & 255) as usize,
            (cell.z as i32 & 255) as usize,
        );
        let f = point - cell;
        let (u, v, w) = (fade(f.x), fade(f.y), fade(f.z));

        let a = self.hash(xi) + yi;
        let aa = self.hash(a) + zi;
        let ab = self.hash(a + 1) + zi;
        let b = self.hash(xi + 1) + yi;
        let ba = self.hash(b) + zi;
        let bb = self.hash(b + 1) + zi;

        let x0 = mix(
            grad(self.hash(aa), f.x, f.y, f.z),
            grad(self.hash(ba), f.x - 1.0, f.y, f.z),
            u,
        );
        let x1 = mix(
            grad(self.hash(ab), f.x, f.y - 1.0, f.z),
            grad(self.hash(bb), f.x - 1.0, f.y - 1.0, f.z),
            u,
        );
        let x2 = mix(
            grad(self.hash(aa + 1), f.x, f.y, f.z - 1.0),
            grad(self.hash(ba + 1), f.x - 1.0, f.y, f.z - 1.0),
            u,
        );
        let x3 = mix(
            grad(self.hash(ab + 1), f.x, f.y - 1.0, f.z - 1.0),
            grad(self.hash(bb + 1), f.x - 1.0, f.y - 1.0, f.z - 1.0),
            u,
        );

        mix(mix(x0, x1, v), mix(x2, x3, v), w)
    }
}
