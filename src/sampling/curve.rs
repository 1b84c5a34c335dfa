// src/sampling/curve.rs
//! Arc-length parameterized polyline with a constant up vector.

use bevy::prelude::*;

use super::{CurveSample, CurveSampler};

#[derive(Clone, Debug)]
pub struct PolylineCurve {
    points: Vec<Vec3>,
    /// Cumulative arc length at each point; `cumulative[0] == 0`.
    cumulative: Vec<f32>,
    up: Vec3,
}

impl PolylineCurve {
    pub fn new(points: Vec<Vec3>, up: Vec3) -> Self {
        let mut cumulative = Vec::with_capacity(points.len());
        let mut acc = 0.0;
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                acc += p.distance(points[i - 1]);
            }
            cumulative.push(acc);
        }
        Self { points, cumulative, up }
    }

    /// Straight segment from `a` to `b`.
    pub fn line(a: Vec3, b: Vec3, up: Vec3) -> Self {
        Self::new(vec![a, b], up)
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }
}

impl CurveSampler for PolylineCurve {
    fn evaluate(&self, t: f32) -> CurveSample {
        let total = self.length();
        let first = self.points.first().copied().unwrap_or(Vec3::ZERO);
        if total <= 0.0 || self.points.len() < 2 {
            return CurveSample { position: first, tangent: Vec3::ZERO, up: self.up };
        }

        let d = t.clamp(0.0, 1.0) * total;
        // First point whose cumulative length exceeds d; segment ends there.
        let end = self
            .cumulative
            .partition_point(|&c| c <= d)
            .clamp(1, self.points.len() - 1);
        let (a, b) = (self.points[end - 1], self.points[end]);
        let seg = self.cumulative[end] - self.cumulative[end - 1];
        let local = if seg > 0.0 { (d - self.cumulative[end - 1]) / seg } else { 0.0 };

        CurveSample {
            position: a.lerp(b, local),
            tangent: (b - a).normalize_or_zero() * total,
            up: self.up,
        }
    }

    fn length(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_line_is_uniform_in_t() {
        let c = PolylineCurve::line(Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0), Vec3::Y);
        assert_eq!(c.length(), 4.0);
        for (t, z) in [(0.0, 0.0), (0.25, 1.0), (0.5, 2.0), (0.75, 3.0)] {
            let s = c.evaluate(t);
            assert!(s.position.abs_diff_eq(Vec3::new(0.0, 0.0, z), 1e-5));
            assert!(s.tangent.normalize().abs_diff_eq(Vec3::Z, 1e-5));
            assert_eq!(s.up, Vec3::Y);
        }
    }

    #[test]
    fn bends_follow_arc_length() {
        let c = PolylineCurve::new(
            vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 1.0)],
            Vec3::Y,
        );
        let s = c.evaluate(0.75);
        assert!(s.position.abs_diff_eq(Vec3::new(1.0, 0.0, 0.5), 1e-5));
        assert!(s.tangent.normalize().abs_diff_eq(Vec3::Z, 1e-5));
    }

    #[test]
    fn single_point_is_degenerate() {
        let c = PolylineCurve::new(vec![Vec3::ONE], Vec3::Y);
        assert_eq!(c.length(), 0.0);
        assert_eq!(c.evaluate(0.5).position, Vec3::ONE);
    }
}
