// src/error.rs
//! Error type shared by placement, registry and baking.

use crate::shapes::ShapeIdentity;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScatterError {
    #[error("instance count must be positive")]
    ZeroInstances,
    #[error("shape set is empty")]
    EmptyShapeSet,
    #[error("curve placement needs a curve sampler in the placement context")]
    MissingCurve,
    #[error("curve is degenerate (length {length})")]
    DegenerateCurve { length: f32 },
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: &'static str },

    #[error("shape {identity:?}: index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { identity: ShapeIdentity, index: u32, vertex_count: usize },
    #[error("shape {identity:?}: {count} indices is not a triangle list")]
    NotTriangleList { identity: ShapeIdentity, count: usize },
    #[error("shape {identity:?}: mesh has no Float32x3 position attribute")]
    MissingPositions { identity: ShapeIdentity },

    #[error("instance {instance} references an evicted shape")]
    StaleShape { instance: usize },
    #[error("combined vertex count {vertices} exceeds the u32 index range")]
    VertexRangeOverflow { vertices: usize },

    #[error(
        "bake size mismatch: allocated {allocated_vertices} vertices / {allocated_indices} indices, \
         wrote {written_vertices} / {written_indices}"
    )]
    SizeMismatch {
        allocated_vertices: usize,
        allocated_indices: usize,
        written_vertices: usize,
        written_indices: usize,
    },
}

impl ScatterError {
    /// Configuration problems caught before any allocation.
    pub fn is_invalid_config(&self) -> bool {
        matches!(
            self,
            Self::ZeroInstances
                | Self::EmptyShapeSet
                | Self::MissingCurve
                | Self::DegenerateCurve { .. }
                | Self::InvalidParameter { .. }
        )
    }

    pub fn is_invalid_geometry(&self) -> bool {
        matches!(
            self,
            Self::IndexOutOfRange { .. } | Self::NotTriangleList { .. } | Self::MissingPositions { .. }
        )
    }

    /// Output too large for 32-bit indices.
    pub fn is_capacity_overflow(&self) -> bool {
        matches!(self, Self::VertexRangeOverflow { .. })
    }
}

pub type Result<T, E = ScatterError> = std::result::Result<T, E>;

/// Reject NaN/inf parameters up front.
pub(crate) fn ensure_finite(name: &'static str, values: &[f32]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ScatterError::InvalidParameter { name, reason: "must be finite" })
    }
}

/// `lo <= hi` for a (min, max) pair.
pub(crate) fn ensure_ordered(name: &'static str, lo: f32, hi: f32) -> Result<()> {
    ensure_finite(name, &[lo, hi])?;
    if lo <= hi {
        Ok(())
    } else {
        Err(ScatterError::InvalidParameter { name, reason: "min exceeds max" })
    }
}

pub(crate) fn ensure_non_negative(name: &'static str, value: f32) -> Result<()> {
    ensure_finite(name, &[value])?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ScatterError::InvalidParameter { name, reason: "must not be negative" })
    }
}
