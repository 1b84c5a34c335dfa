// src/instance.rs
//! Per-instance descriptors and the caller-owned scratch arena they are generated into.

use bevy::prelude::*;

use crate::common::InstanceTransform;
use crate::shapes::ShapeRef;

/// One placed copy of a shape: where it goes, what color, which geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceDescriptor {
    pub transform: InstanceTransform,
    pub color: Vec4,
    pub shape: ShapeRef,
}

impl Default for InstanceDescriptor {
    fn default() -> Self {
        Self {
            transform: InstanceTransform::default(),
            color: Vec4::ONE,
            shape: ShapeRef::default(),
        }
    }
}

/// Grow-only descriptor buffer reused across passes.
#[derive(Default, Debug)]
pub struct InstanceScratch {
    descriptors: Vec<InstanceDescriptor>,
}

impl InstanceScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exactly `n` slots; storage is kept when `n` shrinks.
    pub fn prepare(&mut self, n: usize) -> &mut [InstanceDescriptor] {
        if self.descriptors.len() < n {
            self.descriptors.resize(n, InstanceDescriptor::default());
        }
        &mut self.descriptors[..n]
    }

    /// Largest pass seen so far.
    pub fn high_water(&self) -> usize {
        self.descriptors.len()
    }
}
