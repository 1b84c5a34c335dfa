// src/pipeline.rs
//! Bake path glue: shapes + preset in, one visible combined mesh out.

use bevy::prelude::*;

use crate::bake::{bake, CombinedMesh, RenderSink};
use crate::error::{Result, ScatterError};
use crate::instance::InstanceScratch;
use crate::placement::runner::generate_instances;
use crate::placement::PlacementContext;
use crate::preset::ScatterPreset;
use crate::shapes::{GeometrySource, ShapeRegistry};

/// Owns the shape cache, the descriptor arena and the last good mesh.
#[derive(Default)]
pub struct BakePipeline {
    registry: ShapeRegistry,
    scratch: InstanceScratch,
    visible: CombinedMesh,
    bakes: u64,
}

impl BakePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Regenerate and bake. The visible mesh is replaced only when every step succeeds.
    pub fn rebuild<S: GeometrySource>(
        &mut self,
        shapes: &[S],
        preset: &ScatterPreset,
        time: f32,
        ctx: &PlacementContext,
    ) -> Result<&CombinedMesh> {
        match self.bake_next(shapes, preset, time, ctx) {
            Ok(mesh) => {
                self.visible = mesh;
                self.bakes += 1;
                Ok(&self.visible)
            }
            Err(e) => {
                warn!("BakePipeline: bake of '{}' discarded, keeping previous mesh: {}", preset.name, e);
                Err(e)
            }
        }
    }

    fn bake_next<S: GeometrySource>(
        &mut self,
        shapes: &[S],
        preset: &ScatterPreset,
        time: f32,
        ctx: &PlacementContext,
    ) -> Result<CombinedMesh> {
        // Reject bad configs before the shape cache is touched.
        preset.placement.validate(ctx)?;
        if shapes.is_empty() {
            return Err(ScatterError::EmptyShapeSet);
        }
        self.registry.update(shapes)?;
        let instances = generate_instances(
            &preset.placement,
            preset.color,
            time,
            ctx,
            &self.registry,
            &mut self.scratch,
        )?;
        bake(instances, &self.registry)
    }

    pub fn visible(&self) -> &CombinedMesh {
        &self.visible
    }

    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    /// Completed (swapped-in) bakes.
    pub fn bake_count(&self) -> u64 {
        self.bakes
    }

    pub fn present(&self, sink: &mut impl RenderSink) {
        sink.present_mesh(&self.visible);
    }

    /// Drop cached shapes and the visible mesh.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.visible = CombinedMesh::default();
    }
}
