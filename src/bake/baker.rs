// src/bake/baker.rs
//! Two-pass merge of instanced shapes into one mesh.
//!
//! Pass 1 walks the descriptors once to size every buffer exactly and record each
//! instance's offsets. Pass 2 transforms and copies geometry into those disjoint ranges in
//! parallel batches. Nothing grows after pass 1.

use bevy::prelude::*;

use super::CombinedMesh;
use crate::common::compute_pool;
use crate::error::{Result, ScatterError};
use crate::instance::InstanceDescriptor;
use crate::shapes::{Geometry, ShapeRegistry};

/// Descriptors per parallel scatter task.
const BATCH: usize = 256;

/// Where one instance lands in the combined buffers.
struct Span<'a> {
    geometry: &'a Geometry,
    vertex_offset: usize,
}

/// Bake `instances` (in order) against the shapes in `registry`.
///
/// Zero instances is a valid empty bake.
pub fn bake(instances: &[InstanceDescriptor], registry: &ShapeRegistry) -> Result<CombinedMesh> {
    // Pass 1: resolve shapes and prefix-sum sizes.
    let mut spans = Vec::with_capacity(instances.len());
    let mut vertex_total = 0usize;
    let mut index_total = 0usize;
    for (instance, desc) in instances.iter().enumerate() {
        let geometry = registry.get(desc.shape).ok_or(ScatterError::StaleShape { instance })?;
        spans.push(Span { geometry, vertex_offset: vertex_total });
        vertex_total += geometry.vertex_count();
        index_total += geometry.index_count();
    }
    if vertex_total > u32::MAX as usize {
        return Err(ScatterError::VertexRangeOverflow { vertices: vertex_total });
    }

    let mut vertices = vec![Vec3::ZERO; vertex_total];
    let mut colors = vec![Vec4::ZERO; vertex_total];
    let mut indices = vec![0u32; index_total];

    // Pass 2: scatter batches into disjoint sub-slices.
    let spans = &spans[..];
    let mut v_rest: &mut [Vec3] = &mut vertices;
    let mut c_rest: &mut [Vec4] = &mut colors;
    let mut i_rest: &mut [u32] = &mut indices;
    let results = compute_pool().scope(move |scope| {
        for (batch, batch_spans) in instances.chunks(BATCH).zip(spans.chunks(BATCH)) {
            let v_len: usize = batch_spans.iter().map(|s| s.geometry.vertex_count()).sum();
            let i_len: usize = batch_spans.iter().map(|s| s.geometry.index_count()).sum();

            let Some((v, v_tail)) = std::mem::take(&mut v_rest).split_at_mut_checked(v_len) else { break };
            let Some((c, c_tail)) = std::mem::take(&mut c_rest).split_at_mut_checked(v_len) else { break };
            let Some((i, i_tail)) = std::mem::take(&mut i_rest).split_at_mut_checked(i_len) else { break };
            v_rest = v_tail;
            c_rest = c_tail;
            i_rest = i_tail;

            scope.spawn(async move { scatter_batch(batch, batch_spans, v, c, i) });
        }
    });

    let mut written_vertices = 0usize;
    let mut written_indices = 0usize;
    for result in results {
        let (v, i) = result?;
        written_vertices += v;
        written_indices += i;
    }
    if written_vertices != vertex_total || written_indices != index_total {
        let err = ScatterError::SizeMismatch {
            allocated_vertices: vertex_total,
            allocated_indices: index_total,
            written_vertices,
            written_indices,
        };
        error!("Bake: {err}; discarding output");
        return Err(err);
    }

    debug!(
        "Bake: {} instances -> {} vertices, {} indices",
        instances.len(),
        vertex_total,
        index_total
    );

    Ok(CombinedMesh { vertices, colors, indices })
}

/// Write one batch; returns (vertices, indices) written.
fn scatter_batch(
    descs: &[InstanceDescriptor],
    spans: &[Span],
    vertices: &mut [Vec3],
    colors: &mut [Vec4],
    indices: &mut [u32],
) -> Result<(usize, usize)> {
    let (v_cap, i_cap) = (vertices.len(), indices.len());
    let mut vo = 0usize;
    let mut io = 0usize;
    for (desc, span) in descs.iter().zip(spans) {
        let geometry = span.geometry;
        let nv = geometry.vertex_count();
        let ni = geometry.index_count();
        let mismatch = move || ScatterError::SizeMismatch {
            allocated_vertices: v_cap,
            allocated_indices: i_cap,
            written_vertices: vo + nv,
            written_indices: io + ni,
        };

        let dst_v = vertices.get_mut(vo..vo + nv).ok_or_else(mismatch)?;
        let matrix = desc.transform.matrix();
        for (dst, src) in dst_v.iter_mut().zip(geometry.vertices()) {
            *dst = matrix.transform_point3(*src);
        }
        colors.get_mut(vo..vo + nv).ok_or_else(mismatch)?.fill(desc.color);

        let base = span.vertex_offset as u32;
        let dst_i = indices.get_mut(io..io + ni).ok_or_else(mismatch)?;
        for (dst, src) in dst_i.iter_mut().zip(geometry.indices()) {
            *dst = src + base;
        }

        vo += nv;
        io += ni;
    }
    Ok((vo, io))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::InstanceTransform;
    use crate::shapes::{Primitive, ShapeRef};

    fn descriptor(shape: ShapeRef, position: Vec3) -> InstanceDescriptor {
        InstanceDescriptor {
            transform: InstanceTransform { position, ..Default::default() },
            color: Vec4::new(1.0, 0.5, 0.25, 1.0),
            shape,
        }
    }

    #[test]
    fn empty_input_bakes_empty_mesh() {
        let registry = ShapeRegistry::new();
        let mesh = bake(&[], &registry).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn translates_vertices_and_rebases_indices() {
        let mut registry = ShapeRegistry::new();
        registry.update(&[Primitive::Triangle]).unwrap();
        let tri = registry.lookup(0).unwrap();
        let instances = [descriptor(tri, Vec3::ZERO), descriptor(tri, Vec3::new(0.0, 0.0, 5.0))];

        let mesh = bake(&instances, &registry).unwrap();
        let local = registry.get(tri).unwrap().vertices();
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(&mesh.indices[3..], &[3, 4, 5]);
        assert_eq!(mesh.vertices[3], local[0] + Vec3::new(0.0, 0.0, 5.0));
        assert!(mesh.colors.iter().all(|c| *c == Vec4::new(1.0, 0.5, 0.25, 1.0)));
    }

    #[test]
    fn many_batches_stay_contiguous() {
        let mut registry = ShapeRegistry::new();
        registry.update(&[Primitive::Cube, Primitive::Quad]).unwrap();
        let instances: Vec<_> = (0..(BATCH * 3 + 17))
            .map(|i| descriptor(registry.lookup(i % 2).unwrap(), Vec3::splat(i as f32)))
            .collect();

        let mesh = bake(&instances, &registry).unwrap();
        let cubes = instances.len().div_ceil(2);
        let quads = instances.len() / 2;
        assert_eq!(mesh.vertex_count(), cubes * 24 + quads * 4);
        assert_eq!(mesh.index_count(), cubes * 36 + quads * 6);
        assert!(mesh.is_well_formed());
    }

    #[test]
    fn stale_reference_is_rejected() {
        let mut registry = ShapeRegistry::new();
        registry.update(&[Primitive::Quad]).unwrap();
        let old = registry.lookup(0).unwrap();
        registry.update(&[Primitive::Cube]).unwrap();

        let err = bake(&[descriptor(old, Vec3::ZERO)], &registry).unwrap_err();
        assert_eq!(err, ScatterError::StaleShape { instance: 0 });
    }
}
