// src/shapes/registry.rs
//! Geometry cache keyed by the ordered identity sequence of its sources.
//!
//! Any change in that sequence (count or identity at any position) releases every cached
//! geometry and rebuilds from scratch. Outstanding [`ShapeRef`]s stop resolving after a
//! rebuild instead of pointing at freed data.

use bevy::log::info;
use slotmap::SlotMap;

use super::{Geometry, GeometrySource, ShapeIdentity};
use crate::error::Result;

slotmap::new_key_type! {
    /// Non-owning, generation-checked reference to a registry entry.
    pub struct ShapeRef;
}

#[derive(Default)]
pub struct ShapeRegistry {
    /// Ordered identities; index in this vector is the shape slot.
    identities: Vec<ShapeIdentity>,
    refs: Vec<ShapeRef>,
    shapes: SlotMap<ShapeRef, Geometry>,
    rebuilds: u64,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `sources` has exactly the cached identity sequence.
    pub fn matches<S: GeometrySource>(&self, sources: &[S]) -> bool {
        self.identities.len() == sources.len()
            && self.identities.iter().zip(sources).all(|(id, s)| *id == s.identity())
    }

    /// Reuse the cache when the identity sequence is unchanged, otherwise rebuild it all.
    /// Returns whether a rebuild happened. On a build error the registry is left empty.
    pub fn update<S: GeometrySource>(&mut self, sources: &[S]) -> Result<bool> {
        if self.rebuilds > 0 && self.matches(sources) {
            return Ok(false);
        }

        self.clear();
        let mut refs = Vec::with_capacity(sources.len());
        let mut identities = Vec::with_capacity(sources.len());
        for source in sources {
            let geometry = match source.build_geometry() {
                Ok(g) => g,
                Err(e) => {
                    self.clear();
                    return Err(e);
                }
            };
            identities.push(source.identity());
            refs.push(self.shapes.insert(geometry));
        }
        self.refs = refs;
        self.identities = identities;
        self.rebuilds += 1;

        info!("Shapes: registry rebuilt with {} shapes", self.refs.len());
        Ok(true)
    }

    /// Release every cached geometry.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.refs.clear();
        self.identities.clear();
    }

    /// Reference for shape slot `index`.
    #[inline]
    pub fn lookup(&self, index: usize) -> Option<ShapeRef> {
        self.refs.get(index).copied()
    }

    /// Geometry behind a reference, if it is still alive.
    #[inline]
    pub fn get(&self, shape: ShapeRef) -> Option<&Geometry> {
        self.shapes.get(shape)
    }

    pub fn identities(&self) -> &[ShapeIdentity] {
        &self.identities
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Number of full rebuilds so far.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Primitive, SourceShape};
    use bevy::prelude::Vec3;

    #[test]
    fn identical_sequence_reuses_cache() {
        let mut reg = ShapeRegistry::new();
        assert!(reg.update(&[Primitive::Triangle, Primitive::Quad]).unwrap());
        let before = reg.lookup(1).unwrap();

        assert!(!reg.update(&[Primitive::Triangle, Primitive::Quad]).unwrap());
        assert_eq!(reg.lookup(1), Some(before));
        assert_eq!(reg.rebuild_count(), 1);
    }

    #[test]
    fn any_difference_rebuilds_everything() {
        let mut reg = ShapeRegistry::new();
        reg.update(&[Primitive::Triangle, Primitive::Quad]).unwrap();
        let old = reg.lookup(0).unwrap();

        // Same first entry, reordered tail: still a full rebuild.
        assert!(reg.update(&[Primitive::Triangle, Primitive::Cube]).unwrap());
        assert!(reg.get(old).is_none(), "old reference must go stale");
        assert_eq!(reg.get(reg.lookup(1).unwrap()).unwrap().vertex_count(), 24);

        assert!(reg.update(&[Primitive::Triangle]).unwrap());
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.rebuild_count(), 3);
    }

    #[test]
    fn failed_build_leaves_registry_empty() {
        let mut reg = ShapeRegistry::new();
        reg.update(&[Primitive::Quad]).unwrap();
        let bad = SourceShape::named("bad", vec![Vec3::ZERO], vec![0, 0, 1]);
        assert!(reg.update(&[bad]).is_err());
        assert!(reg.is_empty());
        assert_eq!(reg.lookup(0), None);
    }

    #[test]
    fn heterogeneous_sources_through_dyn() {
        let blade = SourceShape::named("blade", vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2]);
        let sources: [&dyn GeometrySource; 2] = [&Primitive::Cube, &blade];
        let mut reg = ShapeRegistry::new();
        reg.update(&sources).unwrap();
        assert_eq!(reg.identities()[1], ShapeIdentity::from_name("blade"));
    }
}
