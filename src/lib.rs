//! Deterministic procedural instance placement and two-pass mesh baking.
//!
//! Two output paths share one set of placement variants:
//! - bake: [`pipeline::BakePipeline`] generates descriptors and merges shapes into a
//!   [`bake::CombinedMesh`];
//! - live: [`live::LivePool`] writes placements straight into persistent transform handles.

pub mod bake;
pub mod common;
pub mod error;
pub mod instance;
pub mod live;
pub mod pipeline;
pub mod placement;
pub mod preset;
pub mod rng;
pub mod sampling;
pub mod shapes;

pub mod prelude {
    pub use crate::bake::{bake, build_grass, CombinedMesh, GrassConfig, RenderSink};
    pub use crate::common::{InstanceTransform, Placement, RootSpace, ScaleLaw};
    pub use crate::error::ScatterError;
    pub use crate::instance::{InstanceDescriptor, InstanceScratch};
    pub use crate::live::{LivePool, TransformHandle, MAX_POOL_CAPACITY};
    pub use crate::pipeline::BakePipeline;
    pub use crate::placement::runner::generate_instances;
    pub use crate::placement::{
        BurstConfig, CurveAnimation, CurveFollowConfig, GridConfig, OrbitConfig, PlacementConfig,
        PlacementContext, ScatterConfig,
    };
    pub use crate::preset::{PresetAssetPlugin, PresetLoadError, ScatterPreset};
    pub use crate::rng::{shape_slot, RngStream};
    pub use crate::sampling::{CurveSample, CurveSampler, GradientNoise, NoiseField, PolylineCurve};
    pub use crate::shapes::{
        Geometry, GeometrySource, MeshShape, Primitive, ShapeIdentity, ShapeRef, ShapeRegistry,
        SourceShape,
    };
}
