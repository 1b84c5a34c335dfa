// tests/placement_properties.rs
use approx::assert_relative_eq;
use bevy::math::{Quat, Vec3};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use scatterkit::common::smoothstep;
use scatterkit::prelude::*;

const PRESETS: [(&str, &str); 5] = [
    ("chain", include_str!("../presets/chain.scatter.ron")),
    ("stage", include_str!("../presets/stage.scatter.ron")),
    ("dust", include_str!("../presets/dust.scatter.ron")),
    ("wall", include_str!("../presets/wall.scatter.ron")),
    ("star", include_str!("../presets/star.scatter.ron")),
];

fn load_presets() -> Vec<ScatterPreset> {
    PRESETS
        .iter()
        .map(|(name, text)| {
            let preset = ScatterPreset::from_ron_str(text).unwrap();
            assert_eq!(&preset.name, name);
            preset
        })
        .collect()
}

#[test]
fn shipped_presets_parse_and_round_trip() {
    for preset in load_presets() {
        let text = preset.to_ron_string().unwrap();
        assert_eq!(ScatterPreset::from_ron_str(&text).unwrap(), preset);
    }
}

#[test]
fn per_instance_results_ignore_evaluation_order() {
    let curve = PolylineCurve::new(vec![Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(2.0, 3.0, 1.0)], Vec3::Y);
    let noise = GradientNoise::new(17);
    let root = RootSpace::from_transform(
        &bevy::transform::components::Transform::from_xyz(1.0, 0.0, -2.0)
            .with_rotation(Quat::from_rotation_y(0.7))
            .with_scale(Vec3::splat(2.0)),
    );
    let ctx = PlacementContext::new(&noise).with_curve(&curve).with_root(root);
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for preset in load_presets() {
        let config = &preset.placement;
        let n = config.instance_count();
        let forward: Vec<InstanceTransform> = (0..n).map(|i| config.instance(i, 4.2, &ctx)).collect();

        let mut order: Vec<u32> = (0..n).rev().collect();
        let mut reverse = vec![InstanceTransform::default(); n as usize];
        for &i in &order {
            reverse[i as usize] = config.instance(i, 4.2, &ctx);
        }

        order.shuffle(&mut rng);
        let mut shuffled = vec![InstanceTransform::default(); n as usize];
        for &i in &order {
            shuffled[i as usize] = config.instance(i, 4.2, &ctx);
        }

        assert_eq!(forward, reverse, "{}", preset.name);
        assert_eq!(forward, shuffled, "{}", preset.name);
    }
}

#[test]
fn scale_law_hits_its_bounds_exactly() {
    let law = ScaleLaw { min: 0.3, max: 1.7, exponent: 1.0 };
    assert_eq!(law.base(0.0), 0.3);
    assert_eq!(law.base(1.0), 1.7);
    assert_relative_eq!(law.base(0.5), 1.0, max_relative = 1e-6);

    let steep = ScaleLaw { exponent: 3.0, ..law };
    assert_eq!(steep.base(0.0), 0.3);
    assert_eq!(steep.base(1.0), 1.7);
}

#[test]
fn fade_envelope_is_clamped_and_monotonic() {
    for d in [0.1f32, 0.5, 2.0] {
        assert_eq!(smoothstep(0.0, d, -0.1), 0.0);
        assert_eq!(smoothstep(0.0, d, d + 0.1), 1.0);
        let samples: Vec<f32> = (0..=64).map(|k| smoothstep(0.0, d, d * k as f32 / 64.0)).collect();
        assert!(samples.windows(2).all(|w| w[0] <= w[1]));
    }
}

#[test]
fn live_pool_tracks_the_bake_path() {
    let star = load_presets().into_iter().find(|p| p.name == "star").unwrap();
    let shapes = [Primitive::Tetrahedron, Primitive::Cube];
    let ids: Vec<ShapeIdentity> = shapes.iter().map(|s| s.identity()).collect();
    let ctx = PlacementContext::default();

    let mut registry = ShapeRegistry::new();
    registry.update(&shapes).unwrap();
    let mut scratch = InstanceScratch::new();
    let instances = generate_instances(&star.placement, star.color, 1.1, &ctx, &registry, &mut scratch).unwrap();

    let mut pool = LivePool::new(0);
    pool.set_shape_set(&ids);
    pool.set_capacity(star.placement.instance_count() as usize);
    pool.update_all(1.1, &star.placement, &ctx).unwrap();

    for (handle, desc) in pool.handles().iter().zip(instances) {
        assert_eq!(handle.position, desc.transform.position);
        assert_eq!(handle.rotation, desc.transform.rotation);
        assert_eq!(handle.scale, desc.transform.scale);
        assert_eq!(registry.lookup(handle.shape_index), Some(desc.shape));
    }
}

#[test]
fn registry_reuses_identical_sequences_only() {
    let mut registry = ShapeRegistry::new();
    assert!(registry.update(&[Primitive::Quad, Primitive::Cube]).unwrap());
    let cube = registry.lookup(1).unwrap();
    assert!(!registry.update(&[Primitive::Quad, Primitive::Cube]).unwrap());
    assert!(registry.get(cube).is_some());

    assert!(registry.update(&[Primitive::Cube, Primitive::Quad]).unwrap());
    assert!(registry.get(cube).is_none());
    assert_eq!(registry.rebuild_count(), 2);
}
