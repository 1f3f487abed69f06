//! End-to-end editing scenarios over a registry and its render bridge.

use std::collections::HashSet;

use ctrlut_core::codec::{self, byte_to_unit};
use ctrlut_core::{
    Domain, EditorConfig, LutError, LutRegistry, LutSampler, LutTable, PairPolicy, Raster,
    RenderBridge, SamplerFlags, TABLE_LEN,
};

fn new_registry() -> LutRegistry {
    LutRegistry::new(RenderBridge::new(), EditorConfig::default())
}

/// Deterministic pseudo-random tables on the 8-bit grid.
fn pseudo_random_table(seed: u32) -> [f32; TABLE_LEN] {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    std::array::from_fn(|_| {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        byte_to_unit((state >> 24) as u8)
    })
}

fn red(raster: &Raster, x: usize) -> u8 {
    raster.rgba[x * 4]
}

#[test]
fn signed_sampler_scenario_encodes_pairs_and_decodes_back() {
    let mut registry = new_registry();
    let table = registry.create();
    let mut editor = registry.editor(&table).unwrap();
    let sampler = editor.create_sampler();
    let sampler = editor.rename_sampler(&sampler, "S").unwrap();
    editor.set_entry(&sampler, 5, 0.5).unwrap();
    editor.set_entry(&sampler, 133, 0.8).unwrap();

    let raster = registry.table(&table).unwrap().sampler("S").unwrap().export_raster(1);
    assert_eq!((raster.width, raster.height), (512, 1));
    assert_eq!(red(&raster, 266), 128);
    assert_eq!(red(&raster, 267), 128);

    let decoded = codec::decode(&raster, Domain::Signed, PairPolicy::SecondCopy).unwrap();
    assert!((decoded[5] - 0.5).abs() <= 1.0 / 255.0);
    assert!((decoded[133] - 0.8).abs() <= 1.0 / 255.0);
    assert_eq!(decoded.iter().filter(|&&v| v != 0.0).count(), 2);
}

#[test]
fn codec_roundtrip_holds_for_many_tables_and_heights() {
    for seed in 0..16 {
        let table = pseudo_random_table(seed);
        for domain in [Domain::Absolute, Domain::Signed] {
            for policy in [PairPolicy::SecondCopy, PairPolicy::Average] {
                let height = 1 + seed % 5;
                let raster = codec::encode(&table, domain, height);
                let back = codec::decode(&raster, domain, policy).unwrap();
                assert_eq!(back, table, "seed {seed} {domain:?} {policy:?}");
            }
        }
    }
}

#[test]
fn reimport_of_exported_raster_restores_sampler() {
    let mut registry = new_registry();
    let table = registry.create();
    let mut editor = registry.editor(&table).unwrap();
    let name = editor.create_sampler();
    editor.set_flags(&name, SamplerFlags::IS_ABSOLUTE).unwrap();
    let values = pseudo_random_table(99);
    editor
        .edit_sampler(&name, |sampler| {
            for (i, v) in values.iter().enumerate() {
                sampler.table_mut().set(i, *v).unwrap();
            }
        })
        .unwrap();

    let exported = editor.table().sampler(&name).unwrap().export_raster(128);
    editor.set_entry(&name, 0, 0.0).unwrap();
    editor.replace_sampler_raster(&name, &exported).unwrap();

    let sampler = registry.table(&table).unwrap().sampler(&name).unwrap();
    assert_eq!(sampler.table().values(), &values);
    assert!(registry.bridge().active(&name).unwrap().matches(sampler));
}

#[test]
fn sequential_creates_yield_distinct_names() {
    let mut registry = new_registry();
    let table = registry.create();
    let mut editor = registry.editor(&table).unwrap();
    let names: HashSet<String> = (0..40).map(|_| editor.create_sampler()).collect();
    assert_eq!(names.len(), 40);
}

#[test]
fn rename_leaves_exactly_one_current_entry() {
    let mut registry = new_registry();
    let table = registry.create();
    let mut editor = registry.editor(&table).unwrap();
    let old = editor.create_sampler();
    editor.set_entry(&old, 42, 0.25).unwrap();
    editor.rename_sampler(&old, "Specular").unwrap();

    let bridge = registry.bridge();
    assert!(!bridge.is_active(&old));
    assert!(!bridge.is_cached(&old));
    assert_eq!(bridge.active_names(), ["Specular"]);
    let sampler = registry.table(&table).unwrap().sampler("Specular").unwrap();
    assert!(bridge.active("Specular").unwrap().matches(sampler));
}

#[test]
fn removing_table_evicts_all_its_samplers() {
    let mut registry = new_registry();
    let keep = registry.import(LutTable::with_samplers("Keep", vec![LutSampler::new("C")]));
    let drop = registry.import(LutTable::with_samplers(
        "Drop",
        vec![LutSampler::new("A"), LutSampler::new("B")],
    ));
    registry.bridge().with_maps(|maps| {
        for name in ["A", "B", "C"] {
            let lut = maps.active.get(name).unwrap();
            maps.cache.insert(name, lut);
        }
    });

    registry.remove(&drop).unwrap();

    let bridge = registry.bridge();
    for name in ["A", "B"] {
        assert!(!bridge.is_active(name), "{name} still active");
        assert!(!bridge.is_cached(name), "{name} still cached");
    }
    assert!(bridge.is_active("C"));
    assert_eq!(registry.names().collect::<Vec<_>>(), [keep.as_str()]);
}

#[test]
fn wrong_width_raster_is_rejected_without_side_effects() {
    let mut registry = new_registry();
    let table = registry.create();
    let mut editor = registry.editor(&table).unwrap();
    let name = editor.create_sampler();
    let before = editor.table().clone();

    for height in [0, 1, 64] {
        let raster = Raster::from_rgba(256, height, vec![255; 256 * 4 * height as usize]);
        assert!(matches!(
            editor.replace_sampler_raster(&name, &raster),
            Err(LutError::InvalidDimensions { width: 256, .. })
        ));
        assert!(matches!(
            editor.import_sampler_raster("Bad", &raster),
            Err(LutError::InvalidDimensions { .. })
        ));
    }
    assert_eq!(editor.table(), &before);
}

#[test]
fn loading_document_binds_every_sampler() {
    let tables = vec![
        LutTable::with_samplers("T", vec![LutSampler::new("A")]),
        LutTable::with_samplers("T", vec![LutSampler::new("B")]),
    ];
    let registry = LutRegistry::load(tables, RenderBridge::new(), EditorConfig::default());
    assert_eq!(registry.names().collect::<Vec<_>>(), ["T", "T_1"]);
    assert_eq!(registry.bridge().active_names(), ["A", "B"]);
}
