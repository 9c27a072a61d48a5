//! End-to-end construction scenarios.

use std::fs;
use std::path::PathBuf;

use omsim::*;
use proptest::prelude::*;
use serde_json::json;

/// Writes a base-structure description with one glass dome to a fresh temp directory.
fn write_structure(dir_name: &str, file_name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("omsim-{}-{dir_name}", std::process::id()));
    fs::create_dir_all(&dir).expect("create temp dir");
    let description = json!({
        "world": {"name": "World", "kind": {"primitive": {"kind": "box", "half_x": 2000.0, "half_y": 2000.0, "half_z": 2000.0}}},
        "children": [
            {"name": "GlasHemisphere_0", "solid": {"name": "dome", "kind": {"primitive": {"kind": "sphere", "inner": 205.11, "outer": 217.0}}}},
            {"name": "Titan_flange_0", "solid": {"name": "flange", "kind": {"primitive": {"kind": "tube", "inner": 205.0, "outer": 216.0, "half_z": 10.0}}},
             "transform": {"rotation": [0.0, 0.0, 0.0, 1.0], "translation": [0.0, 0.0, -10.0]}}
        ]
    });
    let path = dir.join(file_name);
    fs::write(&path, description.to_string()).expect("write structure");
    path
}

#[test]
fn test_north_pole_unit() {
    init_logging();
    let mut construction = Construction::new();
    let target = *construction.place(50.0 * MM, 0.0, 0.0).unwrap();

    assert!(target.target.abs_diff_eq(DVec3::new(0.0, 0.0, 50.0), 1e-12));
    let placement = target.placement();
    assert!(placement.rotation.abs_diff_eq(DQuat::IDENTITY, 1e-12));
}

#[test]
fn test_south_pole_unit() {
    let mut construction = Construction::new();
    let target = *construction.place(50.0 * MM, 180.0 * DEG, 0.0).unwrap();

    assert!(target.target.abs_diff_eq(DVec3::new(0.0, 0.0, -50.0), 1e-12));
    let (axis, angle) = target.placement().axis_angle();
    assert!((angle - std::f64::consts::PI).abs() < 1e-12);
    assert!(axis.abs_diff_eq(DVec3::X, 1e-12));
}

#[test]
fn test_copy_numbers_are_dense_and_ordered() {
    let mut construction = Construction::new();
    let coords = [(200.0, 10.0, 300.0), (150.0, 170.0, 20.0), (220.0, 90.0, 90.0), (180.0, 0.0, 0.0)];
    for (r, theta, phi) in coords {
        construction.place(r, theta * DEG, phi * DEG).unwrap();
    }
    let tree = construction.construct().unwrap();

    let pad_copies: Vec<_> = tree
        .world_children()
        .filter(|(_, pv)| pv.name() == "gelpad")
        .map(|(_, pv)| pv.copy_no())
        .collect();
    let pmt_copies: Vec<_> = tree
        .world_children()
        .filter(|(_, pv)| pv.name() == "PMT")
        .map(|(_, pv)| pv.copy_no())
        .collect();
    assert_eq!(pad_copies, vec![0, 1, 2, 3]);
    assert_eq!(pmt_copies, vec![0, 1, 2, 3]);

    let records: Vec<_> = construction.records().iter().map(|r| r.copy_no).collect();
    assert_eq!(records, vec![0, 1, 2, 3]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_copy_numbers_cover_every_request(
        coords in prop::collection::vec((50.0f64..300.0, 0.0f64..180.0, 0.0f64..360.0), 1..8),
    ) {
        let mut construction = Construction::new();
        for &(r, theta, phi) in &coords {
            construction.place(r * MM, theta * DEG, phi * DEG).unwrap();
        }
        construction.construct().unwrap();
        let tree = construction.tree().unwrap();
        let expected: Vec<usize> = (0..coords.len()).collect();

        let records = construction.records();
        let copies: Vec<_> = records.iter().map(|r| r.copy_no).collect();
        prop_assert_eq!(&copies, &expected);
        for record in records {
            prop_assert_eq!(tree.physical(record.gelpad).copy_no(), record.copy_no);
            prop_assert_eq!(tree.physical(record.pmt).copy_no(), record.copy_no);
            prop_assert!(tree.physical(record.pmt).transform().translation.is_finite());
        }
        // one gel pad and one PMT per request
        prop_assert_eq!(tree.world_children().count(), 2 * coords.len());
    }
}

#[test]
fn test_submerge_without_structure_floods_world() {
    let mut construction = Construction::new();
    construction.set_submerge(true).unwrap();
    let tree = construction.construct().unwrap();

    assert_eq!(tree.logical(tree.world_logical()).material(), Material::Water);
    assert_eq!(tree.num_physicals(), 1);
    assert_eq!(construction.carve_outcome(), Some(&CarveOutcome::WorldFlooded));
}

#[test]
fn test_submerge_with_unknown_structure_is_skipped() {
    let path = write_structure("unknown", "prototype_dome.json");
    let mut construction = Construction::new();
    construction
        .set_base_structure_file(path.to_string_lossy())
        .unwrap();
    construction.set_submerge(true).unwrap();
    let tree = construction.construct().unwrap();

    // world + the two loaded children, nothing carved
    assert_eq!(tree.num_physicals(), 3);
    assert!(tree.find_physical("water").next().is_none());
    assert_eq!(tree.logical(tree.world_logical()).material(), Material::Air);
    assert!(matches!(
        construction.carve_outcome(),
        Some(CarveOutcome::Skipped { .. })
    ));
}

#[test]
fn test_submerge_with_known_structure_carves_water() {
    let path = write_structure("known", "half_vessel.json");
    let mut construction = Construction::new();
    construction
        .set_base_structure_file(path.to_string_lossy())
        .unwrap();
    construction.set_submerge(true).unwrap();
    construction.place(205.11, 60.0 * DEG, 0.0).unwrap();
    let tree = construction.construct().unwrap();

    let water = tree.require_physical("water").unwrap();
    assert_eq!(tree.logical_of(water).material(), Material::Water);
    assert_eq!(tree.physical(water).role(), Some(ComponentRole::Water));
    assert!(matches!(
        construction.carve_outcome(),
        Some(CarveOutcome::Carved {
            structure: KnownStructure::HalfVessel,
            glass_children: 1,
            ..
        })
    ));
    assert!(construction.records()[0].glass_subtracted);
}

#[test]
fn test_glass_and_synthetic_dome_are_exclusive() {
    let path = write_structure("exclusive", "dome.json");
    let mut with_glass = Construction::new();
    with_glass
        .set_base_structure_file(path.to_string_lossy())
        .unwrap();
    with_glass.place(205.11, 30.0 * DEG, 0.0).unwrap();
    with_glass.construct().unwrap();

    let mut without_glass = Construction::new();
    without_glass.place(205.11, 30.0 * DEG, 0.0).unwrap();
    without_glass.construct().unwrap();

    for (construction, glass) in [(&with_glass, true), (&without_glass, false)] {
        let record = construction.records()[0];
        assert_eq!(record.glass_subtracted, glass);

        let tree = construction.tree().unwrap();
        let pad = tree.logical_of(record.gelpad).solid();
        let node = pad.boolean_node().unwrap();
        // the PMT envelope is always the last operand
        assert_eq!(node.op, BooleanOp::Subtraction);
        assert_eq!(node.right.name(), "pmt_envelope");
        // the step before it is the dome treatment
        let dome_op = node.left.op().unwrap();
        let expected = if glass {
            BooleanOp::Subtraction
        } else {
            BooleanOp::Intersection
        };
        assert_eq!(dome_op, expected);
    }
}

#[test]
fn test_options_file_roundtrip() {
    let dir = std::env::temp_dir().join(format!("omsim-{}-options", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("options.json");
    let options = json!({
        "solid_reflector": true,
        "frame_origin": [0.0, 0.0, 10.0],
        "gel_ring_offset": 2.0,
        "photocathode_tube_length": 3.0,
        "placements": [
            {"radius": 200.0, "theta": 90.0, "phi": 0.0},
            {"radius": 200.0, "theta": 90.0, "phi": 180.0}
        ]
    });
    fs::write(&path, options.to_string()).unwrap();

    let construction = construct_from_file(&path).unwrap();
    assert_eq!(construction.records().len(), 2);
    assert_eq!(construction.dimensions().ring_offset, Some(2.0));
    assert!(construction.targets()[1]
        .target
        .abs_diff_eq(DVec3::new(-200.0, 0.0, 10.0), 1e-9));

    // gel pad reflectors against the world, PMT reflectors inside each PMT
    let tree = construction.tree().unwrap();
    let gel_reflectors = tree
        .border_surfaces()
        .iter()
        .filter(|b| b.name == "gelpad_reflector")
        .count();
    let pmt_reflectors = tree
        .border_surfaces()
        .iter()
        .filter(|b| b.name == "reflector")
        .count();
    assert_eq!(gel_reflectors, 4);
    assert_eq!(pmt_reflectors, 4);
}

#[test]
fn test_malformed_structure_is_fatal() {
    let dir = std::env::temp_dir().join(format!("omsim-{}-malformed", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("half_vessel.json");
    fs::write(&path, "{ \"world\": 3 }").unwrap();

    let mut construction = Construction::new();
    construction
        .set_base_structure_file(path.to_string_lossy())
        .unwrap();
    let err = construction.construct().unwrap_err();
    assert!(matches!(err, GeometryError::StructureLoad { .. }));
    assert!(!construction.is_constructed());
}
