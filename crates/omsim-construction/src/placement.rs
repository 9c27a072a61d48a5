//! Placement engine: turns resolved unit targets into placed gel pads and PMTs.
//!
//! Each unit passes through three stages, one type per stage:
//! [`TransformedUnit`] (placement transform known), [`ComposedUnit`] (per-unit
//! gel pad solid built) and finally a [`PlacementRecord`] once both parts are
//! in the world.

use omsim_core::csg::{self, CsgChain};
use omsim_core::{
    DimensionParameters, GeometryTree, LogicalId, Material, MaterialCatalog, PhysicalId,
    RigidTransform, Solid, SurfaceKind, UnitTarget,
};

use crate::calibration::{gelpad_offset, pmt_offset, SYNTHETIC_DOME_CLEARANCE, SYNTHETIC_DOME_RADIUS};
use crate::structure::{glass_dome_children, GlassChild};
use crate::templates::SensorTemplates;

/// A unit whose placement transform is known.
#[derive(Debug, Clone, Copy)]
pub struct TransformedUnit {
    pub copy_no: usize,
    /// Placement of the unit tip in the world.
    pub transform: RigidTransform,
}

impl TransformedUnit {
    /// Derives the placement transform of `target`.
    pub fn new(copy_no: usize, target: &UnitTarget) -> Self {
        Self {
            copy_no,
            transform: target.placement(),
        }
    }

    /// Builds this unit's gel pad from the template.
    ///
    /// Glass children are subtracted when there are any, otherwise the pad is
    /// trimmed by the synthetic dome. The PMT envelope is always removed last.
    pub fn compose(self, template: &Solid, glass: &[GlassChild], pmt_envelope: &Solid) -> ComposedUnit {
        let pad_from_world = gelpad_offset().inverse() * self.transform.inverse();
        let mut chain = CsgChain::new("gelpad", template);

        for child in glass {
            chain = chain.subtract(&child.solid, pad_from_world * child.transform);
        }
        let glass_subtracted = !glass.is_empty();

        if !glass_subtracted {
            let dome = csg::sphere("gelpad_dome_cut", 0.0, SYNTHETIC_DOME_RADIUS);
            chain = chain.intersect(
                &dome,
                RigidTransform::along_z(-(SYNTHETIC_DOME_RADIUS - SYNTHETIC_DOME_CLEARANCE)),
            );
        }

        chain = chain.subtract(pmt_envelope, gelpad_offset().inverse() * pmt_offset());

        ComposedUnit {
            copy_no: self.copy_no,
            transform: self.transform,
            gelpad: chain.build(),
            glass_subtracted,
        }
    }
}

/// A unit with its own gel pad solid, ready to be placed.
#[derive(Debug, Clone)]
pub struct ComposedUnit {
    pub copy_no: usize,
    pub transform: RigidTransform,
    pub gelpad: Solid,
    /// True when the pad was carved against base-structure glass.
    pub glass_subtracted: bool,
}

impl ComposedUnit {
    /// Inserts the gel pad and the shared PMT into the world.
    pub fn place(
        self,
        tree: &mut GeometryTree,
        pmt_logical: LogicalId,
        pmt_reflector_boundary: PhysicalId,
        solid_reflector: bool,
    ) -> PlacementRecord {
        let world = tree.world_logical();
        let gel_logical = tree.add_logical("gelpad", self.gelpad, Material::Gel);
        let gelpad = tree.place(
            "gelpad",
            gel_logical,
            world,
            self.transform * gelpad_offset(),
            self.copy_no,
        );
        let pmt = tree.place(
            "PMT",
            pmt_logical,
            world,
            self.transform * pmt_offset(),
            self.copy_no,
        );

        if solid_reflector {
            let world_pv = tree.world();
            tree.add_border_surface_pair("gelpad_reflector", gelpad, world_pv, SurfaceKind::Reflector);
        }
        tree.add_border_surface_pair("reflector", pmt, pmt_reflector_boundary, SurfaceKind::Reflector);

        PlacementRecord {
            copy_no: self.copy_no,
            transform: self.transform,
            gelpad,
            pmt,
            glass_subtracted: self.glass_subtracted,
        }
    }
}

/// The realized gel pad and PMT of one unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRecord {
    /// Index of the request; shared by both placements.
    pub copy_no: usize,
    /// Placement of the unit tip in the world.
    pub transform: RigidTransform,
    pub gelpad: PhysicalId,
    pub pmt: PhysicalId,
    pub glass_subtracted: bool,
}

/// Places one gel pad and one PMT per target, in order.
///
/// Templates are built on demand. No targets means nothing is built or placed.
pub fn place_optical_units(
    tree: &mut GeometryTree,
    catalog: &mut MaterialCatalog,
    templates: &mut SensorTemplates,
    dims: &DimensionParameters,
    targets: &[UnitTarget],
) -> Vec<PlacementRecord> {
    if targets.is_empty() {
        return Vec::new();
    }

    catalog.material(Material::Gel);
    catalog.surface(SurfaceKind::Reflector);

    let gelpad = templates.gelpad(dims).clone();
    let pmt = templates.pmt(tree, catalog, dims).clone();
    let glass = glass_dome_children(tree);
    log::info!(
        "placing {} optical units ({} glass dome children)",
        targets.len(),
        glass.len()
    );

    targets
        .iter()
        .enumerate()
        .map(|(copy_no, target)| {
            let unit = TransformedUnit::new(copy_no, target).compose(&gelpad, &glass, &pmt.envelope);
            log::debug!(
                "unit {copy_no}: tip at {:?}, glass subtracted: {}",
                target.target,
                unit.glass_subtracted
            );
            unit.place(tree, pmt.logical, pmt.reflector_boundary, dims.solid_reflector)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use omsim_core::units::DEG;
    use omsim_core::{BooleanOp, OpticalUnitFrame, OpticalUnitRequest};
    use proptest::prelude::*;

    fn world() -> GeometryTree {
        GeometryTree::new(
            "World",
            csg::cuboid("World", DVec3::splat(5000.0)),
            Material::Air,
        )
    }

    fn north() -> UnitTarget {
        OpticalUnitRequest::new(200.0, 0.0, 0.0)
            .resolve(&OpticalUnitFrame::default())
            .unwrap()
    }

    #[test]
    fn test_synthetic_dome_when_no_glass() {
        let pad = crate::gelpad::build_gelpad(None);
        let envelope = crate::pmt::build_envelope();
        let unit = TransformedUnit::new(0, &north()).compose(&pad, &[], &envelope);
        assert!(!unit.glass_subtracted);
        assert_eq!(
            unit.gelpad.left_spine_ops(),
            vec![
                BooleanOp::Intersection,
                BooleanOp::Intersection,
                BooleanOp::Subtraction
            ]
        );
        // just below the tip: gel between dome and PMT
        assert!(unit.gelpad.contains(DVec3::new(0.0, 0.0, 4.9)));
        // beyond the dome
        assert!(!unit.gelpad.contains(DVec3::new(0.0, 0.0, 6.0)));
        // inside the PMT
        assert!(!unit.gelpad.contains(DVec3::ZERO));
        // on the flank
        assert!(unit.gelpad.contains(DVec3::new(45.0, 0.0, -5.0)));
    }

    #[test]
    fn test_glass_replaces_synthetic_dome() {
        let pad = crate::gelpad::build_gelpad(None);
        let envelope = crate::pmt::build_envelope();
        // glass shell around the world origin, inner surface 1 mm inside the dome
        let glass = GlassChild {
            solid: csg::sphere("GlasHemisphere", 199.0, 210.0),
            transform: RigidTransform::IDENTITY,
        };
        let with_glass = TransformedUnit::new(0, &north()).compose(&pad, &[glass], &envelope);
        let without = TransformedUnit::new(0, &north()).compose(&pad, &[], &envelope);
        assert!(with_glass.glass_subtracted);
        assert_eq!(
            with_glass.gelpad.left_spine_ops(),
            vec![BooleanOp::Intersection, BooleanOp::Subtraction, BooleanOp::Subtraction]
        );

        // pad center sits at world z = 200 - 5.11; probe at world radius 199.5
        let pad_center = 200.0 + crate::calibration::GELPAD_TIP_OFFSET;
        let between = DVec3::new(20.0, 0.0, (199.5f64.powi(2) - 400.0).sqrt() - pad_center);
        assert!(!with_glass.gelpad.contains(between));
        assert!(without.gelpad.contains(between));

        let flank = DVec3::new(45.0, 0.0, -5.0);
        assert!(with_glass.gelpad.contains(flank));
    }

    #[test]
    fn test_pmt_always_subtracted_last() {
        let pad = crate::gelpad::build_gelpad(Some(2.0));
        let envelope = crate::pmt::build_envelope();
        let unit = TransformedUnit::new(3, &north()).compose(&pad, &[], &envelope);
        let node = unit.gelpad.boolean_node().unwrap();
        assert_eq!(node.op, BooleanOp::Subtraction);
        assert!(node.right.ptr_eq(&envelope));
    }

    #[test]
    fn test_no_targets_is_noop() {
        let mut tree = world();
        let mut catalog = MaterialCatalog::new();
        let mut templates = SensorTemplates::new();
        let records = place_optical_units(
            &mut tree,
            &mut catalog,
            &mut templates,
            &DimensionParameters::default(),
            &[],
        );
        assert!(records.is_empty());
        assert_eq!(tree.num_physicals(), 1);
        assert!(!templates.has_pmt());
    }

    #[test]
    fn test_copy_numbers_follow_request_order() {
        let mut tree = world();
        let mut catalog = MaterialCatalog::new();
        let mut templates = SensorTemplates::new();
        let frame = OpticalUnitFrame::default();
        let targets: Vec<_> = [(200.0, 90.0, 0.0), (150.0, 30.0, 45.0), (180.0, 180.0, 0.0)]
            .iter()
            .map(|&(r, t, p)| OpticalUnitRequest::new(r, t * DEG, p * DEG).resolve(&frame).unwrap())
            .collect();
        let dims = DimensionParameters {
            solid_reflector: true,
            ..DimensionParameters::default()
        };
        let records = place_optical_units(&mut tree, &mut catalog, &mut templates, &dims, &targets);

        let copies: Vec<_> = records.iter().map(|r| r.copy_no).collect();
        assert_eq!(copies, vec![0, 1, 2]);
        for record in &records {
            assert_eq!(tree.physical(record.gelpad).copy_no(), record.copy_no);
            assert_eq!(tree.physical(record.pmt).copy_no(), record.copy_no);
            // two gel pad reflector borders + two PMT reflector borders
            assert_eq!(tree.borders_of(record.gelpad).count(), 2);
            assert_eq!(tree.borders_of(record.pmt).count(), 2);
        }
        // every PMT shares one logical volume, every gel pad has its own
        assert_eq!(
            tree.physical(records[0].pmt).logical(),
            tree.physical(records[2].pmt).logical()
        );
        assert_ne!(
            tree.physical(records[0].gelpad).logical(),
            tree.physical(records[1].gelpad).logical()
        );
    }

    #[test]
    fn test_pmt_reflector_without_solid_reflector() {
        let mut tree = world();
        let mut catalog = MaterialCatalog::new();
        let mut templates = SensorTemplates::new();
        let records = place_optical_units(
            &mut tree,
            &mut catalog,
            &mut templates,
            &DimensionParameters::default(),
            &[north()],
        );
        assert_eq!(tree.borders_of(records[0].gelpad).count(), 0);
        assert_eq!(tree.borders_of(records[0].pmt).count(), 2);
    }

    #[test]
    fn test_placed_parts_sit_behind_tip() {
        let mut tree = world();
        let mut catalog = MaterialCatalog::new();
        let mut templates = SensorTemplates::new();
        let target = OpticalUnitRequest::new(200.0, 90.0 * DEG, 0.0)
            .resolve(&OpticalUnitFrame::default())
            .unwrap();
        let records = place_optical_units(
            &mut tree,
            &mut catalog,
            &mut templates,
            &DimensionParameters::default(),
            &[target],
        );
        let pad = tree.physical(records[0].gelpad).transform();
        let pmt = tree.physical(records[0].pmt).transform();
        assert!(pad.translation.abs_diff_eq(DVec3::new(200.0 - 5.11, 0.0, 0.0), 1e-9));
        assert!(pmt.translation.abs_diff_eq(DVec3::new(200.0 - 53.0, 0.0, 0.0), 1e-9));
    }

    proptest! {
        #[test]
        fn prop_parts_lie_on_unit_axis(theta in 1.0f64..179.0, phi in 0.0f64..360.0, radius in 100.0f64..300.0) {
            let target = OpticalUnitRequest::new(radius, theta * DEG, phi * DEG)
                .resolve(&OpticalUnitFrame::default())
                .unwrap();
            let unit = TransformedUnit::new(0, &target);
            let dir = target.direction();
            let pad = (unit.transform * gelpad_offset()).translation;
            let pmt = (unit.transform * pmt_offset()).translation;
            prop_assert!(pad.abs_diff_eq(target.target - 5.11 * dir, 1e-7));
            prop_assert!(pmt.abs_diff_eq(target.target - 53.0 * dir, 1e-7));
        }
    }
}
