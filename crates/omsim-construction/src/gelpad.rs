//! Gel pad template.
//!
//! A truncated cone, optionally widened by an overflow ring, capped by a
//! large sphere that follows the dome curvature. The template is larger than
//! the real pad; per-unit placement trims it against the dome and the PMT.

use omsim_core::csg::{self, CsgChain};
use omsim_core::{RigidTransform, Solid};

use crate::calibration::{
    gelpad_large_radius, GELPAD_CAP_SPHERE_RADIUS, GELPAD_SMALL_RADIUS, GELPAD_THICKNESS,
    GEL_RING_HEIGHT, GEL_RING_RADIUS, GEL_RING_REFERENCE_OFFSET,
};

/// Axial center of the overflow ring for a given ring offset.
pub fn ring_center(ring_offset: f64) -> f64 {
    GEL_RING_REFERENCE_OFFSET - ring_offset + GEL_RING_HEIGHT / 2.0
}

/// Builds the gel pad template. `ring_offset` adds the overflow ring.
pub fn build_gelpad(ring_offset: Option<f64>) -> Solid {
    let cone = csg::cone(
        "gelpad_cone",
        (0.0, GELPAD_SMALL_RADIUS),
        (0.0, gelpad_large_radius()),
        GELPAD_THICKNESS / 2.0,
    );

    let mut chain = CsgChain::new("gelpad", &cone);
    if let Some(offset) = ring_offset {
        let ring = csg::tube("gelpad_ring", 0.0, GEL_RING_RADIUS, GEL_RING_HEIGHT / 2.0);
        chain = chain.union(&ring, RigidTransform::along_z(ring_center(offset)));
    }

    let cap = csg::sphere("gelpad_sphere_cut", 0.0, GELPAD_CAP_SPHERE_RADIUS);
    let z_translation = -GELPAD_CAP_SPHERE_RADIUS + GELPAD_THICKNESS / 2.0;
    chain
        .intersect(&cap, RigidTransform::along_z(z_translation))
        .build()
}
