//! Calibration table: every fixed dimension and offset of the sensor assemblies.
//!
//! Lengths in mm, angles in radians. The "tip" of a unit is its placement
//! point on the inside of the dome; the unit axis points outward along +z.

use glam::DVec3;
use omsim_core::units::{DEG, M, MM};
use omsim_core::RigidTransform;

// --- gel pad ---

/// Opening angle of the gel pad cone flank.
pub const GELPAD_OPENING_ANGLE: f64 = 50.0 * DEG;
/// Radius of the narrow (PMT side) end of the cone.
pub const GELPAD_SMALL_RADIUS: f64 = 40.0 * MM;
/// Cone height; slightly thicker than the cured pad, trimmed later.
pub const GELPAD_THICKNESS: f64 = 24.0 * MM;
/// Radius of the sphere giving the pad its curved outer cap.
pub const GELPAD_CAP_SPHERE_RADIUS: f64 = 203.0 * MM;

/// Axial reference for the overflow ring: the outer face of the cone.
pub const GEL_RING_REFERENCE_OFFSET: f64 = GELPAD_THICKNESS / 2.0;
/// Outer radius of the overflow ring.
pub const GEL_RING_RADIUS: f64 = 80.0 * MM;
/// Height of the overflow ring.
pub const GEL_RING_HEIGHT: f64 = 2.0 * MM;

/// Large radius of the gel pad cone.
pub fn gelpad_large_radius() -> f64 {
    GELPAD_SMALL_RADIUS + GELPAD_OPENING_ANGLE.tan() * GELPAD_THICKNESS
}

// --- PMT ---

/// Radius of the vacuum bulb caps.
pub const VACUUM_SPHERE_RADIUS: f64 = 50.0 * MM;
/// Radius of the vacuum waist cylinder.
pub const VACUUM_CYLINDER_RADIUS: f64 = 38.0 * MM;
/// Height of the vacuum waist cylinder.
pub const VACUUM_CYLINDER_HEIGHT: f64 = 10.0 * MM;
/// Axial position of the waist center inside the PMT frame.
pub const VACUUM_OFFSET_IN_PMT: f64 = 29.0 * MM;

/// Glass wall thickness of the PMT envelope.
pub const PMT_GLASS_THICKNESS: f64 = 1.5 * MM;
/// Radius of the PMT tail (base) tube.
pub const PMT_TAIL_RADIUS: f64 = 26.0 * MM;
/// Half length of the tail tube, centered on the PMT frame origin.
/// The part above the neck lies inside the bulb.
pub const PMT_TAIL_HALF_LENGTH: f64 = 45.0 * MM;

/// Photocathode layer thickness.
pub const PHOTOCATHODE_THICKNESS: f64 = 1.0 * MM;
/// Gap between the photocathode and the vacuum boundary.
pub const PHOTOCATHODE_PADDING: f64 = 0.0 * MM;
/// Lower bound of the radial thickness of the photocathode tube.
pub const PHOTOCATHODE_MIN_TUBE_THICKNESS: f64 = 1.0 * MM;
/// Lower bound of the photocathode tube length.
pub const PHOTOCATHODE_MIN_TUBE_LENGTH: f64 = 0.01 * MM;

/// Absorber tube modelling the dynode structure.
pub const ABSORBER_RADIUS: f64 = 20.0 * MM;
pub const ABSORBER_HEIGHT: f64 = 50.0 * MM;
/// Absorber center along the PMT axis. Its top face stays below the lower
/// vacuum cap, which bottoms out at 6.5 mm.
pub const ABSORBER_OFFSET: f64 = -19.0 * MM;

// --- placement ---

/// Gel pad center relative to the unit tip.
pub const GELPAD_TIP_OFFSET: f64 = -5.11 * MM;
/// PMT frame origin relative to the unit tip.
pub const PMT_TIP_OFFSET: f64 = -53.0 * MM;

/// Radius of the analytic dome used when the base structure has no glass.
pub const SYNTHETIC_DOME_RADIUS: f64 = 200.0 * MM;
/// Axial distance from the pad center out to the synthetic dome surface.
pub const SYNTHETIC_DOME_CLEARANCE: f64 = -GELPAD_TIP_OFFSET;

/// Gel pad placement relative to the unit tip.
pub fn gelpad_offset() -> RigidTransform {
    RigidTransform::along_z(GELPAD_TIP_OFFSET)
}

/// PMT placement relative to the unit tip.
pub fn pmt_offset() -> RigidTransform {
    RigidTransform::along_z(PMT_TIP_OFFSET)
}

// --- world and media ---

/// Half size of the synthetic world box.
pub const WORLD_HALF_SIZE: f64 = 50.0 * M;

/// Half extents of the synthetic world box.
pub fn world_half_extents() -> DVec3 {
    DVec3::splat(WORLD_HALF_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_large_radius() {
        assert!((gelpad_large_radius() - 68.602).abs() < 1e-3);
    }

    #[test]
    fn test_synthetic_dome_touches_tip() {
        // dome surface on the pad axis coincides with the tip
        let center = -(SYNTHETIC_DOME_RADIUS - SYNTHETIC_DOME_CLEARANCE);
        let surface = center + SYNTHETIC_DOME_RADIUS;
        assert!((surface + GELPAD_TIP_OFFSET).abs() < 1e-12);
    }
}
