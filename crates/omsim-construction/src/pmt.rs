//! PMT template: glass envelope with the vacuum, photocathode and absorber inside.
//!
//! ```text
//!             ..------..
//!          -°°          °°-    <---- sphere radius R
//!        /                  \
//!       |<------------------>|   -
//!       |   cylinder radius r |   | waist height 2h
//!       |                    |   -
//!        \                  /
//!          -..          ..-
//!             °°------°°
//! ```
//!
//! All parts are stacked along the PMT frame's z axis. The caps are the
//! parts of the sphere beyond the cutoff `c = √(R² − r²)`, so their flat
//! faces match the waist cylinder exactly.

use glam::DVec3;
use omsim_core::csg::{self, CsgChain};
use omsim_core::{GeometryTree, LogicalId, Material, MaterialCatalog, PhysicalId, RigidTransform, Solid, SurfaceKind};

use crate::calibration::{
    ABSORBER_HEIGHT, ABSORBER_OFFSET, ABSORBER_RADIUS, PHOTOCATHODE_MIN_TUBE_LENGTH,
    PHOTOCATHODE_MIN_TUBE_THICKNESS, PHOTOCATHODE_PADDING, PHOTOCATHODE_THICKNESS,
    PMT_GLASS_THICKNESS, PMT_TAIL_HALF_LENGTH, PMT_TAIL_RADIUS, VACUUM_CYLINDER_HEIGHT,
    VACUUM_CYLINDER_RADIUS, VACUUM_OFFSET_IN_PMT, VACUUM_SPHERE_RADIUS,
};

/// Half length of the waist below which the caps start.
pub fn sphere_cutoff(sphere_radius: f64, cylinder_radius: f64) -> f64 {
    (sphere_radius.powi(2) - cylinder_radius.powi(2)).sqrt()
}

/// The three stacked parts of a bulb and where they sit along the axis.
#[derive(Debug, Clone)]
pub struct Bulb {
    pub upper: Solid,
    pub lower: Solid,
    pub waist: Solid,
    pub upper_offset: f64,
    pub lower_offset: f64,
    pub waist_offset: f64,
    pub sphere_radius: f64,
    pub cylinder_radius: f64,
    pub waist_half_height: f64,
}

impl Bulb {
    /// Builds a bulb whose waist is centered at `waist_offset`.
    pub fn new(
        prefix: &str,
        sphere_radius: f64,
        cylinder_radius: f64,
        waist_half_height: f64,
        waist_offset: f64,
    ) -> Self {
        let c = sphere_cutoff(sphere_radius, cylinder_radius);
        let semi = DVec3::splat(sphere_radius);
        Self {
            upper: csg::ellipsoid(format!("upper{prefix}Sphere"), semi, c, sphere_radius),
            lower: csg::ellipsoid(format!("lower{prefix}Sphere"), semi, -sphere_radius, -c),
            waist: csg::elliptical_tube(
                format!("{prefix}Cylinder"),
                cylinder_radius,
                cylinder_radius,
                waist_half_height,
            ),
            upper_offset: waist_offset + waist_half_height - c,
            lower_offset: waist_offset - waist_half_height + c,
            waist_offset,
            sphere_radius,
            cylinder_radius,
            waist_half_height,
        }
    }

    /// Union of the three parts, expressed in the frame the offsets refer to.
    pub fn envelope(&self, name: &str, core: &Solid) -> Solid {
        CsgChain::new(name, core)
            .union(&self.waist, RigidTransform::along_z(self.waist_offset))
            .union(&self.upper, RigidTransform::along_z(self.upper_offset))
            .union(&self.lower, RigidTransform::along_z(self.lower_offset))
            .build()
    }
}

/// Vacuum bulb of the PMT.
pub fn vacuum_bulb() -> Bulb {
    Bulb::new(
        "Vac",
        VACUUM_SPHERE_RADIUS,
        VACUUM_CYLINDER_RADIUS,
        VACUUM_CYLINDER_HEIGHT / 2.0,
        VACUUM_OFFSET_IN_PMT,
    )
}

/// Glass bulb: the vacuum bulb grown by the wall thickness.
pub fn glass_bulb() -> Bulb {
    Bulb::new(
        "Glass",
        VACUUM_SPHERE_RADIUS + PMT_GLASS_THICKNESS,
        VACUUM_CYLINDER_RADIUS + PMT_GLASS_THICKNESS,
        VACUUM_CYLINDER_HEIGHT / 2.0,
        VACUUM_OFFSET_IN_PMT,
    )
}

/// Outer glass envelope in the PMT frame, tail tube included.
pub fn build_envelope() -> Solid {
    let tail = csg::tube("pmt_tail", 0.0, PMT_TAIL_RADIUS, PMT_TAIL_HALF_LENGTH);
    glass_bulb().envelope("pmt_envelope", &tail)
}

/// Photocathode tube length, clamped to stay strictly positive.
pub fn clamp_tube_length(requested: f64) -> f64 {
    requested.max(PHOTOCATHODE_MIN_TUBE_LENGTH)
}

/// Photocathode piece lining the upper vacuum cap.
pub fn build_photocathode_cap(bulb: &Bulb) -> Solid {
    let outer = bulb.sphere_radius - PHOTOCATHODE_PADDING;
    let shell = csg::sphere(
        "photocathode_subsolid",
        outer - PHOTOCATHODE_THICKNESS,
        outer,
    );
    csg::intersect("photocathode", &bulb.upper, &shell, RigidTransform::IDENTITY)
}

/// Photocathode piece lining the waist, flush with its upper end.
pub fn build_photocathode_tube(bulb: &Bulb, tube_length: f64) -> Solid {
    let length = clamp_tube_length(tube_length);
    let thickness = PHOTOCATHODE_THICKNESS.max(PHOTOCATHODE_MIN_TUBE_THICKNESS);
    let outer = bulb.cylinder_radius - PHOTOCATHODE_PADDING;
    let shell = csg::tube("photocathode_tube_subsolid", outer - thickness, outer, length / 2.0);
    csg::intersect(
        "photocathode_tube",
        &bulb.waist,
        &shell,
        RigidTransform::along_z(bulb.waist_half_height - length / 2.0),
    )
}

/// The PMT logical hierarchy registered in a geometry tree.
#[derive(Debug, Clone)]
pub struct PmtTemplate {
    /// Logical volume of the whole PMT (glass envelope).
    pub logical: LogicalId,
    /// Envelope solid, subtracted from every gel pad.
    pub envelope: Solid,
    /// Vacuum daughter whose boundary with the glass carries the internal reflector.
    pub reflector_boundary: PhysicalId,
    pub photocathode_cap: LogicalId,
    pub photocathode_tube: LogicalId,
    pub absorber: LogicalId,
}

/// Builds the PMT logical volume and its daughters inside `tree`.
///
/// Daughter order: upper vacuum cap, lower vacuum cap, vacuum waist, absorber.
pub fn build_pmt(tree: &mut GeometryTree, catalog: &mut MaterialCatalog, tube_length: f64) -> PmtTemplate {
    for material in [
        Material::Vacuum,
        Material::Glass,
        Material::Plastic,
        Material::Photocathode,
    ] {
        catalog.material(material);
    }
    catalog.surface(SurfaceKind::Plastic);

    let vacuum = vacuum_bulb();
    let envelope = build_envelope();

    let upper_log = tree.add_logical("upperVacSphere", vacuum.upper.clone(), Material::Vacuum);
    let lower_log = tree.add_logical("lowerVacSphere", vacuum.lower.clone(), Material::Vacuum);
    let waist_log = tree.add_logical("VacCylinder", vacuum.waist.clone(), Material::Vacuum);

    let cathode_cap = tree.add_logical(
        "photocathode",
        build_photocathode_cap(&vacuum),
        Material::Photocathode,
    );
    let cathode_tube = tree.add_logical(
        "photocathode_tube",
        build_photocathode_tube(&vacuum, tube_length),
        Material::Photocathode,
    );
    tree.place("photocathode", cathode_cap, upper_log, RigidTransform::IDENTITY, 0);
    tree.place("photocathode_tube", cathode_tube, waist_log, RigidTransform::IDENTITY, 0);

    let absorber_solid = csg::tube("Absorber", 0.0, ABSORBER_RADIUS, ABSORBER_HEIGHT / 2.0);
    let absorber = tree.add_logical("Absorber", absorber_solid, Material::Plastic);
    tree.add_skin_surface("AbsorberSurface", absorber, SurfaceKind::Plastic);

    let pmt = tree.add_logical("PMT", envelope.clone(), Material::Glass);
    tree.place(
        "upperVacSphere",
        upper_log,
        pmt,
        RigidTransform::along_z(vacuum.upper_offset),
        0,
    );
    let lower = tree.place(
        "lowerVacSphere",
        lower_log,
        pmt,
        RigidTransform::along_z(vacuum.lower_offset),
        0,
    );
    tree.place(
        "VacCylinder",
        waist_log,
        pmt,
        RigidTransform::along_z(vacuum.waist_offset),
        0,
    );
    tree.place("Absorber", absorber, pmt, RigidTransform::along_z(ABSORBER_OFFSET), 0);

    log::debug!(
        "built PMT template: cutoff {:.3} mm, photocathode tube {:.3} mm",
        sphere_cutoff(vacuum.sphere_radius, vacuum.cylinder_radius),
        clamp_tube_length(tube_length)
    );

    PmtTemplate {
        logical: pmt,
        envelope,
        reflector_boundary: lower,
        photocathode_cap: cathode_cap,
        photocathode_tube: cathode_tube,
        absorber,
    }
}
