//! Immersion media around known base structures.
//!
//! Carving is not general geometry introspection. Each supported structure
//! has a recipe of inner voids that approximate its known interior; the water
//! fill is the world solid minus those voids minus every glass-dome child.

use std::fmt;
use std::path::Path;

use omsim_core::csg::{self, CsgChain};
use omsim_core::{ComponentRole, GeometryTree, Material, MaterialCatalog, PhysicalId, RigidTransform, Solid};

use crate::structure::{glass_dome_children, GlassChild};

/// Shape of an inner void, centered on the structure axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoidShape {
    Sphere { radius: f64 },
    Tube { radius: f64, half_z: f64 },
    EllipticalTube { semi_x: f64, semi_y: f64, half_z: f64 },
}

/// One void of a carving recipe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoidSpec {
    pub name: &'static str,
    pub shape: VoidShape,
    /// Position of the void center along the structure's z axis.
    pub offset: f64,
}

impl VoidSpec {
    /// The void as a solid in its own frame.
    pub fn solid(&self) -> Solid {
        match self.shape {
            VoidShape::Sphere { radius } => csg::sphere(self.name, 0.0, radius),
            VoidShape::Tube { radius, half_z } => csg::tube(self.name, 0.0, radius, half_z),
            VoidShape::EllipticalTube {
                semi_x,
                semi_y,
                half_z,
            } => csg::elliptical_tube(self.name, semi_x, semi_y, half_z),
        }
    }

    /// Placement of the void in the world.
    pub fn transform(&self) -> RigidTransform {
        RigidTransform::along_z(self.offset)
    }
}

const HALF_VESSEL_VOIDS: &[VoidSpec] = &[
    VoidSpec {
        name: "dome_void",
        shape: VoidShape::Sphere { radius: 212.0 },
        offset: 0.0,
    },
    VoidSpec {
        name: "flange_void",
        shape: VoidShape::Tube {
            radius: 216.0,
            half_z: 12.0,
        },
        offset: -12.0,
    },
    VoidSpec {
        name: "backplate_void",
        shape: VoidShape::EllipticalTube {
            semi_x: 160.0,
            semi_y: 160.0,
            half_z: 30.0,
        },
        offset: -54.0,
    },
];

const FULL_VESSEL_VOIDS: &[VoidSpec] = &[
    VoidSpec {
        name: "upper_dome_void",
        shape: VoidShape::Sphere { radius: 212.0 },
        offset: 30.0,
    },
    VoidSpec {
        name: "lower_dome_void",
        shape: VoidShape::Sphere { radius: 212.0 },
        offset: -30.0,
    },
    VoidSpec {
        name: "belt_void",
        shape: VoidShape::Tube {
            radius: 216.0,
            half_z: 30.0,
        },
        offset: 0.0,
    },
];

/// Base structures with a carving recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownStructure {
    /// One glass hemisphere on a flange and back plate.
    HalfVessel,
    /// Two glass hemispheres joined by a cylindrical belt.
    FullVessel,
}

impl KnownStructure {
    pub const ALL: [KnownStructure; 2] = [KnownStructure::HalfVessel, KnownStructure::FullVessel];

    /// Identity string, matched against the description's file stem.
    pub fn identity(self) -> &'static str {
        match self {
            KnownStructure::HalfVessel => "half_vessel",
            KnownStructure::FullVessel => "full_vessel",
        }
    }

    pub fn from_identity(identity: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.identity() == identity)
    }

    /// Resolves the structure of a base-structure file.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(Self::from_identity)
    }

    /// Inner voids, in subtraction order.
    pub fn voids(self) -> &'static [VoidSpec] {
        match self {
            KnownStructure::HalfVessel => HALF_VESSEL_VOIDS,
            KnownStructure::FullVessel => FULL_VESSEL_VOIDS,
        }
    }
}

impl fmt::Display for KnownStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identity())
    }
}

/// What carving did to the world.
#[derive(Debug, Clone, PartialEq)]
pub enum CarveOutcome {
    /// No base structure: the world itself became water.
    WorldFlooded,
    /// A water fill was placed around a known structure.
    Carved {
        structure: KnownStructure,
        fill: PhysicalId,
        voids: usize,
        glass_children: usize,
    },
    /// The structure is not known; nothing was carved.
    Skipped { identity: String },
}

/// Builds the water fill for `structure` from a world solid.
pub fn build_fill(world: &Solid, structure: KnownStructure, glass: &[GlassChild]) -> Solid {
    let mut chain = CsgChain::new("water", world);
    for void in structure.voids() {
        log::debug!("carving {} out of the water fill", void.name);
        chain = chain.subtract(&void.solid(), void.transform());
    }
    for child in glass {
        chain = chain.subtract(&child.solid, child.transform);
    }
    chain.build()
}

/// Adds the immersion medium for the base structure loaded from `base_structure_file`.
///
/// An empty file name floods the whole world. An unknown structure is
/// reported and left alone, so the world stays air.
pub fn carve_media(
    tree: &mut GeometryTree,
    catalog: &mut MaterialCatalog,
    base_structure_file: &str,
) -> CarveOutcome {
    if base_structure_file.is_empty() {
        catalog.material(Material::Water);
        let world = tree.world_logical();
        tree.set_material(world, Material::Water);
        log::info!("no base structure: world material set to water");
        return CarveOutcome::WorldFlooded;
    }

    let Some(structure) = KnownStructure::from_path(base_structure_file) else {
        let identity = Path::new(base_structure_file)
            .file_stem()
            .map_or_else(String::new, |s| s.to_string_lossy().into_owned());
        log::warn!(
            "no carving recipe for base structure '{base_structure_file}', no water volume is added"
        );
        return CarveOutcome::Skipped { identity };
    };

    catalog.material(Material::Water);
    let glass = glass_dome_children(tree);
    let world_solid = tree.logical(tree.world_logical()).solid().clone();
    let fill_solid = build_fill(&world_solid, structure, &glass);

    let world = tree.world_logical();
    let logical = tree.add_logical("water", fill_solid, Material::Water);
    let fill = tree.place("water", logical, world, RigidTransform::IDENTITY, 0);
    tree.set_role(fill, ComponentRole::Water);

    log::info!(
        "carved water around {structure}: {} voids, {} glass children",
        structure.voids().len(),
        glass.len()
    );
    CarveOutcome::Carved {
        structure,
        fill,
        voids: structure.voids().len(),
        glass_children: glass.len(),
    }
}
