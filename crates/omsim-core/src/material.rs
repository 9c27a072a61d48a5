//! Materials, optical surfaces and component roles.
//!
//! [`MaterialCatalog`] is an owned service: it is created once at startup and
//! handed by reference to whatever needs material or surface definitions.
//! Definitions are resolved lazily on first request and cached.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Bulk materials used by the optical module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Vacuum,
    Air,
    Water,
    Glass,
    Gel,
    Titanium,
    Plastic,
    Photocathode,
}

/// Where a material definition comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialSource {
    /// A predefined NIST material, by database name.
    Nist(&'static str),
    /// A custom material with a fixed density (g/cm³).
    Custom { density: f64 },
}

/// A resolved material definition.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDef {
    pub material: Material,
    pub name: &'static str,
    pub source: MaterialSource,
}

impl Material {
    fn definition(self) -> MaterialDef {
        let (name, source) = match self {
            Material::Vacuum => ("G4_Galactic", MaterialSource::Nist("G4_Galactic")),
            Material::Air => ("G4_AIR", MaterialSource::Nist("G4_AIR")),
            Material::Water => ("G4_WATER", MaterialSource::Nist("G4_WATER")),
            Material::Glass => ("G4_Pyrex_Glass", MaterialSource::Nist("G4_Pyrex_Glass")),
            Material::Titanium => ("G4_Ti", MaterialSource::Nist("G4_Ti")),
            Material::Plastic => (
                "G4_PLASTIC_SC_VINYLTOLUENE",
                MaterialSource::Nist("G4_PLASTIC_SC_VINYLTOLUENE"),
            ),
            Material::Gel => ("OpticalGel", MaterialSource::Custom { density: 2.51 }),
            Material::Photocathode => ("Photocathode", MaterialSource::Custom { density: 2.51 }),
        };
        MaterialDef {
            material: self,
            name,
            source,
        }
    }
}

/// Optical surfaces that can wrap a volume or sit on a border between two placements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    Plastic,
    Titanium,
    Reflector,
}

/// Interface type of an optical surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceType {
    DielectricDielectric,
    DielectricMetal,
}

/// Surface finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceFinish {
    Ground,
    Polished,
}

/// A resolved optical surface definition.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceDef {
    pub kind: SurfaceKind,
    pub name: &'static str,
    pub surface_type: SurfaceType,
    pub finish: SurfaceFinish,
}

impl SurfaceKind {
    fn definition(self) -> SurfaceDef {
        let (name, surface_type, finish) = match self {
            SurfaceKind::Plastic => (
                "plasticSurface",
                SurfaceType::DielectricDielectric,
                SurfaceFinish::Ground,
            ),
            SurfaceKind::Titanium => (
                "titaniumSurface",
                SurfaceType::DielectricMetal,
                SurfaceFinish::Ground,
            ),
            SurfaceKind::Reflector => (
                "reflectorSurface",
                SurfaceType::DielectricMetal,
                SurfaceFinish::Polished,
            ),
        };
        SurfaceDef {
            kind: self,
            name,
            surface_type,
            finish,
        }
    }
}

/// Build-once cache of material and surface definitions.
#[derive(Debug, Default)]
pub struct MaterialCatalog {
    materials: HashMap<Material, MaterialDef>,
    surfaces: HashMap<SurfaceKind, SurfaceDef>,
}

impl MaterialCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the definition of `material`, building it on first use.
    pub fn material(&mut self, material: Material) -> &MaterialDef {
        self.materials.entry(material).or_insert_with(|| {
            log::debug!("building material {material:?}");
            material.definition()
        })
    }

    /// Returns the definition of `kind`, building it on first use.
    pub fn surface(&mut self, kind: SurfaceKind) -> &SurfaceDef {
        self.surfaces.entry(kind).or_insert_with(|| {
            log::debug!("building optical surface {kind:?}");
            kind.definition()
        })
    }

    /// Number of materials built so far.
    pub fn num_materials(&self) -> usize {
        self.materials.len()
    }

    /// Number of surfaces built so far.
    pub fn num_surfaces(&self) -> usize {
        self.surfaces.len()
    }
}

/// Role of a child volume of the external base structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentRole {
    PmtGlass,
    GlassDome,
    TitaniumFlange,
    HvDivider,
    Spring,
    OpticalGel,
    Water,
    Air,
    /// Anything unrecognized: opaque plastic.
    Plastic,
}

/// Name fragments for the legacy classifier, in priority order.
///
/// Matching is case-sensitive. When a name contains several fragments the
/// entry listed first wins, so PMT glass beats the dome, and every solid
/// part beats the `water` / `air` media markers.
const ROLE_PRIORITY: &[(&str, ComponentRole)] = &[
    ("Hamamatsu_R14374", ComponentRole::PmtGlass),
    ("GlasHemisphere", ComponentRole::GlassDome),
    ("Titan_flange", ComponentRole::TitaniumFlange),
    ("HV_divider", ComponentRole::HvDivider),
    ("spring", ComponentRole::Spring),
    ("Optical_gel", ComponentRole::OpticalGel),
    ("water", ComponentRole::Water),
    ("air", ComponentRole::Air),
];

impl ComponentRole {
    /// Classifies a component from its name alone.
    ///
    /// Compatibility path for descriptions that carry no explicit role.
    pub fn classify(name: &str) -> Self {
        ROLE_PRIORITY
            .iter()
            .find(|(fragment, _)| name.contains(fragment))
            .map_or(ComponentRole::Plastic, |(_, role)| *role)
    }

    /// Bulk material of the component.
    pub fn material(self) -> Material {
        match self {
            ComponentRole::PmtGlass | ComponentRole::GlassDome => Material::Glass,
            ComponentRole::TitaniumFlange | ComponentRole::Spring => Material::Titanium,
            ComponentRole::HvDivider | ComponentRole::Plastic => Material::Plastic,
            ComponentRole::OpticalGel => Material::Gel,
            ComponentRole::Water => Material::Water,
            ComponentRole::Air => Material::Air,
        }
    }

    /// Skin surface wrapped around the component, if any.
    pub fn skin_surface(self) -> Option<SurfaceKind> {
        match self {
            ComponentRole::TitaniumFlange | ComponentRole::Spring => Some(SurfaceKind::Titanium),
            ComponentRole::HvDivider | ComponentRole::Plastic => Some(SurfaceKind::Plastic),
            _ => None,
        }
    }

    /// True for the glass dome that gel pads are carved against.
    pub fn is_glass_dome(self) -> bool {
        self == ComponentRole::GlassDome
    }
}
