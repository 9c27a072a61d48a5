//! The external base structure: loading, synthesis and per-component configuration.
//!
//! The base structure is a one-level hierarchy: a world solid and a list of
//! named children placed directly inside it. Each child carries a
//! [`ComponentRole`], either given explicitly by the description or resolved
//! once from its name.

use std::fs;
use std::path::Path;

use omsim_core::csg;
use omsim_core::{
    ComponentRole, GeometryError, GeometryTree, Material, MaterialCatalog, PhysicalId, Result,
    RigidTransform, Solid,
};
use serde::{Deserialize, Serialize};

use crate::calibration::world_half_extents;

/// Reads an external structural description into a geometry tree.
///
/// Implementations only build the hierarchy. Materials and surfaces are
/// assigned afterwards by [`configure_base_structure`].
pub trait StructureLoader {
    /// Loads the description at `path`.
    fn load(&self, path: &Path) -> Result<GeometryTree>;
}

/// One child of the base structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureChild {
    pub name: String,
    pub solid: Solid,
    /// Placement inside the world.
    #[serde(default)]
    pub transform: RigidTransform,
    /// Explicit role; when absent the name is classified.
    #[serde(default)]
    pub role: Option<ComponentRole>,
}

/// A complete structural description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureDescription {
    pub world: Solid,
    #[serde(default)]
    pub children: Vec<StructureChild>,
}

impl StructureDescription {
    /// Builds the unconfigured tree. Every volume starts out as air.
    pub fn into_tree(self) -> GeometryTree {
        let mut tree = GeometryTree::new(self.world.name().to_owned(), self.world, Material::Air);
        let world = tree.world_logical();
        for child in self.children {
            let logical = tree.add_logical(child.name.clone(), child.solid, Material::Air);
            let id = tree.place(child.name, logical, world, child.transform, 0);
            if let Some(role) = child.role {
                tree.set_role(id, role);
            }
        }
        tree
    }
}

/// Loader for JSON structural descriptions.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStructureLoader;

impl JsonStructureLoader {
    /// Parses a description from a JSON string.
    pub fn parse(json: &str) -> serde_json::Result<StructureDescription> {
        serde_json::from_str(json)
    }
}

impl StructureLoader for JsonStructureLoader {
    fn load(&self, path: &Path) -> Result<GeometryTree> {
        let load_error = |reason: String| GeometryError::StructureLoad {
            path: path.to_path_buf(),
            reason,
        };

        let content = fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
        let description = Self::parse(&content).map_err(|e| load_error(e.to_string()))?;
        if let Some(index) = description.children.iter().position(|c| c.name.is_empty()) {
            return Err(load_error(format!("child #{index} has no name")));
        }

        log::info!(
            "loaded base structure {} with {} children",
            path.display(),
            description.children.len()
        );
        Ok(description.into_tree())
    }
}

/// An empty air-filled world box, used when no base structure is given.
pub fn synthetic_world() -> GeometryTree {
    GeometryTree::new(
        "World",
        csg::cuboid("World", world_half_extents()),
        Material::Air,
    )
}

/// Assigns material, skin surface and role to every child of the world, and
/// makes the world itself air. Returns the number of configured children.
pub fn configure_base_structure(tree: &mut GeometryTree, catalog: &mut MaterialCatalog) -> usize {
    catalog.material(Material::Air);
    let world_logical = tree.world_logical();
    tree.set_material(world_logical, Material::Air);

    let children: Vec<(PhysicalId, ComponentRole)> = tree
        .world_children()
        .map(|(id, pv)| {
            let role = pv.role().unwrap_or_else(|| ComponentRole::classify(pv.name()));
            (id, role)
        })
        .collect();

    for &(id, role) in &children {
        let logical = tree.physical(id).logical();
        let name = tree.physical(id).name().to_owned();

        tree.set_role(id, role);
        tree.set_material(logical, role.material());
        catalog.material(role.material());
        if let Some(surface) = role.skin_surface() {
            catalog.surface(surface);
            tree.add_skin_surface(name.clone(), logical, surface);
        }
        log::debug!("configured {name} as {role:?}");
    }

    children.len()
}

/// A glass-dome child of the base structure, with its placement in the world.
#[derive(Debug, Clone)]
pub struct GlassChild {
    pub solid: Solid,
    pub transform: RigidTransform,
}

/// Collects the world children tagged (or, untagged, named) as glass dome.
pub fn glass_dome_children(tree: &GeometryTree) -> Vec<GlassChild> {
    tree.world_children()
        .filter(|(_, pv)| {
            pv.role()
                .unwrap_or_else(|| ComponentRole::classify(pv.name()))
                .is_glass_dome()
        })
        .map(|(id, pv)| GlassChild {
            solid: tree.logical_of(id).solid().clone(),
            transform: pv.transform(),
        })
        .collect()
}
