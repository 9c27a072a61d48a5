//! The placed-geometry tree handed to the transport engine.
//!
//! Logical volumes (solid + material + daughters) and physical volumes
//! (a logical volume placed inside a mother) live in two arenas owned by the
//! tree and are addressed by index. A logical volume can be placed many
//! times; its daughters are shared by every placement.

use std::fmt;

use crate::error::{GeometryError, Result};
use crate::material::{ComponentRole, Material, SurfaceKind};
use crate::solid::Solid;
use crate::transform::RigidTransform;

/// Index of a logical volume in a [`GeometryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicalId(usize);

/// Index of a physical volume in a [`GeometryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhysicalId(usize);

/// A solid with a material and an ordered list of daughter placements.
#[derive(Debug, Clone)]
pub struct LogicalVolume {
    name: String,
    solid: Solid,
    material: Material,
    daughters: Vec<PhysicalId>,
}

impl LogicalVolume {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn solid(&self) -> &Solid {
        &self.solid
    }

    pub fn material(&self) -> Material {
        self.material
    }

    /// Daughter placements, in insertion order.
    pub fn daughters(&self) -> &[PhysicalId] {
        &self.daughters
    }
}

/// A logical volume placed inside a mother volume.
#[derive(Debug, Clone)]
pub struct PhysicalVolume {
    name: String,
    logical: LogicalId,
    mother: Option<LogicalId>,
    transform: RigidTransform,
    copy_no: usize,
    role: Option<ComponentRole>,
}

impl PhysicalVolume {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn logical(&self) -> LogicalId {
        self.logical
    }

    /// The mother logical volume; `None` only for the world.
    pub fn mother(&self) -> Option<LogicalId> {
        self.mother
    }

    /// Placement of this volume in its mother's frame.
    pub fn transform(&self) -> RigidTransform {
        self.transform
    }

    pub fn copy_no(&self) -> usize {
        self.copy_no
    }

    /// Role tag resolved when the volume was loaded, if any.
    pub fn role(&self) -> Option<ComponentRole> {
        self.role
    }
}

/// An optical surface wrapping every placement of a logical volume.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinSurface {
    pub name: String,
    pub logical: LogicalId,
    pub surface: SurfaceKind,
}

/// An optical surface on the oriented boundary `from -> to`.
#[derive(Debug, Clone, PartialEq)]
pub struct BorderSurface {
    pub name: String,
    pub from: PhysicalId,
    pub to: PhysicalId,
    pub surface: SurfaceKind,
}

/// Owner of all volumes and surfaces of one run.
#[derive(Debug, Clone)]
pub struct GeometryTree {
    logicals: Vec<LogicalVolume>,
    physicals: Vec<PhysicalVolume>,
    skin_surfaces: Vec<SkinSurface>,
    border_surfaces: Vec<BorderSurface>,
    world: PhysicalId,
}

impl GeometryTree {
    /// Creates a tree whose root is a world volume made of `solid`.
    pub fn new(name: impl Into<String>, solid: Solid, material: Material) -> Self {
        let name = name.into();
        let mut tree = Self {
            logicals: Vec::new(),
            physicals: Vec::new(),
            skin_surfaces: Vec::new(),
            border_surfaces: Vec::new(),
            world: PhysicalId(0),
        };
        let logical = tree.add_logical(name.clone(), solid, material);
        tree.physicals.push(PhysicalVolume {
            name,
            logical,
            mother: None,
            transform: RigidTransform::IDENTITY,
            copy_no: 0,
            role: None,
        });
        tree
    }

    /// Registers a logical volume that is not placed yet.
    pub fn add_logical(&mut self, name: impl Into<String>, solid: Solid, material: Material) -> LogicalId {
        self.logicals.push(LogicalVolume {
            name: name.into(),
            solid,
            material,
            daughters: Vec::new(),
        });
        LogicalId(self.logicals.len() - 1)
    }

    /// Places `logical` inside `mother`.
    pub fn place(
        &mut self,
        name: impl Into<String>,
        logical: LogicalId,
        mother: LogicalId,
        transform: RigidTransform,
        copy_no: usize,
    ) -> PhysicalId {
        let id = PhysicalId(self.physicals.len());
        self.physicals.push(PhysicalVolume {
            name: name.into(),
            logical,
            mother: Some(mother),
            transform,
            copy_no,
            role: None,
        });
        self.logicals[mother.0].daughters.push(id);
        id
    }

    /// Attaches a role tag to a placement.
    pub fn set_role(&mut self, id: PhysicalId, role: ComponentRole) {
        self.physicals[id.0].role = Some(role);
    }

    /// The world placement.
    pub fn world(&self) -> PhysicalId {
        self.world
    }

    /// The world logical volume.
    pub fn world_logical(&self) -> LogicalId {
        self.physicals[self.world.0].logical
    }

    pub fn logical(&self, id: LogicalId) -> &LogicalVolume {
        &self.logicals[id.0]
    }

    pub fn physical(&self, id: PhysicalId) -> &PhysicalVolume {
        &self.physicals[id.0]
    }

    /// Logical volume placed by `id`.
    pub fn logical_of(&self, id: PhysicalId) -> &LogicalVolume {
        self.logical(self.physical(id).logical)
    }

    /// Changes the material of a logical volume.
    pub fn set_material(&mut self, id: LogicalId, material: Material) {
        self.logicals[id.0].material = material;
    }

    /// Daughters of a logical volume, paired with their ids.
    pub fn daughters(&self, id: LogicalId) -> impl Iterator<Item = (PhysicalId, &PhysicalVolume)> {
        self.logicals[id.0]
            .daughters
            .iter()
            .map(|&d| (d, &self.physicals[d.0]))
    }

    /// Direct children of the world.
    pub fn world_children(&self) -> impl Iterator<Item = (PhysicalId, &PhysicalVolume)> {
        self.daughters(self.world_logical())
    }

    /// Looks up physical volumes by exact name.
    pub fn find_physical(&self, name: &str) -> impl Iterator<Item = (PhysicalId, &PhysicalVolume)> + '_ {
        let name = name.to_owned();
        self.physicals
            .iter()
            .enumerate()
            .filter(move |(_, pv)| pv.name == name)
            .map(|(i, pv)| (PhysicalId(i), pv))
    }

    /// First physical volume with the given name.
    pub fn require_physical(&self, name: &str) -> Result<PhysicalId> {
        self.find_physical(name)
            .next()
            .map(|(id, _)| id)
            .ok_or_else(|| GeometryError::VolumeNotFound(name.to_owned()))
    }

    /// Wraps every placement of `logical` in `surface`.
    pub fn add_skin_surface(&mut self, name: impl Into<String>, logical: LogicalId, surface: SurfaceKind) {
        self.skin_surfaces.push(SkinSurface {
            name: name.into(),
            logical,
            surface,
        });
    }

    /// Adds a surface on the oriented boundary `from -> to`.
    pub fn add_border_surface(
        &mut self,
        name: impl Into<String>,
        from: PhysicalId,
        to: PhysicalId,
        surface: SurfaceKind,
    ) {
        self.border_surfaces.push(BorderSurface {
            name: name.into(),
            from,
            to,
            surface,
        });
    }

    /// Adds the same surface on both orientations of a boundary.
    pub fn add_border_surface_pair(
        &mut self,
        name: &str,
        a: PhysicalId,
        b: PhysicalId,
        surface: SurfaceKind,
    ) {
        self.add_border_surface(name, a, b, surface);
        self.add_border_surface(name, b, a, surface);
    }

    pub fn skin_surfaces(&self) -> &[SkinSurface] {
        &self.skin_surfaces
    }

    pub fn border_surfaces(&self) -> &[BorderSurface] {
        &self.border_surfaces
    }

    /// Border surfaces touching `id` on either side.
    pub fn borders_of(&self, id: PhysicalId) -> impl Iterator<Item = &BorderSurface> {
        self.border_surfaces
            .iter()
            .filter(move |b| b.from == id || b.to == id)
    }

    pub fn num_logicals(&self) -> usize {
        self.logicals.len()
    }

    pub fn num_physicals(&self) -> usize {
        self.physicals.len()
    }

    /// Counts of the tree contents, for logging.
    pub fn summary(&self) -> TreeSummary {
        TreeSummary {
            logical_volumes: self.logicals.len(),
            physical_volumes: self.physicals.len(),
            world_children: self.logical(self.world_logical()).daughters.len(),
            skin_surfaces: self.skin_surfaces.len(),
            border_surfaces: self.border_surfaces.len(),
        }
    }
}

/// Volume and surface counts of a [`GeometryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeSummary {
    pub logical_volumes: usize,
    pub physical_volumes: usize,
    pub world_children: usize,
    pub skin_surfaces: usize,
    pub border_surfaces: usize,
}

impl fmt::Display for TreeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} logical / {} physical volumes, {} world children, {} skin / {} border surfaces",
            self.logical_volumes,
            self.physical_volumes,
            self.world_children,
            self.skin_surfaces,
            self.border_surfaces
        )
    }
}
