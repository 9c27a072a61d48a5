//! Core abstractions for omsim.
//!
//! This crate provides the building blocks of the optical-module geometry:
//! - [`Solid`] CSG trees and the [`csg`] helpers that build them
//! - [`RigidTransform`] and the optical-unit [`frame`] math
//! - [`MaterialCatalog`] and component roles
//! - [`GeometryTree`], the placed-volume hierarchy
//! - Construction options and errors

// Internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Geometry code names its axes x/y/z and radii r/rmin/rmax
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]

pub mod csg;
pub mod error;
pub mod frame;
pub mod material;
pub mod options;
pub mod solid;
pub mod transform;
pub mod tree;
pub mod units;

pub use csg::{CsgChain, CsgStep};
pub use error::{GeometryError, Result};
pub use frame::{rotation_from_direction, OpticalUnitFrame, OpticalUnitRequest, UnitTarget};
pub use material::{ComponentRole, Material, MaterialCatalog, SurfaceKind};
pub use options::{ConstructionOptions, DimensionParameters, PlacementSpec};
pub use solid::{BooleanOp, Shape, Solid};
pub use transform::RigidTransform;
pub use tree::{GeometryTree, LogicalId, PhysicalId, TreeSummary};

// Re-export glam types for convenience
pub use glam::{DQuat, DVec3};
