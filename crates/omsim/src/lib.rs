//! omsim: geometry construction for underwater optical sensor modules.
//!
//! The crate turns a handful of configuration values into a placed-volume
//! tree: gel pads and photomultipliers positioned on a carrier dome, and the
//! water that surrounds the module.
//!
//! # Quick Start
//!
//! ```no_run
//! use omsim::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let mut construction = Construction::new();
//!     construction.set_solid_reflector(true)?;
//!     for i in 0..8 {
//!         construction.place(200.0 * MM, 90.0 * DEG, f64::from(i) * 45.0 * DEG)?;
//!     }
//!
//!     let tree = construction.construct()?;
//!     println!("{}", tree.summary());
//!     Ok(())
//! }
//! ```
//!
//! # Pipeline
//!
//! - Each `place` command is resolved against the current [`OpticalUnitFrame`]
//! - `construct` loads or synthesizes the world, optionally carves the
//!   immersion medium, then places one gel pad and one PMT per request
//! - Every unit's gel pad is trimmed against the dome glass (or a synthetic
//!   dome) and has the PMT envelope removed

// Internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod construction;

pub use construction::Construction;

// Re-export core types
pub use omsim_core::{
    csg, error::{GeometryError, Result},
    units::{CM, DEG, M, MM},
    BooleanOp, ComponentRole, ConstructionOptions, CsgChain, DimensionParameters, GeometryTree,
    LogicalId, Material, MaterialCatalog, OpticalUnitFrame, OpticalUnitRequest, PhysicalId,
    PlacementSpec, RigidTransform, Shape, Solid, SurfaceKind, TreeSummary, UnitTarget,
};

// Re-export construction types
pub use omsim_construction::{
    calibration, CarveOutcome, JsonStructureLoader, KnownStructure, PlacementRecord,
    StructureDescription, StructureLoader,
};

pub use glam::{DQuat, DVec3};

/// Initializes `env_logger` from `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::try_init();
}

/// Reads options from a JSON file and builds the world they describe.
pub fn construct_from_file(path: impl AsRef<std::path::Path>) -> Result<Construction> {
    let options = ConstructionOptions::from_json_file(path)?;
    let mut construction = Construction::from_options(&options)?;
    construction.construct()?;
    Ok(construction)
}
