//! Construction of the optical-module geometry.
//!
//! This crate provides:
//! - The gel pad and PMT templates ([`gelpad`], [`pmt`], [`templates`])
//! - The fixed dimensions they are built from ([`calibration`])
//! - Loading and configuration of the external base structure ([`structure`])
//! - The placement engine ([`placement`]) and media carving ([`carving`])

// Internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod calibration;
pub mod carving;
pub mod gelpad;
pub mod placement;
pub mod pmt;
pub mod structure;
pub mod templates;

pub use carving::{carve_media, CarveOutcome, KnownStructure, VoidShape, VoidSpec};
pub use gelpad::build_gelpad;
pub use placement::{place_optical_units, ComposedUnit, PlacementRecord, TransformedUnit};
pub use pmt::{build_pmt, PmtTemplate};
pub use structure::{
    configure_base_structure, glass_dome_children, synthetic_world, GlassChild, JsonStructureLoader,
    StructureChild, StructureDescription, StructureLoader,
};
pub use templates::SensorTemplates;
