//! Lazily built sensor templates.

use omsim_core::{DimensionParameters, GeometryTree, MaterialCatalog, Solid};

use crate::gelpad::build_gelpad;
use crate::pmt::{build_pmt, PmtTemplate};

/// Gel pad and PMT templates, each built on first request and then reused.
#[derive(Debug, Default)]
pub struct SensorTemplates {
    gelpad: Option<Solid>,
    pmt: Option<PmtTemplate>,
}

impl SensorTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    /// The gel pad template.
    pub fn gelpad(&mut self, dims: &DimensionParameters) -> &Solid {
        self.gelpad.get_or_insert_with(|| {
            log::debug!("building gel pad template (ring offset {:?})", dims.ring_offset);
            build_gelpad(dims.ring_offset)
        })
    }

    /// The PMT template, registered in `tree` on first use.
    pub fn pmt(
        &mut self,
        tree: &mut GeometryTree,
        catalog: &mut MaterialCatalog,
        dims: &DimensionParameters,
    ) -> &PmtTemplate {
        self.pmt
            .get_or_insert_with(|| build_pmt(tree, catalog, dims.tube_length))
    }

    pub fn has_gelpad(&self) -> bool {
        self.gelpad.is_some()
    }

    pub fn has_pmt(&self) -> bool {
        self.pmt.is_some()
    }
}
