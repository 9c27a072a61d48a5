//! The construction orchestrator.
//!
//! A [`Construction`] collects configuration commands, then builds the world
//! exactly once. After [`Construction::construct`] every configuration
//! command fails with [`GeometryError::ConfigurationLocked`].

use std::path::Path;

use glam::DVec3;
use omsim_construction::{
    carve_media, configure_base_structure, place_optical_units, synthetic_world, CarveOutcome,
    JsonStructureLoader, PlacementRecord, SensorTemplates, StructureLoader,
};
use omsim_core::units::DEG;
use omsim_core::{
    ConstructionOptions, DimensionParameters, GeometryError, GeometryTree, MaterialCatalog,
    OpticalUnitFrame, OpticalUnitRequest, Result, UnitTarget,
};

/// The world once it has been built.
#[derive(Debug)]
struct BuiltWorld {
    tree: GeometryTree,
    records: Vec<PlacementRecord>,
    carve: Option<CarveOutcome>,
}

/// Builds the optical-module geometry from configuration commands.
#[derive(Debug)]
pub struct Construction<L = JsonStructureLoader> {
    loader: L,
    catalog: MaterialCatalog,
    templates: SensorTemplates,
    frame: OpticalUnitFrame,
    dims: DimensionParameters,
    base_structure_file: String,
    targets: Vec<UnitTarget>,
    built: Option<BuiltWorld>,
}

impl Default for Construction {
    fn default() -> Self {
        Self::with_loader(JsonStructureLoader)
    }
}

impl Construction {
    /// Creates a construction that reads base structures as JSON.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replays `options` through the configuration commands.
    pub fn from_options(options: &ConstructionOptions) -> Result<Self> {
        let mut construction = Self::new();
        construction.apply_options(options)?;
        Ok(construction)
    }
}

impl<L: StructureLoader> Construction<L> {
    /// Creates a construction that reads base structures with `loader`.
    pub fn with_loader(loader: L) -> Self {
        Self {
            loader,
            catalog: MaterialCatalog::new(),
            templates: SensorTemplates::new(),
            frame: OpticalUnitFrame::default(),
            dims: DimensionParameters::default(),
            base_structure_file: String::new(),
            targets: Vec::new(),
            built: None,
        }
    }

    /// Applies every option in the order a command layer would issue them.
    ///
    /// Frame commands come before placements so each unit is resolved
    /// against the configured frame.
    pub fn apply_options(&mut self, options: &ConstructionOptions) -> Result<()> {
        self.set_base_structure_file(options.base_structure_file.clone())?;
        self.set_submerge(options.submerge)?;
        self.set_solid_reflector(options.solid_reflector)?;
        self.set_gel_ring_offset(options.gel_ring_offset)?;
        self.set_photocathode_tube_length(options.photocathode_tube_length)?;
        self.set_frame_origin(DVec3::from_array(options.frame_origin))?;
        self.set_frame_ref_x(DVec3::from_array(options.frame_ref_x))?;
        self.set_frame_ref_y(DVec3::from_array(options.frame_ref_y))?;
        for spec in &options.placements {
            self.place(spec.radius, spec.theta * DEG, spec.phi * DEG)?;
        }
        Ok(())
    }

    fn ensure_unlocked(&self) -> Result<()> {
        if self.built.is_some() {
            return Err(GeometryError::ConfigurationLocked);
        }
        Ok(())
    }

    /// Path of the external structural description. Empty synthesizes an air world.
    pub fn set_base_structure_file(&mut self, path: impl Into<String>) -> Result<()> {
        self.ensure_unlocked()?;
        self.base_structure_file = path.into();
        Ok(())
    }

    pub fn set_submerge(&mut self, submerge: bool) -> Result<()> {
        self.ensure_unlocked()?;
        self.dims.submerge = submerge;
        Ok(())
    }

    pub fn set_solid_reflector(&mut self, enabled: bool) -> Result<()> {
        self.ensure_unlocked()?;
        self.dims.solid_reflector = enabled;
        Ok(())
    }

    pub fn set_gel_ring_offset(&mut self, offset: Option<f64>) -> Result<()> {
        self.ensure_unlocked()?;
        self.dims.ring_offset = offset;
        Ok(())
    }

    pub fn set_photocathode_tube_length(&mut self, length: f64) -> Result<()> {
        self.ensure_unlocked()?;
        self.dims.tube_length = length;
        Ok(())
    }

    pub fn set_frame_origin(&mut self, origin: DVec3) -> Result<()> {
        self.ensure_unlocked()?;
        self.frame.set_origin(origin);
        Ok(())
    }

    /// Sets the first frame direction. The vector is normalized.
    pub fn set_frame_ref_x(&mut self, ref_x: DVec3) -> Result<()> {
        self.ensure_unlocked()?;
        self.frame.set_ref_x(ref_x)
    }

    /// Sets the second frame direction. The vector is normalized.
    pub fn set_frame_ref_y(&mut self, ref_y: DVec3) -> Result<()> {
        self.ensure_unlocked()?;
        self.frame.set_ref_y(ref_y)
    }

    /// Requests one unit at `(radius, theta, phi)` of the current frame.
    ///
    /// The request is resolved immediately; later frame changes do not move it.
    /// Parallel frame directions fail with [`GeometryError::DegenerateVector`]
    /// and queue nothing.
    pub fn place(&mut self, radius: f64, theta: f64, phi: f64) -> Result<&UnitTarget> {
        self.ensure_unlocked()?;
        let target = OpticalUnitRequest::new(radius, theta, phi).resolve(&self.frame)?;
        log::debug!(
            "queued unit #{} at {:?} (frame origin {:?})",
            self.targets.len(),
            target.target,
            target.center
        );
        self.targets.push(target);
        Ok(&self.targets[self.targets.len() - 1])
    }

    /// Builds the world: base structure, media, then every requested unit.
    pub fn construct(&mut self) -> Result<&GeometryTree> {
        self.ensure_unlocked()?;

        let mut tree = if self.base_structure_file.is_empty() {
            log::info!("no base structure given, using an empty world");
            synthetic_world()
        } else {
            let mut tree = self.loader.load(Path::new(&self.base_structure_file))?;
            configure_base_structure(&mut tree, &mut self.catalog);
            tree
        };

        let carve = self
            .dims
            .submerge
            .then(|| carve_media(&mut tree, &mut self.catalog, &self.base_structure_file));

        let records = place_optical_units(
            &mut tree,
            &mut self.catalog,
            &mut self.templates,
            &self.dims,
            &self.targets,
        );
        log::info!("geometry constructed: {}", tree.summary());

        let built = self.built.insert(BuiltWorld {
            tree,
            records,
            carve,
        });
        Ok(&built.tree)
    }

    pub fn is_constructed(&self) -> bool {
        self.built.is_some()
    }

    /// The world tree, once constructed.
    pub fn tree(&self) -> Option<&GeometryTree> {
        self.built.as_ref().map(|b| &b.tree)
    }

    /// One record per placed unit, in request order. Empty before construction.
    pub fn records(&self) -> &[PlacementRecord] {
        self.built.as_ref().map_or(&[], |b| b.records.as_slice())
    }

    /// What carving did, if submerge was requested.
    pub fn carve_outcome(&self) -> Option<&CarveOutcome> {
        self.built.as_ref().and_then(|b| b.carve.as_ref())
    }

    /// Resolved unit targets, in request order.
    pub fn targets(&self) -> &[UnitTarget] {
        &self.targets
    }

    pub fn frame(&self) -> &OpticalUnitFrame {
        &self.frame
    }

    pub fn dimensions(&self) -> &DimensionParameters {
        &self.dims
    }

    pub fn catalog(&self) -> &MaterialCatalog {
        &self.catalog
    }

    pub fn templates(&self) -> &SensorTemplates {
        &self.templates
    }

    /// Hands the finished tree over to its consumer.
    pub fn into_tree(self) -> Option<GeometryTree> {
        self.built.map(|b| b.tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omsim_core::{csg, Material};

    /// Loader that hands out a fixed tree instead of reading files.
    struct FixedLoader(GeometryTree);

    impl StructureLoader for FixedLoader {
        fn load(&self, _path: &Path) -> Result<GeometryTree> {
            Ok(self.0.clone())
        }
    }

    fn dome_tree() -> GeometryTree {
        let mut tree = GeometryTree::new(
            "World",
            csg::cuboid("World", DVec3::splat(2000.0)),
            Material::Vacuum,
        );
        let world = tree.world_logical();
        let dome = tree.add_logical("GlasHemisphere", csg::sphere("dome", 210.0, 222.0), Material::Air);
        tree.place("GlasHemisphere_0", dome, world, omsim_core::RigidTransform::IDENTITY, 0);
        tree
    }

    #[test]
    fn test_commands_locked_after_construct() {
        let mut construction = Construction::new();
        construction.place(200.0, 0.0, 0.0).unwrap();
        construction.construct().unwrap();

        assert!(matches!(
            construction.set_submerge(true),
            Err(GeometryError::ConfigurationLocked)
        ));
        assert!(matches!(
            construction.place(1.0, 0.0, 0.0),
            Err(GeometryError::ConfigurationLocked)
        ));
        assert!(construction.construct().is_err());
        assert_eq!(construction.records().len(), 1);
    }

    #[test]
    fn test_degenerate_reference_vector() {
        let mut construction = Construction::new();
        let err = construction.set_frame_ref_x(DVec3::ZERO).unwrap_err();
        assert!(matches!(err, GeometryError::DegenerateVector(_)));
        assert_eq!(construction.frame().ref_x(), DVec3::X);
    }

    #[test]
    fn test_parallel_frame_fails_place() {
        let mut construction = Construction::new();
        construction.set_frame_ref_x(DVec3::Y).unwrap();
        let err = construction.place(200.0, 45.0 * DEG, 0.0).unwrap_err();
        assert!(matches!(err, GeometryError::DegenerateVector(_)));
        assert!(construction.targets().is_empty());

        // swapping the axes passes through the parallel pair and recovers
        construction.set_frame_ref_y(DVec3::X).unwrap();
        let target = *construction.place(200.0, 90.0 * DEG, 0.0).unwrap();
        assert!(target.target.abs_diff_eq(DVec3::new(0.0, 200.0, 0.0), 1e-9));
        assert!(target.target.is_finite());
    }

    #[test]
    fn test_requests_freeze_frame_origin() {
        let mut construction = Construction::new();
        construction.set_frame_origin(DVec3::new(0.0, 0.0, 100.0)).unwrap();
        construction.place(50.0, 0.0, 0.0).unwrap();
        construction.set_frame_origin(DVec3::ZERO).unwrap();
        construction.place(50.0, 0.0, 0.0).unwrap();

        let targets = construction.targets();
        assert!(targets[0].target.abs_diff_eq(DVec3::new(0.0, 0.0, 150.0), 1e-12));
        assert!(targets[0].center.abs_diff_eq(DVec3::new(0.0, 0.0, 100.0), 1e-12));
        assert!(targets[1].target.abs_diff_eq(DVec3::new(0.0, 0.0, 50.0), 1e-12));
    }

    #[test]
    fn test_loaded_structure_is_configured() {
        let mut construction = Construction::with_loader(FixedLoader(dome_tree()));
        construction.set_base_structure_file("dome.json").unwrap();
        construction.place(210.0, 45.0 * DEG, 0.0).unwrap();
        let tree = construction.construct().unwrap();

        assert_eq!(tree.logical(tree.world_logical()).material(), Material::Air);
        let dome = tree.require_physical("GlasHemisphere_0").unwrap();
        assert_eq!(tree.logical_of(dome).material(), Material::Glass);
        assert!(construction.records()[0].glass_subtracted);
        assert!(construction.carve_outcome().is_none());
    }

    #[test]
    fn test_no_requests_builds_no_templates() {
        let mut construction = Construction::new();
        construction.construct().unwrap();
        assert!(construction.records().is_empty());
        assert!(!construction.templates().has_pmt());
        assert!(!construction.templates().has_gelpad());
    }
}
