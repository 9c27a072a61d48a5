//! Error types for omsim.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for geometry construction.
#[derive(Error, Debug)]
pub enum GeometryError {
    /// A configuration command arrived after the world was built.
    #[error("configuration is locked - the world has already been constructed")]
    ConfigurationLocked,

    /// A direction or reference vector has no usable length.
    #[error("degenerate vector {0:?} - a non-zero length is required")]
    DegenerateVector([f64; 3]),

    /// A volume with the given name was not found in the geometry tree.
    #[error("volume '{0}' not found")]
    VolumeNotFound(String),

    /// The external structural description could not be turned into a tree.
    #[error("failed to load base structure '{path}': {reason}")]
    StructureLoad { path: PathBuf, reason: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for omsim operations.
pub type Result<T> = std::result::Result<T, GeometryError>;
