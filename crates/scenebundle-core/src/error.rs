//! Error types for scenebundle.

use thiserror::Error;

/// The main error type for scenebundle operations.
#[derive(Error, Debug)]
pub enum ExportError {
    /// A graphic with the given name already exists in the scene.
    #[error("graphic '{0}' already exists")]
    GraphicExists(String),

    /// A graphic with the given name was not found.
    #[error("graphic '{0}' not found")]
    GraphicNotFound(String),

    /// A material with the given name already exists.
    #[error("material '{0}' already exists")]
    MaterialExists(String),

    /// A material with the given name was not found.
    #[error("material '{0}' not found")]
    MaterialNotFound(String),

    /// A spectrum with the given name already exists.
    #[error("spectrum '{0}' already exists")]
    SpectrumExists(String),

    /// A spectrum with the given name was not found.
    #[error("spectrum '{0}' not found")]
    SpectrumNotFound(String),

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// An element refers to a vertex that does not exist.
    #[error("graphic '{graphic}' references vertex {index} but has {count} vertices")]
    IndexOutOfRange {
        graphic: String,
        index: u32,
        count: usize,
    },

    /// The number of time steps must be at least one.
    #[error("invalid number of time steps: {0}")]
    InvalidTimeSteps(usize),

    /// The time range cannot produce strictly increasing samples.
    #[error("invalid time range: {initial} to {finish}")]
    InvalidTimeRange { initial: f64, finish: f64 },

    /// The bundle prefix cannot be used as a file name stem.
    #[error("invalid bundle prefix '{0}'")]
    InvalidPrefix(String),

    /// The number of resource buffers does not match what the scene requires.
    #[error("scene requires {expected} resources, got {actual}")]
    ResourceCountMismatch { expected: usize, actual: usize },

    /// A placeholder reference in the metadata could not be resolved.
    #[error("unresolved resource reference '{0}'")]
    UnresolvedReference(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for scenebundle operations.
pub type Result<T> = std::result::Result<T, ExportError>;
