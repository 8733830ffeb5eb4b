use std::path::PathBuf;

use thiserror::Error;

use crate::bands::BandRole;

#[derive(Error, Debug)]
pub enum BandforgeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Unsupported channel count: {0}")]
    UnsupportedChannelCount(usize),

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Unsupported band count: {0} (expected 2 or 3)")]
    UnsupportedBandCount(usize),

    #[error("No band mapped for role {role}")]
    MissingBand { role: BandRole },

    #[error("Band {index} mapped to role {role} is out of range (scene has {band_count} bands)")]
    BandOutOfRange {
        role: BandRole,
        index: usize,
        band_count: usize,
    },

    #[error("Scene has no bands")]
    EmptyScene,

    #[error("Band decode error: {0}")]
    Decode(String),

    #[error("Duplicate product name: {0}")]
    DuplicateProduct(String),

    #[error("Invalid name {0:?}: must be non-empty and free of path separators and '..'")]
    InvalidName(String),

    #[error("Invalid manifest: {0}")]
    Manifest(String),

    #[error("Ledger is locked by another writer: {}", .0.display())]
    LedgerLocked(PathBuf),
}

pub type Result<T> = std::result::Result<T, BandforgeError>;
