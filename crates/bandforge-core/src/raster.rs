use ndarray::{Array2, Array3, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{BandforgeError, Result};

/// One spectral band, shape = (height, width).
pub type BandArray = Array2<f32>;

/// Normalized-difference output, nominally in [-1, 1].
pub type IndexArray = Array2<f32>;

/// Binary reclassification of an index: every element is 0.0 or 1.0.
pub type ClassifiedArray = Array2<f32>;

/// Per-pixel opacity: every element is 0 or 255.
pub type AlphaMask = Array2<u8>;

/// 8-bit display product, shape = (height, width, channels).
///
/// Channel order is gray, or R,G,B, or R,G,B,A.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuantizedImage {
    data: Array3<u8>,
}

impl QuantizedImage {
    /// Wrap a single-channel 2-D image.
    pub fn gray(data: Array2<u8>) -> Self {
        Self {
            data: data.insert_axis(Axis(2)),
        }
    }

    /// Wrap an interleaved (height, width, channels) array.
    pub fn from_channels(data: Array3<u8>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &Array3<u8> {
        &self.data
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    /// View of one channel. Panics if `index >= channels()`.
    pub fn channel(&self, index: usize) -> ArrayView2<'_, u8> {
        self.data.index_axis(Axis(2), index)
    }

    /// Row-major interleaved samples, the layout image encoders expect.
    pub fn to_interleaved(&self) -> Vec<u8> {
        self.data.iter().copied().collect()
    }
}

/// Georeferencing summary supplied by the raster decoder for one file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RasterGeometry {
    /// Ground size of one pixel along x, in CRS units (meters for projected CRSs).
    pub pixel_width: f64,
    /// Ground size of one pixel along y.
    pub pixel_height: f64,
    /// Raster width in pixels.
    pub raster_width: usize,
    /// Raster height in pixels.
    pub raster_height: usize,
    /// Coordinate reference system identifier, e.g. "EPSG:32633".
    pub crs: String,
}

/// Fail with `ShapeMismatch` unless both shapes are equal.
pub(crate) fn ensure_same_shape(expected: (usize, usize), found: (usize, usize)) -> Result<()> {
    if expected != found {
        return Err(BandforgeError::ShapeMismatch { expected, found });
    }
    Ok(())
}
