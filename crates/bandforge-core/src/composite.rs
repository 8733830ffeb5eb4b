use ndarray::{concatenate, stack, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::algebra::{normalized_difference, to_unit_range};
use crate::consts::{ALPHA_OPAQUE, ALPHA_TRANSPARENT, DEFAULT_ALPHA_CUTOFF};
use crate::error::{BandforgeError, Result};
use crate::normalize::max_scale;
use crate::raster::{ensure_same_shape, AlphaMask, BandArray, IndexArray, QuantizedImage};

/// Index value below which an RGBA pixel is opaque.
///
/// Configured on its own, never derived from the classification threshold
/// of the same run. Defaults to 0.5.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlphaCutoff(pub f32);

impl Default for AlphaCutoff {
    fn default() -> Self {
        Self(DEFAULT_ALPHA_CUTOFF)
    }
}

/// Build a visual composite from an ordered list of bands.
///
/// - 2 bands: normalized difference, shifted to [0, 1], max-scaled → 1 channel.
/// - 3 bands: stacked as R,G,B and max-scaled with one shared max → 3 channels.
pub fn composite(bands: &[&BandArray]) -> Result<QuantizedImage> {
    match bands {
        [a, b] => {
            let index = normalized_difference(a, b)?;
            let unit = to_unit_range(&index);
            Ok(QuantizedImage::gray(max_scale(&unit)))
        }
        [red, green, blue] => rgb_composite(red, green, blue),
        other => Err(BandforgeError::UnsupportedBandCount(other.len())),
    }
}

/// Stack three bands as channels and max-scale them jointly.
pub fn rgb_composite(
    red: &BandArray,
    green: &BandArray,
    blue: &BandArray,
) -> Result<QuantizedImage> {
    ensure_same_shape(red.dim(), green.dim())?;
    ensure_same_shape(red.dim(), blue.dim())?;

    let stacked = stack(Axis(2), &[red.view(), green.view(), blue.view()])?;
    Ok(QuantizedImage::from_channels(max_scale(&stacked)))
}

/// 255 where `index < cutoff`, 0 elsewhere (ties and NaN are transparent).
pub fn alpha_mask(index: &IndexArray, cutoff: AlphaCutoff) -> AlphaMask {
    index.mapv(|v| {
        if v < cutoff.0 {
            ALPHA_OPAQUE
        } else {
            ALPHA_TRANSPARENT
        }
    })
}

/// RGB composite with an index-derived alpha mask as the fourth channel.
pub fn rgba_composite(
    red: &BandArray,
    green: &BandArray,
    blue: &BandArray,
    index: &IndexArray,
    cutoff: AlphaCutoff,
) -> Result<QuantizedImage> {
    let rgb = rgb_composite(red, green, blue)?;
    ensure_same_shape(rgb.shape(), index.dim())?;

    let alpha = alpha_mask(index, cutoff);
    let opaque = alpha.iter().filter(|&&a| a == ALPHA_OPAQUE).count();
    debug!(cutoff = cutoff.0, opaque, total = alpha.len(), "Built alpha mask");

    let rgba = concatenate(
        Axis(2),
        &[rgb.data().view(), alpha.view().insert_axis(Axis(2))],
    )?;
    Ok(QuantizedImage::from_channels(rgba))
}
