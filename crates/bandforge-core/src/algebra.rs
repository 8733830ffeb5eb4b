use ndarray::Zip;

use crate::consts::NDI_EPSILON;
use crate::error::Result;
use crate::raster::{ensure_same_shape, BandArray, IndexArray};

/// Normalized difference of two bands: `(a - b) / (a + b + eps)`.
///
/// The epsilon term is always present in the denominator. Any element that
/// still comes out NaN or infinite (non-finite inputs, or `a + b == -eps`)
/// is replaced with 0.0. Inputs are not modified.
pub fn normalized_difference(band_a: &BandArray, band_b: &BandArray) -> Result<IndexArray> {
    ensure_same_shape(band_a.dim(), band_b.dim())?;

    let index = Zip::from(band_a).and(band_b).map_collect(|&a, &b| {
        let v = (a - b) / (a + b + NDI_EPSILON);
        if v.is_finite() {
            v
        } else {
            0.0
        }
    });

    Ok(index)
}

/// Shift an index from [-1, 1] to [0, 1] via `(x + 1) / 2`.
pub fn to_unit_range(index: &IndexArray) -> IndexArray {
    index.mapv(|v| (v + 1.0) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_zero_bands_stay_finite() {
        let zeros = Array2::<f32>::zeros((3, 3));
        let index = normalized_difference(&zeros, &zeros).unwrap();
        assert!(index.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_non_finite_input_is_zeroed() {
        let a = Array2::from_elem((1, 2), f32::NAN);
        let b = Array2::from_elem((1, 2), 1.0f32);
        let index = normalized_difference(&a, &b).unwrap();
        assert!(index.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_unit_range_endpoints() {
        let index = Array2::from_shape_vec((1, 3), vec![-1.0f32, 0.0, 1.0]).unwrap();
        let unit = to_unit_range(&index);
        assert_eq!(unit.as_slice().unwrap(), &[0.0, 0.5, 1.0]);
    }
}
