#[allow(dead_code)]
mod common;

use bandforge_core::composite::{
    alpha_mask, composite, rgb_composite, rgba_composite, AlphaCutoff,
};
use bandforge_core::error::BandforgeError;

use common::{band_from, constant_band};

// ---------------------------------------------------------------------------
// composite (band count dispatch)
// ---------------------------------------------------------------------------

#[test]
fn test_two_bands_give_one_channel() {
    let a = constant_band(3, 5, 150.0);
    let b = constant_band(3, 5, 50.0);
    let image = composite(&[&a, &b]).unwrap();
    assert_eq!(image.channels(), 1);
    assert_eq!(image.shape(), (3, 5));
}

#[test]
fn test_two_band_shift_then_max_scale() {
    // index = [-1, 0, 1] → shifted [0, 0.5, 1] → max 1 → [0, 128, 255]
    let a = band_from(1, 3, &[0.0, 1.0, 1.0]);
    let b = band_from(1, 3, &[1.0, 1.0, 0.0]);
    let image = composite(&[&a, &b]).unwrap();
    let gray = image.channel(0);
    assert_eq!(gray[[0, 0]], 0);
    assert_eq!(gray[[0, 1]], 128);
    assert_eq!(gray[[0, 2]], 255);
}

#[test]
fn test_three_bands_give_three_channels() {
    let r = constant_band(2, 2, 10.0);
    let g = constant_band(2, 2, 20.0);
    let b = constant_band(2, 2, 30.0);
    let image = composite(&[&r, &g, &b]).unwrap();
    assert_eq!(image.channels(), 3);
    for row in 0..2 {
        for col in 0..2 {
            assert_eq!(image.data()[[row, col, 0]], 85);
            assert_eq!(image.data()[[row, col, 1]], 170);
            assert_eq!(image.data()[[row, col, 2]], 255);
        }
    }
}

#[test]
fn test_unsupported_band_counts() {
    let band = constant_band(2, 2, 1.0);
    for count in [0usize, 1, 4, 5] {
        let bands = vec![&band; count];
        match composite(&bands) {
            Err(BandforgeError::UnsupportedBandCount(n)) => assert_eq!(n, count),
            other => panic!("count {count}: expected UnsupportedBandCount, got {other:?}"),
        }
    }
}

#[test]
fn test_rgb_shape_mismatch() {
    let r = constant_band(2, 2, 1.0);
    let g = constant_band(2, 2, 1.0);
    let b = constant_band(3, 2, 1.0);
    assert!(matches!(
        rgb_composite(&r, &g, &b),
        Err(BandforgeError::ShapeMismatch { .. })
    ));
}

// ---------------------------------------------------------------------------
// alpha / rgba
// ---------------------------------------------------------------------------

#[test]
fn test_alpha_mask_values() {
    let index = band_from(2, 2, &[0.2, 0.7, 0.5, -1.0]);
    let mask = alpha_mask(&index, AlphaCutoff::default());
    assert_eq!(mask.as_slice().unwrap(), &[255, 0, 0, 255]);
    assert!(mask.iter().all(|&v| v == 0 || v == 255));
}

#[test]
fn test_alpha_cutoff_is_configurable() {
    let index = band_from(1, 3, &[0.1, 0.2, 0.3]);
    let mask = alpha_mask(&index, AlphaCutoff(0.25));
    assert_eq!(mask.as_slice().unwrap(), &[255, 255, 0]);
}

#[test]
fn test_alpha_cutoff_default() {
    assert_eq!(AlphaCutoff::default(), AlphaCutoff(0.5));
}

#[test]
fn test_rgba_left_column_opaque() {
    let r = constant_band(2, 2, 10.0);
    let g = constant_band(2, 2, 20.0);
    let b = constant_band(2, 2, 30.0);
    let index = band_from(2, 2, &[0.1, 0.5, 0.4, 0.9]);

    let image = rgba_composite(&r, &g, &b, &index, AlphaCutoff::default()).unwrap();
    assert_eq!(image.channels(), 4);

    let alpha = image.channel(3);
    assert_eq!(alpha[[0, 0]], 255);
    assert_eq!(alpha[[0, 1]], 0);
    assert_eq!(alpha[[1, 0]], 255);
    assert_eq!(alpha[[1, 1]], 0);

    assert!(image.channel(0).iter().all(|&v| v == 85));
    assert!(image.channel(1).iter().all(|&v| v == 170));
    assert!(image.channel(2).iter().all(|&v| v == 255));
}

#[test]
fn test_rgba_interleaved_order() {
    let r = constant_band(1, 1, 30.0);
    let g = constant_band(1, 1, 0.0);
    let b = constant_band(1, 1, 15.0);
    let index = constant_band(1, 1, 0.0);
    let image = rgba_composite(&r, &g, &b, &index, AlphaCutoff::default()).unwrap();
    assert_eq!(image.to_interleaved(), vec![255, 0, 128, 255]);
}

#[test]
fn test_rgba_index_shape_mismatch() {
    let band = constant_band(2, 2, 1.0);
    let index = constant_band(2, 3, 0.0);
    assert!(matches!(
        rgba_composite(&band, &band, &band, &index, AlphaCutoff::default()),
        Err(BandforgeError::ShapeMismatch { .. })
    ));
}
