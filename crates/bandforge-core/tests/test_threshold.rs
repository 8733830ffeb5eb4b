use ndarray::Array2;

use bandforge_core::normalize::min_max_scale;
use bandforge_core::threshold::{classify, Threshold};

#[test]
fn test_disabled_passes_through() {
    let index = Array2::from_shape_vec((1, 3), vec![-0.4f32, 0.1, 0.9]).unwrap();
    let out = classify(index.clone(), Threshold::Disabled);
    assert_eq!(out, index);
}

#[test]
fn test_below_cutoff_is_one() {
    let index = Array2::from_shape_vec((1, 4), vec![-0.4f32, 0.1, 0.29, 0.9]).unwrap();
    let out = classify(index, Threshold::Below(0.3));
    assert_eq!(out.as_slice().unwrap(), &[1.0, 1.0, 1.0, 0.0]);
}

#[test]
fn test_tie_classifies_as_zero() {
    let index = Array2::from_elem((2, 2), 0.3f32);
    let out = classify(index, Threshold::Below(0.3));
    assert!(out.iter().all(|&v| v == 0.0));
}

#[test]
fn test_nan_classifies_as_zero() {
    let index = Array2::from_elem((1, 1), f32::NAN);
    let out = classify(index, Threshold::Below(0.0));
    assert_eq!(out[[0, 0]], 0.0);
}

#[test]
fn test_classified_then_min_max_is_binary() {
    let index = Array2::from_shape_vec((2, 2), vec![-0.5f32, 0.5, 0.2, 0.8]).unwrap();
    let q = min_max_scale(&classify(index, Threshold::Below(0.3)));
    assert_eq!(q.as_slice().unwrap(), &[255, 0, 255, 0]);
}

#[test]
fn test_single_class_falls_back_to_mid_level() {
    let index = Array2::from_elem((2, 2), 0.9f32);
    let q = min_max_scale(&classify(index, Threshold::Below(0.3)));
    assert!(q.iter().all(|&v| v == 128));
}

#[test]
fn test_threshold_default_and_display() {
    assert_eq!(Threshold::default(), Threshold::Disabled);
    assert!(!Threshold::Disabled.is_enabled());
    assert!(Threshold::Below(0.2).is_enabled());
    assert_eq!(format!("{}", Threshold::Disabled), "Disabled");
    assert_eq!(format!("{}", Threshold::Below(0.25)), "Below 0.25");
}
