use serde::{Deserialize, Serialize};

use crate::raster::{ClassifiedArray, IndexArray};

/// Optional binary reclassification of an index before quantization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Threshold {
    /// Index passes through unchanged.
    #[default]
    Disabled,
    /// Pixels strictly below the cutoff become 1, all others 0.
    Below(f32),
}

impl Threshold {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Below(_))
    }
}

impl std::fmt::Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "Disabled"),
            Self::Below(cutoff) => write!(f, "Below {cutoff}"),
        }
    }
}

/// Reclassify `index` against `threshold`.
///
/// Returns the input untouched when disabled; otherwise a classified array
/// holding 1.0 where `index < cutoff` and 0.0 elsewhere (ties and NaN are 0).
pub fn classify(index: IndexArray, threshold: Threshold) -> ClassifiedArray {
    match threshold {
        Threshold::Disabled => index,
        Threshold::Below(cutoff) => index.mapv_into(|v| if v < cutoff { 1.0 } else { 0.0 }),
    }
}
