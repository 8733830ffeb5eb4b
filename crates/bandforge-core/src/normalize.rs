use ndarray::{Array, Dimension};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{DEGENERATE_MID_LEVEL, MAX_LEVEL};

/// How a float array is mapped into the 8-bit display domain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleStrategy {
    /// `x / max(x)`; all zero when the maximum is zero.
    Max,
    /// `(x - min) / (max - min)`; uniform mid-level when the range is empty.
    #[default]
    MinMax,
}

impl std::fmt::Display for ScaleStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Max => write!(f, "Max"),
            Self::MinMax => write!(f, "Min-Max"),
        }
    }
}

/// Quantize `x` with the given strategy.
pub fn quantize<D: Dimension>(x: &Array<f32, D>, strategy: ScaleStrategy) -> Array<u8, D> {
    match strategy {
        ScaleStrategy::Max => max_scale(x),
        ScaleStrategy::MinMax => min_max_scale(x),
    }
}

/// `round(clip(x / max(x), 0, 1) * 255)`, with one max shared by every element
/// (and so by every channel of a stacked array).
///
/// A zero maximum, or no finite element at all, yields an all-zero image. A
/// negative maximum is a valid divisor: every value at or below it maps to 255.
pub fn max_scale<D: Dimension>(x: &Array<f32, D>) -> Array<u8, D> {
    match finite_range(x) {
        Some((_, max)) if max != 0.0 => x.mapv(|v| to_level(v / max)),
        range => {
            debug!(?range, "Max-scale input has a zero maximum, emitting zeros");
            Array::zeros(x.raw_dim())
        }
    }
}

/// `round(clip((x - min) / (max - min), 0, 1) * 255)`.
///
/// An empty range (`max == min`, or no finite element) yields a uniform
/// mid-level (128) image.
pub fn min_max_scale<D: Dimension>(x: &Array<f32, D>) -> Array<u8, D> {
    match finite_range(x) {
        Some((min, max)) if max > min => {
            let range = max - min;
            x.mapv(|v| to_level((v - min) / range))
        }
        range => {
            debug!(?range, "Min-max input range is degenerate, emitting mid-level");
            Array::from_elem(x.raw_dim(), DEGENERATE_MID_LEVEL)
        }
    }
}

/// Min and max over the finite elements, or `None` when there are none.
fn finite_range<D: Dimension>(x: &Array<f32, D>) -> Option<(f32, f32)> {
    x.iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Map a unit-range value to a display level. Clamps before rounding; NaN maps to 0.
fn to_level(unit: f32) -> u8 {
    if unit.is_nan() {
        return 0;
    }
    (unit.clamp(0.0, 1.0) * MAX_LEVEL).round() as u8
}
