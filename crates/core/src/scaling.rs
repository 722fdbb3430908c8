//! Min-max normalization of numeric arrays
//!
//! Used by the interpolation engine to map coordinates into a common
//! [0, 1] reference frame before fitting, which keeps kernel length
//! scales well-conditioned regardless of the physical units of the input.

use ndarray::{Array1, ArrayView1};

/// Scale an array to a 0-1 range based on provided minimum and maximum values.
///
/// Omitted bounds substitute the array's own min/max. Values outside the
/// provided bounds scale beyond [0, 1]; there is no clamping, so a caller
/// can pass a reference bounding box and extrapolate consistently outside it.
///
/// A zero-width range (`max == min`) divides by zero and yields ±inf/NaN.
pub fn scale(array: ArrayView1<'_, f64>, min_: Option<f64>, max_: Option<f64>) -> Array1<f64> {
    let min_ = min_.unwrap_or_else(|| array.fold(f64::INFINITY, |acc, &v| acc.min(v)));
    let max_ = max_.unwrap_or_else(|| array.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v)));
    array.mapv(|v| (v - min_) / (max_ - min_))
}
