//! Target grid construction from scattered points

use ndarray::Array1;

use crate::error::Result;
use crate::points::PointSet;
use crate::raster::Grid;

fn round_to_lower(value: f64, base: f64) -> f64 {
    (value / base).floor() * base
}

fn round_to_upper(value: f64, base: f64) -> f64 {
    (value / base).ceil() * base
}

/// Evenly spaced values from `start` towards `stop` (exclusive) by `step`.
fn arange(start: f64, stop: f64, step: f64) -> Array1<f64> {
    let count = ((stop - start) / step).ceil();
    let count = if count > 0.0 { count as usize } else { 0 };
    Array1::from_iter((0..count).map(|i| start + i as f64 * step))
}

/// Create an interpolation target grid covering a point set's extent.
///
/// The extent snaps outward to multiples of `resolution` (xmin/ymin down,
/// xmax/ymax up), then cell centers are laid out half a resolution inside
/// the snapped edges: x ascending from `xmin + r/2`, y descending from
/// `ymax - r/2`. The returned grid is zero-filled.
///
/// A non-positive resolution or a point set with zero extent on an axis
/// produces a degenerate (possibly empty) grid rather than an error; the
/// caller is responsible for a sane resolution.
pub fn target_grid_from(points: &PointSet, resolution: f64) -> Result<Grid> {
    let bounds = points.bounds()?;
    if resolution <= 0.0 {
        return Ok(Grid::new(Array1::zeros(0), Array1::zeros(0)));
    }

    let xmin = round_to_lower(bounds.xmin, resolution);
    let ymin = round_to_lower(bounds.ymin, resolution);
    let xmax = round_to_upper(bounds.xmax, resolution);
    let ymax = round_to_upper(bounds.ymax, resolution);

    let xgrid = arange(xmin + 0.5 * resolution, xmax, resolution);
    let ygrid = arange(ymax - 0.5 * resolution, ymin, -resolution);

    Ok(Grid::new(xgrid, ygrid))
}
