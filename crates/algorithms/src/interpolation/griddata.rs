//! General scattered-data interpolation onto a grid
//!
//! One entry point, three methods:
//! - `Linear`: barycentric interpolation on a Delaunay triangulation (the
//!   same interpolant as [`tin_surface`](super::tin_surface))
//! - `Nearest`: value of the closest sample, everywhere on the grid
//! - `Cubic`: piecewise cubic Bezier patches on the triangulation with
//!   per-vertex gradients estimated from the triangulation neighborhood
//!
//! Linear and cubic are undefined outside the convex hull of the input
//! and leave those cells NaN; nearest covers the whole grid.

use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use seisgrid_core::{Error, Grid, PointSet, Result};

use super::delaunay::Triangulation;
use super::kdtree::KdTree;
use super::tin::fill_linear;
use super::{assemble_samples, Sample};

/// Interpolation method for [`griddata`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GriddataMethod {
    #[default]
    Linear,
    Nearest,
    Cubic,
}

impl FromStr for GriddataMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear" => Ok(Self::Linear),
            "nearest" => Ok(Self::Nearest),
            "cubic" => Ok(Self::Cubic),
            other => Err(Error::UnsupportedMethod(other.to_string())),
        }
    }
}

/// Interpolate scattered points onto a target grid with a configurable
/// method.
///
/// # Arguments
/// * `data` - Input point sets, each with `x`, `y` and the value column
/// * `value` - Name of the value column to interpolate
/// * `target_grid` - Grid whose cells receive the estimates
/// * `method` - Interpolation method
///
/// # Returns
/// A new grid with the target's coordinates. Cells the method cannot
/// resolve (outside the convex hull under `Linear`/`Cubic`) are NaN.
pub fn griddata(
    data: &[&PointSet],
    value: &str,
    target_grid: &Grid,
    method: GriddataMethod,
) -> Result<Grid> {
    let samples = assemble_samples(data, value)?;
    debug!(samples = samples.len(), ?method, "griddata");

    let estimates = match method {
        GriddataMethod::Linear => {
            let triangulation = build_triangulation(&samples)?;
            fill_linear(&triangulation, &samples, target_grid)
        }
        GriddataMethod::Nearest => fill_nearest(&samples, target_grid),
        GriddataMethod::Cubic => {
            let triangulation = build_triangulation(&samples)?;
            fill_cubic(&triangulation, &samples, target_grid)
        }
    };

    target_grid.with_values(estimates)
}

fn build_triangulation(samples: &[Sample]) -> Result<Triangulation> {
    let coords: Vec<[f64; 2]> = samples.iter().map(|s| [s.x, s.y]).collect();
    Triangulation::build(&coords)
}

/// Closest-sample value for every cell, flat in `grid_coordinates` order.
fn fill_nearest(samples: &[Sample], grid: &Grid) -> Vec<f64> {
    let tree = KdTree::build(samples);
    let xs = grid.xcoords().to_vec();
    let ys = grid.ycoords().to_vec();

    ys.into_par_iter()
        .flat_map(|y| {
            let row: Vec<f64> = xs
                .iter()
                .map(|&x| {
                    tree.nearest(x, y)
                        .map_or(f64::NAN, |result| result.sample.value)
                })
                .collect();
            row
        })
        .collect()
}

/// Piecewise cubic estimates for every cell, flat in `grid_coordinates`
/// order; NaN outside the convex hull.
fn fill_cubic(triangulation: &Triangulation, samples: &[Sample], grid: &Grid) -> Vec<f64> {
    let gradients = estimate_gradients(triangulation, samples);
    let xs = grid.xcoords().to_vec();
    let ys = grid.ycoords().to_vec();

    ys.into_par_iter()
        .flat_map(|y| {
            let row: Vec<f64> = xs
                .iter()
                .map(|&x| match triangulation.find_simplex(x, y) {
                    Some(simplex) => {
                        cubic_patch(triangulation, simplex, samples, &gradients, x, y)
                    }
                    None => f64::NAN,
                })
                .collect();
            row
        })
        .collect()
}

/// Per-vertex surface gradients, fit by weighted least squares over each
/// vertex's triangulation neighbors.
///
/// Inverse-square distance weights favor close neighbors; a vertex whose
/// neighborhood is degenerate (collinear) falls back to a zero gradient.
/// For data sampled from an affine surface the fit recovers the exact
/// gradient, which gives the cubic patches linear precision.
fn estimate_gradients(triangulation: &Triangulation, samples: &[Sample]) -> Vec<[f64; 2]> {
    let n = samples.len();
    let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); n];
    for &[a, b, c] in triangulation.simplices() {
        for (v, w) in [(a, b), (b, c), (c, a)] {
            if !neighbors[v].contains(&w) {
                neighbors[v].push(w);
            }
            if !neighbors[w].contains(&v) {
                neighbors[w].push(v);
            }
        }
    }

    neighbors
        .iter()
        .enumerate()
        .map(|(v, adjacent)| {
            let center = samples[v];
            let mut sxx = 0.0;
            let mut sxy = 0.0;
            let mut syy = 0.0;
            let mut bx = 0.0;
            let mut by = 0.0;
            for &w in adjacent {
                let dx = samples[w].x - center.x;
                let dy = samples[w].y - center.y;
                let dz = samples[w].value - center.value;
                let dist_sq = dx * dx + dy * dy;
                if dist_sq < 1e-24 {
                    continue;
                }
                let weight = 1.0 / dist_sq;
                sxx += weight * dx * dx;
                sxy += weight * dx * dy;
                syy += weight * dy * dy;
                bx += weight * dx * dz;
                by += weight * dy * dz;
            }
            let det = sxx * syy - sxy * sxy;
            if det.abs() < 1e-12 {
                [0.0, 0.0]
            } else {
                [(syy * bx - sxy * by) / det, (sxx * by - sxy * bx) / det]
            }
        })
        .collect()
}

/// Evaluate the degree-3 Bezier triangle over a simplex at (x, y).
///
/// Corner ordinates come from the vertex values, the edge ordinates from
/// the vertex gradients, and the interior ordinate is the quadratic-
/// precision choice `(3E - V) / 2`.
fn cubic_patch(
    triangulation: &Triangulation,
    simplex: usize,
    samples: &[Sample],
    gradients: &[[f64; 2]],
    x: f64,
    y: f64,
) -> f64 {
    let [i0, i1, i2] = triangulation.simplices()[simplex];
    let [u, v, w] = triangulation.barycentric(simplex, x, y);

    let p = [
        [samples[i0].x, samples[i0].y],
        [samples[i1].x, samples[i1].y],
        [samples[i2].x, samples[i2].y],
    ];
    let z = [samples[i0].value, samples[i1].value, samples[i2].value];
    let g = [gradients[i0], gradients[i1], gradients[i2]];

    // Edge control ordinate adjacent to vertex `a` on the edge to `b`
    let edge = |a: usize, b: usize| -> f64 {
        z[a] + (g[a][0] * (p[b][0] - p[a][0]) + g[a][1] * (p[b][1] - p[a][1])) / 3.0
    };

    let b210 = edge(0, 1);
    let b201 = edge(0, 2);
    let b120 = edge(1, 0);
    let b021 = edge(1, 2);
    let b102 = edge(2, 0);
    let b012 = edge(2, 1);

    let edge_mean = (b210 + b201 + b120 + b021 + b102 + b012) / 6.0;
    let vertex_mean = (z[0] + z[1] + z[2]) / 3.0;
    let b111 = edge_mean + (edge_mean - vertex_mean) / 2.0;

    z[0] * u * u * u
        + z[1] * v * v * v
        + z[2] * w * w * w
        + 3.0 * (b210 * u * u * v + b201 * u * u * w)
        + 3.0 * (b120 * u * v * v + b021 * v * v * w)
        + 3.0 * (b102 * u * w * w + b012 * v * w * w)
        + 6.0 * b111 * u * v * w
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use seisgrid_core::Column;

    use crate::interpolation::tin_surface;

    fn target_grid() -> Grid {
        Grid::new(
            array![0.5, 1.5, 2.5, 3.5, 4.5],
            array![4.5, 3.5, 2.5, 1.5, 0.5],
        )
    }

    fn xyz_pointset() -> PointSet {
        PointSet::from_columns([
            (
                "x",
                Column::Float(vec![0.3, 1.8, 2.7, 4.9, 0.6, 3.1, 4.4, 2.0, 1.2, 3.8]),
            ),
            (
                "y",
                Column::Float(vec![3.6, 2.1, 1.7, 4.8, 0.2, 3.4, 2.9, 1.3, 4.1, 0.7]),
            ),
            (
                "z",
                Column::Float(vec![-0.9, -0.9, -1.3, -0.7, -0.5, -0.9, -0.4, -0.3, -1.3, -0.2]),
            ),
        ])
        .unwrap()
    }

    fn plane_pointset() -> PointSet {
        let xs = vec![0.0, 5.0, 0.0, 5.0, 2.0, 3.5, 1.0];
        let ys = vec![0.0, 0.0, 5.0, 5.0, 3.0, 1.5, 2.0];
        let zs: Vec<f64> = xs
            .iter()
            .zip(&ys)
            .map(|(&x, &y)| 2.0 * x + 3.0 * y + 1.0)
            .collect();
        PointSet::from_columns([
            ("x", Column::Float(xs)),
            ("y", Column::Float(ys)),
            ("z", Column::Float(zs)),
        ])
        .unwrap()
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!("linear".parse::<GriddataMethod>().unwrap(), GriddataMethod::Linear);
        assert_eq!("nearest".parse::<GriddataMethod>().unwrap(), GriddataMethod::Nearest);
        assert_eq!("cubic".parse::<GriddataMethod>().unwrap(), GriddataMethod::Cubic);
        match "spline".parse::<GriddataMethod>() {
            Err(Error::UnsupportedMethod(name)) => assert_eq!(name, "spline"),
            other => panic!("expected UnsupportedMethod, got {other:?}"),
        }
    }

    #[test]
    fn test_linear_matches_tin_surface() {
        let grid = target_grid();
        let set = xyz_pointset();
        let via_griddata = griddata(&[&set], "z", &grid, GriddataMethod::Linear).unwrap();
        let via_tin = tin_surface(&[&set], "z", &grid).unwrap();

        for (a, b) in via_griddata.data().iter().zip(via_tin.data().iter()) {
            if a.is_nan() {
                assert!(b.is_nan());
            } else {
                assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_nearest_covers_whole_grid() {
        let result = griddata(&[&xyz_pointset()], "z", &target_grid(), GriddataMethod::Nearest)
            .unwrap();
        let values = xyz_pointset().float("z").unwrap().to_vec();
        for &estimate in result.data().iter() {
            assert!(!estimate.is_nan());
            assert!(values.contains(&estimate), "estimate {estimate} is not a sample value");
        }
    }

    #[test]
    fn test_nearest_voronoi_assignment() {
        let result = griddata(&[&xyz_pointset()], "z", &target_grid(), GriddataMethod::Nearest)
            .unwrap();
        // Cell (4, 0) at (0.5, 0.5) is closest to the sample at (0.6, 0.2)
        assert_abs_diff_eq!(result.get(4, 0).unwrap(), -0.5, epsilon = 1e-12);
        // Cell (0, 4) at (4.5, 4.5) is closest to the sample at (4.9, 4.8)
        assert_abs_diff_eq!(result.get(0, 4).unwrap(), -0.7, epsilon = 1e-12);
    }

    #[test]
    fn test_cubic_reproduces_plane() {
        let grid = target_grid();
        let result = griddata(&[&plane_pointset()], "z", &grid, GriddataMethod::Cubic).unwrap();
        for (row, &y) in grid.ycoords().iter().enumerate() {
            for (col, &x) in grid.xcoords().iter().enumerate() {
                let estimate = result.get(row, col).unwrap();
                assert!(!estimate.is_nan());
                assert_abs_diff_eq!(estimate, 2.0 * x + 3.0 * y + 1.0, epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn test_cubic_masks_outside_hull() {
        let linear = griddata(&[&xyz_pointset()], "z", &target_grid(), GriddataMethod::Linear)
            .unwrap();
        let cubic = griddata(&[&xyz_pointset()], "z", &target_grid(), GriddataMethod::Cubic)
            .unwrap();
        // Same triangulation, same hull: identical NaN patterns
        for (a, b) in linear.data().iter().zip(cubic.data().iter()) {
            assert_eq!(a.is_nan(), b.is_nan());
        }
    }

    #[test]
    fn test_gradient_estimation_on_plane() {
        let set = plane_pointset();
        let samples = assemble_samples(&[&set], "z").unwrap();
        let triangulation = build_triangulation(&samples).unwrap();
        let gradients = estimate_gradients(&triangulation, &samples);
        for [gx, gy] in gradients {
            assert_abs_diff_eq!(gx, 2.0, epsilon = 1e-9);
            assert_abs_diff_eq!(gy, 3.0, epsilon = 1e-9);
        }
    }
}
