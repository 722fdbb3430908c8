//! TIN (Triangulated Irregular Network) interpolation
//!
//! Triangulates the input points and estimates every target cell as the
//! barycentric-weighted average of its enclosing triangle's vertex values.
//! The weights form an affine combination (they sum to 1), so estimates
//! inside a triangle stay within its vertex value range. Cells outside the
//! convex hull of the input have no enclosing simplex and stay NaN.

use rayon::prelude::*;
use tracing::debug;

use seisgrid_core::{Grid, PointSet, Result};

use super::delaunay::Triangulation;
use super::{assemble_samples, Sample};

/// Interpolate a TIN surface from scattered points onto a target grid.
///
/// # Arguments
/// * `data` - Input point sets, each with `x`, `y` and the value column
/// * `value` - Name of the value column to interpolate
/// * `target_grid` - Grid whose cells receive the estimates
///
/// # Returns
/// A new grid with the target's coordinates; cells outside the convex
/// hull of the input points are NaN.
///
/// # Errors
/// Schema errors from validation, and degenerate-triangulation errors for
/// fewer than 3 points or fully collinear input.
pub fn tin_surface(data: &[&PointSet], value: &str, target_grid: &Grid) -> Result<Grid> {
    let samples = assemble_samples(data, value)?;
    let coords: Vec<[f64; 2]> = samples.iter().map(|s| [s.x, s.y]).collect();
    let triangulation = Triangulation::build(&coords)?;
    debug!(
        samples = samples.len(),
        simplices = triangulation.len(),
        "tin surface"
    );

    let estimates = fill_linear(&triangulation, &samples, target_grid);
    target_grid.with_values(estimates)
}

/// Barycentric linear estimates for every cell of `grid`, flat in
/// `grid_coordinates` order. Shared by the TIN estimator and the linear
/// griddata method, which are the same interpolant.
pub(crate) fn fill_linear(
    triangulation: &Triangulation,
    samples: &[Sample],
    grid: &Grid,
) -> Vec<f64> {
    let xs = grid.xcoords().to_vec();
    let ys = grid.ycoords().to_vec();

    ys.into_par_iter()
        .flat_map(|y| {
            let row: Vec<f64> = xs
                .iter()
                .map(|&x| match triangulation.find_simplex(x, y) {
                    Some(simplex) => {
                        let vertices = triangulation.simplices()[simplex];
                        let weights = triangulation.barycentric(simplex, x, y);
                        vertices
                            .iter()
                            .zip(weights)
                            .map(|(&v, w)| samples[v].value * w)
                            .sum()
                    }
                    None => f64::NAN,
                })
                .collect();
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};
    use seisgrid_core::{Column, Error};

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

    /// Points sampling the plane z = 2x + 3y + 1
    fn plane_pointset() -> PointSet {
        let xs = vec![0.0, 5.0, 0.0, 5.0, 2.0, 3.5];
        let ys = vec![0.0, 0.0, 5.0, 5.0, 3.0, 1.5];
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
    fn test_plane_reproduced_exactly() {
        let grid = target_grid();
        let result = tin_surface(&[&plane_pointset()], "z", &grid).unwrap();
        // Linear interpolation has linear precision: every cell inside the
        // hull reproduces the plane
        for (row, &y) in grid.ycoords().iter().enumerate() {
            for (col, &x) in grid.xcoords().iter().enumerate() {
                let estimate = result.get(row, col).unwrap();
                assert!(!estimate.is_nan());
                assert_abs_diff_eq!(estimate, 2.0 * x + 3.0 * y + 1.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_convex_hull_masking() {
        let result = tin_surface(&[&xyz_pointset()], "z", &target_grid()).unwrap();
        // NaN pattern is fixed by the convex hull of the input points
        let expected_nan = [
            [true, true, true, false, false],
            [false, false, false, false, false],
            [false, false, false, false, true],
            [false, false, false, false, true],
            [true, false, false, true, true],
        ];
        for (row, flags) in expected_nan.iter().enumerate() {
            for (col, &nan) in flags.iter().enumerate() {
                let value = result.get(row, col).unwrap();
                assert_eq!(value.is_nan(), nan, "cell ({row}, {col}) = {value}");
            }
        }
    }

    #[test]
    fn test_estimates_bounded_by_input_range() {
        let result = tin_surface(&[&xyz_pointset()], "z", &target_grid()).unwrap();
        for &value in result.data().iter() {
            if !value.is_nan() {
                assert!((-1.3..=-0.2).contains(&value), "unbounded estimate {value}");
            }
        }
    }

    #[test]
    fn test_multiple_inputs_extend_hull() {
        let extra = PointSet::from_columns([
            ("x", Column::Float(vec![0.75, 2.6, 4.6])),
            ("y", Column::Float(vec![1.9, 4.38, 1.5])),
            ("z", Column::Float(vec![-0.8, -1.1, -0.1])),
        ])
        .unwrap();
        let single = tin_surface(&[&xyz_pointset()], "z", &target_grid()).unwrap();
        let multi = tin_surface(&[&xyz_pointset(), &extra], "z", &target_grid()).unwrap();

        // (2, 4) lies outside the original hull but inside the extended one
        assert!(single.get(2, 4).unwrap().is_nan());
        assert!(!multi.get(2, 4).unwrap().is_nan());
        // (0, 0) stays outside both hulls
        assert!(multi.get(0, 0).unwrap().is_nan());
    }

    #[test]
    fn test_output_preserves_grid_coordinates() {
        let grid = target_grid();
        let result = tin_surface(&[&xyz_pointset()], "z", &grid).unwrap();
        assert_eq!(result.shape(), grid.shape());
        assert_eq!(result.xcoords(), grid.xcoords());
        assert_eq!(result.ycoords(), grid.ycoords());
    }

    #[test]
    fn test_input_grid_untouched() {
        let grid = target_grid();
        let before: Array2<f64> = grid.data().to_owned();
        let _ = tin_surface(&[&xyz_pointset()], "z", &grid).unwrap();
        assert_eq!(grid.data(), before.view());
    }

    #[test]
    fn test_too_few_points_fails() {
        let set = PointSet::from_columns([
            ("x", Column::Float(vec![0.0, 1.0])),
            ("y", Column::Float(vec![0.0, 1.0])),
            ("z", Column::Float(vec![1.0, 2.0])),
        ])
        .unwrap();
        assert!(matches!(
            tin_surface(&[&set], "z", &target_grid()),
            Err(Error::DegenerateTriangulation(_))
        ));
    }

    #[test]
    fn test_missing_column_scenario() {
        let set = PointSet::from_columns([
            ("y", Column::Float(vec![0.0, 1.0, 2.0])),
            ("z", Column::Float(vec![1.0, 2.0, 3.0])),
        ])
        .unwrap();
        match tin_surface(&[&set], "z", &target_grid()).unwrap_err() {
            Error::MissingColumns { missing } => assert_eq!(missing, ["x"]),
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }
}
