//! Radial basis function interpolation
//!
//! Fits a surface of the form
//! ```text
//! f(p) = a0 + a1*x + a2*y + sum_i w_i * phi(|p - p_i|)
//! ```
//! over the input points and evaluates it at every target cell. The fit
//! solves the augmented symmetric system
//! ```text
//! [K + lambda*I  P] [w]   [z]
//! [P^T           0] [a] = [0]
//! ```
//! by Gaussian elimination with partial pivoting.
//!
//! Observation and query coordinates are min-max scaled against the
//! *target grid's* bounding box before fitting. The shared [0, 1] frame
//! keeps kernel length scales well-conditioned whatever the physical units
//! of the input; points outside the grid scale beyond [0, 1], which is the
//! intended extrapolation of the scaling utility.
//!
//! The fitted surface is defined everywhere: no cell is NaN, and
//! extrapolation beyond the convex hull is permitted (and increasingly
//! unreliable far from the data).

use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use seisgrid_core::{Error, Grid, PointSet, Result};

use super::assemble_samples;

/// Radial kernel for [`rbf`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RbfKernel {
    /// r
    Linear,
    /// r^2 * ln(r)
    #[default]
    ThinPlateSpline,
    /// r^3
    Cubic,
    /// r^5
    Quintic,
    /// exp(-(epsilon * r)^2)
    Gaussian,
    /// sqrt(1 + (epsilon * r)^2)
    Multiquadric,
}

impl RbfKernel {
    /// Evaluate the kernel at distance `r`
    fn evaluate(self, r: f64, epsilon: f64) -> f64 {
        match self {
            RbfKernel::Linear => r,
            RbfKernel::ThinPlateSpline => {
                if r < 1e-15 {
                    0.0
                } else {
                    r * r * r.ln()
                }
            }
            RbfKernel::Cubic => r * r * r,
            RbfKernel::Quintic => r.powi(5),
            RbfKernel::Gaussian => (-(epsilon * r).powi(2)).exp(),
            RbfKernel::Multiquadric => (1.0 + (epsilon * r).powi(2)).sqrt(),
        }
    }
}

impl FromStr for RbfKernel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear" => Ok(Self::Linear),
            "thin_plate_spline" => Ok(Self::ThinPlateSpline),
            "cubic" => Ok(Self::Cubic),
            "quintic" => Ok(Self::Quintic),
            "gaussian" => Ok(Self::Gaussian),
            "multiquadric" => Ok(Self::Multiquadric),
            other => Err(Error::UnsupportedKernel(other.to_string())),
        }
    }
}

/// Parameters for RBF interpolation
#[derive(Debug, Clone)]
pub struct RbfParams {
    /// Radial kernel
    pub kernel: RbfKernel,
    /// Shape parameter for the kernels that take one (`Gaussian`,
    /// `Multiquadric`); distances are in the scaled [0, 1] frame
    pub epsilon: f64,
    /// Regularization on the kernel diagonal. 0 interpolates exactly;
    /// larger values trade fidelity at the points for smoothness.
    pub smoothing: f64,
}

impl Default for RbfParams {
    fn default() -> Self {
        Self {
            kernel: RbfKernel::default(),
            epsilon: 1.0,
            smoothing: 0.0,
        }
    }
}

/// Interpolate a radial basis function surface onto a target grid.
///
/// # Arguments
/// * `data` - Input point sets, each with `x`, `y` and the value column
/// * `value` - Name of the value column to interpolate
/// * `target_grid` - Grid whose cells receive the estimates; its bounding
///   box is also the reference frame for coordinate scaling
/// * `params` - Kernel selection and fit parameters
///
/// # Errors
/// Schema errors from validation, and a singular-system error when the
/// fit cannot be solved (duplicate or collinear-only points).
pub fn rbf(data: &[&PointSet], value: &str, target_grid: &Grid, params: &RbfParams) -> Result<Grid> {
    let samples = assemble_samples(data, value)?;
    let n = samples.len();

    // Common scaled frame for observations and queries
    let bbox = target_grid.bounds();
    let xspan = bbox.width();
    let yspan = bbox.height();
    let obs: Vec<[f64; 2]> = samples
        .iter()
        .map(|s| [(s.x - bbox.xmin) / xspan, (s.y - bbox.ymin) / yspan])
        .collect();

    debug!(
        samples = n,
        kernel = ?params.kernel,
        smoothing = params.smoothing,
        "rbf fit"
    );

    // Augmented system over weights and the degree-1 polynomial tail
    let m = n + 3;
    let mut mat = vec![0.0_f64; m * m];
    let mut rhs = vec![0.0_f64; m];

    for i in 0..n {
        for j in 0..n {
            let dx = obs[i][0] - obs[j][0];
            let dy = obs[i][1] - obs[j][1];
            let r = (dx * dx + dy * dy).sqrt();
            let mut entry = params.kernel.evaluate(r, params.epsilon);
            if i == j {
                entry += params.smoothing;
            }
            mat[i * m + j] = entry;
        }
    }

    for (i, p) in obs.iter().enumerate() {
        mat[i * m + n] = 1.0;
        mat[i * m + n + 1] = p[0];
        mat[i * m + n + 2] = p[1];
        mat[n * m + i] = 1.0;
        mat[(n + 1) * m + i] = p[0];
        mat[(n + 2) * m + i] = p[1];
    }

    for (i, sample) in samples.iter().enumerate() {
        rhs[i] = sample.value;
    }

    let coeffs = gauss_solve(m, &mut mat, &mut rhs)?;
    let (weights, poly) = coeffs.split_at(n);
    let [a0, a1, a2] = [poly[0], poly[1], poly[2]];

    // Evaluate at every scaled cell center
    let targets: Vec<[f64; 2]> = target_grid
        .grid_coordinates_scaled(None)
        .outer_iter()
        .map(|q| [q[0], q[1]])
        .collect();
    let estimates: Vec<f64> = targets
        .par_iter()
        .map(|&[qx, qy]| {
            let mut estimate = a0 + a1 * qx + a2 * qy;
            for (weight, p) in weights.iter().zip(&obs) {
                let dx = qx - p[0];
                let dy = qy - p[1];
                let r = (dx * dx + dy * dy).sqrt();
                estimate += weight * params.kernel.evaluate(r, params.epsilon);
            }
            estimate
        })
        .collect();

    target_grid.with_values(estimates)
}

/// Solve `A x = b` by Gaussian elimination with partial pivoting.
///
/// `mat` and `rhs` are consumed in place; a pivot below tolerance means
/// the system is singular.
fn gauss_solve(n: usize, mat: &mut [f64], rhs: &mut [f64]) -> Result<Vec<f64>> {
    for col in 0..n {
        let mut max_val = mat[col * n + col].abs();
        let mut max_row = col;
        for row in (col + 1)..n {
            let val = mat[row * n + col].abs();
            if val > max_val {
                max_val = val;
                max_row = row;
            }
        }

        if max_val < 1e-14 {
            return Err(Error::SingularSystem(n));
        }

        if max_row != col {
            for j in 0..n {
                mat.swap(col * n + j, max_row * n + j);
            }
            rhs.swap(col, max_row);
        }

        let pivot = mat[col * n + col];
        for row in (col + 1)..n {
            let factor = mat[row * n + col] / pivot;
            mat[row * n + col] = 0.0;
            for j in (col + 1)..n {
                mat[row * n + j] -= factor * mat[col * n + j];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut x = vec![0.0_f64; n];
    for col in (0..n).rev() {
        let mut sum = rhs[col];
        for j in (col + 1)..n {
            sum -= mat[col * n + j] * x[j];
        }
        x[col] = sum / mat[col * n + col];
    }

    Ok(x)
}
