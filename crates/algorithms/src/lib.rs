//! # seisgrid algorithms
//!
//! Interpolation and depth-conversion algorithms for seisgrid.
//!
//! ## Available algorithms
//!
//! - **interpolation**: TIN (barycentric), griddata (linear / nearest /
//!   cubic), RBF surface fitting
//! - **depth**: two-way travel-time to depth conversion against a
//!   bathymetry reference reflector
//! - **validation**: schema checks shared by the interpolation entry
//!   points

pub mod depth;
pub mod interpolation;
pub mod validation;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::depth::calculate_depth;
    pub use crate::interpolation::{
        griddata, rbf, tin_surface, GriddataMethod, RbfKernel, RbfParams, Sample,
    };
    pub use crate::validation::validate_input;
    pub use seisgrid_core::prelude::*;
}
