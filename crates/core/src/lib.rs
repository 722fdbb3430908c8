//! # seisgrid core
//!
//! Core types and I/O for the seisgrid spatial interpolation toolkit.
//!
//! This crate provides:
//! - [`PointSet`]: columnar table of scattered point records
//! - [`Grid`]: cell-centered raster grid with coordinate axes
//! - [`BoundingBox`] and the min-max [`scaling`](crate::scaling) utility
//! - [`target_grid_from`]: target grid construction from a point set
//! - Kingdom seismic export parsers ([`io::kingdom`])

pub mod bbox;
pub mod constants;
pub mod error;
pub mod io;
pub mod points;
pub mod raster;
pub mod scaling;

pub use bbox::BoundingBox;
pub use error::{Error, Result};
pub use points::{Column, PointSet};
pub use raster::{target_grid_from, Grid};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::bbox::BoundingBox;
    pub use crate::error::{Error, Result};
    pub use crate::points::{Column, PointSet};
    pub use crate::raster::{target_grid_from, Grid};
    pub use crate::scaling::scale;
}
