//! Cell-centered raster grid

mod builder;
mod grid;

pub use builder::target_grid_from;
pub use grid::Grid;
