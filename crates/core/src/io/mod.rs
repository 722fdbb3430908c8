//! Readers for vendor seismic export formats

pub mod kingdom;

pub use kingdom::{geocard7, single_horizon};
