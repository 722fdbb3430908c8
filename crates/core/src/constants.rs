//! Physical constants for the seismic depth model

/// Constant seismic velocities in m/s
pub mod seismic_velocity {
    /// Speed of sound in the water column
    pub const WATER: f64 = 1500.0;

    /// Representative speed in unconsolidated sediment
    pub const SEDIMENT: f64 = 1600.0;
}
