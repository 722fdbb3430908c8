//! Input validation for the interpolation entry points
//!
//! Every public estimator validates its inputs explicitly before any data
//! is concatenated, so a schema problem in any single point set fails fast
//! with the full list of columns that set is missing.

use seisgrid_core::{Error, PointSet, Result};

/// Check that every input point set carries the `x`, `y` and value columns
/// required for interpolation.
///
/// The error reports the missing subset in `x, y, <value>` order for the
/// first offending set.
pub fn validate_input(data: &[&PointSet], value: &str) -> Result<()> {
    for set in data {
        let missing: Vec<String> = ["x", "y", value]
            .iter()
            .filter(|column| !set.has_column(column))
            .map(|column| column.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingColumns { missing });
        }
    }
    Ok(())
}
