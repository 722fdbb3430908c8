//! Two-way travel-time to depth conversion for seismic reflectors
//!
//! Seismic picks arrive as (x, y, time) records tagged with a reflector
//! name and a line identifier. Within each line, the `"bathy"` reflector
//! is the reference: every other reflector's depth below the seabed is the
//! time lag against the reference at the nearest position along the line,
//! scaled by a constant sediment velocity (halved for the two-way path).

use geo::{LineLocatePoint, LineString, Point};
use ndarray::Array1;
use tracing::debug;

use seisgrid_core::constants::seismic_velocity;
use seisgrid_core::{Error, PointSet, Result};

/// Reflector name that anchors the depth reference within a line
const REFERENCE_REFLECTOR: &str = "bathy";

/// Convert two-way travel times to depth relative to the bathymetry
/// reflector.
///
/// Rows are grouped by the `ID` column when more than one line is present
/// (a missing `ID` column means a single line); lines resolve
/// independently. The returned series aligns to the input's row order.
/// Reference rows are 0 by definition; reflector points that cannot be
/// projected (single-point reflectors) also finish as 0.
///
/// # Errors
/// Fails when a line has no `"bathy"` rows, or when `x`, `y`, `time` or
/// `reflector` columns are absent or of the wrong type.
pub fn calculate_depth(data: &PointSet) -> Result<Array1<f64>> {
    let mut depth = vec![f64::NAN; data.len()];

    if data.has_column("ID") {
        let groups = data.group_indices("ID")?;
        if groups.len() > 1 {
            for (id, rows) in &groups {
                debug!(line = %id, rows = rows.len(), "depth conversion");
                line_depth(data, rows, &mut depth)?;
            }
        } else {
            let rows: Vec<usize> = (0..data.len()).collect();
            line_depth(data, &rows, &mut depth)?;
        }
    } else {
        let rows: Vec<usize> = (0..data.len()).collect();
        line_depth(data, &rows, &mut depth)?;
    }

    Ok(Array1::from_iter(
        depth.into_iter().map(|d| if d.is_nan() { 0.0 } else { d }),
    ))
}

/// Resolve depths for the rows of a single seismic line, writing into the
/// full-length output at the original row positions.
fn line_depth(data: &PointSet, rows: &[usize], depth: &mut [f64]) -> Result<()> {
    let xs = data.float("x")?;
    let ys = data.float("y")?;
    let times = data.float("time")?;
    let reflectors = data.text("reflector")?;

    let bathy_rows: Vec<usize> = rows
        .iter()
        .copied()
        .filter(|&row| reflectors[row] == REFERENCE_REFLECTOR)
        .collect();
    if bathy_rows.is_empty() {
        return Err(Error::NoReferenceReflector);
    }

    let reference = ReferenceLine::new(
        bathy_rows.iter().map(|&row| (xs[row], ys[row])).collect(),
        bathy_rows.iter().map(|&row| times[row]).collect(),
    );

    // Reflectors in order of first appearance within the line
    let mut seen: Vec<&str> = Vec::new();
    for &row in rows {
        let name = reflectors[row].as_str();
        if name != REFERENCE_REFLECTOR && !seen.contains(&name) {
            seen.push(name);
        }
    }

    for name in seen {
        let reflector_rows: Vec<usize> = rows
            .iter()
            .copied()
            .filter(|&row| reflectors[row] == name)
            .collect();
        // A single pick cannot form a polyline to project; it stays NaN
        // and zeroes out at the end
        if reflector_rows.len() < 2 {
            continue;
        }
        for row in reflector_rows {
            let reference_time = reference.time_at_projection(xs[row], ys[row]);
            let delta = times[row] - reference_time;
            depth[row] = delta * (seismic_velocity::SEDIMENT / 2.0);
        }
    }

    Ok(())
}

/// The reference reflector as a polyline: 2-D geometry for projection plus
/// the pick times interpolated along its arclength.
struct ReferenceLine {
    xy: LineString<f64>,
    times: Vec<f64>,
    /// Cumulative 2-D segment lengths per vertex
    cum: Vec<f64>,
}

impl ReferenceLine {
    fn new(coords: Vec<(f64, f64)>, times: Vec<f64>) -> Self {
        let mut cum = Vec::with_capacity(coords.len());
        let mut total = 0.0;
        cum.push(0.0);
        for pair in coords.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            total += ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
            cum.push(total);
        }
        Self {
            xy: LineString::from(coords),
            times,
            cum,
        }
    }

    fn total_length(&self) -> f64 {
        *self.cum.last().expect("cum is never empty")
    }

    /// Reference time at the nearest-arclength projection of (x, y).
    ///
    /// A degenerate (zero-length) reference collapses to its first pick.
    fn time_at_projection(&self, x: f64, y: f64) -> f64 {
        let fraction = self
            .xy
            .line_locate_point(&Point::new(x, y))
            .unwrap_or(0.0);
        self.time_at(fraction * self.total_length())
    }

    /// Linear interpolation of pick times along the arclength
    /// parametrization.
    fn time_at(&self, s: f64) -> f64 {
        if self.cum.len() < 2 {
            return self.times[0];
        }
        // First vertex with cum >= s bounds the segment from the right
        let upper = self.cum.partition_point(|&c| c < s).min(self.cum.len() - 1);
        let upper = upper.max(1);
        let lower = upper - 1;
        let span = self.cum[upper] - self.cum[lower];
        if span < 1e-15 {
            return self.times[lower];
        }
        let t = (s - self.cum[lower]) / span;
        self.times[lower] + t * (self.times[upper] - self.times[lower])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use seisgrid_core::Column;

    /// Two seismic lines: line1 has a bathy reference and a "bk" reflector,
    /// line2 a bathy reference and an "ok" reflector.
    fn seismic_data() -> PointSet {
        PointSet::from_columns([
            (
                "ID",
                Column::Text(
                    ["line1"; 7]
                        .iter()
                        .chain(["line2"; 6].iter())
                        .map(|s| s.to_string())
                        .collect(),
                ),
            ),
            (
                "x",
                Column::Float(vec![
                    0.5, 1.5, 2.5, 3.5, 0.5, 1.5, 2.5, 0.5, 1.5, 2.5, 3.5, 0.5, 1.5,
                ]),
            ),
            (
                "y",
                Column::Float(vec![
                    0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 1.5, 1.5, 1.5, 1.5, 1.5, 1.5,
                ]),
            ),
            (
                "time",
                Column::Float(vec![
                    0.0041, 0.0042, 0.0043, 0.0041, 0.0051, 0.0052, 0.0053, 0.0054, 0.0055,
                    0.0056, 0.0057, 0.0058, 0.0059,
                ]),
            ),
            (
                "reflector",
                Column::Text(
                    ["bathy"; 4]
                        .iter()
                        .chain(["bk"; 3].iter())
                        .chain(["bathy"; 4].iter())
                        .chain(["ok"; 2].iter())
                        .map(|s| s.to_string())
                        .collect(),
                ),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_depth_two_lines() {
        let depth = calculate_depth(&seismic_data()).unwrap();
        let expected = [
            0.0, 0.0, 0.0, 0.0, 0.8, 0.8, 0.8, 0.0, 0.0, 0.0, 0.0, 0.32, 0.32,
        ];
        assert_eq!(depth.len(), expected.len());
        for (d, e) in depth.iter().zip(expected) {
            assert_abs_diff_eq!(*d, e, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_depth_single_line() {
        let data = seismic_data();
        let ids = data.text("ID").unwrap().to_vec();
        let keep: Vec<usize> = (0..data.len()).filter(|&i| ids[i] == "line1").collect();

        let mut line1 = PointSet::new();
        for name in ["x", "y", "time"] {
            let values = data.float(name).unwrap();
            line1
                .push_column(name, Column::Float(keep.iter().map(|&i| values[i]).collect()))
                .unwrap();
        }
        for name in ["ID", "reflector"] {
            let values = data.text(name).unwrap();
            line1
                .push_column(
                    name,
                    Column::Text(keep.iter().map(|&i| values[i].clone()).collect()),
                )
                .unwrap();
        }

        let depth = calculate_depth(&line1).unwrap();
        let expected = [0.0, 0.0, 0.0, 0.0, 0.8, 0.8, 0.8];
        for (d, e) in depth.iter().zip(expected) {
            assert_abs_diff_eq!(*d, e, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_reference_depth_is_zero() {
        let depth = calculate_depth(&seismic_data()).unwrap();
        let reflectors = seismic_data().text("reflector").unwrap().to_vec();
        for (row, name) in reflectors.iter().enumerate() {
            if name == "bathy" {
                assert_eq!(depth[row], 0.0);
            }
        }
    }

    #[test]
    fn test_missing_bathy_fails() {
        let data = PointSet::from_columns([
            ("x", Column::Float(vec![0.5, 1.5])),
            ("y", Column::Float(vec![0.5, 0.5])),
            ("time", Column::Float(vec![0.005, 0.006])),
            (
                "reflector",
                Column::Text(vec!["bk".into(), "bk".into()]),
            ),
        ])
        .unwrap();
        assert!(matches!(
            calculate_depth(&data),
            Err(Error::NoReferenceReflector)
        ));
    }

    #[test]
    fn test_no_id_column_is_single_line() {
        let data = PointSet::from_columns([
            ("x", Column::Float(vec![0.0, 1.0, 0.0, 1.0])),
            ("y", Column::Float(vec![0.0, 0.0, 0.0, 0.0])),
            ("time", Column::Float(vec![0.004, 0.004, 0.005, 0.005])),
            (
                "reflector",
                Column::Text(vec![
                    "bathy".into(),
                    "bathy".into(),
                    "bk".into(),
                    "bk".into(),
                ]),
            ),
        ])
        .unwrap();
        let depth = calculate_depth(&data).unwrap();
        assert_abs_diff_eq!(depth[2], 0.001 * 800.0, epsilon = 1e-9);
        assert_abs_diff_eq!(depth[3], 0.001 * 800.0, epsilon = 1e-9);
    }

    #[test]
    fn test_single_point_reflector_zeroes() {
        let data = PointSet::from_columns([
            ("x", Column::Float(vec![0.0, 1.0, 0.5])),
            ("y", Column::Float(vec![0.0, 0.0, 0.0])),
            ("time", Column::Float(vec![0.004, 0.004, 0.006])),
            (
                "reflector",
                Column::Text(vec!["bathy".into(), "bathy".into(), "lonely".into()]),
            ),
        ])
        .unwrap();
        let depth = calculate_depth(&data).unwrap();
        assert_eq!(depth[2], 0.0);
    }

    #[test]
    fn test_projection_clamps_beyond_line_ends() {
        // Reflector extends past the reference; projection clamps to the
        // nearest endpoint
        let data = PointSet::from_columns([
            ("x", Column::Float(vec![0.0, 1.0, -5.0, 6.0])),
            ("y", Column::Float(vec![0.0, 0.0, 0.0, 0.0])),
            ("time", Column::Float(vec![0.004, 0.005, 0.0045, 0.0065])),
            (
                "reflector",
                Column::Text(vec![
                    "bathy".into(),
                    "bathy".into(),
                    "bk".into(),
                    "bk".into(),
                ]),
            ),
        ])
        .unwrap();
        let depth = calculate_depth(&data).unwrap();
        // -5 projects to the start (time 0.004), +6 to the end (time 0.005)
        assert_abs_diff_eq!(depth[2], 0.0005 * 800.0, epsilon = 1e-6);
        assert_abs_diff_eq!(depth[3], 0.0015 * 800.0, epsilon = 1e-6);
    }

    #[test]
    fn test_missing_reflector_column() {
        let data = PointSet::from_columns([
            ("x", Column::Float(vec![0.0])),
            ("y", Column::Float(vec![0.0])),
            ("time", Column::Float(vec![0.004])),
        ])
        .unwrap();
        assert!(matches!(
            calculate_depth(&data),
            Err(Error::UnknownColumn(_))
        ));
    }
}
