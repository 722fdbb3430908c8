//! Kingdom seismic export parsers
//!
//! Two text formats are supported:
//! - Geocard7 multi-horizon exports: `PROFILE <name> (...)` sections, each
//!   holding one reflector's picks, terminated by `EOD`;
//! - single-horizon "X Y Line Trace Time Amplitude" exports.
//!
//! Both produce a [`PointSet`] with float columns `x`, `y`, `time`,
//! `amplitude` and text column `ID`; Geocard7 additionally carries the
//! per-section horizon name as the `reflector` column.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::points::{Column, PointSet};

/// Parse a Kingdom Geocard7 multi-horizon seismic export file.
///
/// Rows concatenate across `PROFILE` sections in file order. A section
/// whose title line carries no `(`-delimited name parses as reflector
/// `"unknown"`. Malformed data rows fail with the 1-based line number.
pub fn geocard7<P: AsRef<Path>>(path: P) -> Result<PointSet> {
    parse_geocard7(&fs::read_to_string(path)?)
}

/// Parse a Kingdom single-horizon "X Y Line Trace Time Amplitude" export.
pub fn single_horizon<P: AsRef<Path>>(path: P) -> Result<PointSet> {
    parse_single_horizon(&fs::read_to_string(path)?)
}

fn parse_geocard7(text: &str) -> Result<PointSet> {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut times = Vec::new();
    let mut amplitudes = Vec::new();
    let mut ids = Vec::new();
    let mut reflectors = Vec::new();

    // The line after each PROFILE title is a column header, skipped.
    let mut reflector: Option<String> = None;
    let mut skip_header = false;
    let mut sections = 0usize;

    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed == "EOD" {
            break;
        }
        if let Some(rest) = trimmed.strip_prefix("PROFILE") {
            reflector = Some(profile_name(rest));
            skip_header = true;
            sections += 1;
            continue;
        }
        if skip_header {
            skip_header = false;
            continue;
        }
        if trimmed.is_empty() {
            continue;
        }
        let Some(name) = &reflector else {
            // Preamble before the first PROFILE section
            continue;
        };

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() != 8 {
            return Err(Error::Parse {
                line: idx + 1,
                message: format!("expected 8 fields, found {}", fields.len()),
            });
        }
        xs.push(parse_float(fields[0], idx)?);
        ys.push(parse_float(fields[1], idx)?);
        times.push(parse_float(fields[2], idx)?);
        amplitudes.push(parse_float(fields[5], idx)?);
        ids.push(fields[7].to_string());
        reflectors.push(name.clone());
    }

    if sections == 0 {
        return Err(Error::NoPointSets);
    }

    PointSet::from_columns([
        ("x", Column::Float(xs)),
        ("y", Column::Float(ys)),
        ("time", Column::Float(times)),
        ("amplitude", Column::Float(amplitudes)),
        ("ID", Column::Text(ids)),
        ("reflector", Column::Text(reflectors)),
    ])
}

fn parse_single_horizon(text: &str) -> Result<PointSet> {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut ids = Vec::new();
    let mut traces = Vec::new();
    let mut times = Vec::new();
    let mut amplitudes = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed == "EOD" {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(Error::Parse {
                line: idx + 1,
                message: format!("expected 6 fields, found {}", fields.len()),
            });
        }
        xs.push(parse_float(fields[0], idx)?);
        ys.push(parse_float(fields[1], idx)?);
        ids.push(fields[2].to_string());
        traces.push(parse_float(fields[3], idx)?);
        times.push(parse_float(fields[4], idx)?);
        amplitudes.push(parse_float(fields[5], idx)?);
    }

    PointSet::from_columns([
        ("x", Column::Float(xs)),
        ("y", Column::Float(ys)),
        ("ID", Column::Text(ids)),
        ("count", Column::Float(traces)),
        ("time", Column::Float(times)),
        ("amplitude", Column::Float(amplitudes)),
    ])
}

/// Horizon name from the remainder of a PROFILE title line: the text up to
/// the opening parenthesis, or `"unknown"` when no parenthesis is present.
fn profile_name(rest: &str) -> String {
    match rest.split_once('(') {
        Some((name, _)) if !name.trim().is_empty() => name.trim().to_string(),
        _ => "unknown".to_string(),
    }
}

fn parse_float(field: &str, idx: usize) -> Result<f64> {
    field.parse().map_err(|_| Error::Parse {
        line: idx + 1,
        message: format!("invalid number '{field}'"),
    })
}
