//! Columnar point-set table
//!
//! [`PointSet`] is the tabular input type for the interpolation engine and
//! the depth utility: an ordered collection of records with named columns of
//! either floating-point or text values. Columns are stored column-major and
//! share a single row count.

use ndarray::{Array2, ArrayView1};

use crate::bbox::BoundingBox;
use crate::error::{Error, Result};
use crate::scaling::scale;

/// A single named column of a [`PointSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Float(Vec<f64>),
    Text(Vec<String>),
}

impl Column {
    /// Number of rows in the column
    pub fn len(&self) -> usize {
        match self {
            Column::Float(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    /// Whether the column has no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An ordered collection of point records with named columns.
///
/// Every column has the same length; row order is preserved through all
/// operations. A point set used as interpolation input carries at least
/// `x`, `y` and one value column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    /// Columns in insertion order
    columns: Vec<(String, Column)>,
}

impl PointSet {
    /// Create an empty point set with no columns
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a point set from (name, column) pairs.
    ///
    /// Fails if the columns disagree on length.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Column)>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for (name, column) in columns {
            set.push_column(name, column)?;
        }
        Ok(set)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |(_, c)| c.len())
    }

    /// Whether the point set has no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Whether a column with this name exists
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    /// Add a column, replacing any existing column of the same name.
    ///
    /// Fails if the length differs from the existing columns.
    pub fn push_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if !self.columns.is_empty() && column.len() != self.len() {
            return Err(Error::LengthMismatch {
                name,
                expected: self.len(),
                actual: column.len(),
            });
        }
        if let Some(slot) = self.columns.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = column;
        } else {
            self.columns.push((name, column));
        }
        Ok(())
    }

    fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))
    }

    /// Borrow a float column by name
    pub fn float(&self, name: &str) -> Result<&[f64]> {
        match self.column(name)? {
            Column::Float(values) => Ok(values),
            Column::Text(_) => Err(Error::ColumnType {
                name: name.to_string(),
                expected: "float",
            }),
        }
    }

    /// Borrow a text column by name
    pub fn text(&self, name: &str) -> Result<&[String]> {
        match self.column(name)? {
            Column::Text(values) => Ok(values),
            Column::Float(_) => Err(Error::ColumnType {
                name: name.to_string(),
                expected: "text",
            }),
        }
    }

    /// Bounding box of the `x` and `y` columns as (xmin, ymin, xmax, ymax)
    pub fn bounds(&self) -> Result<BoundingBox> {
        let xs = self.float("x")?;
        let ys = self.float("y")?;
        let (xmin, xmax) = min_max(xs);
        let (ymin, ymax) = min_max(ys);
        Ok(BoundingBox::new(xmin, ymin, xmax, ymax))
    }

    /// All (x, y) coordinates as an `(N, 2)` array, row order preserved
    pub fn coordinates(&self) -> Result<Array2<f64>> {
        let xs = self.float("x")?;
        let ys = self.float("y")?;
        Ok(stack_xy(xs.iter().copied(), ys.iter().copied(), xs.len()))
    }

    /// All (x, y) coordinates scaled to [0, 1] per axis.
    ///
    /// Scaling is relative to `bbox` when given, otherwise to the point
    /// set's own bounds. Coordinates outside `bbox` scale beyond [0, 1].
    pub fn coordinates_scaled(&self, bbox: Option<BoundingBox>) -> Result<Array2<f64>> {
        let bbox = match bbox {
            Some(bbox) => bbox,
            None => self.bounds()?,
        };
        let xs = scale(
            ArrayView1::from(self.float("x")?),
            Some(bbox.xmin),
            Some(bbox.xmax),
        );
        let ys = scale(
            ArrayView1::from(self.float("y")?),
            Some(bbox.ymin),
            Some(bbox.ymax),
        );
        Ok(stack_xy(xs.iter().copied(), ys.iter().copied(), xs.len()))
    }

    /// Concatenate point sets into one, preserving row order.
    ///
    /// The result's schema is the union of the input schemas; rows from a
    /// set that lacks a column fill with NaN (float) or the empty string
    /// (text). Fails when no sets are given or when two sets disagree on a
    /// column's type.
    pub fn concat(sets: &[&PointSet]) -> Result<PointSet> {
        if sets.is_empty() {
            return Err(Error::NoPointSets);
        }

        let total: usize = sets.iter().map(|s| s.len()).sum();
        let mut result = PointSet::new();

        for set in sets {
            for (name, column) in &set.columns {
                if result.has_column(name) {
                    continue;
                }
                let merged = match column {
                    Column::Float(_) => {
                        let mut values = Vec::with_capacity(total);
                        for s in sets {
                            match s.column(name) {
                                Ok(Column::Float(v)) => values.extend_from_slice(v),
                                Ok(Column::Text(_)) => {
                                    return Err(Error::ColumnType {
                                        name: name.clone(),
                                        expected: "float",
                                    })
                                }
                                Err(_) => values.extend(std::iter::repeat(f64::NAN).take(s.len())),
                            }
                        }
                        Column::Float(values)
                    }
                    Column::Text(_) => {
                        let mut values = Vec::with_capacity(total);
                        for s in sets {
                            match s.column(name) {
                                Ok(Column::Text(v)) => values.extend_from_slice(v),
                                Ok(Column::Float(_)) => {
                                    return Err(Error::ColumnType {
                                        name: name.clone(),
                                        expected: "text",
                                    })
                                }
                                Err(_) => {
                                    values.extend(std::iter::repeat(String::new()).take(s.len()))
                                }
                            }
                        }
                        Column::Text(values)
                    }
                };
                result.push_column(name.clone(), merged)?;
            }
        }

        Ok(result)
    }

    /// Group row indices by the values of a text column.
    ///
    /// Groups appear in order of first appearance; row order is preserved
    /// within each group.
    pub fn group_indices(&self, column: &str) -> Result<Vec<(String, Vec<usize>)>> {
        let keys = self.text(column)?;
        let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
        for (row, key) in keys.iter().enumerate() {
            match groups.iter_mut().find(|(k, _)| k == key) {
                Some((_, rows)) => rows.push(row),
                None => groups.push((key.clone(), vec![row])),
            }
        }
        Ok(groups)
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(min, max), &v| (min.min(v), max.max(v)),
    )
}

fn stack_xy(
    xs: impl Iterator<Item = f64>,
    ys: impl Iterator<Item = f64>,
    n: usize,
) -> Array2<f64> {
    let mut flat = Vec::with_capacity(n * 2);
    for (x, y) in xs.zip(ys) {
        flat.push(x);
        flat.push(y);
    }
    Array2::from_shape_vec((n, 2), flat).expect("(N, 2) shape matches interleaved length")
}
