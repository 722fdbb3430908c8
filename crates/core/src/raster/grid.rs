//! Main Grid type

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::bbox::BoundingBox;
use crate::error::{Error, Result};
use crate::scaling::scale;

/// A rectangular raster grid with cell-center coordinate axes.
///
/// Values are stored row-major in an `(ny, nx)` array. The y axis runs
/// north to south (strictly descending coordinates), the x axis west to
/// east (ascending); both sequences hold cell *centers* and are evenly
/// spaced, though x and y resolutions may differ. Cells with no estimate
/// hold the NaN no-data sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Cell-center x coordinates, ascending
    xcoords: Array1<f64>,
    /// Cell-center y coordinates, descending
    ycoords: Array1<f64>,
    /// Cell values, shape `(ycoords.len(), xcoords.len())`
    data: Array2<f64>,
}

impl Grid {
    /// Create a zero-filled grid over the given cell-center coordinates
    pub fn new(xcoords: Array1<f64>, ycoords: Array1<f64>) -> Self {
        let shape = (ycoords.len(), xcoords.len());
        Self {
            xcoords,
            ycoords,
            data: Array2::zeros(shape),
        }
    }

    /// Create a grid from existing cell values.
    ///
    /// Fails if the data shape does not match the coordinate lengths.
    pub fn from_data(xcoords: Array1<f64>, ycoords: Array1<f64>, data: Array2<f64>) -> Result<Self> {
        if data.dim() != (ycoords.len(), xcoords.len()) {
            return Err(Error::InvalidDimensions {
                rows: ycoords.len(),
                cols: xcoords.len(),
                len: data.len(),
            });
        }
        Ok(Self {
            xcoords,
            ycoords,
            data,
        })
    }

    /// Build a grid with this grid's coordinates from a flat value vector
    /// in `grid_coordinates` order (y-major, x-minor).
    pub fn with_values(&self, values: Vec<f64>) -> Result<Self> {
        if values.len() != self.len() {
            return Err(Error::InvalidDimensions {
                rows: self.rows(),
                cols: self.cols(),
                len: values.len(),
            });
        }
        let data = Array2::from_shape_vec(self.shape(), values)
            .map_err(|e| Error::Other(e.to_string()))?;
        Ok(Self {
            xcoords: self.xcoords.clone(),
            ycoords: self.ycoords.clone(),
            data,
        })
    }

    // Dimensions

    /// Number of rows (y cells)
    pub fn rows(&self) -> usize {
        self.ycoords.len()
    }

    /// Number of columns (x cells)
    pub fn cols(&self) -> usize {
        self.xcoords.len()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.rows() * self.cols()
    }

    /// Whether the grid has no cells
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Coordinates

    /// Cell-center x coordinates, ascending
    pub fn xcoords(&self) -> ArrayView1<'_, f64> {
        self.xcoords.view()
    }

    /// Cell-center y coordinates, descending
    pub fn ycoords(&self) -> ArrayView1<'_, f64> {
        self.ycoords.view()
    }

    /// Cell size per axis as (xres, yres), both positive.
    ///
    /// A degenerate axis (fewer than two cells) reports resolution 0.
    pub fn resolution(&self) -> (f64, f64) {
        let xres = if self.xcoords.len() > 1 {
            self.xcoords[1] - self.xcoords[0]
        } else {
            0.0
        };
        let yres = if self.ycoords.len() > 1 {
            self.ycoords[0] - self.ycoords[1]
        } else {
            0.0
        };
        (xres, yres)
    }

    /// Outer cell-edge bounding box (cell centers inset by half a cell)
    pub fn bounds(&self) -> BoundingBox {
        if self.is_empty() {
            return BoundingBox::new(f64::NAN, f64::NAN, f64::NAN, f64::NAN);
        }
        let (xres, yres) = self.resolution();
        let x0 = self.xcoords[0];
        let x1 = self.xcoords[self.xcoords.len() - 1];
        let y0 = self.ycoords[0];
        let y1 = self.ycoords[self.ycoords.len() - 1];
        BoundingBox::new(
            x0 - 0.5 * xres,
            y1 - 0.5 * yres,
            x1 + 0.5 * xres,
            y0 + 0.5 * yres,
        )
    }

    /// All cell-center coordinates as an `(N, 2)` array of (x, y) rows.
    ///
    /// Rows run y-major, x-minor with y descending, matching the row-major
    /// cell layout: a flat interpolation result in this order reshapes
    /// directly to the grid's `(y, x)` shape.
    pub fn grid_coordinates(&self) -> Array2<f64> {
        cartesian_product(self.xcoords.view(), self.ycoords.view())
    }

    /// Cell-center coordinates scaled to [0, 1] per axis, in
    /// `grid_coordinates` order.
    ///
    /// Scaling is relative to `bbox` when given, otherwise to this grid's
    /// edge [`bounds`](Self::bounds); cell centers then map strictly inside
    /// (0, 1), half a scaled cell away from the edges.
    pub fn grid_coordinates_scaled(&self, bbox: Option<BoundingBox>) -> Array2<f64> {
        let bbox = bbox.unwrap_or_else(|| self.bounds());
        let xs = scale(self.xcoords.view(), Some(bbox.xmin), Some(bbox.xmax));
        let ys = scale(self.ycoords.view(), Some(bbox.ymin), Some(bbox.ymax));
        cartesian_product(xs.view(), ys.view())
    }

    // Data access

    /// Get the value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Set the value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        let (rows, cols) = self.shape();
        match self.data.get_mut((row, col)) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(Error::IndexOutOfBounds {
                row,
                col,
                rows,
                cols,
            }),
        }
    }

    /// View of the underlying cell array
    pub fn data(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Consume the grid and return the underlying cell array
    pub fn into_data(self) -> Array2<f64> {
        self.data
    }
}

/// (x, y) pairs for every combination of the two axes, y-major/x-minor.
fn cartesian_product(xs: ArrayView1<'_, f64>, ys: ArrayView1<'_, f64>) -> Array2<f64> {
    let mut flat = Vec::with_capacity(xs.len() * ys.len() * 2);
    for &y in ys {
        for &x in xs {
            flat.push(x);
            flat.push(y);
        }
    }
    Array2::from_shape_vec((xs.len() * ys.len(), 2), flat)
        .expect("(N, 2) shape matches interleaved length")
}
