//! Bounding box type shared by point sets and grids

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box as (xmin, ymin, xmax, ymax).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Extent in the x direction
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Extent in the y direction
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Whether (x, y) lies inside or on the edge of the box
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }
}

impl From<(f64, f64, f64, f64)> for BoundingBox {
    fn from((xmin, ymin, xmax, ymax): (f64, f64, f64, f64)) -> Self {
        Self::new(xmin, ymin, xmax, ymax)
    }
}
