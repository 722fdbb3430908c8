//! Delaunay triangulation with per-simplex barycentric transforms
//!
//! Built with the incremental Bowyer-Watson algorithm. Each retained
//! simplex carries the inverted 2x2 edge matrix of its first two vertices
//! relative to the third, so barycentric coordinates of a query point cost
//! one small matrix-vector product.
//!
//! The triangulation is ephemeral: estimators build it per call from the
//! concatenated input coordinates and discard it with the call.

use seisgrid_core::{Error, Result};

/// Tolerance for the inside-simplex test: slightly negative so points on
/// a shared edge resolve to one of the adjacent simplices.
const INSIDE_EPS: f64 = -1e-10;

/// A Delaunay triangulation of scattered 2-D points.
#[derive(Debug)]
pub struct Triangulation {
    points: Vec<[f64; 2]>,
    simplices: Vec<[usize; 3]>,
    /// Per-simplex affine transform `[t00, t01, t10, t11, ox, oy]`: the
    /// inverse edge matrix and the origin (third) vertex. The first two
    /// barycentric weights are `T * (p - o)`, the third is their
    /// complement to 1.
    transforms: Vec<[f64; 6]>,
}

impl Triangulation {
    /// Triangulate a set of (x, y) points.
    ///
    /// Fails when fewer than 3 points are given or all points are
    /// collinear/coincident so that no valid simplex survives.
    pub fn build(points: &[[f64; 2]]) -> Result<Self> {
        if points.len() < 3 {
            return Err(Error::DegenerateTriangulation(format!(
                "at least 3 points required, got {}",
                points.len()
            )));
        }

        let simplices = bowyer_watson(points);
        let mut kept = Vec::with_capacity(simplices.len());
        let mut transforms = Vec::with_capacity(simplices.len());

        for simplex in simplices {
            if let Some(transform) = simplex_transform(points, simplex) {
                kept.push(simplex);
                transforms.push(transform);
            }
        }

        if kept.is_empty() {
            return Err(Error::DegenerateTriangulation(
                "no valid simplices (collinear points?)".to_string(),
            ));
        }

        Ok(Self {
            points: points.to_vec(),
            simplices: kept,
            transforms,
        })
    }

    /// Vertex index triples of the simplices
    pub fn simplices(&self) -> &[[usize; 3]] {
        &self.simplices
    }

    /// Number of simplices
    pub fn len(&self) -> usize {
        self.simplices.len()
    }

    /// Whether the triangulation holds no simplices
    pub fn is_empty(&self) -> bool {
        self.simplices.is_empty()
    }

    /// Triangulated input points
    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    /// Barycentric coordinates of (x, y) with respect to a simplex.
    ///
    /// The weights sum to 1 for any query point; all three are
    /// non-negative exactly when the point lies inside the simplex.
    pub fn barycentric(&self, simplex: usize, x: f64, y: f64) -> [f64; 3] {
        let [t00, t01, t10, t11, ox, oy] = self.transforms[simplex];
        let dx = x - ox;
        let dy = y - oy;
        let b0 = t00 * dx + t01 * dy;
        let b1 = t10 * dx + t11 * dy;
        [b0, b1, 1.0 - b0 - b1]
    }

    /// Index of the simplex enclosing (x, y), or `None` outside the
    /// convex hull.
    ///
    /// Linear scan over simplices; fine for the moderate triangle counts
    /// the estimators deal with.
    pub fn find_simplex(&self, x: f64, y: f64) -> Option<usize> {
        (0..self.simplices.len()).find(|&s| {
            let [b0, b1, b2] = self.barycentric(s, x, y);
            b0 >= INSIDE_EPS && b1 >= INSIDE_EPS && b2 >= INSIDE_EPS
        })
    }
}

/// Inverted edge matrix of a simplex relative to its third vertex, or
/// `None` for a degenerate (zero-area) triangle.
fn simplex_transform(points: &[[f64; 2]], [a, b, c]: [usize; 3]) -> Option<[f64; 6]> {
    let [ox, oy] = points[c];
    let m00 = points[a][0] - ox;
    let m10 = points[a][1] - oy;
    let m01 = points[b][0] - ox;
    let m11 = points[b][1] - oy;

    let det = m00 * m11 - m01 * m10;
    if det.abs() < 1e-12 {
        return None;
    }

    let inv = 1.0 / det;
    Some([m11 * inv, -m01 * inv, -m10 * inv, m00 * inv, ox, oy])
}

/// Incremental Bowyer-Watson triangulation.
///
/// Points insert one at a time into a super-triangle; every insertion
/// removes the simplices whose circumcircle contains the new point and
/// re-triangulates the cavity boundary against it.
fn bowyer_watson(points: &[[f64; 2]]) -> Vec<[usize; 3]> {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in points {
        min_x = min_x.min(p[0]);
        min_y = min_y.min(p[1]);
        max_x = max_x.max(p[0]);
        max_y = max_y.max(p[1]);
    }

    let dx = max_x - min_x;
    let dy = max_y - min_y;
    let span = dx.max(dy).max(1.0);

    // Vertices 0..3 belong to the super-triangle and are stripped at the end.
    let mut vertices: Vec<[f64; 2]> = Vec::with_capacity(points.len() + 3);
    vertices.push([min_x - 10.0 * span, min_y - span]);
    vertices.push([min_x + 0.5 * dx, max_y + 10.0 * span]);
    vertices.push([max_x + 10.0 * span, min_y - span]);

    let mut triangles: Vec<[usize; 3]> = vec![[0, 1, 2]];

    for point in points {
        let vertex = vertices.len();
        vertices.push(*point);

        let bad: Vec<usize> = triangles
            .iter()
            .enumerate()
            .filter_map(|(t, &[a, b, c])| {
                circumcircle_contains(vertices[a], vertices[b], vertices[c], *point)
                    .then_some(t)
            })
            .collect();

        // Cavity boundary: edges of bad triangles not shared by another
        // bad triangle.
        let mut boundary: Vec<(usize, usize)> = Vec::new();
        for &t in &bad {
            let [a, b, c] = triangles[t];
            for edge in [(a, b), (b, c), (c, a)] {
                let shared = bad.iter().any(|&other| {
                    if other == t {
                        return false;
                    }
                    let [oa, ob, oc] = triangles[other];
                    [(oa, ob), (ob, oc), (oc, oa)]
                        .iter()
                        .any(|&(ea, eb)| (ea, eb) == edge || (eb, ea) == edge)
                });
                if !shared {
                    boundary.push(edge);
                }
            }
        }

        // Drop bad triangles from the back so indices stay valid.
        let mut bad = bad;
        bad.sort_unstable_by(|a, b| b.cmp(a));
        for t in bad {
            triangles.swap_remove(t);
        }

        for (a, b) in boundary {
            triangles.push([a, b, vertex]);
        }
    }

    // Strip triangles touching the super-triangle and remap indices.
    triangles.retain(|t| t.iter().all(|&v| v >= 3));
    for t in &mut triangles {
        for v in t.iter_mut() {
            *v -= 3;
        }
    }

    triangles
}

/// Whether `p` lies inside the circumcircle of triangle (a, b, c).
fn circumcircle_contains(a: [f64; 2], b: [f64; 2], c: [f64; 2], p: [f64; 2]) -> bool {
    let d = 2.0 * (a[0] * (b[1] - c[1]) + b[0] * (c[1] - a[1]) + c[0] * (a[1] - b[1]));
    if d.abs() < 1e-12 {
        return false;
    }

    let a_sq = a[0] * a[0] + a[1] * a[1];
    let b_sq = b[0] * b[0] + b[1] * b[1];
    let c_sq = c[0] * c[0] + c[1] * c[1];

    let ux = (a_sq * (b[1] - c[1]) + b_sq * (c[1] - a[1]) + c_sq * (a[1] - b[1])) / d;
    let uy = (a_sq * (c[0] - b[0]) + b_sq * (a[0] - c[0]) + c_sq * (b[0] - a[0])) / d;

    let radius_sq = (a[0] - ux).powi(2) + (a[1] - uy).powi(2);
    (p[0] - ux).powi(2) + (p[1] - uy).powi(2) <= radius_sq
}
