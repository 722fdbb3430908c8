//! 2D k-d tree for nearest-sample queries
//!
//! Backs the `nearest` griddata method: one O(log n) query per target
//! cell instead of a brute-force scan over all samples.
//!
//! The tree is implicit: `order` holds sample indices arranged so that the
//! middle of every subrange is its median along the level's split axis,
//! with the halves recursively arranged the same way. No node structs,
//! no child pointers.

use super::Sample;

/// A 2D k-d tree over sample points.
#[derive(Debug)]
pub struct KdTree {
    samples: Vec<Sample>,
    order: Vec<usize>,
}

/// Result of a nearest-sample query
#[derive(Debug, Clone, Copy)]
pub struct NearestResult {
    pub sample: Sample,
    pub distance_sq: f64,
    pub index: usize,
}

impl KdTree {
    /// Build a tree from sample points. O(n log n).
    pub fn build(samples: &[Sample]) -> Self {
        let samples = samples.to_vec();
        let mut order: Vec<usize> = (0..samples.len()).collect();
        arrange(&samples, &mut order, 0);
        Self { samples, order }
    }

    /// Number of samples in the tree
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the tree is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The sample closest to (x, y), or `None` for an empty tree.
    pub fn nearest(&self, x: f64, y: f64) -> Option<NearestResult> {
        if self.samples.is_empty() {
            return None;
        }

        let mut best_index = self.order[self.order.len() / 2];
        let mut best_dist_sq = f64::INFINITY;
        self.search(&self.order, 0, x, y, &mut best_index, &mut best_dist_sq);

        Some(NearestResult {
            sample: self.samples[best_index],
            distance_sq: best_dist_sq,
            index: best_index,
        })
    }

    fn search(
        &self,
        range: &[usize],
        axis: usize,
        x: f64,
        y: f64,
        best_index: &mut usize,
        best_dist_sq: &mut f64,
    ) {
        if range.is_empty() {
            return;
        }

        let mid = range.len() / 2;
        let node = &self.samples[range[mid]];
        let dist_sq = node.dist_sq(x, y);
        if dist_sq < *best_dist_sq {
            *best_dist_sq = dist_sq;
            *best_index = range[mid];
        }

        let diff = if axis == 0 { x - node.x } else { y - node.y };
        let (near, far) = if diff < 0.0 {
            (&range[..mid], &range[mid + 1..])
        } else {
            (&range[mid + 1..], &range[..mid])
        };

        self.search(near, 1 - axis, x, y, best_index, best_dist_sq);
        // The far side can only help if the splitting plane is closer
        // than the best match so far
        if diff * diff < *best_dist_sq {
            self.search(far, 1 - axis, x, y, best_index, best_dist_sq);
        }
    }
}

/// Recursively place each subrange's median (along the alternating split
/// axis) at its middle position.
fn arrange(samples: &[Sample], range: &mut [usize], axis: usize) {
    if range.len() <= 1 {
        return;
    }
    let mid = range.len() / 2;
    range.select_nth_unstable_by(mid, |&a, &b| {
        let (a, b) = if axis == 0 {
            (samples[a].x, samples[b].x)
        } else {
            (samples[a].y, samples[b].y)
        };
        a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
    });
    let (left, right) = range.split_at_mut(mid);
    arrange(samples, left, 1 - axis);
    arrange(samples, &mut right[1..], 1 - axis);
}
