//! # Ramer–Douglas–Peucker polyline simplification
//!
//! Reduces a larva track to the samples where its direction changes by more than a
//! tolerance ε. The retained samples other than the two endpoints are the **turning points**.
//!
//! ## Algorithm
//! -----------------
//! The divide-and-conquer formulation is run iteratively over an explicit stack of
//! `(start, end)` index ranges, so long recordings cannot exhaust the call stack:
//!
//! 1. Pop a range; find the still-retained intermediate point farthest from the chord
//!    `start → end` (perpendicular distance, or plain distance when the chord is degenerate).
//! 2. If that distance is `> ε`, push `(start, index)` and `(index, end)`.
//! 3. Otherwise clear every intermediate point of the range from the mask.
//!
//! The farthest point is selected with a strict `>`, so ties go to the first occurrence.
//! With `ε = 0` every point off its local chord is kept and collinear points are dropped.
//!
//! ## Output
//! -----------------
//! [`simplify`] returns a [`Simplification`]: the retained points and a boolean mask aligned
//! with the input. The first and last points are always retained.
use nalgebra::Point2;

use crate::constants::Millimeter;

/// Distance of `point` to the line through `start` and `end`.
///
/// When `start == end` the line is undefined and the Euclidean distance to `start` is used.
pub fn perpendicular_distance(
    point: &Point2<f64>,
    start: &Point2<f64>,
    end: &Point2<f64>,
) -> f64 {
    let chord = end - start;
    let norm = chord.norm();
    if norm == 0.0 {
        return (point - start).norm();
    }
    let offset = start - point;
    (chord.x * offset.y - chord.y * offset.x).abs() / norm
}

/// Result of a polyline simplification.
#[derive(Debug, Clone, PartialEq)]
pub struct Simplification {
    /// Retained points, in input order.
    pub points: Vec<Point2<f64>>,
    /// `true` where the input point is retained; same length as the input.
    pub mask: Vec<bool>,
}

impl Simplification {
    /// Input positions of the retained points.
    pub fn retained_indices(&self) -> Vec<usize> {
        self.mask
            .iter()
            .enumerate()
            .filter_map(|(i, &keep)| keep.then_some(i))
            .collect()
    }

    /// Number of retained points that are not endpoints.
    pub fn n_turning_points(&self) -> usize {
        self.points.len().saturating_sub(2)
    }
}

/// Retention mask of the RDP simplification of `points` with tolerance `epsilon`.
pub fn simplification_mask(points: &[Point2<f64>], epsilon: Millimeter) -> Vec<bool> {
    let n = points.len();
    let mut mask = vec![true; n];
    if n < 3 {
        return mask;
    }

    let mut stack = vec![(0_usize, n - 1)];
    while let Some((start, end)) = stack.pop() {
        let mut dmax = 0.0;
        let mut index = start;

        for i in (start + 1)..end {
            if mask[i] {
                let d = perpendicular_distance(&points[i], &points[start], &points[end]);
                if d > dmax {
                    index = i;
                    dmax = d;
                }
            }
        }

        if dmax > epsilon {
            stack.push((start, index));
            stack.push((index, end));
        } else {
            mask[(start + 1)..end].iter_mut().for_each(|m| *m = false);
        }
    }

    mask
}

/// Simplify a polyline with the Ramer–Douglas–Peucker algorithm.
///
/// Arguments
/// -----------------
/// * `points` – Ordered track samples.
/// * `epsilon` – Tolerance (same unit as the points).
///
/// Return
/// ----------
/// * The retained points and the retention mask. Inputs with fewer than three points are
///   returned unchanged with an all-`true` mask.
pub fn simplify(points: &[Point2<f64>], epsilon: Millimeter) -> Simplification {
    let mask = simplification_mask(points, epsilon);
    let points = points
        .iter()
        .zip(&mask)
        .filter_map(|(p, &keep)| keep.then_some(*p))
        .collect();
    Simplification { points, mask }
}
