//! Planar direction centrality: variance of the angular gaps between neighbors

use ndarray::ArrayView2;
use std::f64::consts::{PI, TAU};

/// Direction of `(dx, dy)` in `[0, 2π)`.
///
/// A zero vector (duplicate point) maps to 0.
#[inline]
pub fn direction_angle(dx: f64, dy: f64) -> f64 {
    let angle = dy.atan2(dx);
    if angle < 0.0 {
        angle + TAU
    } else {
        angle
    }
}

/// Normalized variance of the angular gaps around `point`.
///
/// 0 when the neighbors are evenly spread around the point; approaches 1 as
/// they collapse into a single direction.
pub fn angular_dcm(points: ArrayView2<'_, f64>, point: usize, neighbors: &[u32]) -> f64 {
    let k = neighbors.len();
    if k < 2 {
        return 0.0;
    }

    let (x, y) = (points[[point, 0]], points[[point, 1]]);
    let mut angles: Vec<f64> = neighbors
        .iter()
        .map(|&j| direction_angle(points[[j as usize, 0]] - x, points[[j as usize, 1]] - y))
        .collect();
    angles.sort_by(f64::total_cmp);

    let kf = k as f64;
    let even_gap = 2.0 * PI / kf;
    let mut sum = 0.0;
    for pair in angles.windows(2) {
        let gap = pair[1] - pair[0];
        sum += (gap - even_gap).powi(2);
    }
    let wrap = angles[0] - angles[k - 1] + 2.0 * PI;
    sum += (wrap - even_gap).powi(2);

    let variance = sum / kf;
    variance / ((kf - 1.0) * 4.0 * PI.powi(2) / kf.powi(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn angles_cover_all_quadrants() {
        assert_eq!(direction_angle(1.0, 0.0), 0.0);
        assert!((direction_angle(0.0, 1.0) - PI / 2.0).abs() < 1e-15);
        assert!((direction_angle(-1.0, 0.0) - PI).abs() < 1e-15);
        assert!((direction_angle(0.0, -1.0) - 3.0 * PI / 2.0).abs() < 1e-15);
        assert_eq!(direction_angle(0.0, 0.0), 0.0);
        assert!((direction_angle(-1.0, -0.0) - PI).abs() < 1e-15);
    }

    #[test]
    fn evenly_surrounded_point_scores_zero() {
        let x = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [-1.0, 0.0], [0.0, -1.0]];
        let score = angular_dcm(x.view(), 0, &[1, 2, 3, 4]);
        assert!(score.abs() < 1e-12, "got {score}");
    }

    #[test]
    fn one_sided_point_scores_high() {
        // All neighbors inside a narrow cone to the right
        let x = array![[0.0, 0.0], [1.0, 0.0], [1.0, 0.1], [1.0, -0.1], [2.0, 0.0]];
        let score = angular_dcm(x.view(), 0, &[1, 2, 3, 4]);
        assert!(score > 0.7, "got {score}");
    }

    #[test]
    fn fully_collapsed_directions_score_one() {
        // Every neighbor in the same direction: one 2π gap, the rest zero
        let x = array![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [3.0, 0.0]];
        let score = angular_dcm(x.view(), 0, &[1, 2, 3]);
        assert!((score - 1.0).abs() < 1e-12, "got {score}");
    }

    #[test]
    fn single_neighbor_is_zero() {
        let x = array![[0.0, 0.0], [1.0, 0.0]];
        assert_eq!(angular_dcm(x.view(), 0, &[1]), 0.0);
    }
}
