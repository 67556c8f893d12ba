//! Direction centrality in three or more dimensions: variance of the hull
//! simplex volumes spanned by the unit neighbor directions

use crate::centrality::hull::{convex_hull, HullError};
use crate::linalg::{determinant, gram, norm};
use ndarray::ArrayView2;
use statrs::function::gamma::gamma;
use statrs::statistics::Statistics;

/// Score assigned when the local geometry is degenerate
pub const SENTINEL_DCM: f64 = 1.0;

/// Unit direction from `point` to each neighbor.
///
/// Fails on a duplicate point (zero-length direction).
fn unit_directions(
    points: ArrayView2<'_, f64>,
    point: usize,
    neighbors: &[u32],
) -> Result<Vec<Vec<f64>>, HullError> {
    let origin = points.row(point);
    neighbors
        .iter()
        .map(|&j| {
            let diff: Vec<f64> = points
                .row(j as usize)
                .iter()
                .zip(origin.iter())
                .map(|(a, b)| a - b)
                .collect();
            let length = norm(&diff);
            if length == 0.0 || !length.is_finite() {
                return Err(HullError::Degenerate);
            }
            Ok(diff.into_iter().map(|c| c / length).collect())
        })
        .collect()
}

/// Variance of the facet volumes of the hull around `point`.
pub fn try_simplex_dcm(
    points: ArrayView2<'_, f64>,
    point: usize,
    neighbors: &[u32],
) -> Result<f64, HullError> {
    let d = points.ncols();
    let directions = unit_directions(points, point, neighbors)?;
    let facets = convex_hull(&directions)?;
    let scale = gamma((d - 1) as f64);

    let volumes: Vec<f64> = facets
        .iter()
        .map(|facet| {
            let rows: Vec<&[f64]> = facet
                .vertices
                .iter()
                .map(|&v| directions[v].as_slice())
                .collect();
            determinant(gram(&rows).view()).max(0.0).sqrt() / scale
        })
        .collect();

    let variance = volumes.iter().population_variance();
    if variance.is_finite() {
        Ok(variance)
    } else {
        Err(HullError::NonFinite)
    }
}

/// Simplex-volume DCM, degrading to [`SENTINEL_DCM`] on degenerate geometry.
pub fn simplex_dcm(points: ArrayView2<'_, f64>, point: usize, neighbors: &[u32]) -> f64 {
    match try_simplex_dcm(points, point, neighbors) {
        Ok(score) => score,
        Err(e) => {
            log::debug!("Point {} falls back to the sentinel DCM: {}", point, e);
            SENTINEL_DCM
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn symmetric_neighborhood_has_zero_variance() {
        // Octahedron around the origin: all eight facets have equal volume
        let x = array![
            [0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [-2.0, 0.0, 0.0],
            [0.0, 3.0, 0.0],
            [0.0, -3.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
        ];
        let score = try_simplex_dcm(x.view(), 0, &[1, 2, 3, 4, 5, 6]).unwrap();
        assert!(score.abs() < 1e-20, "got {score}");
    }

    #[test]
    fn lopsided_neighborhood_has_positive_variance() {
        let x = array![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 0.2, 0.0],
            [1.0, 0.0, 0.2],
            [1.0, -0.2, -0.2],
            [-1.0, 0.1, 0.1],
        ];
        let score = try_simplex_dcm(x.view(), 0, &[1, 2, 3, 4, 5]).unwrap();
        assert!(score > 1e-4, "got {score}");
    }

    #[test]
    fn coplanar_neighbors_fall_back_to_sentinel() {
        let x = array![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, -1.0, 0.0],
        ];
        assert!(try_simplex_dcm(x.view(), 0, &[1, 2, 3, 4]).is_err());
        assert_eq!(simplex_dcm(x.view(), 0, &[1, 2, 3, 4]), SENTINEL_DCM);
    }

    #[test]
    fn duplicate_neighbor_falls_back_to_sentinel() {
        let x = array![
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ];
        assert_eq!(simplex_dcm(x.view(), 0, &[1, 2, 3, 4]), SENTINEL_DCM);
    }

    #[test]
    fn too_few_neighbors_fall_back_to_sentinel() {
        let x = array![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        assert_eq!(simplex_dcm(x.view(), 0, &[1, 2, 3]), SENTINEL_DCM);
    }
}
