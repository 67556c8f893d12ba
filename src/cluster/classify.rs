//! DCM thresholding and near-distance computation

use crate::cluster::{NearPoint, PointClass};
use crate::error::{CdcError, Result};
use crate::graph::NeighborTable;
use crate::linalg::euclidean_distance;
use ndarray::ArrayView2;

/// Score at rank `ceil(N * ratio)` of the ascending DCM sequence.
pub fn dcm_threshold(scores: &[f64], ratio: f64) -> Result<f64> {
    let n = scores.len();
    let rank = (n as f64 * ratio).ceil() as usize;
    if rank >= n {
        return Err(CdcError::InvalidState(format!(
            "ratio {ratio} puts the threshold rank {rank} past the last of {n} scores"
        )));
    }

    let mut sorted = scores.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted[rank])
}

/// Split points into internal (score strictly below the threshold) and boundary.
///
/// Returns the classes together with the threshold used.
pub fn classify(scores: &[f64], ratio: f64) -> Result<(Vec<PointClass>, f64)> {
    let threshold = dcm_threshold(scores, ratio)?;
    let classes: Vec<PointClass> = scores
        .iter()
        .map(|&s| {
            if s < threshold {
                PointClass::Internal
            } else {
                PointClass::Boundary
            }
        })
        .collect();

    let internal = classes.iter().filter(|c| c.is_internal()).count();
    log::debug!(
        "DCM threshold {:.6}: {} internal, {} boundary",
        threshold,
        internal,
        classes.len() - internal
    );

    if internal == 0 {
        return Err(CdcError::InvalidState(format!(
            "no point scores below the DCM threshold {threshold} (ratio {ratio}); \
             every point would be boundary"
        )));
    }

    Ok((classes, threshold))
}

/// Nearest opposite-class point of every point.
///
/// The first opposite-class entry of the neighbor list wins; without one the
/// whole set is scanned (earliest index on equal distances).
pub fn near_points(
    points: ArrayView2<'_, f64>,
    neighbors: &NeighborTable,
    classes: &[PointClass],
) -> Result<Vec<NearPoint>> {
    let n = points.nrows();
    let mut near = Vec::with_capacity(n);
    let mut scanned = 0;

    for i in 0..n {
        let wanted = classes[i].opposite();
        let from_neighbors = neighbors
            .neighbors(i)
            .iter()
            .map(|&j| j as usize)
            .find(|&j| classes[j] == wanted);

        let record = match from_neighbors {
            Some(j) => NearPoint {
                index: j,
                distance: euclidean_distance(points.row(i), points.row(j)),
            },
            None => {
                scanned += 1;
                nearest_of_class(points, i, classes, wanted).ok_or_else(|| {
                    CdcError::InvalidState(format!("no {wanted:?} point exists for point {i}"))
                })?
            }
        };
        near.push(record);
    }

    log::debug!("{} points needed an exhaustive near-distance scan", scanned);
    Ok(near)
}

fn nearest_of_class(
    points: ArrayView2<'_, f64>,
    from: usize,
    classes: &[PointClass],
    wanted: PointClass,
) -> Option<NearPoint> {
    let origin = points.row(from);
    let mut best: Option<NearPoint> = None;
    for (j, row) in points.outer_iter().enumerate() {
        if classes[j] != wanted {
            continue;
        }
        let distance = euclidean_distance(origin, row);
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(NearPoint { index: j, distance });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NeighborSearch;
    use crate::graph::build_neighbor_table;
    use ndarray::array;
    use PointClass::{Boundary, Internal};

    #[test]
    fn threshold_at_rank() {
        let scores = [0.5, 0.1, 0.4, 0.2, 0.3];
        // ceil(5 * 0.5) = 3 -> fourth smallest
        assert_eq!(dcm_threshold(&scores, 0.5).unwrap(), 0.4);
        let (classes, threshold) = classify(&scores, 0.5).unwrap();
        assert_eq!(threshold, 0.4);
        assert_eq!(classes, vec![Boundary, Internal, Boundary, Internal, Internal]);
    }

    #[test]
    fn ties_at_threshold_are_boundary() {
        let scores = [0.1, 0.2, 0.2, 0.2, 0.9];
        let (classes, _) = classify(&scores, 0.4).unwrap();
        assert_eq!(classes, vec![Internal, Boundary, Boundary, Boundary, Boundary]);
    }

    #[test]
    fn all_tied_minimum_has_no_internal_points() {
        let scores = [0.0, 0.0, 0.0, 0.7];
        assert!(matches!(classify(&scores, 0.2), Err(CdcError::InvalidState(_))));
    }

    #[test]
    fn rank_past_the_end_is_invalid() {
        let scores = [0.1, 0.2, 0.3];
        // ceil(3 * 0.9) = 3 is out of range
        assert!(matches!(dcm_threshold(&scores, 0.9), Err(CdcError::InvalidState(_))));
    }

    #[test]
    fn near_points_prefer_neighbor_then_scan() {
        let x = array![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [10.0, 0.0], [11.0, 0.0]];
        let table = build_neighbor_table(x.view(), 1, NeighborSearch::BruteForce, false).unwrap();
        let classes = vec![Internal, Boundary, Internal, Internal, Internal];
        let near = near_points(x.view(), &table, &classes).unwrap();

        // Point 0's only neighbor is the boundary point 1
        assert_eq!(near[0], NearPoint { index: 1, distance: 1.0 });
        // Point 1 (boundary) has neighbor 0 first on the distance tie
        assert_eq!(near[1], NearPoint { index: 0, distance: 1.0 });
        // Points 3 and 4 only see each other and fall back to a scan
        assert_eq!(near[3], NearPoint { index: 1, distance: 9.0 });
        assert_eq!(near[4], NearPoint { index: 1, distance: 10.0 });
    }

    #[test]
    fn boundary_without_internal_neighbor_scans_for_anchor() {
        // Points 2 and 3 only have each other as neighbor; both internal
        // points are equally far from point 2
        let x = array![[-1.0, 0.0], [1.0, 0.0], [0.0, 5.0], [0.0, 6.0]];
        let table = build_neighbor_table(x.view(), 1, NeighborSearch::BruteForce, false).unwrap();
        let classes = vec![Internal, Internal, Boundary, Boundary];
        assert_eq!(table.neighbors(2), &[3]);
        assert_eq!(table.neighbors(3), &[2]);

        let near = near_points(x.view(), &table, &classes).unwrap();
        // Earliest index wins the distance tie
        assert_eq!(near[2], NearPoint { index: 0, distance: 26f64.sqrt() });
        assert_eq!(near[3], NearPoint { index: 0, distance: 37f64.sqrt() });
        // Internal points fall back to the nearest boundary point
        assert_eq!(near[0], NearPoint { index: 2, distance: 26f64.sqrt() });
        assert_eq!(near[1], NearPoint { index: 2, distance: 26f64.sqrt() });
    }
}
