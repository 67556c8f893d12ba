//! k-nearest-neighbor table construction

use crate::config::NeighborSearch;
use crate::error::Result;
use crate::graph::{KdTree, NeighborTable};
use crate::linalg::squared_distance;
use crate::validation::validate_k;
use ndarray::ArrayView2;
use rayon::prelude::*;
use std::cmp::Ordering;

/// Total order on neighbor candidates: distance first, then index
#[inline]
pub(crate) fn candidate_order(a: &(f64, u32), b: &(f64, u32)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
}

/// Build the k-nearest-neighbor table of a point set.
///
/// `search` must already be resolved (`Auto` is treated as brute force).
pub fn build_neighbor_table(
    points: ArrayView2<'_, f64>,
    k: usize,
    search: NeighborSearch,
    parallel: bool,
) -> Result<NeighborTable> {
    let n = points.nrows();
    validate_k(k, n)?;

    log::debug!("Building {}-NN table for {} points using {:?}", k, n, search);

    let lists: Vec<Vec<u32>> = match search {
        NeighborSearch::KdTree => {
            let tree = KdTree::build(points);
            if parallel {
                (0..n).into_par_iter().map(|i| tree.nearest(i, k)).collect()
            } else {
                (0..n).map(|i| tree.nearest(i, k)).collect()
            }
        }
        NeighborSearch::BruteForce | NeighborSearch::Auto => {
            if parallel {
                (0..n)
                    .into_par_iter()
                    .map(|i| brute_force_neighbors(points, i, k))
                    .collect()
            } else {
                (0..n).map(|i| brute_force_neighbors(points, i, k)).collect()
            }
        }
    };

    Ok(NeighborTable::from_lists(k, lists))
}

/// Exhaustive k-nearest-neighbor query for one point
fn brute_force_neighbors(points: ArrayView2<'_, f64>, query: usize, k: usize) -> Vec<u32> {
    let origin = points.row(query);
    let mut candidates: Vec<(f64, u32)> = points
        .outer_iter()
        .enumerate()
        .filter(|&(j, _)| j != query)
        .map(|(j, row)| (squared_distance(origin, row), j as u32))
        .collect();

    // Partition the k smallest to the front, then order only those
    if candidates.len() > k {
        candidates.select_nth_unstable_by(k - 1, candidate_order);
        candidates.truncate(k);
    }
    candidates.sort_unstable_by(candidate_order);

    candidates.into_iter().map(|(_, j)| j).collect()
}
