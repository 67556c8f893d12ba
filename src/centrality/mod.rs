//! Direction centrality metric (DCM) scoring
//!
//! Planar data uses the variance of the angular gaps between neighbor
//! directions; higher-dimensional data uses the variance of the simplex
//! volumes on the convex hull of the unit neighbor directions.

pub mod angular;
pub mod hull;
pub mod simplex;

pub use angular::angular_dcm;
pub use simplex::{simplex_dcm, SENTINEL_DCM};

use crate::graph::NeighborTable;
use ndarray::ArrayView2;
use rayon::prelude::*;

/// Compute one DCM per point.
pub fn direction_centrality(
    points: ArrayView2<'_, f64>,
    neighbors: &NeighborTable,
    parallel: bool,
) -> Vec<f64> {
    let n = points.nrows();
    let planar = points.ncols() == 2;
    log::debug!(
        "Scoring {} points with the {} DCM",
        n,
        if planar { "angular" } else { "simplex-volume" }
    );

    let score = |i: usize| {
        if planar {
            angular_dcm(points, i, neighbors.neighbors(i))
        } else {
            simplex_dcm(points, i, neighbors.neighbors(i))
        }
    };

    let scores: Vec<f64> = if parallel {
        (0..n).into_par_iter().map(score).collect()
    } else {
        (0..n).map(score).collect()
    };

    if !planar {
        let fallbacks = scores.iter().filter(|&&s| s == SENTINEL_DCM).count();
        if fallbacks > 0 {
            log::debug!("{} of {} points use the sentinel DCM", fallbacks, n);
        }
    }

    scores
}
