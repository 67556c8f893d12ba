//! Clustering by Direction Centrality (CDC)
//!
//! Points whose k nearest neighbors surround them evenly are internal, the
//! rest are boundary points. Internal points whose reachability radii
//! overlap form clusters, and every boundary point joins the cluster of its
//! nearest internal point.
//!
//! ```no_run
//! use ndarray::array;
//!
//! let points = array![[0.0, 0.0], [0.5, 0.1], [0.1, 0.6], [9.0, 9.0], [9.4, 9.1], [9.2, 9.5]];
//! let labels = cdc_cluster::cluster(points.view(), 2, 0.5)?;
//! assert_eq!(labels.len(), 6);
//! # Ok::<(), cdc_cluster::CdcError>(())
//! ```

pub mod cdc;
pub mod centrality;
pub mod cluster;
pub mod config;
pub mod error;
pub mod graph;
pub mod linalg;
pub mod validation;

pub use cdc::{Cdc, CdcResult};
pub use cluster::metrics::adjusted_rand_score;
pub use cluster::{Cluster, NearPoint, PointClass};
pub use config::{CdcConfig, NeighborSearch};
pub use error::{CdcError, Result};

use ndarray::ArrayView2;

/// Cluster `points` (one row per point) with `k` neighbors and threshold
/// `ratio`, returning a label in `1..=M` for every point.
pub fn cluster(points: ArrayView2<'_, f64>, k: usize, ratio: f64) -> Result<Vec<usize>> {
    Cdc::with_params(k, ratio).fit_predict(points)
}
