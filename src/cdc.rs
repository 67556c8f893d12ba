//! The CDC engine: runs the four stages over one point set

use crate::centrality::direction_centrality;
use crate::cluster::classify::{classify, near_points};
use crate::cluster::detection::assign_clusters;
use crate::cluster::metrics::summarize;
use crate::cluster::{Cluster, NearPoint, PointClass};
use crate::config::CdcConfig;
use crate::error::Result;
use crate::graph::build_neighbor_table;
use crate::validation::{validate_k, validate_points};
use ndarray::ArrayView2;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Everything one CDC run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdcResult {
    /// Cluster label of every point (dense, 1-based)
    pub labels: Vec<usize>,

    /// Direction centrality of every point
    pub scores: Vec<f64>,

    /// Internal/boundary role of every point
    pub classes: Vec<PointClass>,

    /// Nearest opposite-class point of every point
    pub near: Vec<NearPoint>,

    /// DCM threshold separating internal from boundary points
    pub threshold: f64,

    /// Number of distinct labels
    pub n_clusters: usize,
}

impl CdcResult {
    /// Number of points classified as internal
    pub fn internal_count(&self) -> usize {
        self.classes.iter().filter(|c| c.is_internal()).count()
    }

    /// Number of points classified as boundary
    pub fn boundary_count(&self) -> usize {
        self.classes.len() - self.internal_count()
    }

    /// Per-cluster summaries; `points` must be the matrix the result came from
    pub fn clusters(&self, points: ArrayView2<'_, f64>) -> Vec<Cluster> {
        summarize(points, &self.labels, &self.classes, &self.scores)
    }
}

/// Clustering by Direction Centrality
#[derive(Debug, Clone, Default)]
pub struct Cdc {
    config: CdcConfig,
}

impl Cdc {
    /// Engine running with `config`
    pub fn new(config: CdcConfig) -> Self {
        Self { config }
    }

    /// Engine with the given `k` and `ratio` and default tuning
    pub fn with_params(k: usize, ratio: f64) -> Self {
        Self::new(CdcConfig::new(k, ratio))
    }

    /// Configuration used by every run
    pub fn config(&self) -> &CdcConfig {
        &self.config
    }

    /// Run all stages and keep the intermediate tables.
    pub fn fit(&self, points: ArrayView2<'_, f64>) -> Result<CdcResult> {
        self.config.validate()?;
        validate_points(points)?;
        validate_k(self.config.k, points.nrows())?;

        match self.thread_pool(points.nrows())? {
            Some(pool) => pool.install(|| self.run(points)),
            None => self.run(points),
        }
    }

    /// Worker pool for a run over `n_points`; `None` when every stage runs
    /// sequentially on the calling thread.
    fn thread_pool(&self, n_points: usize) -> Result<Option<ThreadPool>> {
        if !self.config.is_parallel(n_points) {
            return Ok(None);
        }

        let num_threads = self.config.resolved_threads();
        log::debug!("Using {} worker threads", num_threads);
        let pool = ThreadPoolBuilder::new().num_threads(num_threads).build()?;
        Ok(Some(pool))
    }

    /// Run all stages and return only the labels.
    pub fn fit_predict(&self, points: ArrayView2<'_, f64>) -> Result<Vec<usize>> {
        self.fit(points).map(|result| result.labels)
    }

    fn run(&self, points: ArrayView2<'_, f64>) -> Result<CdcResult> {
        let (n, d) = points.dim();
        let k = self.config.k;
        let parallel = self.config.is_parallel(n);
        let search = self.config.resolved_search(n);
        let start = Instant::now();

        log::info!(
            "Clustering {} points in {} dimensions (k={}, ratio={})",
            n,
            d,
            k,
            self.config.ratio
        );

        // 1. Neighbor graph
        let neighbors = build_neighbor_table(points, k, search, parallel)?;
        log::debug!(
            "Built {:?} neighbor table ({} bytes, parallel={})",
            search,
            neighbors.memory_usage(),
            parallel
        );

        // 2. Direction centrality
        let scores = direction_centrality(points, &neighbors, parallel);

        // 3. Classification and near distances
        let (classes, threshold) = classify(&scores, self.config.ratio)?;
        let near = near_points(points, &neighbors, &classes)?;

        // 4. Merge and relabel
        let labels = assign_clusters(points, &classes, &near)?;
        let n_clusters = labels.iter().copied().max().unwrap_or(0);

        let result = CdcResult {
            labels,
            scores,
            classes,
            near,
            threshold,
            n_clusters,
        };

        log::info!(
            "Found {} clusters ({} internal, {} boundary points) in {:.2?}",
            result.n_clusters,
            result.internal_count(),
            result.boundary_count(),
            start.elapsed()
        );

        Ok(result)
    }
}
