//! Configuration management for the CDC engine

use crate::error::{CdcError, Result};
use crate::validation::validate_ratio;
use serde::{Deserialize, Serialize};

/// Strategy used to build the k-nearest-neighbor table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborSearch {
    /// Brute force for small inputs, k-d tree for large ones
    #[default]
    Auto,
    /// Exhaustive O(N^2) scan
    BruteForce,
    /// Exact k-d tree search
    KdTree,
}

/// Parameters of one CDC run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CdcConfig {
    /// Number of nearest neighbors per point
    pub k: usize,

    /// Fraction of points (by DCM rank) eligible to be internal
    pub ratio: f64,

    /// Number of worker threads (0 = use all available cores)
    pub threads: usize,

    /// Minimum number of points before per-point stages run in parallel
    pub parallel_threshold: usize,

    /// Minimum number of points before `NeighborSearch::Auto` picks the k-d tree
    pub kdtree_threshold: usize,

    /// Neighbor search strategy
    pub neighbor_search: NeighborSearch,
}

impl Default for CdcConfig {
    fn default() -> Self {
        Self {
            k: 30,
            ratio: 0.72,
            threads: 0,
            parallel_threshold: 1_000,
            kdtree_threshold: 2_000,
            neighbor_search: NeighborSearch::Auto,
        }
    }
}

impl CdcConfig {
    /// Create a configuration with the two algorithm parameters and default tuning
    pub fn new(k: usize, ratio: f64) -> Self {
        Self {
            k,
            ratio,
            ..Self::default()
        }
    }

    /// Set the worker count (0 = all cores)
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set the point count at which per-point stages go parallel
    pub fn parallel_threshold(mut self, parallel_threshold: usize) -> Self {
        self.parallel_threshold = parallel_threshold;
        self
    }

    /// Set the point count at which `Auto` switches to the k-d tree
    pub fn kdtree_threshold(mut self, kdtree_threshold: usize) -> Self {
        self.kdtree_threshold = kdtree_threshold;
        self
    }

    /// Set the neighbor search strategy
    pub fn neighbor_search(mut self, neighbor_search: NeighborSearch) -> Self {
        self.neighbor_search = neighbor_search;
        self
    }

    /// Check the parameters that do not depend on the input size.
    ///
    /// `k` is checked against the point count when a run starts.
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(CdcError::invalid_argument("k", "k must be greater than 0"));
        }
        validate_ratio(self.ratio)
    }

    /// Worker count after resolving `threads == 0`
    pub fn resolved_threads(&self) -> usize {
        if self.threads > 0 {
            self.threads
        } else {
            num_cpus::get()
        }
    }

    /// Whether a run over `n_points` should use parallel iterators
    pub fn is_parallel(&self, n_points: usize) -> bool {
        n_points >= self.parallel_threshold
    }

    /// Resolve `Auto` against the input size
    pub fn resolved_search(&self, n_points: usize) -> NeighborSearch {
        match self.neighbor_search {
            NeighborSearch::Auto if n_points >= self.kdtree_threshold => NeighborSearch::KdTree,
            NeighborSearch::Auto => NeighborSearch::BruteForce,
            other => other,
        }
    }
}
