//! k-nearest-neighbor graph representation and construction

pub mod kdtree;
pub mod neighbors;

pub use kdtree::KdTree;
pub use neighbors::build_neighbor_table;

use std::mem;

/// Fixed-degree neighbor graph: every point has exactly `k` outgoing edges.
///
/// Edges are stored in one flat array with stride `k`, sorted per point by
/// ascending distance (ties by ascending index). A point never lists itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborTable {
    /// Number of points in the graph
    pub node_count: usize,

    /// Neighbors per point
    pub k: usize,

    /// Concatenated neighbor lists; `edges[i*k..(i+1)*k]` belongs to point i
    pub edges: Vec<u32>,
}

impl NeighborTable {
    /// Assemble a table from per-point neighbor lists.
    ///
    /// Every list must have length `k`.
    pub fn from_lists(k: usize, lists: Vec<Vec<u32>>) -> Self {
        let node_count = lists.len();
        let mut edges = Vec::with_capacity(node_count * k);
        for list in lists {
            debug_assert_eq!(list.len(), k);
            edges.extend_from_slice(&list);
        }
        Self {
            node_count,
            k,
            edges,
        }
    }

    /// Neighbors of a point, closest first
    pub fn neighbors(&self, node: usize) -> &[u32] {
        let start = node * self.k;
        &self.edges[start..start + self.k]
    }

    /// Estimate memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        mem::size_of::<Self>() + self.edges.capacity() * mem::size_of::<u32>()
    }
}
