//! Exact k-d tree for k-nearest-neighbor queries

use crate::graph::neighbors::candidate_order;
use crate::linalg::squared_distance;
use ndarray::ArrayView2;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

const LEAF_SIZE: usize = 16;

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        start: usize,
        end: usize,
    },
    Split {
        dim: usize,
        value: f64,
        left: usize,
        right: usize,
    },
}

/// Candidate kept in the bounded max-heap during a query
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate(f64, u32);

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        candidate_order(&(self.0, self.1), &(other.0, other.1))
    }
}

/// k-d tree over the rows of a point matrix.
///
/// Queries return exactly the neighbors a brute-force scan returns,
/// including the tie order by index.
pub struct KdTree<'a> {
    points: ArrayView2<'a, f64>,
    /// Row indices permuted so every leaf owns a contiguous range
    indices: Vec<u32>,
    nodes: Vec<Node>,
}

impl<'a> KdTree<'a> {
    /// Build the tree with median splits on the widest dimension.
    pub fn build(points: ArrayView2<'a, f64>) -> Self {
        let n = points.nrows();
        let mut tree = Self {
            points,
            indices: (0..n as u32).collect(),
            nodes: Vec::with_capacity(2 * n / LEAF_SIZE + 1),
        };
        if n > 0 {
            tree.build_node(0, n);
        }
        tree
    }

    fn build_node(&mut self, start: usize, end: usize) -> usize {
        let id = self.nodes.len();
        if end - start <= LEAF_SIZE {
            self.nodes.push(Node::Leaf { start, end });
            return id;
        }

        let dim = self.widest_dimension(start, end);
        let mid = start + (end - start) / 2;
        let points = self.points;
        self.indices[start..end].select_nth_unstable_by(mid - start, |&a, &b| {
            points[[a as usize, dim]].total_cmp(&points[[b as usize, dim]])
        });
        let value = points[[self.indices[mid] as usize, dim]];

        // Reserve the slot, children are pushed after it
        self.nodes.push(Node::Leaf { start, end });
        let left = self.build_node(start, mid);
        let right = self.build_node(mid, end);
        self.nodes[id] = Node::Split {
            dim,
            value,
            left,
            right,
        };
        id
    }

    fn widest_dimension(&self, start: usize, end: usize) -> usize {
        let d = self.points.ncols();
        (0..d)
            .map(|dim| {
                let (lo, hi) = self.indices[start..end].iter().fold(
                    (f64::INFINITY, f64::NEG_INFINITY),
                    |(lo, hi), &i| {
                        let v = self.points[[i as usize, dim]];
                        (lo.min(v), hi.max(v))
                    },
                );
                (dim, hi - lo)
            })
            .max_by(|a, b| a.1.total_cmp(&b.1).then(b.0.cmp(&a.0)))
            .map(|(dim, _)| dim)
            .unwrap_or(0)
    }

    /// The `k` nearest other points of row `query`, closest first.
    pub fn nearest(&self, query: usize, k: usize) -> Vec<u32> {
        let mut heap = BinaryHeap::with_capacity(k + 1);
        if !self.nodes.is_empty() && k > 0 {
            self.search(0, query, k, &mut heap);
        }
        heap.into_sorted_vec().into_iter().map(|c| c.1).collect()
    }

    fn search(&self, node: usize, query: usize, k: usize, heap: &mut BinaryHeap<Candidate>) {
        match self.nodes[node] {
            Node::Leaf { start, end } => {
                let origin = self.points.row(query);
                for &j in &self.indices[start..end] {
                    if j as usize == query {
                        continue;
                    }
                    let candidate =
                        Candidate(squared_distance(origin, self.points.row(j as usize)), j);
                    if heap.len() < k {
                        heap.push(candidate);
                    } else if heap.peek().is_some_and(|worst| candidate < *worst) {
                        heap.pop();
                        heap.push(candidate);
                    }
                }
            }
            Node::Split {
                dim,
                value,
                left,
                right,
            } => {
                let diff = self.points[[query, dim]] - value;
                let (near, far) = if diff < 0.0 { (left, right) } else { (right, left) };
                self.search(near, query, k, heap);

                // Equal distances must still be visited so index ties resolve exactly
                let worst = heap.peek().map(|c| c.0);
                let prune = heap.len() == k && worst.is_some_and(|w| diff * diff > w);
                if !prune {
                    self.search(far, query, k, heap);
                }
            }
        }
    }
}
