//! Cluster assignment: merge reachable internal points, attach boundary points

use crate::cluster::{NearPoint, PointClass};
use crate::error::{CdcError, Result};
use crate::linalg::euclidean_distance;
use ndarray::ArrayView2;
use std::collections::HashMap;

/// Union-Find data structure for connected component analysis
pub struct DisjointSets {
    /// Parent pointers (parent[i] = parent of node i)
    parent: Vec<u32>,

    /// Rank of each root (upper bound on tree height)
    rank: Vec<u8>,
}

impl DisjointSets {
    /// Create a new DisjointSets data structure with every node in its own set
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size as u32).collect(),
            rank: vec![0; size],
        }
    }

    /// Find the root of the set containing x with path compression
    pub fn find(&mut self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }

        // Point every node on the path directly at the root
        let mut node = x;
        while node != root {
            let next = self.parent[node as usize];
            self.parent[node as usize] = root;
            node = next;
        }
        root
    }

    /// Union the sets containing x and y
    pub fn union(&mut self, x: u32, y: u32) {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return;
        }

        // Union by rank: attach the shallower tree under the deeper one
        let rank_x = self.rank[root_x as usize];
        let rank_y = self.rank[root_y as usize];

        if rank_x > rank_y {
            self.parent[root_y as usize] = root_x;
        } else {
            self.parent[root_x as usize] = root_y;
            if rank_x == rank_y {
                self.rank[root_y as usize] += 1;
            }
        }
    }

    /// Whether x and y belong to the same set
    pub fn connected(&mut self, x: u32, y: u32) -> bool {
        self.find(x) == self.find(y)
    }
}

/// Whether two internal points reach each other: their separation is within
/// the sum of their reachability radii.
#[inline]
fn reachable(points: ArrayView2<'_, f64>, near: &[NearPoint], i: usize, j: usize) -> bool {
    euclidean_distance(points.row(i), points.row(j)) <= near[i].distance + near[j].distance
}

/// Merge internal points into components.
///
/// Internal points are visited in index order; a point that no earlier
/// component has reached seeds a new one and absorbs every internal point
/// within reach (joining whole components when that point already belongs
/// to one). Points that were already reached do not seed.
pub fn merge_internal(
    points: ArrayView2<'_, f64>,
    classes: &[PointClass],
    near: &[NearPoint],
) -> DisjointSets {
    let n = classes.len();
    let internal: Vec<usize> = (0..n).filter(|&i| classes[i].is_internal()).collect();
    let mut sets = DisjointSets::new(n);
    let mut reached = vec![false; n];
    let mut seeds = 0;

    for &i in &internal {
        if reached[i] {
            continue;
        }
        reached[i] = true;
        seeds += 1;

        for &j in &internal {
            if reachable(points, near, i, j) {
                sets.union(i as u32, j as u32);
                reached[j] = true;
            }
        }
    }

    log::debug!("{} of {} internal points seeded a merge", seeds, internal.len());
    sets
}

/// Renumber raw component ids into `1..=M` by first appearance.
///
/// `None` marks a point that never received a component.
pub fn dense_relabel(raw: &[Option<u32>]) -> Result<Vec<usize>> {
    let mut mapping: HashMap<u32, usize> = HashMap::new();
    raw.iter()
        .enumerate()
        .map(|(i, id)| {
            let id = id.ok_or_else(|| {
                CdcError::InternalInvariant(format!("point {i} has no cluster after assignment"))
            })?;
            let next = mapping.len() + 1;
            Ok(*mapping.entry(id).or_insert(next))
        })
        .collect()
}

/// Assign a dense cluster label (1-based) to every point.
pub fn assign_clusters(
    points: ArrayView2<'_, f64>,
    classes: &[PointClass],
    near: &[NearPoint],
) -> Result<Vec<usize>> {
    let mut sets = merge_internal(points, classes, near);

    // Boundary points inherit the component of their nearest internal point
    let raw: Vec<Option<u32>> = (0..classes.len())
        .map(|i| match classes[i] {
            PointClass::Internal => Some(sets.find(i as u32)),
            PointClass::Boundary => {
                let anchor = near[i].index;
                classes[anchor]
                    .is_internal()
                    .then(|| sets.find(anchor as u32))
            }
        })
        .collect();

    dense_relabel(&raw)
}
