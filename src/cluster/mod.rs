//! Boundary/internal classification and cluster assignment

pub mod classify;
pub mod detection;
pub mod metrics;

use serde::{Deserialize, Serialize};

/// Role of a point after DCM thresholding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointClass {
    /// Evenly surrounded by its neighbors (DCM below the threshold)
    Internal,
    /// On the edge of a cluster (DCM at or above the threshold)
    Boundary,
}

impl PointClass {
    /// Whether the point is internal
    pub fn is_internal(self) -> bool {
        self == PointClass::Internal
    }

    /// The class a point searches for when computing its near distance
    pub fn opposite(self) -> Self {
        match self {
            PointClass::Internal => PointClass::Boundary,
            PointClass::Boundary => PointClass::Internal,
        }
    }
}

/// Nearest point of the opposite class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NearPoint {
    /// Index of the chosen opposite-class point
    pub index: usize,

    /// Euclidean distance to it; the reachability radius of an internal point
    pub distance: f64,
}

/// Summary of one cluster of a CDC result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    /// Cluster label (1-based, dense)
    pub id: usize,

    /// Members of this cluster (point indices, ascending)
    pub members: Vec<u32>,

    /// Size of the cluster
    pub size: usize,

    /// Number of internal members
    pub internal_count: usize,

    /// Number of boundary members
    pub boundary_count: usize,

    /// Mean coordinates of the members
    pub centroid: Vec<f64>,

    /// Internal members with the lowest DCM (at most five)
    pub central_points: Vec<u32>,
}
