//! Cluster statistics and agreement metrics

use crate::cluster::{Cluster, PointClass};
use crate::error::{CdcError, Result};
use itertools::Itertools;
use ndarray::ArrayView2;
use std::collections::HashMap;

/// Number of central points reported per cluster
const CENTRAL_POINTS: usize = 5;

/// Build a summary for every cluster of a labeling, ordered by label.
pub fn summarize(
    points: ArrayView2<'_, f64>,
    labels: &[usize],
    classes: &[PointClass],
    scores: &[f64],
) -> Vec<Cluster> {
    let dims = points.ncols();

    // Group member indices by label; indices arrive in ascending order
    let groups = labels
        .iter()
        .enumerate()
        .map(|(i, &label)| (label, i as u32))
        .into_group_map();

    groups
        .into_iter()
        .sorted_by_key(|(label, _)| *label)
        .map(|(id, members)| {
            let size = members.len();
            let internal_count = members
                .iter()
                .filter(|&&m| classes[m as usize].is_internal())
                .count();

            let mut centroid = vec![0.0; dims];
            for &m in &members {
                for (c, x) in centroid.iter_mut().zip(points.row(m as usize).iter()) {
                    *c += x;
                }
            }
            centroid.iter_mut().for_each(|c| *c /= size as f64);

            // Most evenly surrounded internal members first
            let central_points = members
                .iter()
                .copied()
                .filter(|&m| classes[m as usize].is_internal())
                .sorted_by(|&a, &b| {
                    scores[a as usize]
                        .total_cmp(&scores[b as usize])
                        .then(a.cmp(&b))
                })
                .take(CENTRAL_POINTS)
                .collect();

            Cluster {
                id,
                size,
                internal_count,
                boundary_count: size - internal_count,
                centroid,
                central_points,
                members,
            }
        })
        .collect()
}

fn pairs(n: usize) -> f64 {
    let n = n as f64;
    n * (n - 1.0) / 2.0
}

/// Adjusted Rand index between two labelings of the same points.
///
/// 1.0 means identical partitions up to renaming; values near 0.0 mean
/// chance-level agreement.
pub fn adjusted_rand_score(labels_true: &[usize], labels_pred: &[usize]) -> Result<f64> {
    if labels_true.len() != labels_pred.len() {
        return Err(CdcError::invalid_argument(
            "labels_pred",
            format!(
                "length {} does not match labels_true length {}",
                labels_pred.len(),
                labels_true.len()
            ),
        ));
    }

    let n = labels_true.len();
    let true_counts = labels_true.iter().counts();
    let pred_counts = labels_pred.iter().counts();

    // Identical trivial partitions: everything together or everything apart
    let (classes, clusters) = (true_counts.len(), pred_counts.len());
    if classes == clusters && (classes <= 1 || classes == n) {
        return Ok(1.0);
    }

    let contingency: HashMap<(usize, usize), usize> = labels_true
        .iter()
        .copied()
        .zip(labels_pred.iter().copied())
        .counts();

    let index: f64 = contingency.values().map(|&c| pairs(c)).sum();
    let sum_true: f64 = true_counts.values().map(|&c| pairs(c)).sum();
    let sum_pred: f64 = pred_counts.values().map(|&c| pairs(c)).sum();

    let expected = sum_true * sum_pred / pairs(n);
    let max_index = (sum_true + sum_pred) / 2.0;
    if max_index == expected {
        return Ok(1.0);
    }

    Ok((index - expected) / (max_index - expected))
}
