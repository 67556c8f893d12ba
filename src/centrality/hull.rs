//! Convex hull in arbitrary dimension (incremental beneath-beyond)
//!
//! Facets are simplices: each holds `D` vertex indices, an outward unit
//! normal and the plane offset. Coplanar facets stay triangulated.

use crate::linalg::{determinant, dot, norm};
use ndarray::{Array2, Axis};
use std::collections::HashMap;
use thiserror::Error;

/// Distance below which a point counts as lying on a hyperplane
const PLANE_EPS: f64 = 1e-10;

/// Reasons a hull cannot be built
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HullError {
    /// Fewer than `D + 1` points
    #[error("{points} points cannot span a {dim}-D hull")]
    TooFewPoints { points: usize, dim: usize },

    /// All points lie in a common hyperplane
    #[error("points are affinely degenerate")]
    Degenerate,

    /// A facet's vertices do not span a hyperplane
    #[error("facet hyperplane is singular")]
    SingularFacet,

    /// An input coordinate is NaN or infinite
    #[error("non-finite coordinate")]
    NonFinite,
}

/// One simplex facet of a convex hull
#[derive(Debug, Clone)]
pub struct Facet {
    /// Vertex indices, sorted ascending
    pub vertices: Vec<usize>,
    /// Outward unit normal
    pub normal: Vec<f64>,
    /// `normal · x == offset` on the facet plane
    pub offset: f64,
}

impl Facet {
    fn through(
        points: &[Vec<f64>],
        mut vertices: Vec<usize>,
        interior: &[f64],
    ) -> Result<Self, HullError> {
        vertices.sort_unstable();
        let (mut normal, mut offset) = hyperplane(points, &vertices)?;
        if dot(&normal, interior) > offset {
            normal.iter_mut().for_each(|c| *c = -*c);
            offset = -offset;
        }
        Ok(Self {
            vertices,
            normal,
            offset,
        })
    }

    /// Signed distance of `p` above the facet (positive = outside)
    #[inline]
    fn distance(&self, p: &[f64]) -> f64 {
        dot(&self.normal, p) - self.offset
    }
}

/// Unit normal and offset of the hyperplane through `D` points.
///
/// The normal is the generalized cross product of the edge vectors, i.e. the
/// signed cofactors of the `(D-1) x D` edge matrix.
fn hyperplane(points: &[Vec<f64>], vertices: &[usize]) -> Result<(Vec<f64>, f64), HullError> {
    let origin = &points[vertices[0]];
    let d = origin.len();
    let edges = Array2::from_shape_fn((vertices.len() - 1, d), |(r, c)| {
        points[vertices[r + 1]][c] - origin[c]
    });

    let mut normal: Vec<f64> = (0..d)
        .map(|skip| {
            let kept: Vec<usize> = (0..d).filter(|&c| c != skip).collect();
            let minor = edges.select(Axis(1), &kept);
            let sign = if skip % 2 == 0 { 1.0 } else { -1.0 };
            sign * determinant(minor.view())
        })
        .collect();

    let length = norm(&normal);
    if !length.is_finite() || length <= PLANE_EPS {
        return Err(HullError::SingularFacet);
    }
    normal.iter_mut().for_each(|c| *c /= length);
    let offset = dot(&normal, origin);
    Ok((normal, offset))
}

/// Pick `D + 1` affinely independent points, greedily maximizing the
/// residual against the span found so far. Earlier indices win ties.
fn initial_simplex(points: &[Vec<f64>]) -> Result<Vec<usize>, HullError> {
    let d = points[0].len();
    let origin = &points[0];
    let mut chosen = vec![0];
    let mut basis: Vec<Vec<f64>> = Vec::with_capacity(d);

    for _ in 0..d {
        let mut best: Option<(usize, Vec<f64>)> = None;
        let mut best_norm = PLANE_EPS;
        for (i, p) in points.iter().enumerate() {
            if chosen.contains(&i) {
                continue;
            }
            let mut residual: Vec<f64> = p.iter().zip(origin).map(|(a, b)| a - b).collect();
            for b in &basis {
                let projection = dot(&residual, b);
                residual.iter_mut().zip(b).for_each(|(r, bc)| *r -= projection * bc);
            }
            let length = norm(&residual);
            if length > best_norm {
                best_norm = length;
                residual.iter_mut().for_each(|r| *r /= length);
                best = Some((i, residual));
            }
        }
        let (index, direction) = best.ok_or(HullError::Degenerate)?;
        chosen.push(index);
        basis.push(direction);
    }

    Ok(chosen)
}

/// Convex hull facets of `points` (all rows share one dimension `D >= 2`).
pub fn convex_hull(points: &[Vec<f64>]) -> Result<Vec<Facet>, HullError> {
    let m = points.len();
    let d = points.first().map_or(0, Vec::len);
    if m < d + 1 || d < 2 {
        return Err(HullError::TooFewPoints { points: m, dim: d });
    }
    if points.iter().flatten().any(|c| !c.is_finite()) {
        return Err(HullError::NonFinite);
    }

    let simplex = initial_simplex(points)?;
    let interior: Vec<f64> = (0..d)
        .map(|c| simplex.iter().map(|&i| points[i][c]).sum::<f64>() / (d + 1) as f64)
        .collect();

    let mut facets = Vec::with_capacity(2 * m);
    for &left_out in &simplex {
        let vertices = simplex.iter().copied().filter(|&v| v != left_out).collect();
        facets.push(Facet::through(points, vertices, &interior)?);
    }

    for p in 0..m {
        if simplex.contains(&p) {
            continue;
        }
        let (visible, hidden): (Vec<Facet>, Vec<Facet>) = facets
            .into_iter()
            .partition(|f| f.distance(&points[p]) > PLANE_EPS);
        facets = hidden;
        if visible.is_empty() {
            continue;
        }

        // Ridges seen once among the visible facets form the horizon
        let mut ridge_count: HashMap<Vec<usize>, usize> = HashMap::new();
        for facet in &visible {
            for ridge in ridges(&facet.vertices) {
                *ridge_count.entry(ridge).or_insert(0) += 1;
            }
        }
        for facet in &visible {
            for ridge in ridges(&facet.vertices) {
                if ridge_count[&ridge] == 1 {
                    let mut vertices = ridge;
                    vertices.push(p);
                    facets.push(Facet::through(points, vertices, &interior)?);
                }
            }
        }
    }

    Ok(facets)
}

/// All `D - 1` vertex subsets of a facet
fn ridges(vertices: &[usize]) -> impl Iterator<Item = Vec<usize>> + '_ {
    (0..vertices.len()).map(move |skip| {
        vertices
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != skip)
            .map(|(_, &v)| v)
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn octahedron() -> Vec<Vec<f64>> {
        vec![
            vec![1.0, 0.0, 0.0],
            vec![-1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, -1.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![0.0, 0.0, -1.0],
        ]
    }

    #[test]
    fn octahedron_has_eight_facets() {
        let facets = convex_hull(&octahedron()).unwrap();
        assert_eq!(facets.len(), 8);
        for facet in &facets {
            assert_eq!(facet.vertices.len(), 3);
            // Every facet plane is at distance 1/sqrt(3) from the origin
            assert!((facet.offset - 1.0 / 3f64.sqrt()).abs() < 1e-12);
        }
    }

    #[test]
    fn facet_normal_points_away_from_interior() {
        let points = vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]];
        let facet = Facet::through(&points, vec![2, 0, 1], &[0.0, 0.0, 0.0]).unwrap();
        let expected = 1.0 / 3f64.sqrt();
        assert_eq!(facet.vertices, vec![0, 1, 2]);
        assert!(facet.normal.iter().all(|c| (c - expected).abs() < 1e-12));
        assert!((facet.offset - expected).abs() < 1e-12);
    }

    #[test]
    fn interior_points_are_dropped() {
        let mut points = octahedron();
        points.push(vec![0.1, 0.1, 0.1]);
        points.push(vec![0.0, 0.0, 0.0]);
        let facets = convex_hull(&points).unwrap();
        assert_eq!(facets.len(), 8);
        assert!(facets.iter().all(|f| f.vertices.iter().all(|&v| v < 6)));
    }

    #[test]
    fn cube_with_center_triangulates_faces() {
        let mut points = Vec::new();
        for x in [0.0, 1.0] {
            for y in [0.0, 1.0] {
                for z in [0.0, 1.0] {
                    points.push(vec![x, y, z]);
                }
            }
        }
        points.push(vec![0.5, 0.5, 0.5]);
        let facets = convex_hull(&points).unwrap();
        assert_eq!(facets.len(), 12);
    }

    #[test]
    fn four_dimensional_simplex() {
        let points = vec![
            vec![0.0, 0.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0, 0.0],
            vec![0.0, 0.0, 0.0, 1.0],
        ];
        assert_eq!(convex_hull(&points).unwrap().len(), 5);
    }

    #[test]
    fn coplanar_points_are_degenerate() {
        let points = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![-1.0, 0.0, 0.0],
            vec![0.0, -1.0, 0.0],
        ];
        assert_eq!(convex_hull(&points).unwrap_err(), HullError::Degenerate);
    }

    #[test]
    fn too_few_points() {
        let points = vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]];
        assert!(matches!(
            convex_hull(&points),
            Err(HullError::TooFewPoints { points: 3, dim: 3 })
        ));
    }
}
