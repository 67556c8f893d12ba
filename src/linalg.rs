//! Small dense linear algebra helpers
//!
//! The matrices involved are tiny (at most `D x D`), so Gaussian elimination
//! on an owned `Array2` is enough.

use ndarray::{Array2, ArrayView1, ArrayView2};

/// Squared Euclidean distance between two rows.
#[inline]
pub fn squared_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .fold(0.0, |acc, (x, y)| acc + (x - y) * (x - y))
}

/// Euclidean distance between two rows.
#[inline]
pub fn euclidean_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    squared_distance(a, b).sqrt()
}

/// Dot product of two equal-length slices.
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Euclidean length of a slice.
#[inline]
pub fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

/// Determinant of a square matrix by Gaussian elimination with partial pivoting.
///
/// Returns exactly 0.0 when a pivot column is entirely zero.
pub fn determinant(matrix: ArrayView2<'_, f64>) -> f64 {
    debug_assert!(matrix.is_square());
    let n = matrix.nrows();
    let mut m = matrix.to_owned();
    let mut det = 1.0;

    for col in 0..n {
        let mut pivot = col;
        for row in col + 1..n {
            if m[[row, col]].abs() > m[[pivot, col]].abs() {
                pivot = row;
            }
        }
        if m[[pivot, col]] == 0.0 {
            return 0.0;
        }
        if pivot != col {
            for c in 0..n {
                m.swap([pivot, c], [col, c]);
            }
            det = -det;
        }
        det *= m[[col, col]];

        for row in col + 1..n {
            let factor = m[[row, col]] / m[[col, col]];
            for c in col..n {
                m[[row, c]] -= factor * m[[col, c]];
            }
        }
    }

    det
}

/// Gram matrix `S * S^T` of the given rows.
pub fn gram(rows: &[&[f64]]) -> Array2<f64> {
    let n = rows.len();
    Array2::from_shape_fn((n, n), |(i, j)| dot(rows[i], rows[j]))
}
