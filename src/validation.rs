//! Precondition checks shared by the pipeline stages

use crate::error::{CdcError, Result};
use ndarray::ArrayView2;

/// Validate the point matrix: at least two points, at least two dimensions,
/// every coordinate finite.
pub fn validate_points(points: ArrayView2<'_, f64>) -> Result<()> {
    let (n, d) = points.dim();
    validate_point_count(n)?;
    if n < 2 {
        return Err(CdcError::invalid_argument(
            "points",
            format!("at least 2 points are required, got {n}"),
        ));
    }
    if d < 2 {
        return Err(CdcError::invalid_argument(
            "points",
            format!("points must have at least 2 dimensions, got {d}"),
        ));
    }
    if let Some(((row, col), value)) = points.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(CdcError::invalid_argument(
            "points",
            format!("coordinate ({row}, {col}) is not finite: {value}"),
        ));
    }
    Ok(())
}

/// Validate that every point index fits the `u32` neighbor tables.
pub fn validate_point_count(n_points: usize) -> Result<()> {
    if u32::try_from(n_points).is_err() {
        return Err(CdcError::invalid_argument(
            "points",
            format!("at most {} points are supported, got {n_points}", u32::MAX),
        ));
    }
    Ok(())
}

/// Validate the neighbor count against the number of points.
pub fn validate_k(k: usize, n_points: usize) -> Result<()> {
    if k == 0 {
        return Err(CdcError::invalid_argument("k", "k must be greater than 0"));
    }
    if k >= n_points {
        return Err(CdcError::invalid_argument(
            "k",
            format!("k={k} requires at least {} points, got {n_points}", k + 1),
        ));
    }
    Ok(())
}

/// Validate the threshold ratio (open interval `(0, 1)`).
pub fn validate_ratio(ratio: f64) -> Result<()> {
    if !(ratio > 0.0 && ratio < 1.0) {
        return Err(CdcError::invalid_argument(
            "ratio",
            format!("ratio must lie strictly between 0 and 1, got {ratio}"),
        ));
    }
    Ok(())
}
