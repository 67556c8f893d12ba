//! Error types for the CDC engine

use thiserror::Error;

/// Errors returned by CDC clustering.
#[derive(Debug, Error)]
pub enum CdcError {
    /// A parameter or the input point set violates a precondition.
    #[error("invalid argument `{arg}`: {reason}")]
    InvalidArgument { arg: &'static str, reason: String },

    /// The classification is degenerate (one of the classes is empty).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A post-condition of the cluster assignment did not hold.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),

    /// The worker pool for a parallel run could not be started.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CdcError>;

impl CdcError {
    pub(crate) fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        CdcError::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }
}
