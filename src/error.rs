use thiserror::Error;

/// Errors reported at the public API boundary.
///
/// Every variant is a precondition violation: the operation is rejected
/// before any weight is modified.
#[derive(Debug, Error)]
pub enum NetError {
    /// A vector's length disagrees with the width the receiver expects.
    #[error("shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("invalid hyperparameter: {0}")]
    InvalidHyperparameter(String),

    /// A weighted sum evaluated to NaN, so no activation can be produced.
    #[error("numeric overflow: {0}")]
    NumericOverflow(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetError>;

/// Fails with `ShapeMismatch` unless `actual == expected`.
pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(NetError::ShapeMismatch { what, expected, actual })
    }
}
