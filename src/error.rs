//! Error types for dualmesh.
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during triangulation and mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The orientation predicate's fast path is inconclusive.
    ///
    /// The magnitude of the determinant is not provably larger than the
    /// floating-point error bound, so its sign cannot be trusted. No
    /// adaptive-precision fallback is implemented; near-degenerate inputs
    /// surface as this error instead of a silently wrong sign.
    #[error("orientation test is inconclusive (det = {det:e}, error bound = {bound:e}): input is near-degenerate")]
    AmbiguousOrientation {
        /// The computed determinant (twice the signed triangle area).
        det: f64,
        /// The error bound the determinant failed to clear.
        bound: f64,
    },

    /// The half-edge arrays violate a structural invariant.
    #[error("invalid mesh topology: {details}")]
    InvalidTopology {
        /// Description of the violated invariant.
        details: String,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a mesh interchange file.
    #[error("failed to parse mesh file at line {line}: {message}")]
    Parse {
        /// The 1-based line number where parsing failed.
        line: usize,
        /// Error message.
        message: String,
    },
}

impl MeshError {
    /// Create an invalid topology error.
    pub fn invalid_topology<S: Into<String>>(details: S) -> Self {
        MeshError::InvalidTopology {
            details: details.into(),
        }
    }
}
