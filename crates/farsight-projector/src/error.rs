//! Projection error types.

use farsight_math::MathError;

/// Errors raised while projecting one body.
///
/// A zero observer-to-body distance is not an error; the body is simply not
/// drawn that frame.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    /// Decimal arithmetic failed.
    #[error("arithmetic error: {0}")]
    Math(#[from] MathError),

    /// A floating-point stage produced NaN or infinity.
    #[error("non-finite value while computing {0}")]
    NonFinite(&'static str),
}
