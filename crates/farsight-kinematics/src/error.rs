//! Kinematics error types.

use farsight_math::MathError;

/// Errors raised while integrating a body or applying a force effect.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KinematicsError {
    /// The configured tick period was zero.
    #[error("tick period must be non-zero")]
    ZeroPeriod,

    /// Decimal arithmetic failed.
    #[error("arithmetic error: {0}")]
    Math(#[from] MathError),
}
