//! Arithmetic error types.

/// Errors raised by decimal and spatial arithmetic.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MathError {
    /// A division had a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// A square root was requested for a negative value.
    #[error("square root of negative value {0}")]
    NegativeSqrt(String),

    /// A floating-point intermediate (trigonometry, conversion) was NaN or infinite.
    #[error("non-finite floating-point value: {0}")]
    NonFinite(f64),
}
