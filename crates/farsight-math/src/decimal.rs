//! Decimal precision policy.
//!
//! Layout of the policy:
//! - add / sub / mul: exact, unbounded precision
//! - div / sqrt: rounded half-up to [`DIVISION_SCALE`] fractional digits
//! - trigonometry: evaluated in `f64`, converted back at [`DIVISION_SCALE`]

use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive, Zero};

use crate::MathError;

/// Arbitrary-precision decimal used for every spatial component.
pub type Decimal = BigDecimal;

/// Fractional digits kept by every division and square root.
pub const DIVISION_SCALE: i64 = 10;

/// τ = 2π to 37 fractional digits (well beyond a 128-bit decimal context).
const TAU_DIGITS: u128 = 62_831_853_071_795_864_769_252_867_665_590_057_684;
const TAU_SCALE: i64 = 37;

/// Decimal from a whole number.
pub fn dec(value: i64) -> Decimal {
    Decimal::from(value)
}

/// High-precision τ (one full turn in radians).
pub fn tau() -> Decimal {
    Decimal::new(BigInt::from(TAU_DIGITS), TAU_SCALE)
}

/// Divide with an explicit scale and rounding mode.
fn div_with(
    lhs: &Decimal,
    rhs: &Decimal,
    scale: i64,
    mode: RoundingMode,
) -> Result<Decimal, MathError> {
    if rhs.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    Ok((lhs / rhs).with_scale_round(scale, mode))
}

/// `lhs / rhs`, rounded half-up to [`DIVISION_SCALE`] fractional digits.
pub fn div_round(lhs: &Decimal, rhs: &Decimal) -> Result<Decimal, MathError> {
    div_with(lhs, rhs, DIVISION_SCALE, RoundingMode::HalfUp)
}

/// `lhs / rhs`, rounded half-up to an explicit number of fractional digits.
///
/// For unit conversions whose results sit far below the division scale.
pub fn div_round_to(lhs: &Decimal, rhs: &Decimal, scale: i64) -> Result<Decimal, MathError> {
    div_with(lhs, rhs, scale, RoundingMode::HalfUp)
}

/// Square root, rounded half-up to [`DIVISION_SCALE`] fractional digits.
pub fn sqrt_round(value: &Decimal) -> Result<Decimal, MathError> {
    if value.is_zero() {
        return Ok(Decimal::zero());
    }
    value
        .sqrt()
        .map(|root| root.with_scale_round(DIVISION_SCALE, RoundingMode::HalfUp))
        .ok_or_else(|| MathError::NegativeSqrt(value.to_string()))
}

/// Convert a finite `f64` into a decimal at [`DIVISION_SCALE`].
pub fn decimal_from_f64(value: f64) -> Result<Decimal, MathError> {
    if !value.is_finite() {
        return Err(MathError::NonFinite(value));
    }
    Decimal::from_f64(value)
        .map(|d| d.with_scale_round(DIVISION_SCALE, RoundingMode::HalfUp))
        .ok_or(MathError::NonFinite(value))
}

/// Lossy conversion to `f64` for trigonometry and presentation.
///
/// Values that cannot be represented come back as NaN.
pub fn decimal_to_f64(value: &Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Normalize an angle in radians into `[0, τ)`.
pub fn wrap_angle(angle: &Decimal) -> Decimal {
    let tau = tau();
    let zero = Decimal::zero();
    if *angle >= zero && *angle < tau {
        return angle.clone();
    }

    // tau is never zero, so the floor division cannot fail.
    let turns = div_with(angle, &tau, 0, RoundingMode::Floor).unwrap_or_default();
    let mut wrapped = angle - &(&turns * &tau);

    // The quotient is computed to finite precision; nudge across the seam.
    if wrapped < zero {
        wrapped = &wrapped + &tau;
    }
    if wrapped >= tau {
        wrapped = &wrapped - &tau;
    }
    wrapped
}
