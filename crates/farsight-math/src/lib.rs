//! Decimal precision policy, `Point`/`Vector` spatial types, and distance units for Farsight.
//!
//! All spatial state is carried as arbitrary-precision decimals so results are
//! reproducible bit-for-bit regardless of platform. Addition, subtraction and
//! multiplication are exact; every division and square root rounds half-up to
//! [`DIVISION_SCALE`] fractional digits.

mod decimal;
mod error;
mod spatial;
mod units;

pub use decimal::{
    DIVISION_SCALE, Decimal, dec, decimal_from_f64, decimal_to_f64, div_round, div_round_to,
    sqrt_round, tau, wrap_angle,
};
pub use error::MathError;
pub use spatial::{Combine, Point, Spatial, Vector};
pub use units::{LightYears, METERS_PER_LIGHT_YEAR, SPEED_OF_LIGHT_M_S, format_distance};
