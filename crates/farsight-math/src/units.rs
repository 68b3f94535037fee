//! Distance and speed units.
//!
//! Spatial components are plain meters. Light-years only appear at the edges:
//! sector radii, star-field extents, and log output.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::{Decimal, MathError, dec, decimal_from_f64, decimal_to_f64, div_round_to};

/// 1 light-year = 9,460,730,472,580,800 meters (IAU definition, exact).
pub const METERS_PER_LIGHT_YEAR: i64 = 9_460_730_472_580_800;

/// 1 Astronomical Unit = 149,597,870,700 meters (IAU 2012, exact).
const METERS_PER_AU: i64 = 149_597_870_700;

/// Speed of light in vacuum, meters per second (exact).
pub const SPEED_OF_LIGHT_M_S: i64 = 299_792_458;

/// Fractional digits kept when converting meters back to light-years.
const LIGHT_YEAR_SCALE: i64 = 34;

/// A distance measured in light-years.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LightYears(Decimal);

impl LightYears {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Whole light-years.
    pub fn whole(value: i64) -> Self {
        Self(dec(value))
    }

    pub fn from_f64(value: f64) -> Result<Self, MathError> {
        decimal_from_f64(value).map(Self)
    }

    pub fn value(&self) -> &Decimal {
        &self.0
    }

    /// Exact conversion to meters.
    pub fn to_meters(&self) -> Decimal {
        &self.0 * &dec(METERS_PER_LIGHT_YEAR)
    }

    /// Convert meters to light-years, rounded half-up at 34 fractional digits.
    pub fn from_meters(meters: &Decimal) -> Self {
        // The divisor is a non-zero constant.
        Self(div_round_to(meters, &dec(METERS_PER_LIGHT_YEAR), LIGHT_YEAR_SCALE).unwrap_or_default())
    }

    /// Whole meters, truncated toward zero, for integer universe coordinates.
    pub fn to_whole_meters(&self) -> BigInt {
        let (digits, _) = self.to_meters().with_scale(0).into_bigint_and_exponent();
        digits
    }
}

/// Format a distance in meters as a human-readable string,
/// automatically choosing the most appropriate unit.
///
/// Examples:
/// - 0.5 -> "0.500 m"
/// - 5000 -> "5.000 km"
/// - 2e11 -> "1.337 AU"
/// - 1e16 -> "1.057 ly"
pub fn format_distance(meters: &Decimal) -> String {
    let sign = if meters.is_negative() { "-" } else { "" };
    let abs = meters.abs();

    if abs >= dec(METERS_PER_LIGHT_YEAR) {
        let ly = LightYears::from_meters(&abs);
        format!("{}{:.3} ly", sign, decimal_to_f64(ly.value()))
    } else if abs >= dec(METERS_PER_AU) {
        format!("{}{:.3} AU", sign, decimal_to_f64(&abs) / METERS_PER_AU as f64)
    } else if abs >= dec(1_000) {
        format!("{}{:.3} km", sign, decimal_to_f64(&abs) / 1_000.0)
    } else if abs.is_zero() {
        "0 m".to_string()
    } else {
        format!("{}{:.3} m", sign, decimal_to_f64(&abs))
    }
}
