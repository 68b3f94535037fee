//! Unbounded integer coordinates between sectors.

use std::fmt;

use farsight_math::{Decimal, LightYears, sqrt_round};
use num_bigint::BigInt;
use num_traits::Zero;

/// A sector's position in the universe, in whole meters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct UniverseCoordinate {
    pub x: BigInt,
    pub y: BigInt,
    pub z: BigInt,
}

impl UniverseCoordinate {
    pub fn new(x: impl Into<BigInt>, y: impl Into<BigInt>, z: impl Into<BigInt>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            z: z.into(),
        }
    }

    /// The universe origin, home of the empty-space sector.
    pub fn origin() -> Self {
        Self::new(BigInt::zero(), BigInt::zero(), BigInt::zero())
    }

    /// Whole-meter coordinate from light-year components, truncated toward zero.
    pub fn from_light_years(x: &LightYears, y: &LightYears, z: &LightYears) -> Self {
        Self::new(x.to_whole_meters(), y.to_whole_meters(), z.to_whole_meters())
    }

    /// Exact sum of squared component differences.
    pub fn distance_squared(&self, other: &UniverseCoordinate) -> BigInt {
        let dx = &self.x - &other.x;
        let dy = &self.y - &other.y;
        let dz = &self.z - &other.z;
        &dx * &dx + &dy * &dy + &dz * &dz
    }

    /// Euclidean distance in meters.
    ///
    /// The sum of squares is computed in exact integers; only the final square
    /// root rounds (half-up at the division scale).
    pub fn distance_to(&self, other: &UniverseCoordinate) -> Decimal {
        let squared = Decimal::new(self.distance_squared(other), 0);
        // A sum of squares is never negative.
        sqrt_round(&squared).unwrap_or_default()
    }
}

impl fmt::Display for UniverseCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
