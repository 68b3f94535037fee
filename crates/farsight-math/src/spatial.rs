//! `Point` and `Vector`: the two decimal 3D value types.
//!
//! Both share the [`Spatial`] arithmetic contract but stay distinct types, so a
//! position can never be used where a rate of change is expected. Operand
//! combinations are restricted by [`Combine`]:
//!
//! | lhs      | rhs      | result   |
//! |----------|----------|----------|
//! | `Point`  | `Point`  | `Point`  |
//! | `Point`  | `Vector` | `Point`  |
//! | `Vector` | `Vector` | `Vector` |

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use glam::DVec3;
use num_traits::Zero;

use crate::{Decimal, MathError, decimal_from_f64, decimal_to_f64, div_round, sqrt_round};

/// Shared component-wise arithmetic for [`Point`] and [`Vector`].
pub trait Spatial: Sized + Clone {
    /// Build a value from its three components.
    fn from_components(x: Decimal, y: Decimal, z: Decimal) -> Self;

    /// X component.
    fn x(&self) -> &Decimal;

    /// Y component.
    fn y(&self) -> &Decimal;

    /// Z component.
    fn z(&self) -> &Decimal;

    /// The zero value.
    fn zero() -> Self {
        Self::from_components(Decimal::zero(), Decimal::zero(), Decimal::zero())
    }

    /// Build from `f64` components, rounded to the division scale.
    fn from_f64s(x: f64, y: f64, z: f64) -> Result<Self, MathError> {
        Ok(Self::from_components(
            decimal_from_f64(x)?,
            decimal_from_f64(y)?,
            decimal_from_f64(z)?,
        ))
    }

    /// Returns `true` when all three components are zero.
    fn is_zero(&self) -> bool {
        self.x().is_zero() && self.y().is_zero() && self.z().is_zero()
    }

    /// Component-wise sum with another spatial value.
    fn add_each<R: Spatial>(&self, rhs: &R) -> Self
    where
        Self: Combine<R>,
    {
        self.add_xyz(rhs.x(), rhs.y(), rhs.z())
    }

    /// Component-wise difference with another spatial value.
    fn sub_each<R: Spatial>(&self, rhs: &R) -> Self
    where
        Self: Combine<R>,
    {
        self.sub_xyz(rhs.x(), rhs.y(), rhs.z())
    }

    /// Component-wise product with another spatial value.
    fn mul_each<R: Spatial>(&self, rhs: &R) -> Self
    where
        Self: Combine<R>,
    {
        self.mul_xyz(rhs.x(), rhs.y(), rhs.z())
    }

    /// Component-wise quotient with another spatial value.
    fn div_each<R: Spatial>(&self, rhs: &R) -> Result<Self, MathError>
    where
        Self: Combine<R>,
    {
        self.div_xyz(rhs.x(), rhs.y(), rhs.z())
    }

    /// Add a component triple.
    fn add_xyz(&self, x: &Decimal, y: &Decimal, z: &Decimal) -> Self {
        Self::from_components(self.x() + x, self.y() + y, self.z() + z)
    }

    /// Subtract a component triple.
    fn sub_xyz(&self, x: &Decimal, y: &Decimal, z: &Decimal) -> Self {
        Self::from_components(self.x() - x, self.y() - y, self.z() - z)
    }

    /// Multiply by a component triple.
    fn mul_xyz(&self, x: &Decimal, y: &Decimal, z: &Decimal) -> Self {
        Self::from_components(self.x() * x, self.y() * y, self.z() * z)
    }

    /// Divide by a component triple, rounding each quotient half-up.
    fn div_xyz(&self, x: &Decimal, y: &Decimal, z: &Decimal) -> Result<Self, MathError> {
        Ok(Self::from_components(
            div_round(self.x(), x)?,
            div_round(self.y(), y)?,
            div_round(self.z(), z)?,
        ))
    }

    /// Multiply every component by a scalar.
    fn scale(&self, factor: &Decimal) -> Self {
        self.mul_xyz(factor, factor, factor)
    }

    /// Divide every component by a scalar, rounding half-up.
    fn div_scalar(&self, divisor: &Decimal) -> Result<Self, MathError> {
        self.div_xyz(divisor, divisor, divisor)
    }

    /// Flip the sign of every component.
    fn negate(&self) -> Self {
        Self::from_components(-self.x(), -self.y(), -self.z())
    }

    /// x² + y² + z², exact.
    fn length_squared(&self) -> Decimal {
        self.x() * self.x() + self.y() * self.y() + self.z() * self.z()
    }

    /// Euclidean length via the rounded decimal square root.
    fn length(&self) -> Decimal {
        // A sum of squares is never negative.
        sqrt_round(&self.length_squared()).unwrap_or_default()
    }

    /// Unit-length copy. The zero value (or one too small to have a length at
    /// the division scale) normalizes to zero.
    fn normalize(&self) -> Self {
        let length = self.length();
        if length.is_zero() {
            return Self::zero();
        }
        self.div_scalar(&length).unwrap_or_else(|_| Self::zero())
    }

    /// Copy with the x component replaced.
    fn with_x(&self, x: Decimal) -> Self {
        Self::from_components(x, self.y().clone(), self.z().clone())
    }

    /// Copy with the y component replaced.
    fn with_y(&self, y: Decimal) -> Self {
        Self::from_components(self.x().clone(), y, self.z().clone())
    }

    /// Copy with the z component replaced.
    fn with_z(&self, z: Decimal) -> Self {
        Self::from_components(self.x().clone(), self.y().clone(), z)
    }

    /// Lossy `f64` view for trigonometry and presentation.
    fn to_dvec3(&self) -> DVec3 {
        DVec3::new(
            decimal_to_f64(self.x()),
            decimal_to_f64(self.y()),
            decimal_to_f64(self.z()),
        )
    }
}

/// Marks which right-hand operand types a spatial value may be combined with.
pub trait Combine<Rhs: Spatial>: Spatial {}

impl Combine<Point> for Point {}
impl Combine<Vector> for Point {}
impl Combine<Vector> for Vector {}

/// An absolute or relative location, or an Euler orientation (x = pitch, y = yaw, z = roll).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: Decimal,
    pub y: Decimal,
    pub z: Decimal,
}

/// A rate of change: linear or angular velocity / acceleration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vector {
    pub x: Decimal,
    pub y: Decimal,
    pub z: Decimal,
}

impl Spatial for Point {
    fn from_components(x: Decimal, y: Decimal, z: Decimal) -> Self {
        Self { x, y, z }
    }

    fn x(&self) -> &Decimal {
        &self.x
    }

    fn y(&self) -> &Decimal {
        &self.y
    }

    fn z(&self) -> &Decimal {
        &self.z
    }
}

impl Spatial for Vector {
    fn from_components(x: Decimal, y: Decimal, z: Decimal) -> Self {
        Self { x, y, z }
    }

    fn x(&self) -> &Decimal {
        &self.x
    }

    fn y(&self) -> &Decimal {
        &self.y
    }

    fn z(&self) -> &Decimal {
        &self.z
    }
}

impl Point {
    /// Create a point from its components.
    pub fn new(x: Decimal, y: Decimal, z: Decimal) -> Self {
        Self { x, y, z }
    }

    /// Squared distance to another point, exact.
    pub fn distance_squared(&self, other: &Point) -> Decimal {
        self.sub_each(other).length_squared()
    }

    /// Distance to another point.
    pub fn distance(&self, other: &Point) -> Decimal {
        self.sub_each(other).length()
    }
}

impl Vector {
    /// Create a vector from its components.
    pub fn new(x: Decimal, y: Decimal, z: Decimal) -> Self {
        Self { x, y, z }
    }

    /// Dot product, exact.
    pub fn dot(&self, other: &Vector) -> Decimal {
        &self.x * &other.x + &self.y * &other.y + &self.z * &other.z
    }

    /// Scalar projection of `self` onto `other`; zero when `other` is zero.
    pub fn project_onto(&self, other: &Vector) -> Decimal {
        let length = other.length();
        if length.is_zero() {
            return Decimal::zero();
        }
        div_round(&self.dot(other), &length).unwrap_or_default()
    }

    /// Yaw-style heading in the horizontal (x/z) plane: `atan2(x, z)`.
    pub fn horizontal_angle(&self) -> f64 {
        if self.is_zero() {
            return 0.0;
        }
        let v = self.to_dvec3();
        v.x.atan2(v.z)
    }

    /// Pitch-style elevation above the horizontal plane: `atan2(y, sqrt(x² + z²))`.
    pub fn vertical_angle(&self) -> f64 {
        if self.is_zero() {
            return 0.0;
        }
        let v = self.to_dvec3();
        v.y.atan2(v.x.hypot(v.z))
    }

    /// Angle in the x/y plane: `atan2(y, x)`.
    pub fn theta(&self) -> f64 {
        if self.is_zero() {
            return 0.0;
        }
        let v = self.to_dvec3();
        v.y.atan2(v.x)
    }

    /// Angle in the x/z plane: `atan2(z, x)`.
    pub fn phi(&self) -> f64 {
        if self.is_zero() {
            return 0.0;
        }
        let v = self.to_dvec3();
        v.z.atan2(v.x)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({}, {}, {})", self.x, self.y, self.z)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Add<&Vector> for &Point {
    type Output = Point;

    fn add(self, rhs: &Vector) -> Point {
        self.add_each(rhs)
    }
}

impl Sub<&Vector> for &Point {
    type Output = Point;

    fn sub(self, rhs: &Vector) -> Point {
        self.sub_each(rhs)
    }
}

impl Add<&Point> for &Point {
    type Output = Point;

    fn add(self, rhs: &Point) -> Point {
        self.add_each(rhs)
    }
}

impl Sub<&Point> for &Point {
    type Output = Point;

    fn sub(self, rhs: &Point) -> Point {
        self.sub_each(rhs)
    }
}

impl Add<&Vector> for &Vector {
    type Output = Vector;

    fn add(self, rhs: &Vector) -> Vector {
        self.add_each(rhs)
    }
}

impl Sub<&Vector> for &Vector {
    type Output = Vector;

    fn sub(self, rhs: &Vector) -> Vector {
        self.sub_each(rhs)
    }
}

impl Mul<&Decimal> for &Point {
    type Output = Point;

    fn mul(self, rhs: &Decimal) -> Point {
        self.scale(rhs)
    }
}

impl Mul<&Decimal> for &Vector {
    type Output = Vector;

    fn mul(self, rhs: &Decimal) -> Vector {
        self.scale(rhs)
    }
}

impl Neg for &Point {
    type Output = Point;

    fn neg(self) -> Point {
        self.negate()
    }
}

impl Neg for &Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        self.negate()
    }
}
