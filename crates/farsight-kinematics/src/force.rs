//! Timed force effects.
//!
//! A force effect adds a contribution to a body's acceleration and remembers
//! exactly what it added. Removing it subtracts that record, never a value
//! recomputed from the body's current orientation, so net acceleration always
//! returns to its pre-effect value.

use farsight_math::{Decimal, MathError, Point, Spatial, Vector, decimal_to_f64, wrap_angle};

/// Identifies one active force effect on a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ForceId(pub(crate) u64);

impl ForceId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// How a thrust contribution follows the body's orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThrustMode {
    /// Direction is fixed at activation.
    #[default]
    Fixed,
    /// Direction is recomputed from the current orientation every tick.
    Tracking,
}

/// Bookkeeping for one active force effect.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ForceRecord {
    pub magnitude: Decimal,
    pub mode: ThrustMode,
    /// Exactly what is currently folded into the body's acceleration.
    pub contribution: Vector,
}

/// Forward unit direction for an orientation (x = pitch, y = yaw, z = roll).
///
/// At zero orientation forward is -Z. Positive yaw turns toward -X and positive
/// pitch raises the nose toward +Y. Roll does not change the forward axis.
pub fn thrust_direction(orientation: &Point) -> Result<Vector, MathError> {
    let pitch = decimal_to_f64(&wrap_angle(&orientation.x));
    let yaw = decimal_to_f64(&wrap_angle(&orientation.y));

    let (sin_pitch, cos_pitch) = pitch.sin_cos();
    let (sin_yaw, cos_yaw) = yaw.sin_cos();

    Vector::from_f64s(-sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
}

/// Acceleration contribution of a thrust of `magnitude` at `orientation`.
pub(crate) fn thrust_contribution(
    magnitude: &Decimal,
    orientation: &Point,
) -> Result<Vector, MathError> {
    Ok(thrust_direction(orientation)?.scale(magnitude))
}
