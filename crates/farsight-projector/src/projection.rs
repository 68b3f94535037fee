//! Radial sphere projection and orientation compensation.

use farsight_math::{Decimal, MathError, Point, Spatial, decimal_to_f64, wrap_angle};
use glam::DVec3;
use num_traits::Zero;

/// Scale `v` onto the sphere of `radius` around the origin: `v · R / |v|`.
///
/// Returns `None` for a zero-length input.
pub fn project_radial<S: Spatial>(v: &S, radius: &Decimal) -> Result<Option<S>, MathError> {
    let length = v.length();
    if length.is_zero() {
        return Ok(None);
    }
    v.scale(radius).div_scalar(&length).map(Some)
}

/// `f64` counterpart of [`project_radial`] for per-sample work.
///
/// Returns `None` for zero-length or non-finite input.
pub fn project_radial_f64(v: DVec3, radius: f64) -> Option<DVec3> {
    let length = v.length();
    if length == 0.0 || !length.is_finite() {
        return None;
    }
    Some(v * (radius / length))
}

/// Inverse of an observer orientation, applied as yaw, then pitch, then roll.
///
/// Each step is a plain 2D rotation on one axis pair:
///
/// | step  | plane | axis       |
/// |-------|-------|------------|
/// | yaw   | x/z   | vertical   |
/// | pitch | y/z   | lateral    |
/// | roll  | x/y   | forward    |
///
/// After compensation the observer's forward direction lies on -Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Compensation {
    yaw: (f64, f64),
    pitch: (f64, f64),
    roll: (f64, f64),
}

impl Compensation {
    /// No rotation.
    pub const IDENTITY: Self = Self {
        yaw: (0.0, 1.0),
        pitch: (0.0, 1.0),
        roll: (0.0, 1.0),
    };

    /// Precompute sines and cosines for an Euler orientation
    /// (x = pitch, y = yaw, z = roll). Angles are wrapped first.
    pub fn from_orientation(orientation: &Point) -> Self {
        let angle = |a: &Decimal| decimal_to_f64(&wrap_angle(a)).sin_cos();
        Self {
            yaw: angle(&orientation.y),
            pitch: angle(&orientation.x),
            roll: angle(&orientation.z),
        }
    }

    pub fn apply(&self, v: DVec3) -> DVec3 {
        let (sin_yaw, cos_yaw) = self.yaw;
        let x = v.x * cos_yaw - v.z * sin_yaw;
        let z = v.x * sin_yaw + v.z * cos_yaw;

        let (sin_pitch, cos_pitch) = self.pitch;
        let y = v.y * cos_pitch + z * sin_pitch;
        let z = -v.y * sin_pitch + z * cos_pitch;

        let (sin_roll, cos_roll) = self.roll;
        let rolled_x = x * cos_roll - y * sin_roll;
        let rolled_y = x * sin_roll + y * cos_roll;

        DVec3::new(rolled_x, rolled_y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farsight_math::{Vector, dec};
    use std::f64::consts::{FRAC_PI_2, PI};
    use std::str::FromStr;

    fn relative_error(actual: f64, expected: f64) -> f64 {
        ((actual - expected) / expected).abs()
    }

    #[test]
    fn test_projected_length_equals_radius() {
        let radius = dec(50);
        let inputs = [
            Point::new(dec(3), dec(4), dec(12)),
            Point::new(dec(-84_400_000), dec(0), dec(0)),
            Point::new(dec(1), dec(-1), dec(1)),
            Point::new(
                Decimal::from_str("-9460730472580800.123").unwrap(),
                Decimal::from_str("123456789.5").unwrap(),
                Decimal::from_str("0.0001").unwrap(),
            ),
        ];
        for v in &inputs {
            let projected = project_radial(v, &radius).unwrap().unwrap();
            let length = decimal_to_f64(&projected.length());
            assert!(relative_error(length, 50.0) < 1e-9, "{v} -> {length}");
        }
    }

    #[test]
    fn test_projection_of_vector_keeps_type() {
        let v = Vector::new(dec(0), dec(0), dec(-2));
        let projected: Vector = project_radial(&v, &dec(10)).unwrap().unwrap();
        assert_eq!(projected, Vector::new(dec(0), dec(0), dec(-10)));
    }

    #[test]
    fn test_projection_of_zero_is_none() {
        assert_eq!(project_radial(&Point::zero(), &dec(50)).unwrap(), None);
        assert_eq!(project_radial_f64(DVec3::ZERO, 50.0), None);
    }

    #[test]
    fn test_projected_length_equals_radius_f64() {
        for v in [
            DVec3::new(1e-6, 0.0, 0.0),
            DVec3::new(3.0, -4.0, 5.0),
            DVec3::new(9.46e15, 1.0, -2.0e12),
        ] {
            let projected = project_radial_f64(v, 50.0).unwrap();
            assert!(relative_error(projected.length(), 50.0) < 1e-9);
        }
    }

    #[test]
    fn test_identity_compensation_at_zero_orientation() {
        let c = Compensation::from_orientation(&Point::zero());
        let v = DVec3::new(1.0, 2.0, 3.0);
        assert!((c.apply(v) - v).length() < 1e-12);
        assert!((Compensation::IDENTITY.apply(v) - v).length() < 1e-12);
    }

    #[test]
    fn test_forward_maps_to_negative_z() {
        let (pitch, yaw) = (0.35_f64, 2.1_f64);
        let forward = DVec3::new(
            -yaw.sin() * pitch.cos(),
            pitch.sin(),
            -yaw.cos() * pitch.cos(),
        );
        let c = Compensation::from_orientation(&Point::from_f64s(pitch, yaw, 0.0).unwrap());
        let local = c.apply(forward);
        assert!((local - DVec3::NEG_Z).length() < 1e-9, "{local:?}");
    }

    #[test]
    fn test_half_turn_yaw_flips_behind_to_ahead() {
        let c = Compensation::from_orientation(&Point::from_f64s(0.0, PI, 0.0).unwrap());
        let local = c.apply(DVec3::new(0.0, 0.0, 10.0));
        assert!((local - DVec3::new(0.0, 0.0, -10.0)).length() < 1e-8);
    }

    #[test]
    fn test_roll_rotates_in_screen_plane() {
        let c = Compensation::from_orientation(&Point::from_f64s(0.0, 0.0, FRAC_PI_2).unwrap());
        let local = c.apply(DVec3::X);
        assert!((local - DVec3::Y).length() < 1e-9);
    }

    #[test]
    fn test_compensation_preserves_length() {
        let c = Compensation::from_orientation(&Point::from_f64s(1.0, 2.0, 3.0).unwrap());
        let v = DVec3::new(-7.0, 11.0, 0.5);
        assert!((c.apply(v).length() - v.length()).abs() < 1e-9);
    }
}
