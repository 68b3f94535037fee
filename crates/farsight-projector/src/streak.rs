//! Hyperspace streak geometry.

use farsight_math::Vector;
use glam::DVec3;

/// Unit direction from a horizontal (yaw-style) and vertical (pitch-style) angle.
///
/// Inverse of [`Vector::horizontal_angle`] / [`Vector::vertical_angle`].
pub fn direction_from_angles(horizontal: f64, vertical: f64) -> DVec3 {
    let (sin_h, cos_h) = horizontal.sin_cos();
    let (sin_v, cos_v) = vertical.sin_cos();
    DVec3::new(sin_h * cos_v, sin_v, cos_h * cos_v)
}

/// Direction of travel reconstructed from the velocity's angle decomposition.
pub fn streak_direction(velocity: &Vector) -> DVec3 {
    direction_from_angles(velocity.horizontal_angle(), velocity.vertical_angle())
}

/// Offsets of `count` streak points spread over `length` along `direction`,
/// starting at zero.
pub(crate) fn streak_offsets(
    direction: DVec3,
    length: f64,
    count: usize,
) -> impl Iterator<Item = DVec3> {
    let count = count.max(1);
    (0..count).map(move |i| direction * (length * i as f64 / count as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use farsight_math::{Spatial, dec};

    #[test]
    fn test_direction_reconstructs_velocity() {
        let velocity = Vector::new(dec(-51_000_000), dec(2_000_000), dec(7_000_000));
        let expected = velocity.to_dvec3().normalize();
        let actual = streak_direction(&velocity);
        assert!((actual - expected).length() < 1e-12);
    }

    #[test]
    fn test_axis_directions() {
        assert!((direction_from_angles(0.0, 0.0) - DVec3::Z).length() < 1e-12);
        let up = direction_from_angles(0.0, std::f64::consts::FRAC_PI_2);
        assert!((up - DVec3::Y).length() < 1e-12);
    }

    #[test]
    fn test_offsets_are_evenly_spaced() {
        let offsets: Vec<_> = streak_offsets(DVec3::X, 10.0, 4).collect();
        assert_eq!(
            offsets,
            vec![
                DVec3::ZERO,
                DVec3::new(2.5, 0.0, 0.0),
                DVec3::new(5.0, 0.0, 0.0),
                DVec3::new(7.5, 0.0, 0.0),
            ]
        );
    }
}
