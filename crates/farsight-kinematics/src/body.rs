//! Pose and motion state with the per-tick integration rule.

use std::collections::BTreeMap;
use std::time::Duration;

use farsight_math::{Combine, Decimal, Point, Spatial, Vector, dec, div_round, wrap_angle};
use num_bigint::BigInt;
use tracing::debug;

use crate::KinematicsError;
use crate::force::{ForceId, ForceRecord, ThrustMode, thrust_contribution};

/// Position, velocity, orientation and angular motion of one simulated entity.
///
/// Orientation is stored as Euler angles (x = pitch, y = yaw, z = roll), each
/// kept in `[0, τ)`.
///
/// The net acceleration is the base acceleration plus the recorded
/// contribution of every active force.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KinematicBody {
    position: Point,
    velocity: Vector,
    base_acceleration: Vector,
    acceleration: Vector,
    orientation: Point,
    angular_velocity: Vector,
    angular_acceleration: Vector,
    last_tick: Option<Duration>,
    forces: BTreeMap<ForceId, ForceRecord>,
    next_force_id: u64,
}

impl KinematicBody {
    /// A body at rest at `position`.
    pub fn at(position: Point) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Position in sector-relative meters.
    pub fn position(&self) -> &Point {
        &self.position
    }

    /// Linear velocity in m/s.
    pub fn velocity(&self) -> &Vector {
        &self.velocity
    }

    /// Net linear acceleration, force contributions included.
    pub fn acceleration(&self) -> &Vector {
        &self.acceleration
    }

    /// Linear acceleration excluding active force contributions.
    pub fn base_acceleration(&self) -> &Vector {
        &self.base_acceleration
    }

    /// Euler angles in radians (x = pitch, y = yaw, z = roll).
    pub fn orientation(&self) -> &Point {
        &self.orientation
    }

    /// Angular velocity in rad/s.
    pub fn angular_velocity(&self) -> &Vector {
        &self.angular_velocity
    }

    /// Angular acceleration in rad/s².
    pub fn angular_acceleration(&self) -> &Vector {
        &self.angular_acceleration
    }

    /// Timestamp of the last integration step, if any.
    pub fn last_tick(&self) -> Option<Duration> {
        self.last_tick
    }

    /// Move the body without integrating.
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Replace the linear velocity.
    pub fn set_velocity(&mut self, velocity: Vector) {
        self.velocity = velocity;
    }

    /// Replace the base acceleration.
    ///
    /// Active forces keep contributing on top of it, so removing one later
    /// still returns the net acceleration to the new base.
    pub fn set_acceleration(&mut self, acceleration: Vector) {
        self.base_acceleration = acceleration;
        self.resync_acceleration();
    }

    /// Replace the orientation; each angle is wrapped into `[0, τ)`.
    pub fn set_orientation(&mut self, orientation: Point) {
        self.orientation = wrap_orientation(&orientation);
    }

    /// Replace the angular velocity.
    pub fn set_angular_velocity(&mut self, angular_velocity: Vector) {
        self.angular_velocity = angular_velocity;
    }

    /// Replace the angular acceleration.
    pub fn set_angular_acceleration(&mut self, angular_acceleration: Vector) {
        self.angular_acceleration = angular_acceleration;
    }

    /// Mark `now` as the last tick without integrating.
    ///
    /// Used at scene start so the first real tick measures from the start time.
    pub fn stamp(&mut self, now: Duration) {
        self.last_tick = Some(now);
    }

    /// Advance the body to `now`.
    ///
    /// The elapsed time since the last tick is expressed as a fraction `f` of
    /// `period` (rounded half-up at the division scale); the first tick of an
    /// unstamped body uses `f = 1`. A `now` earlier than the last tick is a
    /// zero step and leaves the stamp where it was. With `a` held constant over the step:
    ///
    /// ```text
    /// v' = v + a·f
    /// p' = p + (v + v')/2 · f
    /// ```
    ///
    /// This is exact for constant acceleration, so one long tick equals any
    /// split of the same interval. Angular motion follows the same rule and the
    /// resulting orientation is wrapped.
    pub fn tick(&mut self, now: Duration, period: Duration) -> Result<(), KinematicsError> {
        if period.is_zero() {
            return Err(KinematicsError::ZeroPeriod);
        }

        self.retrack_forces()?;

        let factor = match self.last_tick {
            Some(last) => tick_factor(now.saturating_sub(last), period)?,
            None => dec(1),
        };

        let (position, velocity) =
            advance(&self.position, &self.velocity, &self.acceleration, &factor)?;
        self.position = position;
        self.velocity = velocity;

        let (orientation, angular_velocity) = advance(
            &self.orientation,
            &self.angular_velocity,
            &self.angular_acceleration,
            &factor,
        )?;
        self.orientation = wrap_orientation(&orientation);
        self.angular_velocity = angular_velocity;

        self.last_tick = Some(self.last_tick.map_or(now, |last| last.max(now)));
        Ok(())
    }

    /// Start a thrust of `magnitude` along the current forward direction.
    ///
    /// Returns the id under which the exact contribution is recorded.
    pub fn apply_thrust(
        &mut self,
        magnitude: Decimal,
        mode: ThrustMode,
    ) -> Result<ForceId, KinematicsError> {
        let contribution = thrust_contribution(&magnitude, &self.orientation)?;

        let id = ForceId(self.next_force_id);
        self.next_force_id += 1;
        debug!(force = id.raw(), ?mode, "Thrust applied: {}", contribution);

        self.forces.insert(
            id,
            ForceRecord {
                magnitude,
                mode,
                contribution,
            },
        );
        self.resync_acceleration();
        Ok(id)
    }

    /// Remove a force effect, subtracting exactly its recorded contribution.
    ///
    /// Returns `false` if the force was already removed.
    pub fn remove_force(&mut self, id: ForceId) -> bool {
        match self.forces.remove(&id) {
            Some(_) => {
                self.resync_acceleration();
                debug!(force = id.raw(), "Force removed");
                true
            }
            None => false,
        }
    }

    /// Whether a force effect is still active.
    pub fn has_force(&self, id: ForceId) -> bool {
        self.forces.contains_key(&id)
    }

    /// Number of active force effects.
    pub fn active_forces(&self) -> usize {
        self.forces.len()
    }

    /// Swap each tracking force's record for one computed from the current
    /// orientation.
    fn retrack_forces(&mut self) -> Result<(), KinematicsError> {
        let mut changed = false;
        for record in self.forces.values_mut() {
            if record.mode != ThrustMode::Tracking {
                continue;
            }
            record.contribution = thrust_contribution(&record.magnitude, &self.orientation)?;
            changed = true;
        }
        if changed {
            self.resync_acceleration();
        }
        Ok(())
    }

    fn resync_acceleration(&mut self) {
        self.acceleration = self
            .forces
            .values()
            .fold(self.base_acceleration.clone(), |net, record| {
                &net + &record.contribution
            });
    }
}

/// `elapsed / period` rounded half-up at the division scale.
fn tick_factor(elapsed: Duration, period: Duration) -> Result<Decimal, KinematicsError> {
    let elapsed = Decimal::new(BigInt::from(elapsed.as_nanos()), 0);
    let period = Decimal::new(BigInt::from(period.as_nanos()), 0);
    Ok(div_round(&elapsed, &period)?)
}

/// One constant-acceleration step for a (value, rate) pair.
fn advance<P>(
    value: &P,
    rate: &Vector,
    rate_of_rate: &Vector,
    factor: &Decimal,
) -> Result<(P, Vector), KinematicsError>
where
    P: Combine<Vector>,
{
    let next_rate = rate + &(rate_of_rate * factor);
    let mean_rate = (rate + &next_rate).div_scalar(&dec(2))?;
    let next_value = value.add_each(&(&mean_rate * factor));
    Ok((next_value, next_rate))
}

fn wrap_orientation(orientation: &Point) -> Point {
    Point::new(
        wrap_angle(&orientation.x),
        wrap_angle(&orientation.y),
        wrap_angle(&orientation.z),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use farsight_math::tau;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn accelerating_body() -> KinematicBody {
        let mut body = KinematicBody::at(Point::new(dec(10), dec(0), dec(-5)));
        body.set_velocity(Vector::new(dec(3), dec(-1), dec(0)));
        body.set_acceleration(Vector::new(dec(2), d("0.5"), dec(-4)));
        body.set_angular_velocity(Vector::new(d("0.01"), dec(0), dec(0)));
        body.set_angular_acceleration(Vector::new(d("0.002"), d("0.001"), dec(0)));
        body.stamp(ms(0));
        body
    }

    #[test]
    fn test_first_tick_uses_whole_period() {
        let mut body = KinematicBody::at(Point::zero());
        body.set_acceleration(Vector::new(dec(2), dec(0), dec(0)));
        body.tick(ms(1234), ms(40)).unwrap();

        assert_eq!(body.velocity(), &Vector::new(dec(2), dec(0), dec(0)));
        assert_eq!(body.position(), &Point::new(dec(1), dec(0), dec(0)));
        assert_eq!(body.last_tick(), Some(ms(1234)));
    }

    #[test]
    fn test_velocity_carries_position_at_nominal_period() {
        let mut body = KinematicBody::at(Point::zero());
        body.set_velocity(Vector::new(dec(0), dec(0), dec(-7)));
        body.stamp(ms(0));

        body.tick(ms(40), ms(40)).unwrap();
        body.tick(ms(80), ms(40)).unwrap();

        assert_eq!(body.position(), &Point::new(dec(0), dec(0), dec(-14)));
    }

    #[test]
    fn test_one_long_tick_equals_two_short_ticks() {
        let mut single = accelerating_body();
        single.tick(ms(100), ms(40)).unwrap();

        let mut split = accelerating_body();
        split.tick(ms(50), ms(40)).unwrap();
        split.tick(ms(100), ms(40)).unwrap();

        assert_eq!(single.position(), split.position());
        assert_eq!(single.velocity(), split.velocity());
        assert_eq!(single.orientation(), split.orientation());
        assert_eq!(single.angular_velocity(), split.angular_velocity());
    }

    #[test]
    fn test_partial_tick_scales_by_elapsed_fraction() {
        let mut body = KinematicBody::at(Point::zero());
        body.set_velocity(Vector::new(dec(10), dec(0), dec(0)));
        body.stamp(ms(0));
        body.tick(ms(20), ms(40)).unwrap();

        assert_eq!(body.position(), &Point::new(dec(5), dec(0), dec(0)));
    }

    #[test]
    fn test_each_axis_uses_its_own_acceleration() {
        let mut body = KinematicBody::at(Point::zero());
        body.set_acceleration(Vector::new(dec(1), dec(2), dec(3)));
        body.set_angular_acceleration(Vector::new(d("0.1"), d("0.2"), d("0.3")));
        body.tick(ms(0), ms(40)).unwrap();

        assert_eq!(body.velocity(), &Vector::new(dec(1), dec(2), dec(3)));
        assert_eq!(
            body.angular_velocity(),
            &Vector::new(d("0.1"), d("0.2"), d("0.3"))
        );
    }

    #[test]
    fn test_orientation_wraps_into_full_turn() {
        let mut body = KinematicBody::at(Point::zero());
        body.set_orientation(Point::new(dec(6), dec(0), dec(0)));
        body.set_angular_velocity(Vector::new(dec(1), dec(-1), dec(0)));
        body.tick(ms(0), ms(40)).unwrap();

        let expected_pitch = &dec(7) - &tau();
        let expected_yaw = &tau() - &dec(1);
        assert_eq!(body.orientation().x, expected_pitch);
        assert_eq!(body.orientation().y, expected_yaw);
    }

    #[test]
    fn test_set_orientation_wraps() {
        let mut body = KinematicBody::default();
        body.set_orientation(Point::new(dec(-1), dec(0), dec(0)));
        assert_eq!(body.orientation().x, &tau() - &dec(1));
    }

    #[test]
    fn test_zero_period_is_error() {
        let mut body = KinematicBody::default();
        assert_eq!(
            body.tick(ms(10), Duration::ZERO),
            Err(KinematicsError::ZeroPeriod)
        );
    }

    #[test]
    fn test_clock_going_backwards_is_a_zero_step() {
        let mut body = accelerating_body();
        body.stamp(ms(100));
        let before = body.clone();
        body.tick(ms(50), ms(40)).unwrap();

        assert_eq!(body.position(), before.position());
        assert_eq!(body.velocity(), before.velocity());
        assert_eq!(body.last_tick(), Some(ms(100)));
    }

    #[test]
    fn test_late_tick_after_backwards_clock_integrates_real_interval_only() {
        let mut body = KinematicBody::at(Point::zero());
        body.set_velocity(Vector::new(dec(40), dec(0), dec(0)));
        body.stamp(ms(100));

        body.tick(ms(50), ms(40)).unwrap();
        body.tick(ms(140), ms(40)).unwrap();

        assert_eq!(body.position(), &Point::new(dec(40), dec(0), dec(0)));
        assert_eq!(body.last_tick(), Some(ms(140)));
    }

    #[test]
    fn test_set_acceleration_keeps_active_forces_on_top() {
        let mut body = KinematicBody::default();
        let id = body.apply_thrust(dec(5), ThrustMode::Fixed).unwrap();

        body.set_acceleration(Vector::new(dec(1), dec(0), dec(0)));
        assert_eq!(body.acceleration(), &Vector::new(dec(1), dec(0), dec(-5)));
        assert_eq!(body.base_acceleration(), &Vector::new(dec(1), dec(0), dec(0)));

        body.set_acceleration(Vector::zero());
        assert!(body.remove_force(id));
        assert_eq!(body.acceleration(), &Vector::zero());
    }

    #[test]
    fn test_thrust_adds_forward_contribution() {
        let mut body = KinematicBody::default();
        let id = body.apply_thrust(dec(5), ThrustMode::Fixed).unwrap();

        assert!(body.has_force(id));
        assert_eq!(body.acceleration(), &Vector::new(dec(0), dec(0), dec(-5)));
    }

    #[test]
    fn test_thrust_cancel_after_rotation_restores_acceleration_exactly() {
        let mut body = KinematicBody::default();
        let base = Vector::new(d("0.25"), dec(-3), d("1.5"));
        body.set_acceleration(base.clone());
        body.set_orientation(Point::from_f64s(0.4, 1.2, 0.0).unwrap());

        let id = body.apply_thrust(d("12.5"), ThrustMode::Fixed).unwrap();
        assert_ne!(body.acceleration(), &base);

        body.set_angular_velocity(Vector::new(d("0.3"), d("-0.7"), d("0.1")));
        body.stamp(ms(0));
        body.tick(ms(40), ms(40)).unwrap();
        body.tick(ms(80), ms(40)).unwrap();

        assert!(body.remove_force(id));
        assert_eq!(body.acceleration(), &base);
    }

    #[test]
    fn test_remove_force_is_idempotent() {
        let mut body = KinematicBody::default();
        let id = body.apply_thrust(dec(3), ThrustMode::Fixed).unwrap();

        assert!(body.remove_force(id));
        assert!(!body.remove_force(id));
        assert_eq!(body.acceleration(), &Vector::zero());
        assert_eq!(body.active_forces(), 0);
    }

    #[test]
    fn test_tracking_thrust_follows_orientation() {
        let mut body = KinematicBody::default();
        let id = body.apply_thrust(dec(2), ThrustMode::Tracking).unwrap();

        // Turn a quarter of a full yaw, then tick: the thrust now points along -X.
        body.set_orientation(Point::from_f64s(0.0, std::f64::consts::FRAC_PI_2, 0.0).unwrap());
        body.tick(ms(0), ms(40)).unwrap();

        let accel = body.acceleration().to_dvec3();
        assert!((accel.x + 2.0).abs() < 1e-9);
        assert!(accel.z.abs() < 1e-9);

        assert!(body.remove_force(id));
        assert_eq!(body.acceleration(), &Vector::zero());
    }

    #[test]
    fn test_fixed_thrust_ignores_rotation() {
        let mut body = KinematicBody::default();
        body.apply_thrust(dec(2), ThrustMode::Fixed).unwrap();
        body.set_orientation(Point::from_f64s(0.0, 1.0, 0.0).unwrap());
        body.tick(ms(0), ms(40)).unwrap();

        assert_eq!(body.acceleration(), &Vector::new(dec(0), dec(0), dec(-2)));
    }

    #[test]
    fn test_stacked_forces_remove_independently() {
        let mut body = KinematicBody::default();
        let first = body.apply_thrust(dec(1), ThrustMode::Fixed).unwrap();
        body.set_orientation(Point::from_f64s(0.0, 0.5, 0.0).unwrap());
        let second = body.apply_thrust(dec(4), ThrustMode::Fixed).unwrap();

        assert_ne!(first, second);
        assert!(body.remove_force(second));
        assert_eq!(body.acceleration(), &Vector::new(dec(0), dec(0), dec(-1)));
        assert!(body.remove_force(first));
        assert_eq!(body.acceleration(), &Vector::zero());
    }
}
