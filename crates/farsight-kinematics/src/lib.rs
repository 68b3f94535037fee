//! Kinematic bodies for Farsight: pose and motion state, the per-tick
//! integration rule, timed force effects, and celestial body classes.
//!
//! Velocities are expressed in meters per tick period and accelerations in
//! meters per period squared, so a tick that lands exactly on the nominal
//! period advances state by exactly one unit of each rate.

mod body;
mod celestial;
mod error;
mod force;

pub use body::KinematicBody;
pub use celestial::{BodyClass, CelestialBody};
pub use error::KinematicsError;
pub use force::{ForceId, ThrustMode, thrust_direction};
