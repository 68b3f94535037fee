//! Draw-sphere projector.
//!
//! Maps bodies at arbitrary distance onto a fixed-radius sphere around a world
//! anchor near the observer, compensates for the observer's orientation, and
//! picks a level of detail: full surface sampling for nearby bodies, a single
//! marker beyond the render cutoff, or a hyperspace streak when the observer is
//! moving faster than the luminal threshold.
//!
//! Body-level quantities (offset, distance, projected radius and centre) are
//! computed in decimal; per-sample geometry runs in `f64` via `glam::DVec3`.

mod error;
mod lod;
mod projection;
mod projector;
mod sampling;
mod streak;

pub use error::ProjectionError;
pub use lod::{Detail, LodSettings};
pub use projection::{Compensation, project_radial, project_radial_f64};
pub use projector::{ObserverView, PointKind, ProjectedPoint, Projector, ProjectorSettings};
pub use sampling::{DensityCurve, SamplingSettings, sphere_point};
pub use streak::{direction_from_angles, streak_direction};
