//! Sector and universe coordinate model.
//!
//! Two scales are kept apart:
//!
//! 1. **Universe coordinates**: unbounded integer meters, used only for
//!    sector-to-sector distances (transit planning).
//! 2. **Sector space**: decimal [`Point`](farsight_math::Point)s relative to the
//!    sector origin, used by the integrator and the projector every tick.

mod sector;
mod universe;

pub use sector::{Sector, StarFieldSettings};
pub use universe::UniverseCoordinate;
