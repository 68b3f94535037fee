//! Sectors: bounded regions holding celestial bodies.

use farsight_kinematics::CelestialBody;
use farsight_math::{Decimal, LightYears, Point, Spatial, dec};
use num_bigint::BigInt;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::UniverseCoordinate;

/// Fractional digits of a generated star-field coordinate, in light-years.
const FIELD_COORDINATE_DIGITS: i64 = 15;

/// Parameters for the seeded star field of the empty-space sector.
#[derive(Clone, Debug, PartialEq)]
pub struct StarFieldSettings {
    /// Number of small stars scattered around the origin.
    pub star_count: usize,
    /// Half-extent of the field on each axis.
    pub extent: LightYears,
    /// Physical radius of every field star, in meters.
    pub star_radius: Decimal,
}

impl Default for StarFieldSettings {
    fn default() -> Self {
        Self {
            star_count: 200,
            extent: LightYears::whole(1),
            star_radius: dec(1_737_400),
        }
    }
}

/// A bounded region of the universe and the bodies it contains.
///
/// Bodies are permanent once placed; insertion order is the default render
/// order.
#[derive(Clone, Debug)]
pub struct Sector {
    position: UniverseCoordinate,
    /// Radius in meters.
    radius: Decimal,
    bodies: Vec<CelestialBody>,
}

impl Sector {
    pub fn new(position: UniverseCoordinate, radius: Decimal) -> Self {
        Self {
            position,
            radius,
            bodies: Vec::new(),
        }
    }

    /// The predefined "empty space" sector: the region between defined sectors.
    ///
    /// Sits at the universe origin with a radius of 10 ly. Holds two nearby
    /// named stars and a field of small stars placed deterministically from
    /// `seed`.
    pub fn empty_space(seed: u64, field: &StarFieldSettings) -> Self {
        let mut sector = Self::new(
            UniverseCoordinate::origin(),
            LightYears::whole(10).to_meters(),
        );

        sector.add_body(CelestialBody::star(
            "Vesper",
            dec(1_737_400),
            Point::new(dec(-84_400_000), dec(0), dec(0)),
        ));
        sector.add_body(CelestialBody::star(
            "Halcyon",
            dec(2_737_400),
            Point::new(dec(-44_400_000), dec(0), dec(44_400_000)),
        ));

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let unit = 10_i64.pow(FIELD_COORDINATE_DIGITS as u32);
        for index in 0..field.star_count {
            let mut axis = || {
                let fraction = Decimal::new(
                    BigInt::from(rng.random_range(-unit..unit)),
                    FIELD_COORDINATE_DIGITS,
                );
                LightYears::new(&fraction * field.extent.value()).to_meters()
            };
            let position = Point::new(axis(), axis(), axis());
            sector.add_body(CelestialBody::star(
                format!("field-{index}"),
                field.star_radius.clone(),
                position,
            ));
        }

        debug!(
            seed,
            bodies = sector.len(),
            "Generated empty-space sector"
        );
        sector
    }

    pub fn position(&self) -> &UniverseCoordinate {
        &self.position
    }

    pub fn radius(&self) -> &Decimal {
        &self.radius
    }

    /// Append a body. There is no removal.
    pub fn add_body(&mut self, body: CelestialBody) {
        self.bodies.push(body);
    }

    /// All bodies in insertion order.
    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    /// Mutable access for the integrator.
    pub fn bodies_mut(&mut self) -> impl Iterator<Item = &mut CelestialBody> {
        self.bodies.iter_mut()
    }

    /// Bodies the projector draws, in insertion order.
    pub fn renderable(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter().filter(|body| body.is_renderable())
    }

    /// Whether a sector-space point lies within the sector radius.
    pub fn contains(&self, point: &Point) -> bool {
        point.length_squared() <= &self.radius * &self.radius
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}
