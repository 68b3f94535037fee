//! Celestial bodies: a kinematic body with a physical radius and a visual class.

use farsight_math::{Decimal, Point};

use crate::KinematicBody;

/// Visual class of a celestial body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyClass {
    Star,
    Planet,
    /// The observer's vessel. Never projected.
    Ship,
}

/// A body placed in a sector.
#[derive(Clone, Debug, PartialEq)]
pub struct CelestialBody {
    name: String,
    class: BodyClass,
    /// Physical radius in meters.
    radius: Decimal,
    body: KinematicBody,
}

impl CelestialBody {
    pub fn new(name: impl Into<String>, class: BodyClass, radius: Decimal, position: Point) -> Self {
        Self {
            name: name.into(),
            class,
            radius,
            body: KinematicBody::at(position),
        }
    }

    pub fn star(name: impl Into<String>, radius: Decimal, position: Point) -> Self {
        Self::new(name, BodyClass::Star, radius, position)
    }

    pub fn planet(name: impl Into<String>, radius: Decimal, position: Point) -> Self {
        Self::new(name, BodyClass::Planet, radius, position)
    }

    pub fn ship(name: impl Into<String>, radius: Decimal, position: Point) -> Self {
        Self::new(name, BodyClass::Ship, radius, position)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> BodyClass {
        self.class
    }

    pub fn radius(&self) -> &Decimal {
        &self.radius
    }

    /// Whether the body is drawn by the projector (everything except ships).
    pub fn is_renderable(&self) -> bool {
        self.class != BodyClass::Ship
    }

    pub fn body(&self) -> &KinematicBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut KinematicBody {
        &mut self.body
    }
}
