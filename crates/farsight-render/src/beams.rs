//! Hyperspace beam animation.
//!
//! Beams run from a narrow ring ahead of the ship to a wide ring behind it.
//! A fixed number of beams starts on every tick and each beam carries its own
//! progress counter, so the animation is driven purely by calls to
//! [`HyperspaceBeams::advance`].

use glam::DVec3;
use rand::Rng;
use std::f64::consts::TAU;

use crate::budget::Candidate;
use crate::sink::VisualKind;

/// Shape and pacing of the beam animation. Distances are in draw-space units.
#[derive(Clone, Debug, PartialEq)]
pub struct BeamSettings {
    pub count: usize,
    pub points_per_beam: usize,
    /// Ticks a beam needs to travel from start to end.
    pub travel_ticks: u32,
    /// Beams that begin on each tick.
    pub beams_per_tick: usize,
    /// Direction the ship is heading in draw space.
    pub ahead: DVec3,
    /// Distance of the start ring centre ahead of the anchor.
    pub start_distance: f64,
    /// Distance of the end ring centre behind the anchor.
    pub end_distance: f64,
    pub start_radius_min: f64,
    pub start_radius_max: f64,
    pub end_radius_min: f64,
    pub end_radius_max: f64,
}

impl Default for BeamSettings {
    fn default() -> Self {
        Self {
            count: 200,
            points_per_beam: 1300,
            travel_ticks: 50,
            beams_per_tick: 4,
            ahead: DVec3::NEG_X,
            start_distance: 300.0,
            end_distance: 100.0,
            start_radius_min: 10.0,
            start_radius_max: 30.0,
            end_radius_min: 50.0,
            end_radius_max: 100.0,
        }
    }
}

#[derive(Clone, Debug)]
struct Beam {
    start: DVec3,
    end: DVec3,
    ticks: u32,
    covered: usize,
}

/// The running animation.
#[derive(Clone, Debug)]
pub struct HyperspaceBeams {
    settings: BeamSettings,
    beams: Vec<Beam>,
    started: usize,
}

impl HyperspaceBeams {
    /// Lay out every beam around `anchor`. Random angles and radii come from
    /// `rng`; nothing is emitted until the first [`advance`](Self::advance).
    pub fn new<R: Rng + ?Sized>(settings: BeamSettings, anchor: DVec3, rng: &mut R) -> Self {
        let ahead = settings.ahead.try_normalize().unwrap_or(DVec3::NEG_X);
        let (u, v) = ahead.any_orthonormal_pair();
        let start_centre = anchor + ahead * settings.start_distance;
        let end_centre = anchor - ahead * settings.end_distance;

        let beams = (0..settings.count)
            .map(|_| {
                let angle = rng.random::<f64>() * TAU;
                let ring = u * angle.cos() + v * angle.sin();
                let start_radius =
                    radius_between(rng, settings.start_radius_min, settings.start_radius_max);
                let end_radius =
                    radius_between(rng, settings.end_radius_min, settings.end_radius_max);
                Beam {
                    start: start_centre + ring * start_radius,
                    end: end_centre + ring * end_radius,
                    ticks: 0,
                    covered: 0,
                }
            })
            .collect();

        Self {
            settings,
            beams,
            started: 0,
        }
    }

    pub fn settings(&self) -> &BeamSettings {
        &self.settings
    }

    /// Beams that have begun travelling.
    pub fn started(&self) -> usize {
        self.started
    }

    /// Whether every beam has reached its end.
    pub fn is_finished(&self) -> bool {
        self.started == self.beams.len()
            && self
                .beams
                .iter()
                .all(|beam| beam.covered >= self.settings.points_per_beam)
    }

    /// Advance the animation by one tick and return the beam points newly
    /// covered during it.
    pub fn advance(&mut self) -> Vec<Candidate> {
        self.started = (self.started + self.settings.beams_per_tick.max(1)).min(self.beams.len());

        let total = self.settings.points_per_beam;
        let travel = u64::from(self.settings.travel_ticks.max(1));
        let mut points = Vec::new();

        for beam in &mut self.beams[..self.started] {
            if beam.covered >= total {
                continue;
            }
            beam.ticks += 1;
            let target = ((total as u64 * u64::from(beam.ticks)) / travel).min(total as u64) as usize;
            let step = (beam.end - beam.start) / total as f64;
            points.extend((beam.covered..target).map(|j| Candidate {
                position: beam.start + step * j as f64,
                kind: VisualKind::Beam,
            }));
            beam.covered = target;
        }
        points
    }
}

fn radius_between<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}
