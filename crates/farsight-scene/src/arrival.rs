//! Arrival from hyperspace.
//!
//! The scene first shows the beam animation. When it ends, sector rendering
//! resumes and the ship drops out of hyperspace at high speed while braking.
//! After a further delay it settles at cruise velocity.

use std::time::Duration;

use farsight_math::{Spatial, Vector, dec};
use farsight_render::{BeamSettings, HyperspaceBeams};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::scene::{RenderMode, SpaceScene};
use crate::scheduler::{TaskHandle, TickScheduler};
use crate::SceneError;

#[derive(Clone, Debug, PartialEq)]
pub struct ArrivalSettings {
    /// How long the beams are shown before the sector appears.
    pub beam_duration: Duration,
    /// Added to the ship's velocity when leaving hyperspace.
    pub exit_velocity: Vector,
    /// Added to the ship's acceleration when leaving hyperspace.
    pub braking: Vector,
    /// Time between leaving hyperspace and settling.
    pub settle_delay: Duration,
    pub cruise_velocity: Vector,
    pub beams: BeamSettings,
    pub seed: u64,
}

impl Default for ArrivalSettings {
    fn default() -> Self {
        Self {
            beam_duration: Duration::from_secs(2),
            exit_velocity: Vector::new(dec(-51_000_000), dec(0), dec(0)),
            braking: Vector::new(dec(2_300_000), dec(0), dec(0)),
            settle_delay: Duration::from_millis(3_500),
            cruise_velocity: Vector::new(dec(-500_000), dec(0), dec(0)),
            beams: BeamSettings::default(),
            seed: 0,
        }
    }
}

/// Handles of the two one-shot steps of an arrival.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArrivalHandles {
    pub exit: TaskHandle,
    pub settle: TaskHandle,
}

impl ArrivalHandles {
    /// Cancel whatever has not fired yet.
    pub fn cancel(&self, scheduler: &mut TickScheduler<SpaceScene>) {
        scheduler.cancel(self.exit);
        scheduler.cancel(self.settle);
    }
}

pub struct ArrivalSequence {
    settings: ArrivalSettings,
}

impl ArrivalSequence {
    pub fn new(settings: ArrivalSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ArrivalSettings {
        &self.settings
    }

    /// Switch `scene` to the beam animation and schedule the exit and settle
    /// steps relative to `now`.
    pub fn begin(
        &self,
        scene: &mut SpaceScene,
        scheduler: &mut TickScheduler<SpaceScene>,
        now: Duration,
    ) -> Result<ArrivalHandles, SceneError> {
        let exit_at = now + self.settings.beam_duration;
        let settle_at = exit_at + self.settings.settle_delay;

        let exit_velocity = self.settings.exit_velocity.clone();
        let braking = self.settings.braking.clone();
        let exit = scheduler.schedule_once(exit_at, move |scene: &mut SpaceScene, _| {
            scene.set_mode(RenderMode::Sector);
            let ship = scene.ship_mut();
            let velocity = ship.velocity() + &exit_velocity;
            let acceleration = ship.base_acceleration() + &braking;
            ship.set_velocity(velocity);
            ship.set_acceleration(acceleration);
            info!("Dropped out of hyperspace");
        })?;

        let cruise = self.settings.cruise_velocity.clone();
        let settle = scheduler
            .schedule_once(settle_at, move |scene: &mut SpaceScene, _| {
                let ship = scene.ship_mut();
                ship.set_velocity(cruise.clone());
                ship.set_acceleration(Vector::zero());
                info!("Settled at cruise velocity");
            })
            .inspect_err(|_| {
                scheduler.cancel(exit);
            })?;

        let anchor = scene.renderer().projector().anchor();
        let mut rng = ChaCha8Rng::seed_from_u64(self.settings.seed);
        let beams = HyperspaceBeams::new(self.settings.beams.clone(), anchor, &mut rng);
        scene.set_mode(RenderMode::Beams(beams));
        info!(duration = ?self.settings.beam_duration, "Arrival started");

        Ok(ArrivalHandles { exit, settle })
    }
}
