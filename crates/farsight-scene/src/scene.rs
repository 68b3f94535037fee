//! The space scene: one observer ship flying through one sector.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use farsight_coords::Sector;
use farsight_kinematics::{ForceId, KinematicBody, ThrustMode};
use farsight_math::Decimal;
use farsight_render::{FrameStats, HyperspaceBeams, PresentationSink, SceneRenderer};
use tracing::{debug, info, warn};

use crate::scheduler::{TaskHandle, TickScheduler};
use crate::{SceneError, SchedulerError};

/// Tick periods of the physics and render tasks. They must be equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneSettings {
    pub physics_period: Duration,
    pub render_period: Duration,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            physics_period: Duration::from_millis(40),
            render_period: Duration::from_millis(40),
        }
    }
}

impl SceneSettings {
    /// The shared tick period, or an error if the two periods differ.
    pub fn period(&self) -> Result<Duration, SceneError> {
        if self.physics_period != self.render_period {
            return Err(SceneError::PeriodMismatch {
                physics: self.physics_period,
                render: self.render_period,
            });
        }
        Ok(self.physics_period)
    }
}

/// What the render task draws.
#[derive(Debug, Default)]
pub enum RenderMode {
    /// Nothing; render ticks are skipped.
    Idle,
    /// Every renderable body of the sector.
    #[default]
    Sector,
    /// The hyperspace beam animation instead of the sector.
    Beams(HyperspaceBeams),
}

/// Handles of the physics and render tasks of a running scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneTasks {
    pub physics: TaskHandle,
    pub render: TaskHandle,
}

/// A thrust effect scheduled with [`SpaceScene::thrust`].
#[derive(Clone, Debug)]
pub struct ThrustHandle {
    activate: TaskHandle,
    deactivate: TaskHandle,
    force: Rc<Cell<Option<ForceId>>>,
}

impl ThrustHandle {
    /// Whether the thrust currently contributes to the ship's acceleration.
    pub fn is_active(&self) -> bool {
        self.force.get().is_some()
    }

    /// Stop the thrust now, removing exactly its recorded contribution.
    ///
    /// Safe to call before activation, after expiry, or repeatedly.
    pub fn cancel(&self, scheduler: &mut TickScheduler<SpaceScene>, scene: &mut SpaceScene) {
        scheduler.cancel(self.activate);
        scheduler.cancel(self.deactivate);
        if let Some(id) = self.force.take() {
            scene.ship.remove_force(id);
        }
    }
}

/// Scene context: sector, observer ship, renderer and presentation sink.
///
/// Constructed and owned by the caller. [`start`](Self::start) and
/// [`stop`](Self::stop) bracket one session.
pub struct SpaceScene {
    settings: SceneSettings,
    sector: Sector,
    ship: KinematicBody,
    renderer: SceneRenderer,
    sink: Box<dyn PresentationSink>,
    mode: RenderMode,
    tasks: Option<SceneTasks>,
    last_frame: Option<FrameStats>,
}

impl SpaceScene {
    pub fn new(
        settings: SceneSettings,
        sector: Sector,
        ship: KinematicBody,
        renderer: SceneRenderer,
        sink: impl PresentationSink + 'static,
    ) -> Self {
        Self {
            settings,
            sector,
            ship,
            renderer,
            sink: Box::new(sink),
            mode: RenderMode::default(),
            tasks: None,
            last_frame: None,
        }
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    pub fn sector(&self) -> &Sector {
        &self.sector
    }

    pub fn ship(&self) -> &KinematicBody {
        &self.ship
    }

    pub fn ship_mut(&mut self) -> &mut KinematicBody {
        &mut self.ship
    }

    pub fn renderer(&self) -> &SceneRenderer {
        &self.renderer
    }

    pub fn mode(&self) -> &RenderMode {
        &self.mode
    }

    pub fn set_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
    }

    /// Statistics of the most recent frame.
    pub fn last_frame(&self) -> Option<&FrameStats> {
        self.last_frame.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.tasks.is_some()
    }

    /// Start the physics and render tasks.
    ///
    /// Every body is stamped at `now`, then the physics task is registered
    /// before the render task so a frame always sees the writes of its own
    /// tick. Calling `start` on a running scene returns the existing handles.
    pub fn start(
        &mut self,
        scheduler: &mut TickScheduler<SpaceScene>,
        now: Duration,
    ) -> Result<SceneTasks, SceneError> {
        if let Some(tasks) = self.tasks {
            return Ok(tasks);
        }
        let period = self.settings.period()?;
        if period.is_zero() {
            return Err(SchedulerError::ZeroPeriod.into());
        }

        for body in self.sector.bodies_mut() {
            body.body_mut().stamp(now);
        }
        self.ship.stamp(now);

        let first = now + period;
        let physics = scheduler.schedule_repeating(first, period, |scene: &mut SpaceScene, due| {
            scene.physics_tick(due);
        })?;
        let render = scheduler
            .schedule_repeating(first, period, |scene: &mut SpaceScene, _| {
                scene.render_tick();
            })
            .inspect_err(|_| {
                scheduler.cancel(physics);
            })?;

        let tasks = SceneTasks { physics, render };
        self.tasks = Some(tasks);
        info!(?period, bodies = self.sector.len(), "Scene started");
        Ok(tasks)
    }

    /// Cancel the physics and render tasks. Returns `false` if not running.
    pub fn stop(&mut self, scheduler: &mut TickScheduler<SpaceScene>) -> bool {
        match self.tasks.take() {
            Some(tasks) => {
                scheduler.cancel(tasks.physics);
                scheduler.cancel(tasks.render);
                info!("Scene stopped");
                true
            }
            None => false,
        }
    }

    /// Advance every sector body and the ship to `now`.
    ///
    /// A body that fails to integrate is logged and skipped. Returns
    /// the number of such bodies.
    pub fn physics_tick(&mut self, now: Duration) -> usize {
        let period = self.settings.physics_period;
        let mut failed = 0;

        for body in self.sector.bodies_mut() {
            if let Err(e) = body.body_mut().tick(now, period) {
                failed += 1;
                warn!(body = body.name(), error = %e, "Physics tick failed");
            }
        }
        if let Err(e) = self.ship.tick(now, period) {
            failed += 1;
            warn!(error = %e, "Physics tick failed for ship");
        }
        failed
    }

    /// Render one frame according to the current [`RenderMode`].
    pub fn render_tick(&mut self) -> Option<FrameStats> {
        let stats = match &mut self.mode {
            RenderMode::Idle => return None,
            RenderMode::Sector => self.renderer.render(&self.ship, &self.sector, self.sink.as_mut()),
            RenderMode::Beams(beams) => {
                let points = beams.advance();
                self.renderer.present(points, self.sink.as_mut())
            }
        };
        self.last_frame = Some(stats);
        Some(stats)
    }

    /// Schedule a thrust of `magnitude` on the ship for `duration`.
    ///
    /// Activation runs at the scheduler's current time, deactivation
    /// `duration` later.
    pub fn thrust(
        scheduler: &mut TickScheduler<SpaceScene>,
        magnitude: Decimal,
        duration: Duration,
        mode: ThrustMode,
    ) -> Result<ThrustHandle, SceneError> {
        let now = scheduler.now();
        let force = Rc::new(Cell::new(None));

        let slot = Rc::clone(&force);
        let activate = scheduler.schedule_once(now, move |scene: &mut SpaceScene, _| {
            match scene.ship.apply_thrust(magnitude.clone(), mode) {
                Ok(id) => slot.set(Some(id)),
                Err(e) => warn!(error = %e, "Thrust could not be applied"),
            }
        })?;

        let slot = Rc::clone(&force);
        let deactivate = scheduler
            .schedule_once(now + duration, move |scene: &mut SpaceScene, _| {
                if let Some(id) = slot.take() {
                    scene.ship.remove_force(id);
                }
            })
            .inspect_err(|_| {
                scheduler.cancel(activate);
            })?;

        debug!(?duration, ?mode, "Thrust scheduled");
        Ok(ThrustHandle {
            activate,
            deactivate,
            force,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::Receiver;
    use farsight_coords::StarFieldSettings;
    use farsight_math::{Point, Spatial, Vector, dec};
    use farsight_projector::{Projector, ProjectorSettings};
    use farsight_render::{ChannelSink, Frame, ParticleBudget};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn scene_with(settings: SceneSettings) -> (SpaceScene, Receiver<Frame>) {
        let field = StarFieldSettings {
            star_count: 10,
            ..StarFieldSettings::default()
        };
        let sector = Sector::empty_space(3, &field);
        let ship = KinematicBody::at(Point::new(dec(500_000_000), dec(0), dec(0)));
        let renderer = SceneRenderer::new(
            Projector::new(ProjectorSettings::default()),
            ParticleBudget::default(),
            5,
        );
        let (sink, frames) = ChannelSink::bounded(256);
        (SpaceScene::new(settings, sector, ship, renderer, sink), frames)
    }

    fn scene() -> (SpaceScene, Receiver<Frame>) {
        scene_with(SceneSettings::default())
    }

    #[test]
    fn test_start_is_idempotent() {
        let (mut scene, _frames) = scene();
        let mut scheduler = TickScheduler::new();

        let first = scene.start(&mut scheduler, ms(0)).unwrap();
        let second = scene.start(&mut scheduler, ms(0)).unwrap();
        assert_eq!(first, second);
        assert_eq!(scheduler.len(), 2);
        assert!(first.physics < first.render);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (mut scene, _frames) = scene();
        let mut scheduler = TickScheduler::new();
        scene.start(&mut scheduler, ms(0)).unwrap();

        assert!(scene.stop(&mut scheduler));
        assert!(!scene.stop(&mut scheduler));
        assert!(scheduler.is_empty());
        assert!(!scene.is_running());
    }

    #[test]
    fn test_mismatched_periods_are_rejected() {
        let (mut scene, _frames) = scene_with(SceneSettings {
            physics_period: ms(40),
            render_period: ms(50),
        });
        let mut scheduler = TickScheduler::new();

        let result = scene.start(&mut scheduler, ms(0));
        assert!(matches!(result, Err(SceneError::PeriodMismatch { .. })));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_zero_period_is_rejected() {
        let (mut scene, _frames) = scene_with(SceneSettings {
            physics_period: Duration::ZERO,
            render_period: Duration::ZERO,
        });
        let mut scheduler = TickScheduler::new();

        let result = scene.start(&mut scheduler, ms(0));
        assert_eq!(result, Err(SceneError::Scheduler(SchedulerError::ZeroPeriod)));
    }

    #[test]
    fn test_exhausted_scheduler_leaves_nothing_registered() {
        let (mut scene, _frames) = scene();
        let mut scheduler = TickScheduler::with_capacity(1);

        let result = scene.start(&mut scheduler, ms(0));
        assert_eq!(
            result,
            Err(SceneError::Scheduler(SchedulerError::Exhausted { capacity: 1 }))
        );
        assert!(scheduler.is_empty());
        assert!(!scene.is_running());
    }

    #[test]
    fn test_each_tick_moves_the_ship_and_renders_a_frame() {
        let (mut scene, frames) = scene();
        scene
            .ship_mut()
            .set_velocity(Vector::new(dec(-500_000), dec(0), dec(0)));
        let mut scheduler = TickScheduler::new();
        scene.start(&mut scheduler, ms(1_000)).unwrap();

        scheduler.run_until(ms(1_120), &mut scene);

        assert_eq!(
            scene.ship().position(),
            &Point::new(dec(498_500_000), dec(0), dec(0))
        );
        let received: Vec<Frame> = frames.try_iter().collect();
        assert_eq!(received.len(), 3);
        assert_eq!(received[2].sequence, 2);
        assert!(received.iter().all(|f| f.particles() <= 8000));
        assert_eq!(scene.last_frame().map(|s| s.sequence), Some(2));
    }

    #[test]
    fn test_idle_mode_skips_frames() {
        let (mut scene, frames) = scene();
        scene.set_mode(RenderMode::Idle);
        let mut scheduler = TickScheduler::new();
        scene.start(&mut scheduler, ms(0)).unwrap();

        scheduler.run_until(ms(200), &mut scene);
        assert!(frames.try_recv().is_err());
        assert!(scene.last_frame().is_none());
    }

    #[test]
    fn test_thrust_activates_and_expires() {
        let (mut scene, _frames) = scene();
        let mut scheduler = TickScheduler::new();
        scene.start(&mut scheduler, ms(0)).unwrap();

        let handle =
            SpaceScene::thrust(&mut scheduler, dec(1_000), ms(80), ThrustMode::Fixed).unwrap();
        scheduler.run_until(ms(0), &mut scene);

        assert!(handle.is_active());
        assert_eq!(
            scene.ship().acceleration(),
            &Vector::new(dec(0), dec(0), dec(-1_000))
        );

        scheduler.run_until(ms(80), &mut scene);
        assert!(!handle.is_active());
        assert!(scene.ship().acceleration().is_zero());
        assert_eq!(scene.ship().active_forces(), 0);
    }

    #[test]
    fn test_cancelled_thrust_restores_acceleration_after_turning() {
        let (mut scene, _frames) = scene();
        scene
            .ship_mut()
            .set_acceleration(Vector::new(dec(3), dec(-7), dec(11)));
        let mut scheduler = TickScheduler::new();
        scene.start(&mut scheduler, ms(0)).unwrap();

        let handle = SpaceScene::thrust(
            &mut scheduler,
            dec(2_500),
            ms(10_000),
            ThrustMode::Fixed,
        )
        .unwrap();
        scheduler.run_until(ms(0), &mut scene);
        scene
            .ship_mut()
            .set_orientation(Point::from_f64s(0.4, 1.9, 0.0).unwrap());
        scheduler.run_until(ms(400), &mut scene);

        handle.cancel(&mut scheduler, &mut scene);
        handle.cancel(&mut scheduler, &mut scene);

        assert_eq!(
            scene.ship().acceleration(),
            &Vector::new(dec(3), dec(-7), dec(11))
        );
        assert_eq!(scheduler.len(), 2);
    }

    #[test]
    fn test_thrust_cancelled_before_activation_never_applies() {
        let (mut scene, _frames) = scene();
        let mut scheduler = TickScheduler::new();

        let handle =
            SpaceScene::thrust(&mut scheduler, dec(1_000), ms(80), ThrustMode::Tracking).unwrap();
        handle.cancel(&mut scheduler, &mut scene);
        scheduler.run_until(ms(200), &mut scene);

        assert!(scene.ship().acceleration().is_zero());
        assert!(scheduler.is_empty());
    }
}
