//! Farsight demo: flies the observer ship into the empty-space sector on a
//! virtual clock and feeds every frame to a presenter thread.

mod setup;

use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, TryFromFloatSecsError};

use clap::Parser;
use crossbeam_channel::Receiver;
use farsight_config::{CliArgs, Config, ConfigError};
use farsight_math::{MathError, format_distance};
use farsight_render::{ChannelSink, Frame, VisualKind};
use farsight_scene::{ArrivalSequence, SceneError, TickScheduler};
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Math(#[from] MathError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("run length out of range: {0}")]
    RunLength(#[from] TryFromFloatSecsError),
    #[error("failed to spawn presenter thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("presenter thread panicked")]
    Presenter,
}

/// What the presenter thread received.
#[derive(Debug, Default)]
struct Presented {
    frames: u64,
    particles: u64,
    stars: u64,
    planets: u64,
    streaks: u64,
    beams: u64,
}

impl Presented {
    fn record(&mut self, frame: &Frame) {
        self.frames += 1;
        self.particles += frame.particles();
        for request in &frame.requests {
            match request.kind {
                VisualKind::Star => self.stars += 1,
                VisualKind::Planet => self.planets += 1,
                VisualKind::Streak => self.streaks += 1,
                VisualKind::Beam => self.beams += 1,
            }
        }
    }
}

fn present(frames: Receiver<Frame>) -> Presented {
    let mut presented = Presented::default();
    for frame in frames.iter() {
        presented.record(&frame);
    }
    presented
}

fn run(config: &Config) -> Result<(), DemoError> {
    config.validate()?;
    let end = Duration::try_from_secs_f64(config.timing.run_seconds)?;

    let (sink, frames) = ChannelSink::bounded(config.budget.frame_queue);
    let presenter = thread::Builder::new()
        .name("presenter".to_string())
        .spawn(move || present(frames))
        .map_err(DemoError::Spawn)?;

    let start = setup::ship_start(config)?;
    let mut scene = setup::build_scene(config, sink)?;
    let mut scheduler = TickScheduler::with_capacity(config.timing.task_capacity);

    scene.start(&mut scheduler, Duration::ZERO)?;
    if config.arrival.enabled {
        ArrivalSequence::new(setup::arrival_settings(config)?).begin(
            &mut scene,
            &mut scheduler,
            Duration::ZERO,
        )?;
    }

    let period = Duration::from_millis(config.timing.physics_period_ms);
    let mut now = Duration::ZERO;
    while now < end {
        now = (now + period).min(end);
        scheduler.run_until(now, &mut scene);
        if config.debug.frame_stats
            && let Some(stats) = scene.last_frame()
        {
            info!(
                sequence = stats.sequence,
                emitted = stats.points_emitted,
                dropped = stats.points_dropped,
                particles = stats.particles_emitted,
                "Frame"
            );
        }
    }
    scene.stop(&mut scheduler);

    let rendered = scene.renderer().next_sequence();
    let travelled = start.distance(scene.ship().position());
    let panics = scheduler.panics();
    // Dropping the scene closes the channel and lets the presenter finish.
    drop(scene);
    let presented = presenter.join().map_err(|_| DemoError::Presenter)?;

    info!(
        simulated = ?now,
        travelled = %format_distance(&travelled),
        rendered,
        presented = presented.frames,
        skipped = rendered.saturating_sub(presented.frames),
        task_panics = panics,
        "Run complete"
    );
    info!(
        particles = presented.particles,
        stars = presented.stars,
        planets = presented.planets,
        streaks = presented.streaks,
        beams = presented.beams,
        "Presented draw requests"
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(Config::default_dir)
        .unwrap_or_else(|| PathBuf::from("farsight"));

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    farsight_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_run() -> Config {
        let mut config = Config::default();
        config.timing.run_seconds = 0.4;
        config.universe.field_star_count = 20;
        config.budget.frame_queue = 64;
        config
    }

    #[test]
    fn test_short_run_completes() {
        run(&short_run()).unwrap();
    }

    #[test]
    fn test_invalid_config_fails_before_running() {
        let mut config = short_run();
        config.timing.render_period_ms = 10;
        assert!(matches!(run(&config), Err(DemoError::Config(_))));
    }

    #[test]
    fn test_oversized_run_length_is_rejected() {
        let mut config = short_run();
        config.timing.run_seconds = 1e20;
        assert!(matches!(run(&config), Err(DemoError::Config(_))));
    }

    #[test]
    fn test_presented_counts_kinds() {
        let mut presented = Presented::default();
        presented.record(&Frame {
            sequence: 0,
            requests: vec![
                farsight_render::DrawRequest {
                    position: glam::DVec3::ZERO,
                    kind: VisualKind::Beam,
                    count: 2,
                },
                farsight_render::DrawRequest {
                    position: glam::DVec3::ONE,
                    kind: VisualKind::Star,
                    count: 2,
                },
            ],
        });
        assert_eq!(presented.frames, 1);
        assert_eq!(presented.particles, 4);
        assert_eq!(presented.beams, 1);
        assert_eq!(presented.stars, 1);
    }
}
