//! Command-line argument parsing for Farsight.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Farsight command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "farsight", about = "Draw-sphere renderer for distant bodies")]
pub struct CliArgs {
    /// Seed for star placement, beam layout and budget shuffling.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Physics and render tick period in milliseconds.
    #[arg(long)]
    pub period_ms: Option<u64>,

    /// Simulated seconds to run.
    #[arg(long)]
    pub run_seconds: Option<f64>,

    /// Draw-sphere radius.
    #[arg(long)]
    pub radius: Option<f64>,

    /// Particles allowed per frame.
    #[arg(long)]
    pub budget: Option<u32>,

    /// Skip the hyperspace arrival sequence.
    #[arg(long)]
    pub no_arrival: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.universe.seed = seed;
        }
        if let Some(period) = args.period_ms {
            self.timing.physics_period_ms = period;
            self.timing.render_period_ms = period;
        }
        if let Some(seconds) = args.run_seconds {
            self.timing.run_seconds = seconds;
        }
        if let Some(radius) = args.radius {
            self.draw_sphere.radius = radius;
        }
        if let Some(budget) = args.budget {
            self.budget.particles_per_frame = budget;
        }
        if args.no_arrival {
            self.arrival.enabled = false;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
