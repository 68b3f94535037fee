//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Longest demo run accepted by [`Config::validate`], one simulated year.
pub const MAX_RUN_SECONDS: f64 = 365.0 * 24.0 * 3600.0;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Tick periods and run length.
    pub timing: TimingConfig,
    /// Draw-sphere geometry.
    pub draw_sphere: DrawSphereConfig,
    /// Level-of-detail thresholds and streak shaping.
    pub lod: LodConfig,
    /// Surface sampling density.
    pub sampling: SamplingConfig,
    /// Per-frame particle budget.
    pub budget: BudgetConfig,
    /// Hyperspace beam animation.
    pub beams: BeamConfig,
    /// Arrival sequence.
    pub arrival: ArrivalConfig,
    /// Starting sector and ship.
    pub universe: UniverseConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Tick timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// Physics tick period in milliseconds.
    pub physics_period_ms: u64,
    /// Render tick period in milliseconds. Must equal the physics period.
    pub render_period_ms: u64,
    /// Maximum number of live scheduler tasks.
    pub task_capacity: usize,
    /// Simulated time the demo runs for, in seconds, at most
    /// [`MAX_RUN_SECONDS`].
    pub run_seconds: f64,
}

/// Draw-sphere geometry, in draw-space units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DrawSphereConfig {
    /// Sphere radius.
    pub radius: f64,
    /// World point the sphere is centred on.
    pub anchor: (f64, f64, f64),
}

/// Level-of-detail configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LodConfig {
    /// Bodies farther than this (meters) are drawn as a marker or streak.
    pub render_cutoff_m: f64,
    /// Observer speed (m/s) above which far bodies become streaks.
    pub luminal_threshold_m_s: f64,
    /// Streak length at the speed of light.
    pub streak_scale: f64,
    pub max_streak_length: f64,
    pub streak_spacing: f64,
    pub max_streak_points: usize,
}

/// Shape of the sample-count curve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DensityCurveKind {
    Linear,
    Quadratic,
}

/// Surface sampling configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SamplingConfig {
    pub curve: DensityCurveKind,
    /// Samples per projected unit (or unit squared) for stars.
    pub star_density: f64,
    /// Samples per projected unit (or unit squared) for planets.
    pub planet_density: f64,
    pub max_samples_per_body: usize,
}

/// Particle budget configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BudgetConfig {
    /// Particles allowed per frame.
    pub particles_per_frame: u32,
    /// Particles per emitted point.
    pub batch_weight: u32,
    /// Frames buffered for the presentation consumer.
    pub frame_queue: usize,
}

/// Hyperspace beam configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BeamConfig {
    pub count: usize,
    pub points_per_beam: usize,
    /// Ticks a beam takes to travel its length.
    pub travel_ticks: u32,
    /// Beams started per tick.
    pub beams_per_tick: usize,
    pub start_distance: f64,
    pub end_distance: f64,
    pub start_radius: (f64, f64),
    pub end_radius: (f64, f64),
}

/// Arrival sequence configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ArrivalConfig {
    /// Play the arrival sequence when the scene starts.
    pub enabled: bool,
    pub beam_duration_ms: u64,
    pub settle_delay_ms: u64,
    /// Velocity added when leaving hyperspace (m/s).
    pub exit_velocity: (f64, f64, f64),
    /// Acceleration added when leaving hyperspace (m/s²).
    pub braking: (f64, f64, f64),
    /// Velocity after settling (m/s).
    pub cruise_velocity: (f64, f64, f64),
}

/// Starting universe configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UniverseConfig {
    /// Seed for star placement, beam layout and budget shuffling.
    pub seed: u64,
    pub field_star_count: usize,
    /// Half-extent of the star field in light-years.
    pub field_extent_ly: f64,
    pub field_star_radius_m: f64,
    /// Ship start position in sector space (meters).
    pub ship_start: (f64, f64, f64),
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Log statistics for every frame at info level.
    pub frame_stats: bool,
}

// --- Default implementations ---

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            physics_period_ms: 40,
            render_period_ms: 40,
            task_capacity: 64,
            run_seconds: 10.0,
        }
    }
}

impl Default for DrawSphereConfig {
    fn default() -> Self {
        Self {
            radius: 50.0,
            anchor: (0.5, 0.0, -4.5),
        }
    }
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            render_cutoff_m: 1.0e10,
            luminal_threshold_m_s: 10_792_458.0,
            streak_scale: 10.0,
            max_streak_length: 20.0,
            streak_spacing: 0.2,
            max_streak_points: 100,
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            curve: DensityCurveKind::Linear,
            star_density: 100.0,
            planet_density: 250.0,
            max_samples_per_body: 3000,
        }
    }
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            particles_per_frame: 8000,
            batch_weight: 2,
            frame_queue: 4,
        }
    }
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            count: 200,
            points_per_beam: 1300,
            travel_ticks: 50,
            beams_per_tick: 4,
            start_distance: 300.0,
            end_distance: 100.0,
            start_radius: (10.0, 30.0),
            end_radius: (50.0, 100.0),
        }
    }
}

impl Default for ArrivalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            beam_duration_ms: 2000,
            settle_delay_ms: 3500,
            exit_velocity: (-51_000_000.0, 0.0, 0.0),
            braking: (2_300_000.0, 0.0, 0.0),
            cruise_velocity: (-500_000.0, 0.0, 0.0),
        }
    }
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            field_star_count: 200,
            field_extent_ly: 1.0,
            field_star_radius_m: 1_737_400.0,
            ship_start: (500_000_000.0, 0.0, 0.0),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            frame_stats: false,
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Platform config directory for Farsight, if the platform has one.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("farsight"))
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(false)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Check ranges and cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let timing = &self.timing;
        if timing.physics_period_ms == 0 {
            return invalid("timing.physics_period_ms", "must be positive");
        }
        if timing.physics_period_ms != timing.render_period_ms {
            return invalid(
                "timing.render_period_ms",
                format!(
                    "must equal physics_period_ms ({} != {})",
                    timing.render_period_ms, timing.physics_period_ms
                ),
            );
        }
        if timing.task_capacity < 2 {
            return invalid("timing.task_capacity", "must hold at least the two scene tasks");
        }
        if !(0.0..=MAX_RUN_SECONDS).contains(&timing.run_seconds) {
            return invalid(
                "timing.run_seconds",
                format!("must be between 0 and {MAX_RUN_SECONDS}"),
            );
        }

        positive("draw_sphere.radius", self.draw_sphere.radius)?;
        let (x, y, z) = self.draw_sphere.anchor;
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return invalid("draw_sphere.anchor", "must be finite");
        }

        positive("lod.render_cutoff_m", self.lod.render_cutoff_m)?;
        non_negative("lod.luminal_threshold_m_s", self.lod.luminal_threshold_m_s)?;
        non_negative("lod.streak_scale", self.lod.streak_scale)?;
        non_negative("lod.max_streak_length", self.lod.max_streak_length)?;
        positive("lod.streak_spacing", self.lod.streak_spacing)?;
        if self.lod.max_streak_points == 0 {
            return invalid("lod.max_streak_points", "must be positive");
        }

        non_negative("sampling.star_density", self.sampling.star_density)?;
        non_negative("sampling.planet_density", self.sampling.planet_density)?;
        if self.sampling.max_samples_per_body == 0 {
            return invalid("sampling.max_samples_per_body", "must be positive");
        }

        if self.budget.batch_weight == 0 {
            return invalid("budget.batch_weight", "must be positive");
        }
        if self.budget.particles_per_frame < self.budget.batch_weight {
            return invalid(
                "budget.particles_per_frame",
                "must fit at least one batch",
            );
        }
        if self.budget.frame_queue == 0 {
            return invalid("budget.frame_queue", "must be positive");
        }

        if self.beams.travel_ticks == 0 {
            return invalid("beams.travel_ticks", "must be positive");
        }
        ordered_range("beams.start_radius", self.beams.start_radius)?;
        ordered_range("beams.end_radius", self.beams.end_radius)?;

        positive("universe.field_extent_ly", self.universe.field_extent_ly)?;
        positive("universe.field_star_radius_m", self.universe.field_star_radius_m)?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> Result<(), ConfigError> {
    Err(ConfigError::Invalid {
        field,
        reason: reason.into(),
    })
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        invalid(field, format!("must be positive, got {value}"))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        invalid(field, format!("must not be negative, got {value}"))
    }
}

fn ordered_range(field: &'static str, (min, max): (f64, f64)) -> Result<(), ConfigError> {
    non_negative(field, min)?;
    non_negative(field, max)?;
    if min > max {
        return invalid(field, format!("minimum {min} exceeds maximum {max}"));
    }
    Ok(())
}
