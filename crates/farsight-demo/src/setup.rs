//! Builds the domain settings and the scene from a loaded [`Config`].

use std::time::Duration;

use farsight_config::{Config, DensityCurveKind};
use farsight_coords::{Sector, StarFieldSettings};
use farsight_kinematics::KinematicBody;
use farsight_math::{LightYears, MathError, Point, Spatial, Vector, decimal_from_f64};
use farsight_projector::{DensityCurve, LodSettings, Projector, ProjectorSettings, SamplingSettings};
use farsight_render::{BeamSettings, ParticleBudget, PresentationSink, SceneRenderer};
use farsight_scene::{ArrivalSettings, SceneSettings, SpaceScene};
use glam::DVec3;

pub fn scene_settings(config: &Config) -> SceneSettings {
    SceneSettings {
        physics_period: Duration::from_millis(config.timing.physics_period_ms),
        render_period: Duration::from_millis(config.timing.render_period_ms),
    }
}

pub fn projector_settings(config: &Config) -> Result<ProjectorSettings, MathError> {
    let lod = &config.lod;
    let sampling = &config.sampling;
    let curve = |density: f64| match sampling.curve {
        DensityCurveKind::Linear => DensityCurve::Linear { per_unit: density },
        DensityCurveKind::Quadratic => DensityCurve::Quadratic {
            per_unit_squared: density,
        },
    };
    let (x, y, z) = config.draw_sphere.anchor;

    Ok(ProjectorSettings {
        radius: decimal_from_f64(config.draw_sphere.radius)?,
        anchor: DVec3::new(x, y, z),
        lod: LodSettings {
            render_cutoff: decimal_from_f64(lod.render_cutoff_m)?,
            luminal_threshold: decimal_from_f64(lod.luminal_threshold_m_s)?,
            streak_scale: decimal_from_f64(lod.streak_scale)?,
            max_streak_length: decimal_from_f64(lod.max_streak_length)?,
            streak_spacing: decimal_from_f64(lod.streak_spacing)?,
            max_streak_points: lod.max_streak_points,
        },
        sampling: SamplingSettings {
            star: curve(sampling.star_density),
            planet: curve(sampling.planet_density),
            max_samples_per_body: sampling.max_samples_per_body,
        },
    })
}

pub fn star_field(config: &Config) -> Result<StarFieldSettings, MathError> {
    Ok(StarFieldSettings {
        star_count: config.universe.field_star_count,
        extent: LightYears::from_f64(config.universe.field_extent_ly)?,
        star_radius: decimal_from_f64(config.universe.field_star_radius_m)?,
    })
}

pub fn particle_budget(config: &Config) -> ParticleBudget {
    ParticleBudget {
        per_frame: config.budget.particles_per_frame,
        batch_weight: config.budget.batch_weight,
    }
}

pub fn beam_settings(config: &Config) -> BeamSettings {
    let beams = &config.beams;
    BeamSettings {
        count: beams.count,
        points_per_beam: beams.points_per_beam,
        travel_ticks: beams.travel_ticks,
        beams_per_tick: beams.beams_per_tick,
        start_distance: beams.start_distance,
        end_distance: beams.end_distance,
        start_radius_min: beams.start_radius.0,
        start_radius_max: beams.start_radius.1,
        end_radius_min: beams.end_radius.0,
        end_radius_max: beams.end_radius.1,
        ..BeamSettings::default()
    }
}

pub fn arrival_settings(config: &Config) -> Result<ArrivalSettings, MathError> {
    let arrival = &config.arrival;
    let vector = |(x, y, z): (f64, f64, f64)| Vector::from_f64s(x, y, z);
    Ok(ArrivalSettings {
        beam_duration: Duration::from_millis(arrival.beam_duration_ms),
        exit_velocity: vector(arrival.exit_velocity)?,
        braking: vector(arrival.braking)?,
        settle_delay: Duration::from_millis(arrival.settle_delay_ms),
        cruise_velocity: vector(arrival.cruise_velocity)?,
        beams: beam_settings(config),
        seed: config.universe.seed,
    })
}

/// Ship start position in sector space.
pub fn ship_start(config: &Config) -> Result<Point, MathError> {
    let (x, y, z) = config.universe.ship_start;
    Point::from_f64s(x, y, z)
}

/// The empty-space sector with the ship at its configured start.
pub fn build_scene(
    config: &Config,
    sink: impl PresentationSink + 'static,
) -> Result<SpaceScene, MathError> {
    let seed = config.universe.seed;
    let sector = Sector::empty_space(seed, &star_field(config)?);
    let ship = KinematicBody::at(ship_start(config)?);
    let renderer = SceneRenderer::new(
        Projector::new(projector_settings(config)?),
        particle_budget(config),
        seed,
    );
    Ok(SpaceScene::new(
        scene_settings(config),
        sector,
        ship,
        renderer,
        sink,
    ))
}
