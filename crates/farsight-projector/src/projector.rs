//! Per-body projection onto the draw sphere.

use farsight_kinematics::{BodyClass, CelestialBody, KinematicBody};
use farsight_math::{Decimal, MathError, Point, Spatial, dec, decimal_to_f64, div_round};
use glam::DVec3;
use tracing::trace;

use crate::lod::{Detail, LodSettings};
use crate::projection::{Compensation, project_radial, project_radial_f64};
use crate::sampling::{SamplingSettings, sphere_point};
use crate::streak::{streak_direction, streak_offsets};
use crate::ProjectionError;

/// Which representation a projected point belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointKind {
    Surface,
    Marker,
    Streak,
}

/// One point on the draw sphere, in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedPoint {
    /// World position, anchor included.
    pub position: DVec3,
    pub kind: PointKind,
    /// Class of the body the point belongs to.
    pub class: BodyClass,
}

/// Draw-sphere geometry plus LOD and sampling tuning.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectorSettings {
    /// Draw-sphere radius R.
    pub radius: Decimal,
    /// World point the sphere is centred on.
    pub anchor: DVec3,
    pub lod: LodSettings,
    pub sampling: SamplingSettings,
}

impl Default for ProjectorSettings {
    fn default() -> Self {
        Self {
            radius: dec(50),
            anchor: DVec3::new(0.5, 0.0, -4.5),
            lod: LodSettings::default(),
            sampling: SamplingSettings::default(),
        }
    }
}

/// Observer state distilled once per frame.
#[derive(Clone, Debug)]
pub struct ObserverView {
    position: Point,
    compensation: Compensation,
    speed: Decimal,
    heading: DVec3,
}

impl ObserverView {
    /// Capture position, orientation and velocity of `observer`.
    pub fn of(observer: &KinematicBody) -> Self {
        let velocity = observer.velocity();
        Self {
            position: observer.position().clone(),
            compensation: Compensation::from_orientation(observer.orientation()),
            speed: velocity.length(),
            heading: streak_direction(velocity),
        }
    }

    /// Observer speed in m/s.
    pub fn speed(&self) -> &Decimal {
        &self.speed
    }
}

/// Maps bodies onto the draw sphere around the observer.
#[derive(Clone, Debug)]
pub struct Projector {
    settings: ProjectorSettings,
    radius: f64,
}

impl Projector {
    /// Creates a projector for the given sphere and tuning.
    pub fn new(settings: ProjectorSettings) -> Self {
        let radius = decimal_to_f64(&settings.radius);
        Self { settings, radius }
    }

    /// Returns the projector settings.
    pub fn settings(&self) -> &ProjectorSettings {
        &self.settings
    }

    /// Draw-sphere radius as `f64`.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// World point the draw sphere is centred on.
    pub fn anchor(&self) -> DVec3 {
        self.settings.anchor
    }

    /// Size of a body on the draw sphere: `r · R / distance`.
    pub fn projected_radius(
        &self,
        body_radius: &Decimal,
        distance: &Decimal,
    ) -> Result<Decimal, MathError> {
        div_round(&(body_radius * &self.settings.radius), distance)
    }

    /// Project one body as seen by `observer`.
    ///
    /// Ships and bodies coincident with the observer yield no points.
    pub fn project_body(
        &self,
        observer: &KinematicBody,
        body: &CelestialBody,
    ) -> Result<Vec<ProjectedPoint>, ProjectionError> {
        self.project_with(&ObserverView::of(observer), body)
    }

    /// Like [`Projector::project_body`] with observer state computed once per frame.
    pub fn project_with(
        &self,
        view: &ObserverView,
        body: &CelestialBody,
    ) -> Result<Vec<ProjectedPoint>, ProjectionError> {
        if !body.is_renderable() {
            return Ok(Vec::new());
        }

        let offset = body.body().position().sub_each(&view.position);
        let distance = offset.length();
        let detail = self.settings.lod.select(&distance, &view.speed)?;

        let centre = match project_radial(&offset, &self.settings.radius)? {
            Some(centre) => centre.to_dvec3(),
            None => return Ok(Vec::new()),
        };
        if !centre.is_finite() {
            return Err(ProjectionError::NonFinite("projected centre"));
        }

        let class = body.class();
        let emit = |kind: PointKind| {
            move |p: DVec3| {
                self.to_world(p, &view.compensation)
                    .map(|position| ProjectedPoint {
                        position,
                        kind,
                        class,
                    })
            }
        };

        let points: Vec<ProjectedPoint> = match &detail {
            Detail::Hidden => Vec::new(),
            Detail::Marker => emit(PointKind::Marker)(centre).into_iter().collect(),
            Detail::Streak { length, points } => {
                streak_offsets(view.heading, decimal_to_f64(length), *points)
                    .filter_map(|offset| emit(PointKind::Streak)(centre + offset))
                    .collect()
            }
            Detail::Surface => {
                let projected_radius =
                    decimal_to_f64(&self.projected_radius(body.radius(), &distance)?);
                if !projected_radius.is_finite() {
                    return Err(ProjectionError::NonFinite("projected radius"));
                }
                let count = self.settings.sampling.sample_count(class, projected_radius);
                (0..count)
                    .map(|i| centre + sphere_point(i, count, projected_radius))
                    .filter(|sample| sample.length() <= self.radius)
                    .filter_map(emit(PointKind::Surface))
                    .collect()
            }
        };

        trace!(
            body = body.name(),
            ?detail,
            points = points.len(),
            "Projected body"
        );
        Ok(points)
    }

    /// Radially project a draw-frame point onto the sphere, undo the observer
    /// orientation, and move it to world space.
    fn to_world(&self, p: DVec3, compensation: &Compensation) -> Option<DVec3> {
        project_radial_f64(p, self.radius).map(|on_sphere| {
            self.settings.anchor + compensation.apply(on_sphere)
        })
    }
}
