//! Deterministic surface sampling for nearby bodies.

use farsight_kinematics::BodyClass;
use glam::DVec3;

/// How the sample count grows with a body's projected radius.
///
/// Both curves are monotone and single-valued; the result is clamped to
/// `[1, max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DensityCurve {
    /// `N = r · per_unit`
    Linear { per_unit: f64 },
    /// `N = r² · per_unit_squared`, faster than linear.
    Quadratic { per_unit_squared: f64 },
}

impl DensityCurve {
    /// Sample count for a projected radius, saturating at `max`.
    pub fn sample_count(&self, projected_radius: f64, max: usize) -> usize {
        let raw = match *self {
            Self::Linear { per_unit } => projected_radius * per_unit,
            Self::Quadratic { per_unit_squared } => {
                projected_radius * projected_radius * per_unit_squared
            }
        };
        let max = max.max(1);
        if !raw.is_finite() || raw >= max as f64 {
            return max;
        }
        (raw.floor() as usize).clamp(1, max)
    }
}

/// Density curves per body class and the per-body sample cap.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplingSettings {
    pub star: DensityCurve,
    pub planet: DensityCurve,
    /// Upper bound on surface samples for any single body.
    pub max_samples_per_body: usize,
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            star: DensityCurve::Linear { per_unit: 100.0 },
            planet: DensityCurve::Linear { per_unit: 250.0 },
            max_samples_per_body: 3000,
        }
    }
}

impl SamplingSettings {
    /// Curve for a body class. Ships are never sampled and use the star curve.
    pub fn curve_for(&self, class: BodyClass) -> DensityCurve {
        match class {
            BodyClass::Planet => self.planet,
            BodyClass::Star | BodyClass::Ship => self.star,
        }
    }

    pub fn sample_count(&self, class: BodyClass, projected_radius: f64) -> usize {
        self.curve_for(class)
            .sample_count(projected_radius, self.max_samples_per_body)
    }
}

/// Sample `index` of `count` on a sphere of `radius` around the origin.
///
/// Colatitude `θ = acos(-1 + 2i/N)` spaces the samples in equal-area bands;
/// longitude `φ = sqrt(N·π) · θ` winds them into a spiral.
pub fn sphere_point(index: usize, count: usize, radius: f64) -> DVec3 {
    let n = count.max(1) as f64;
    let theta = (-1.0 + 2.0 * index as f64 / n).clamp(-1.0, 1.0).acos();
    let phi = (n * std::f64::consts::PI).sqrt() * theta;
    let (sin_theta, cos_theta) = theta.sin_cos();
    DVec3::new(
        phi.cos() * sin_theta * radius,
        phi.sin() * sin_theta * radius,
        cos_theta * radius,
    )
}
