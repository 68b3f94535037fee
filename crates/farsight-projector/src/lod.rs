//! Distance and speed based level-of-detail selection.

use farsight_math::{Decimal, MathError, SPEED_OF_LIGHT_M_S, dec, div_round};
use num_traits::{ToPrimitive, Zero};

/// How a body is drawn this frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Detail {
    /// Observer coincides with the body; nothing is drawn.
    Hidden,
    /// Beyond the render cutoff: one point at the projected centre.
    Marker,
    /// Beyond the render cutoff while the observer exceeds the luminal
    /// threshold: a short line of points along the velocity.
    Streak { length: Decimal, points: usize },
    /// Within the render cutoff: full surface sampling.
    Surface,
}

/// Thresholds and streak shaping.
#[derive(Clone, Debug, PartialEq)]
pub struct LodSettings {
    /// Bodies farther than this (meters) are drawn as a marker or streak.
    pub render_cutoff: Decimal,
    /// Observer speed above which far bodies turn into streaks.
    pub luminal_threshold: Decimal,
    /// Streak length at exactly the speed of light.
    pub streak_scale: Decimal,
    pub max_streak_length: Decimal,
    /// Distance between consecutive streak points.
    pub streak_spacing: Decimal,
    pub max_streak_points: usize,
}

impl Default for LodSettings {
    fn default() -> Self {
        Self {
            render_cutoff: dec(10_000_000_000),
            luminal_threshold: dec(10_792_458),
            streak_scale: dec(10),
            max_streak_length: dec(20),
            streak_spacing: Decimal::new(2.into(), 1),
            max_streak_points: 100,
        }
    }
}

impl LodSettings {
    /// Choose the detail level for a body at `distance` from an observer moving
    /// at `observer_speed`.
    pub fn select(&self, distance: &Decimal, observer_speed: &Decimal) -> Result<Detail, MathError> {
        if distance.is_zero() {
            return Ok(Detail::Hidden);
        }
        if distance <= &self.render_cutoff {
            return Ok(Detail::Surface);
        }
        if observer_speed <= &self.luminal_threshold {
            return Ok(Detail::Marker);
        }

        let length = self.streak_length(observer_speed)?;
        let points = self.streak_points(&length)?;
        Ok(Detail::Streak { length, points })
    }

    /// `min(speed · streak_scale / c, max_streak_length)`.
    pub fn streak_length(&self, speed: &Decimal) -> Result<Decimal, MathError> {
        let length = div_round(&(speed * &self.streak_scale), &dec(SPEED_OF_LIGHT_M_S))?;
        Ok(length.min(self.max_streak_length.clone()))
    }

    /// `floor(length / spacing)`, within `[1, max_streak_points]`.
    pub fn streak_points(&self, length: &Decimal) -> Result<usize, MathError> {
        let raw = div_round(length, &self.streak_spacing)?.with_scale(0);
        let max = self.max_streak_points.max(1);
        Ok(raw.to_usize().unwrap_or(max).clamp(1, max))
    }
}
