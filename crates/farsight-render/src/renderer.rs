//! Per-frame aggregation of every body in the sector.

use farsight_coords::Sector;
use farsight_kinematics::{BodyClass, KinematicBody};
use farsight_projector::{ObserverView, PointKind, ProjectedPoint, Projector};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::budget::{Candidate, ParticleBudget};
use crate::sink::{Frame, PresentationSink, VisualKind};

/// Counters for one rendered frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub sequence: u64,
    pub bodies_projected: usize,
    pub bodies_skipped: usize,
    pub points_generated: usize,
    pub points_emitted: usize,
    pub particles_emitted: u64,
    pub points_dropped: usize,
}

/// Projects a sector into frames and hands them to a sink.
pub struct SceneRenderer {
    projector: Projector,
    budget: ParticleBudget,
    rng: ChaCha8Rng,
    sequence: u64,
}

impl SceneRenderer {
    pub fn new(projector: Projector, budget: ParticleBudget, seed: u64) -> Self {
        Self {
            projector,
            budget,
            rng: ChaCha8Rng::seed_from_u64(seed),
            sequence: 0,
        }
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub fn budget(&self) -> ParticleBudget {
        self.budget
    }

    /// Sequence number of the next frame.
    pub fn next_sequence(&self) -> u64 {
        self.sequence
    }

    /// Render every renderable body of `sector` as seen by `observer`.
    ///
    /// A body whose projection fails is logged and left out of the frame.
    pub fn render(
        &mut self,
        observer: &KinematicBody,
        sector: &Sector,
        sink: &mut dyn PresentationSink,
    ) -> FrameStats {
        let view = ObserverView::of(observer);
        let mut stats = FrameStats::default();
        let mut candidates = Vec::new();

        for body in sector.renderable() {
            match self.projector.project_with(&view, body) {
                Ok(points) => {
                    stats.bodies_projected += 1;
                    candidates.extend(points.iter().map(candidate));
                }
                Err(e) => {
                    stats.bodies_skipped += 1;
                    warn!(body = body.name(), error = %e, "Skipping body this frame");
                }
            }
        }

        self.emit(candidates, stats, sink)
    }

    /// Submit points that were produced outside the projector, such as the
    /// hyperspace beams, through the same budget.
    pub fn present(
        &mut self,
        candidates: Vec<Candidate>,
        sink: &mut dyn PresentationSink,
    ) -> FrameStats {
        self.emit(candidates, FrameStats::default(), sink)
    }

    fn emit(
        &mut self,
        mut candidates: Vec<Candidate>,
        mut stats: FrameStats,
        sink: &mut dyn PresentationSink,
    ) -> FrameStats {
        stats.sequence = self.sequence;
        stats.points_generated = candidates.len();

        let (requests, dropped) = self.budget.select(&mut candidates, &mut self.rng);
        stats.points_emitted = requests.len();
        stats.points_dropped = dropped;
        stats.particles_emitted = requests.iter().map(|r| u64::from(r.count)).sum();

        sink.present(Frame {
            sequence: self.sequence,
            requests,
        });
        self.sequence += 1;

        debug!(
            sequence = stats.sequence,
            bodies = stats.bodies_projected,
            skipped = stats.bodies_skipped,
            generated = stats.points_generated,
            emitted = stats.points_emitted,
            particles = stats.particles_emitted,
            dropped = stats.points_dropped,
            "Frame rendered"
        );
        stats
    }
}

fn candidate(point: &ProjectedPoint) -> Candidate {
    let kind = match (point.kind, point.class) {
        (PointKind::Streak, _) => VisualKind::Streak,
        (_, BodyClass::Planet) => VisualKind::Planet,
        (_, BodyClass::Star | BodyClass::Ship) => VisualKind::Star,
    };
    Candidate {
        position: point.position,
        kind,
    }
}
