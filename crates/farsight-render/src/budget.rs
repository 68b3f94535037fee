//! Per-frame particle budget.

use glam::DVec3;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::sink::{DrawRequest, VisualKind};

/// A point waiting to be emitted this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub position: DVec3,
    pub kind: VisualKind,
}

/// Caps the number of particles submitted per frame.
///
/// Every emitted point costs `batch_weight` particles. Candidates are shuffled
/// before truncation so the dropped overflow is spread evenly across bodies.
/// Overflow is discarded, never carried into the next frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParticleBudget {
    pub per_frame: u32,
    pub batch_weight: u32,
}

impl Default for ParticleBudget {
    fn default() -> Self {
        Self {
            per_frame: 8000,
            batch_weight: 2,
        }
    }
}

impl ParticleBudget {
    /// Number of points that fit into one frame.
    pub fn capacity(&self) -> usize {
        if self.batch_weight == 0 {
            return 0;
        }
        (self.per_frame / self.batch_weight) as usize
    }

    /// Shuffle `candidates` and turn as many as fit into draw requests.
    ///
    /// Returns the requests and the number of dropped candidates.
    pub fn select<R: Rng + ?Sized>(
        &self,
        candidates: &mut [Candidate],
        rng: &mut R,
    ) -> (Vec<DrawRequest>, usize) {
        let capacity = self.capacity().min(candidates.len());
        let (chosen, rest) = candidates.partial_shuffle(rng, capacity);
        let requests = chosen
            .iter()
            .map(|candidate| DrawRequest {
                position: candidate.position,
                kind: candidate.kind,
                count: self.batch_weight,
            })
            .collect();
        (requests, rest.len())
    }
}
